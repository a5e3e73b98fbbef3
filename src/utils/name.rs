// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::RepositoryError;

/// 将用户全名拆分为 (名, 姓)
///
/// 只有一个词时名和姓相同；多个词时最后一个词为姓，其余为名。
pub fn split_user_full_name(full_name: &str) -> Result<(String, String), RepositoryError> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();

    match tokens.as_slice() {
        [] => Err(RepositoryError::InvalidParameter(
            "user full name is empty".to_string(),
        )),
        [single] => Ok((single.to_string(), single.to_string())),
        [first @ .., last] => Ok((first.join(" "), last.to_string())),
    }
}
