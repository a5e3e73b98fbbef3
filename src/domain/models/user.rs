// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户身份
///
/// 爬取内容的所有者。由身份解析步骤提供，爬取过程只读取不修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// 用户唯一标识符
    pub id: Uuid,
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
}

impl UserIdentity {
    /// 创建一个新的用户身份，生成新的ID
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// 全名
    pub fn full_name(&self) -> String {
        if self.first_name == self.last_name {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}
