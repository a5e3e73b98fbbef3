// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::domain::models::user::UserIdentity;
use crate::utils::errors::RepositoryError;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 按姓名查找用户，不存在时创建
    async fn get_or_create(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserIdentity, RepositoryError>;
}
