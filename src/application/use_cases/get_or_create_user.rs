// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::domain::models::user::UserIdentity;
use crate::domain::repositories::metadata_sink::RunMetadataSink;
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::RepositoryError;
use crate::utils::name::split_user_full_name;

/// 元数据输出名
pub const USER_OUTPUT: &str = "user";

/// 获取或创建用户用例
pub struct GetOrCreateUserUseCase {
    users: Arc<dyn UserRepository>,
    metadata_sink: Arc<dyn RunMetadataSink>,
}

impl GetOrCreateUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>, metadata_sink: Arc<dyn RunMetadataSink>) -> Self {
        Self {
            users,
            metadata_sink,
        }
    }

    /// 根据全名获取用户，不存在时创建
    pub async fn execute(&self, user_full_name: &str) -> Result<UserIdentity, RepositoryError> {
        info!("Getting or creating user: {}", user_full_name);

        let (first_name, last_name) = split_user_full_name(user_full_name)?;
        let user = self.users.get_or_create(&first_name, &last_name).await?;

        self.metadata_sink
            .add_output_metadata(USER_OUTPUT, metadata(user_full_name, &user));

        Ok(user)
    }
}

fn metadata(user_full_name: &str, user: &UserIdentity) -> serde_json::Value {
    json!({
        "query": {
            "user_full_name": user_full_name,
        },
        "retrieved": {
            "user_id": user.id.to_string(),
            "first_name": user.first_name,
            "last_name": user.last_name,
        },
    })
}
