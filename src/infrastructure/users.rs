// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

use crate::domain::models::user::UserIdentity;
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::RepositoryError;

/// 内存用户仓库
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<UserIdentity>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_or_create(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserIdentity, RepositoryError> {
        let mut users = self.users.write().await;
        if let Some(user) = users
            .iter()
            .find(|u| u.first_name == first_name && u.last_name == last_name)
        {
            return Ok(user.clone());
        }

        let user = UserIdentity::new(first_name, last_name);
        users.push(user.clone());
        Ok(user)
    }
}

/// 本地文件用户仓库，所有用户保存在一个 JSON 文件中
pub struct LocalUserRepository {
    path: PathBuf,
    // serializes read-modify-write of the file
    lock: Mutex<()>,
}

impl LocalUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<UserIdentity>, RepositoryError> {
        match fs::read(&self.path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }
}

#[async_trait]
impl UserRepository for LocalUserRepository {
    async fn get_or_create(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserIdentity, RepositoryError> {
        let _guard = self.lock.lock().await;

        let mut users = self.load().await?;
        if let Some(user) = users
            .iter()
            .find(|u| u.first_name == first_name && u.last_name == last_name)
        {
            return Ok(user.clone());
        }

        let user = UserIdentity::new(first_name, last_name);
        users.push(user.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&users)?).await?;

        Ok(user)
    }
}
