// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::config::settings::StorageSettings;
use crate::domain::models::document::{CrawledDocument, DocumentKind};
use crate::domain::repositories::document_repository::DocumentRepository;
use crate::utils::errors::RepositoryError;

/// 本地文件系统文档仓库
///
/// 每个文档保存为 `{base}/{collection}/{id}.json`
pub struct LocalDocumentRepository {
    base_path: PathBuf,
}

impl LocalDocumentRepository {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn collection_path(&self, kind: DocumentKind) -> PathBuf {
        self.base_path.join(kind.collection())
    }

    async fn read_collection(&self, kind: DocumentKind) -> Result<Vec<CrawledDocument>, RepositoryError> {
        let dir = self.collection_path(kind);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::Io(e)),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let data = match fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path.display(), "Skipping unreadable document: {}", e);
                    continue;
                }
            };
            match serde_json::from_slice(&data) {
                Ok(document) => documents.push(document),
                Err(e) => warn!(path = %path.display(), "Skipping corrupt document: {}", e),
            }
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentRepository for LocalDocumentRepository {
    async fn save(&self, document: &CrawledDocument) -> Result<(), RepositoryError> {
        let dir = self.collection_path(document.kind);

        // 确保目录存在
        fs::create_dir_all(&dir).await?;

        let full_path = dir.join(format!("{}.json", document.id));
        let data = serde_json::to_vec_pretty(document)?;

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(())
    }

    async fn find_by_link(
        &self,
        kind: DocumentKind,
        link: &str,
    ) -> Result<Option<CrawledDocument>, RepositoryError> {
        Ok(self
            .read_collection(kind)
            .await?
            .into_iter()
            .find(|d| d.link == link))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<CrawledDocument>, RepositoryError> {
        let mut documents = Vec::new();
        for kind in [
            DocumentKind::Post,
            DocumentKind::Article,
            DocumentKind::Repository,
        ] {
            documents.extend(
                self.read_collection(kind)
                    .await?
                    .into_iter()
                    .filter(|d| d.author_id == author_id),
            );
        }
        Ok(documents)
    }
}

/// 内存文档仓库（用于单元测试和不落盘的运行）
pub struct InMemoryDocumentRepository {
    data: Arc<RwLock<Vec<CrawledDocument>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// 已保存的文档数量
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &CrawledDocument) -> Result<(), RepositoryError> {
        let mut documents = self.data.write().await;
        documents.push(document.clone());
        Ok(())
    }

    async fn find_by_link(
        &self,
        kind: DocumentKind,
        link: &str,
    ) -> Result<Option<CrawledDocument>, RepositoryError> {
        let documents = self.data.read().await;
        Ok(documents
            .iter()
            .find(|d| d.kind == kind && d.link == link)
            .cloned())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<CrawledDocument>, RepositoryError> {
        let documents = self.data.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.author_id == author_id)
            .cloned()
            .collect())
    }
}

/// 存储工厂函数
pub fn create_document_repository(
    settings: &StorageSettings,
) -> Result<Arc<dyn DocumentRepository>, RepositoryError> {
    match settings.storage_type.as_str() {
        "local" => {
            let base_path = settings
                .local_path
                .clone()
                .unwrap_or_else(|| "./storage".to_string());
            Ok(Arc::new(LocalDocumentRepository::new(base_path)))
        }
        "memory" => Ok(Arc::new(InMemoryDocumentRepository::new())),
        other => Err(RepositoryError::InvalidParameter(format!(
            "Unsupported storage type: {}",
            other
        ))),
    }
}

/// 存储根目录
pub fn storage_root(settings: &StorageSettings) -> &Path {
    Path::new(settings.local_path.as_deref().unwrap_or("./storage"))
}
