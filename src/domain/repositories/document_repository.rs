// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::document::{CrawledDocument, DocumentKind};
use crate::utils::errors::RepositoryError;

/// 文档仓库特质
///
/// 抽取器通过它持久化抓取结果。去重和更新语义由实现负责。
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// 保存文档
    async fn save(&self, document: &CrawledDocument) -> Result<(), RepositoryError>;

    /// 根据链接查找指定类型的文档
    async fn find_by_link(
        &self,
        kind: DocumentKind,
        link: &str,
    ) -> Result<Option<CrawledDocument>, RepositoryError>;

    /// 列出某个所有者的全部文档
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<CrawledDocument>, RepositoryError>;
}
