// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::user::UserIdentity;

/// 文档类型
///
/// 每个抽取器在构造时注入其文档类型，决定抓取结果存入哪个集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// 社交网络帖子
    Post,
    /// 文章
    Article,
    /// 代码仓库
    Repository,
}

impl DocumentKind {
    /// 集合名称
    pub fn collection(&self) -> &'static str {
        match self {
            DocumentKind::Post => "posts",
            DocumentKind::Article => "articles",
            DocumentKind::Repository => "repositories",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// 已抓取的文档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledDocument {
    /// 文档唯一标识符
    pub id: Uuid,
    /// 文档类型
    pub kind: DocumentKind,
    /// 来源平台名称
    pub platform: String,
    /// 来源链接
    pub link: String,
    /// 标题（可选）
    pub title: Option<String>,
    /// 正文内容
    pub content: String,
    /// 所有者ID
    pub author_id: Uuid,
    /// 所有者全名
    pub author_full_name: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl CrawledDocument {
    /// 为指定所有者创建一个新文档
    pub fn new(
        kind: DocumentKind,
        platform: impl Into<String>,
        link: impl Into<String>,
        title: Option<String>,
        content: String,
        owner: &UserIdentity,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            platform: platform.into(),
            link: link.into(),
            title,
            content,
            author_id: owner.id,
            author_full_name: owner.full_name(),
            created_at: Utc::now(),
        }
    }
}
