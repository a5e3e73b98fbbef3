// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::user::UserIdentity;
use crate::utils::errors::RepositoryError;

/// 爬虫错误类型
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// 调度器注册配置错误
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// 无法解析出主机的URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// 浏览器会话不可用
    #[error("Browser session error: {0}")]
    Session(String),
    /// 抓取、解析过程中的其他错误
    #[error("Extraction failed: {0}")]
    Extraction(String),
    /// 没有匹配的抽取器，也没有注册默认抽取器
    #[error("No extractor registered for '{0}'")]
    NoExtractor(String),
    /// 持久化失败
    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
    /// 批次被取消
    #[error("Cancelled")]
    Cancelled,
}

impl CrawlerError {
    /// 是否为启动阶段的错误（应当终止整个运行）
    pub fn is_setup_error(&self) -> bool {
        matches!(self, CrawlerError::Configuration(_))
    }

    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        CrawlerError::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for CrawlerError {
    fn from(e: reqwest::Error) -> Self {
        CrawlerError::Extraction(e.to_string())
    }
}

/// 已知的抽取器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlerKind {
    LinkedIn,
    Medium,
    GitHub,
    /// 兜底的通用文章抽取器
    CustomArticle,
}

impl CrawlerKind {
    pub fn name(&self) -> &'static str {
        match self {
            CrawlerKind::LinkedIn => "linkedin",
            CrawlerKind::Medium => "medium",
            CrawlerKind::GitHub => "github",
            CrawlerKind::CustomArticle => "custom_article",
        }
    }
}

impl std::fmt::Display for CrawlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 内容抽取器特质
///
/// 抓取一个链接的内容并以 `owner` 的名义持久化。错误原样返回给调用方，
/// 由编排层负责隔离。
#[async_trait]
pub trait Extractor: Send {
    /// 执行抽取
    async fn extract(&mut self, link: &str, owner: &UserIdentity) -> Result<(), CrawlerError>;

    /// 释放抽取器持有的资源（例如浏览器会话）
    ///
    /// 无论 `extract` 成功与否，调用方都必须调用一次
    async fn close(&mut self) -> Result<(), CrawlerError> {
        Ok(())
    }

    /// 抽取器名称
    fn name(&self) -> &'static str;
}

/// 抽取器工厂特质
///
/// 每次调用 `create` 都产生一个独立的抽取器实例，实例之间不共享会话状态
#[async_trait]
pub trait ExtractorFactory: Send + Sync {
    /// 该工厂产生的抽取器类型
    fn kind(&self) -> CrawlerKind;

    /// 创建抽取器
    async fn create(&self) -> Result<Box<dyn Extractor>, CrawlerError>;
}
