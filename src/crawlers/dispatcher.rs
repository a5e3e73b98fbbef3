// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::crawlers::catalog::CrawlerCatalog;
use crate::crawlers::traits::{CrawlerError, CrawlerKind, ExtractorFactory};
use crate::utils::url_utils;

static HOST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$")
        .expect("host pattern regex is valid")
});

/// 域名与抽取器工厂的注册项
#[derive(Clone)]
pub struct CrawlerRegistration {
    pattern: String,
    factory: Arc<dyn ExtractorFactory>,
}

impl CrawlerRegistration {
    /// 创建注册项
    ///
    /// `pattern` 可以是主机名（`medium.com`）或URL（`https://www.medium.com/`），
    /// 统一规范化为不带 `www.` 的小写主机名
    pub fn new(pattern: &str, factory: Arc<dyn ExtractorFactory>) -> Result<Self, CrawlerError> {
        Ok(Self {
            pattern: normalize_pattern(pattern)?,
            factory,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> CrawlerKind {
        self.factory.kind()
    }

    /// 主机等于模式或是模式的子域名
    fn matches(&self, host: &str) -> bool {
        host == self.pattern
            || host
                .strip_suffix(self.pattern.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

fn normalize_pattern(pattern: &str) -> Result<String, CrawlerError> {
    let raw = pattern.trim();
    if raw.is_empty() {
        return Err(CrawlerError::Configuration(
            "domain pattern must not be empty".to_string(),
        ));
    }

    let host = if raw.contains("://") {
        let url = Url::parse(raw).map_err(|e| {
            CrawlerError::Configuration(format!("invalid domain pattern '{}': {}", raw, e))
        })?;
        if !matches!(url.path(), "" | "/") || url.query().is_some() {
            return Err(CrawlerError::Configuration(format!(
                "domain pattern '{}' must not contain a path or query",
                raw
            )));
        }
        url.host_str().unwrap_or_default().to_string()
    } else {
        raw.to_string()
    };

    let host = url_utils::normalize_host(&host);
    if !HOST_PATTERN.is_match(&host) {
        return Err(CrawlerError::Configuration(format!(
            "invalid domain pattern '{}'",
            raw
        )));
    }
    Ok(host)
}

/// 解析结果
#[derive(Clone)]
pub struct ResolvedCrawler {
    /// 链接的主机名，用作统计分组键
    pub domain: String,
    /// 选中的抽取器类型
    pub kind: CrawlerKind,
    /// 用于创建抽取器的工厂
    pub factory: Arc<dyn ExtractorFactory>,
}

impl fmt::Debug for ResolvedCrawler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCrawler")
            .field("domain", &self.domain)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// 爬虫调度器
///
/// 根据链接的主机名选择抽取器。构建完成后只读，可以在多个任务间共享。
#[derive(Clone, Default)]
pub struct CrawlerDispatcher {
    registrations: Vec<CrawlerRegistration>,
    default: Option<Arc<dyn ExtractorFactory>>,
}

impl CrawlerDispatcher {
    /// 创建一个空的调度器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建调度器构建器
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// 注册一个域名模式
    ///
    /// 模式为空、格式错误或重复注册时返回 `CrawlerError::Configuration`
    pub fn register(
        &mut self,
        pattern: &str,
        factory: Arc<dyn ExtractorFactory>,
    ) -> Result<(), CrawlerError> {
        let registration = CrawlerRegistration::new(pattern, factory)?;
        if self
            .registrations
            .iter()
            .any(|r| r.pattern == registration.pattern)
        {
            return Err(CrawlerError::Configuration(format!(
                "domain pattern '{}' is already registered",
                registration.pattern
            )));
        }
        debug!(
            pattern = %registration.pattern,
            kind = %registration.kind(),
            "Registered crawler"
        );
        self.registrations.push(registration);
        Ok(())
    }

    /// 设置未匹配任何模式时使用的默认工厂
    pub fn set_default(&mut self, factory: Arc<dyn ExtractorFactory>) {
        self.default = Some(factory);
    }

    /// 已注册的模式
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.pattern())
    }

    /// 为链接选择抽取器
    ///
    /// 只看主机名（忽略端口、路径和查询参数），最长的匹配模式优先。
    /// 没有匹配时使用默认工厂；没有默认工厂时返回 `CrawlerError::NoExtractor`。
    pub fn resolve(&self, link: &str) -> Result<ResolvedCrawler, CrawlerError> {
        let url =
            Url::parse(link.trim()).map_err(|e| CrawlerError::invalid_url(link, e.to_string()))?;
        let domain = url
            .host_str()
            .filter(|h| !h.is_empty())
            .map(|h| h.to_ascii_lowercase())
            .ok_or_else(|| CrawlerError::invalid_url(link, "URL has no host"))?;

        let host = url_utils::normalize_host(&domain);
        let factory = self
            .registrations
            .iter()
            .filter(|r| r.matches(&host))
            .max_by_key(|r| r.pattern.len())
            .map(|r| r.factory.clone())
            .or_else(|| self.default.clone())
            .ok_or_else(|| CrawlerError::NoExtractor(domain.clone()))?;

        Ok(ResolvedCrawler {
            kind: factory.kind(),
            domain,
            factory,
        })
    }
}

/// 调度器构建器
#[derive(Default)]
pub struct DispatcherBuilder {
    dispatcher: CrawlerDispatcher,
}

impl DispatcherBuilder {
    /// 注册一个域名模式
    pub fn register(
        mut self,
        pattern: &str,
        factory: Arc<dyn ExtractorFactory>,
    ) -> Result<Self, CrawlerError> {
        self.dispatcher.register(pattern, factory)?;
        Ok(self)
    }

    /// 设置默认工厂
    pub fn with_default(mut self, factory: Arc<dyn ExtractorFactory>) -> Self {
        self.dispatcher.set_default(factory);
        self
    }

    pub fn register_linkedin(self, catalog: &CrawlerCatalog) -> Result<Self, CrawlerError> {
        self.register("linkedin.com", catalog.linkedin())
    }

    pub fn register_medium(self, catalog: &CrawlerCatalog) -> Result<Self, CrawlerError> {
        self.register("medium.com", catalog.medium())
    }

    pub fn register_github(self, catalog: &CrawlerCatalog) -> Result<Self, CrawlerError> {
        self.register("github.com", catalog.github())
    }

    pub fn build(self) -> CrawlerDispatcher {
        self.dispatcher
    }
}
