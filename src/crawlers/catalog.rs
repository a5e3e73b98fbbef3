// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::settings::Settings;
use crate::crawlers::browser::{LaunchOptions, LoginHook, NoLogin, SessionLauncher};
use crate::crawlers::browser_crawler::BrowserCrawlerFactory;
use crate::crawlers::chromium::ChromiumLauncher;
use crate::crawlers::dispatcher::CrawlerDispatcher;
use crate::crawlers::http_crawler::HttpCrawlerFactory;
use crate::crawlers::profile::ContentProfile;
use crate::crawlers::scroll::ScrollSettings;
use crate::crawlers::traits::{CrawlerError, CrawlerKind, ExtractorFactory};
use crate::domain::repositories::document_repository::DocumentRepository;

/// 内置抽取器目录
///
/// 持有各抽取器共享的依赖，按平台产出工厂
pub struct CrawlerCatalog {
    repository: Arc<dyn DocumentRepository>,
    launcher: Arc<dyn SessionLauncher>,
    client: Client,
    scroll: ScrollSettings,
    login_hooks: HashMap<CrawlerKind, Arc<dyn LoginHook>>,
}

impl CrawlerCatalog {
    pub fn new(
        repository: Arc<dyn DocumentRepository>,
        launcher: Arc<dyn SessionLauncher>,
        client: Client,
        scroll: ScrollSettings,
    ) -> Self {
        Self {
            repository,
            launcher,
            client,
            scroll,
            login_hooks: HashMap::new(),
        }
    }

    /// 根据配置创建目录，浏览器使用 Chromium
    pub fn from_settings(
        settings: &Settings,
        repository: Arc<dyn DocumentRepository>,
    ) -> Result<Self, CrawlerError> {
        let client = Client::builder()
            .user_agent(settings.crawler.user_agent.as_str())
            .timeout(Duration::from_secs(settings.crawler.http_timeout_secs))
            .build()
            .map_err(|e| CrawlerError::Configuration(e.to_string()))?;
        let launcher = Arc::new(ChromiumLauncher::new(LaunchOptions::from(&settings.browser)));

        Ok(Self::new(
            repository,
            launcher,
            client,
            settings.scroll_settings(),
        ))
    }

    /// 为某个平台设置登录钩子
    pub fn with_login_hook(mut self, kind: CrawlerKind, hook: Arc<dyn LoginHook>) -> Self {
        self.login_hooks.insert(kind, hook);
        self
    }

    fn login_hook(&self, kind: CrawlerKind) -> Arc<dyn LoginHook> {
        self.login_hooks
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Arc::new(NoLogin))
    }

    fn browser(&self, kind: CrawlerKind, profile: ContentProfile) -> Arc<dyn ExtractorFactory> {
        Arc::new(BrowserCrawlerFactory::new(
            kind,
            profile,
            self.launcher.clone(),
            self.repository.clone(),
            self.scroll,
            self.login_hook(kind),
        ))
    }

    fn http(&self, kind: CrawlerKind, profile: ContentProfile) -> Arc<dyn ExtractorFactory> {
        Arc::new(HttpCrawlerFactory::new(
            kind,
            profile,
            self.client.clone(),
            self.repository.clone(),
        ))
    }

    pub fn linkedin(&self) -> Arc<dyn ExtractorFactory> {
        self.browser(CrawlerKind::LinkedIn, ContentProfile::LINKEDIN)
    }

    pub fn medium(&self) -> Arc<dyn ExtractorFactory> {
        self.browser(CrawlerKind::Medium, ContentProfile::MEDIUM)
    }

    pub fn github(&self) -> Arc<dyn ExtractorFactory> {
        self.http(CrawlerKind::GitHub, ContentProfile::GITHUB)
    }

    pub fn custom_article(&self) -> Arc<dyn ExtractorFactory> {
        self.http(CrawlerKind::CustomArticle, ContentProfile::CUSTOM_ARTICLE)
    }

    /// LinkedIn、Medium、GitHub 加上通用文章兜底
    pub fn standard_dispatcher(&self) -> Result<CrawlerDispatcher, CrawlerError> {
        Ok(CrawlerDispatcher::builder()
            .register_linkedin(self)?
            .register_medium(self)?
            .register_github(self)?
            .with_default(self.custom_article())
            .build())
    }
}
