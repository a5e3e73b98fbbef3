// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::crawlers::browser::{BrowserPage, BrowserSession, LoginHook, SessionLauncher};
use crate::crawlers::profile::ContentProfile;
use crate::crawlers::scroll::{scroll_to_stability, ScrollOutcome, ScrollSettings};
use crate::crawlers::traits::{CrawlerError, CrawlerKind, Extractor, ExtractorFactory};
use crate::domain::models::document::CrawledDocument;
use crate::domain::models::user::UserIdentity;
use crate::domain::repositories::document_repository::DocumentRepository;

/// 浏览器抽取器
///
/// 独占一个浏览器会话。抓取前先滚动页面直到懒加载内容全部出现。
pub struct BrowserCrawler {
    kind: CrawlerKind,
    profile: ContentProfile,
    session: Box<dyn BrowserSession>,
    repository: Arc<dyn DocumentRepository>,
    scroll: ScrollSettings,
    login: Arc<dyn LoginHook>,
}

impl BrowserCrawler {
    pub fn new(
        kind: CrawlerKind,
        profile: ContentProfile,
        session: Box<dyn BrowserSession>,
        repository: Arc<dyn DocumentRepository>,
        scroll: ScrollSettings,
        login: Arc<dyn LoginHook>,
    ) -> Self {
        Self {
            kind,
            profile,
            session,
            repository,
            scroll,
            login,
        }
    }

    /// 加载页面中所有懒加载的内容
    pub async fn scroll_page(&self, page: &dyn BrowserPage) -> Result<ScrollOutcome, CrawlerError> {
        scroll_to_stability(page, &self.scroll).await
    }
}

#[async_trait]
impl Extractor for BrowserCrawler {
    async fn extract(&mut self, link: &str, owner: &UserIdentity) -> Result<(), CrawlerError> {
        if self
            .repository
            .find_by_link(self.profile.kind, link)
            .await?
            .is_some()
        {
            info!("Document already exists in the database: {}", link);
            return Ok(());
        }

        info!("Starting scraping {} page: {}", self.profile.platform, link);

        let page = self.session.new_page().await?;
        self.login.login(page.as_ref()).await?;
        page.goto(link).await?;

        let scrolled = self.scroll_page(page.as_ref()).await?;
        debug!(
            scrolls = scrolled.scrolls,
            stop = ?scrolled.stop,
            height = scrolled.final_height,
            "Page scrolled"
        );

        let html = page.content().await?;
        let extracted = self.profile.parse(&html)?;

        let document = CrawledDocument::new(
            self.profile.kind,
            self.profile.platform,
            link,
            extracted.title,
            extracted.content,
            owner,
        );
        self.repository.save(&document).await?;

        info!("Finished scraping {} page: {}", self.profile.platform, link);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), CrawlerError> {
        self.session.close().await
    }

    fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// 浏览器抽取器工厂
///
/// 每次创建抽取器都会启动一个新的浏览器会话
pub struct BrowserCrawlerFactory {
    kind: CrawlerKind,
    profile: ContentProfile,
    launcher: Arc<dyn SessionLauncher>,
    repository: Arc<dyn DocumentRepository>,
    scroll: ScrollSettings,
    login: Arc<dyn LoginHook>,
}

impl BrowserCrawlerFactory {
    pub fn new(
        kind: CrawlerKind,
        profile: ContentProfile,
        launcher: Arc<dyn SessionLauncher>,
        repository: Arc<dyn DocumentRepository>,
        scroll: ScrollSettings,
        login: Arc<dyn LoginHook>,
    ) -> Self {
        Self {
            kind,
            profile,
            launcher,
            repository,
            scroll,
            login,
        }
    }
}

#[async_trait]
impl ExtractorFactory for BrowserCrawlerFactory {
    fn kind(&self) -> CrawlerKind {
        self.kind
    }

    async fn create(&self) -> Result<Box<dyn Extractor>, CrawlerError> {
        let session = self.launcher.launch().await?;
        Ok(Box::new(BrowserCrawler::new(
            self.kind,
            self.profile,
            session,
            self.repository.clone(),
            self.scroll,
            self.login.clone(),
        )))
    }
}
