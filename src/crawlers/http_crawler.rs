// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use crate::crawlers::profile::ContentProfile;
use crate::crawlers::traits::{CrawlerError, CrawlerKind, Extractor, ExtractorFactory};
use crate::domain::models::document::CrawledDocument;
use crate::domain::models::user::UserIdentity;
use crate::domain::repositories::document_repository::DocumentRepository;

/// HTTP 抽取器
///
/// 用于不需要执行 JavaScript 的页面
pub struct HttpCrawler {
    kind: CrawlerKind,
    profile: ContentProfile,
    client: Client,
    repository: Arc<dyn DocumentRepository>,
}

impl HttpCrawler {
    pub fn new(
        kind: CrawlerKind,
        profile: ContentProfile,
        client: Client,
        repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            kind,
            profile,
            client,
            repository,
        }
    }

    async fn fetch(&self, link: &str) -> Result<String, CrawlerError> {
        let response = self.client.get(link).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Extractor for HttpCrawler {
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

        let html = self.fetch(link).await?;
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

    fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// HTTP 抽取器工厂
pub struct HttpCrawlerFactory {
    kind: CrawlerKind,
    profile: ContentProfile,
    client: Client,
    repository: Arc<dyn DocumentRepository>,
}

impl HttpCrawlerFactory {
    pub fn new(
        kind: CrawlerKind,
        profile: ContentProfile,
        client: Client,
        repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            kind,
            profile,
            client,
            repository,
        }
    }
}

#[async_trait]
impl ExtractorFactory for HttpCrawlerFactory {
    fn kind(&self) -> CrawlerKind {
        self.kind
    }

    async fn create(&self) -> Result<Box<dyn Extractor>, CrawlerError> {
        Ok(Box::new(HttpCrawler::new(
            self.kind,
            self.profile,
            self.client.clone(),
            self.repository.clone(),
        )))
    }
}
