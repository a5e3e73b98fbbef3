// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::crawlers::dispatcher::CrawlerDispatcher;
use crate::crawlers::traits::CrawlerError;
use crate::domain::models::crawl::{CrawlOutcome, CrawlReport, DomainMetrics};
use crate::domain::models::user::UserIdentity;
use crate::domain::repositories::metadata_sink::RunMetadataSink;
use crate::utils::url_utils;

/// 元数据输出名
pub const CRAWLED_LINKS_OUTPUT: &str = "crawled_links";

/// 批量爬取链接用例
///
/// 对每个链接：解析抽取器、创建实例、抽取、释放。单个链接的任何失败
/// （包括 panic）只记入该链接所属域名的统计，不会中断整个批次。
pub struct CrawlLinksUseCase {
    dispatcher: Arc<CrawlerDispatcher>,
    metadata_sink: Arc<dyn RunMetadataSink>,
    concurrency: usize,
}

impl CrawlLinksUseCase {
    pub fn new(dispatcher: Arc<CrawlerDispatcher>, metadata_sink: Arc<dyn RunMetadataSink>) -> Self {
        Self {
            dispatcher,
            metadata_sink,
            concurrency: 1,
        }
    }

    /// 同时处理的链接数，最小为1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 爬取全部链接并返回报告
    pub async fn execute(&self, owner: &UserIdentity, links: Vec<String>) -> CrawlReport {
        self.execute_with_cancellation(owner, links, CancellationToken::new())
            .await
    }

    /// 可取消的批量爬取
    ///
    /// 取消后正在进行的抽取被中止，尚未开始的链接直接记为失败；
    /// 两种情况都会计入统计，因此所有域名的 `total` 之和始终等于输入链接数。
    pub async fn execute_with_cancellation(
        &self,
        owner: &UserIdentity,
        links: Vec<String>,
        cancel: CancellationToken,
    ) -> CrawlReport {
        let total = links.len();
        info!("Starting to crawl {} link(s).", total);

        let mut metrics = DomainMetrics::new();
        let mut successful: u64 = 0;

        {
            let mut outcomes = stream::iter(links.iter().enumerate())
                .map(|(index, link)| self.crawl_link(index, total, link, owner, &cancel))
                .buffer_unordered(self.concurrency);

            // 统计只在这里写入
            while let Some(outcome) = outcomes.next().await {
                successful += u64::from(outcome.success);
                metrics.record(&outcome);
            }
        }

        self.metadata_sink
            .add_output_metadata(CRAWLED_LINKS_OUTPUT, metrics.to_metadata());

        let cancelled = cancel.is_cancelled();
        if cancelled {
            warn!("Crawl batch was cancelled.");
        }
        info!("Successfully crawled {} / {} links.", successful, total);

        CrawlReport {
            links,
            metrics,
            successful,
            cancelled,
        }
    }

    #[instrument(skip_all, fields(url = %link))]
    async fn crawl_link(
        &self,
        index: usize,
        total: usize,
        link: &str,
        owner: &UserIdentity,
        cancel: &CancellationToken,
    ) -> CrawlOutcome {
        let domain = url_utils::domain_or_raw(link);

        if cancel.is_cancelled() {
            warn!("Skipping link, batch was cancelled");
            record_job(&domain, false);
            return CrawlOutcome::failed(domain);
        }

        debug!("[{}/{}] Crawling {}", index + 1, total, link);

        let success = match AssertUnwindSafe(self.try_crawl(link, owner, cancel))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("An error occurred while crawling: {}", e);
                false
            }
            Err(panic) => {
                error!(
                    "Crawl job panicked: {}",
                    panic_message(panic.as_ref())
                );
                false
            }
        };

        record_job(&domain, success);

        CrawlOutcome { success, domain }
    }

    async fn try_crawl(
        &self,
        link: &str,
        owner: &UserIdentity,
        cancel: &CancellationToken,
    ) -> Result<(), CrawlerError> {
        let resolved = self.dispatcher.resolve(link)?;
        debug!(kind = %resolved.kind, domain = %resolved.domain, "Resolved extractor");

        let mut extractor = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CrawlerError::Cancelled),
            created = resolved.factory.create() => created?,
        };

        // panic 在这里转成错误，保证下面的 close 一定执行
        let extraction = AssertUnwindSafe(extractor.extract(link, owner)).catch_unwind();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CrawlerError::Cancelled),
            extracted = extraction => extracted.unwrap_or_else(|panic| {
                Err(CrawlerError::Extraction(format!(
                    "extractor panicked: {}",
                    panic_message(panic.as_ref())
                )))
            }),
        };

        // 成功与否都要释放
        if let Err(e) = extractor.close().await {
            warn!(
                extractor = extractor.name(),
                "Failed to release extractor: {}", e
            );
        }

        result
    }
}

fn record_job(domain: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "crawl_jobs_total",
        "domain" => domain.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
