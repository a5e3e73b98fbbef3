// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{bail, Context, Result};
use clap::Parser;
use crawl_dispatch::application::use_cases::crawl_links::CrawlLinksUseCase;
use crawl_dispatch::application::use_cases::get_or_create_user::GetOrCreateUserUseCase;
use crawl_dispatch::config::settings::Settings;
use crawl_dispatch::crawlers::catalog::CrawlerCatalog;
use crawl_dispatch::domain::repositories::user_repository::UserRepository;
use crawl_dispatch::infrastructure::metadata::TracingMetadataSink;
use crawl_dispatch::infrastructure::storage::{create_document_repository, storage_root};
use crawl_dispatch::infrastructure::users::{InMemoryUserRepository, LocalUserRepository};
use crawl_dispatch::utils::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "crawl-dispatch", about = "Crawl links and store the extracted documents")]
struct Cli {
    /// Full name of the user that owns the crawled documents
    #[arg(short, long)]
    user: String,

    /// Links to crawl
    links: Vec<String>,

    /// File with one link per line; blank lines and lines starting with '#' are skipped
    #[arg(long)]
    links_file: Option<PathBuf>,

    /// Number of links crawled at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Maximum number of scrolls per page; 0 disables scrolling
    #[arg(long)]
    scroll_limit: Option<u32>,
}

/// 主函数
///
/// 加载配置、解析用户、按域名调度爬取并把报告以JSON输出到stdout
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut settings = Settings::new().context("failed to load configuration")?;
    if let Some(concurrency) = cli.concurrency {
        settings.crawler.concurrency = concurrency;
    }
    if let Some(scroll_limit) = cli.scroll_limit {
        settings.browser.scroll_limit = scroll_limit;
    }

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);
    info!("Starting crawl-dispatch...");

    let links = collect_links(&cli).await?;
    if links.is_empty() {
        bail!("no links given, pass them as arguments or with --links-file");
    }

    // 3. Storage
    let documents = create_document_repository(&settings.storage)?;
    let users: Arc<dyn UserRepository> = match settings.storage.storage_type.as_str() {
        "memory" => Arc::new(InMemoryUserRepository::new()),
        _ => Arc::new(LocalUserRepository::new(
            storage_root(&settings.storage).join("users.json"),
        )),
    };
    let sink = Arc::new(TracingMetadataSink);

    // 4. Resolve the owner
    let owner = GetOrCreateUserUseCase::new(users, sink.clone())
        .execute(&cli.user)
        .await
        .context("failed to resolve user")?;

    // 5. Dispatcher
    let catalog = CrawlerCatalog::from_settings(&settings, documents)?;
    let dispatcher = match catalog.standard_dispatcher() {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) if e.is_setup_error() => bail!("invalid crawler registration: {}", e),
        Err(e) => return Err(e.into()),
    };
    info!(
        patterns = ?dispatcher.patterns().collect::<Vec<_>>(),
        "Dispatcher ready"
    );

    // 6. Crawl, Ctrl-C cancels the batch
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    let signal_task = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Shutdown signal received, cancelling crawl");
                shutdown.cancel();
            }
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    });

    let report = CrawlLinksUseCase::new(dispatcher, sink)
        .with_concurrency(settings.crawler.concurrency)
        .execute_with_cancellation(&owner, links, cancel)
        .await;
    signal_task.abort();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn collect_links(cli: &Cli) -> Result<Vec<String>> {
    let mut links = cli.links.clone();

    if let Some(path) = &cli.links_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read links file {}", path.display()))?;
        links.extend(
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    Ok(links)
}
