// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::crawlers::browser::{BrowserPage, BrowserSession, LaunchOptions, SessionLauncher};
use crate::crawlers::traits::CrawlerError;

/// 默认启动参数：无界面、无沙箱、忽略证书错误、尽量安静
const DEFAULT_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--log-level=3",
    "--disable-popup-blocking",
    "--disable-notifications",
    "--disable-extensions",
    "--disable-background-networking",
    "--ignore-certificate-errors",
];

fn session_error(e: impl std::fmt::Display) -> CrawlerError {
    CrawlerError::Session(e.to_string())
}

/// 基于 chromiumoxide 的会话启动器
///
/// 每次启动都会创建独立的临时用户目录和缓存目录，调试端口由浏览器自行分配，
/// 因此并发的会话之间互不干扰
pub struct ChromiumLauncher {
    options: LaunchOptions,
}

impl ChromiumLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    fn build_config(&self, profile: &TempDir) -> Result<BrowserConfig, CrawlerError> {
        let cache_dir = profile.path().join("cache");
        let data_dir = profile.path().join("data");

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .new_headless_mode()
            .user_data_dir(profile.path().join("profile"))
            .request_timeout(self.options.request_timeout)
            .arg(format!("--disk-cache-dir={}", cache_dir.display()))
            .arg(format!("--data-path={}", data_dir.display()));

        for arg in DEFAULT_ARGS {
            builder = builder.arg(*arg);
        }
        for arg in &self.options.extra_args {
            builder = builder.arg(arg.as_str());
        }
        if let Some(executable) = &self.options.executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(CrawlerError::Configuration)
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CrawlerError> {
        let profile = tempfile::Builder::new()
            .prefix("crawl-dispatch-")
            .tempdir()
            .map_err(session_error)?;

        let config = self.build_config(&profile)?;
        let (browser, mut handler) = Browser::launch(config).await.map_err(session_error)?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        info!(profile = %profile.path().display(), "Browser session launched");

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            profile: Some(profile),
            closed: false,
        }))
    }
}

/// Chromium 浏览器会话
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    profile: Option<TempDir>,
    closed: bool,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, CrawlerError> {
        if self.closed {
            return Err(CrawlerError::Session("session already closed".to_string()));
        }
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(session_error)?;
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(&mut self) -> Result<(), CrawlerError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let close_result = self.browser.close().await.map_err(session_error);
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser process: {}", e);
        }
        self.handler_task.abort();

        // 删除临时的用户目录
        if let Some(profile) = self.profile.take() {
            if let Err(e) = profile.close() {
                warn!("Failed to remove browser profile directory: {}", e);
            }
        }

        debug!("Browser session closed");
        close_result.map(|_| ())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            // Browser kills its child process on drop; the handler would otherwise linger
            warn!("Browser session dropped without close()");
            self.handler_task.abort();
        }
    }
}

/// Chromium 页面
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), CrawlerError> {
        self.page.goto(url).await.map_err(session_error)?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(session_error)?;
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64, CrawlerError> {
        let height: f64 = self
            .page
            .evaluate("document.body.scrollHeight")
            .await
            .map_err(session_error)?
            .into_value()
            .map_err(session_error)?;
        Ok(height.max(0.0).round() as u64)
    }

    async fn scroll_to_bottom(&self) -> Result<(), CrawlerError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await
            .map_err(session_error)?;
        Ok(())
    }

    async fn content(&self) -> Result<String, CrawlerError> {
        self.page.content().await.map_err(session_error)
    }
}
