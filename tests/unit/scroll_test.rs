// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 浏览器抽取器测试模块
///
/// 通过工厂创建抽取器，验证滚动上限、等待时间、会话崩溃和登录钩子

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use crawl_dispatch::crawlers::browser::{BrowserPage, LoginHook, NoLogin};
    use crawl_dispatch::crawlers::browser_crawler::BrowserCrawlerFactory;
    use crawl_dispatch::crawlers::profile::ContentProfile;
    use crawl_dispatch::crawlers::scroll::ScrollSettings;
    use crawl_dispatch::crawlers::testing::{ScriptedLauncher, ScriptedPage};
    use crawl_dispatch::crawlers::traits::{CrawlerError, CrawlerKind, ExtractorFactory};
    use crawl_dispatch::domain::models::user::UserIdentity;
    use crawl_dispatch::infrastructure::storage::InMemoryDocumentRepository;
    use std::sync::Arc;
    use std::time::Duration;

    const HTML: &str = "<html><body><article><p>Feed post</p></article></body></html>";

    fn factory(
        launcher: &ScriptedLauncher,
        scroll_limit: u32,
        login: Arc<dyn LoginHook>,
    ) -> BrowserCrawlerFactory {
        BrowserCrawlerFactory::new(
            CrawlerKind::LinkedIn,
            ContentProfile::LINKEDIN,
            Arc::new(launcher.clone()),
            Arc::new(InMemoryDocumentRepository::new()),
            ScrollSettings {
                scroll_limit,
                settle_delay: Duration::from_secs(5),
            },
            login,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_endless_feed_stops_at_scroll_limit() {
        let launcher = ScriptedLauncher::new(ScriptedPage::growing(1000, 400).with_html(HTML));
        let factory = factory(&launcher, 4, Arc::new(NoLogin));
        let owner = UserIdentity::new("Paul", "Iusztin");

        let start = tokio::time::Instant::now();
        let mut extractor = factory.create().await.unwrap();
        extractor
            .extract("https://www.linkedin.com/in/someone", &owner)
            .await
            .unwrap();
        extractor.close().await.unwrap();

        assert_eq!(launcher.page().scroll_count(), 4);
        // 4 scrolls x 5s settle delay
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(20) && elapsed < Duration::from_secs(21));
        assert_eq!(launcher.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_limit_loads_page_without_scrolling() {
        let launcher = ScriptedLauncher::new(ScriptedPage::growing(1000, 400).with_html(HTML));
        let factory = factory(&launcher, 0, Arc::new(NoLogin));

        let start = tokio::time::Instant::now();
        let mut extractor = factory.create().await.unwrap();
        extractor
            .extract("https://www.linkedin.com/in/someone", &UserIdentity::new("A", "B"))
            .await
            .unwrap();

        assert_eq!(launcher.page().scroll_count(), 0);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_crash_is_reported_and_session_still_closes() {
        let launcher = ScriptedLauncher::new(
            ScriptedPage::growing(1000, 400)
                .with_html(HTML)
                .crash_after_reads(2),
        );
        let factory = factory(&launcher, 5, Arc::new(NoLogin));

        let mut extractor = factory.create().await.unwrap();
        let result = extractor
            .extract("https://www.linkedin.com/in/someone", &UserIdentity::new("A", "B"))
            .await;
        extractor.close().await.unwrap();

        assert!(matches!(result, Err(CrawlerError::Session(_))));
        assert_eq!(launcher.closed(), 1);
    }

    struct VisitLoginPage;

    #[async_trait]
    impl LoginHook for VisitLoginPage {
        async fn login(&self, page: &dyn BrowserPage) -> Result<(), CrawlerError> {
            page.goto("https://www.linkedin.com/login").await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_hook_runs_before_navigation() {
        let launcher = ScriptedLauncher::new(ScriptedPage::with_heights(vec![800]).with_html(HTML));
        let factory = factory(&launcher, 1, Arc::new(VisitLoginPage));

        let mut extractor = factory.create().await.unwrap();
        extractor
            .extract("https://www.linkedin.com/in/someone", &UserIdentity::new("A", "B"))
            .await
            .unwrap();

        assert_eq!(
            launcher.page().visited(),
            vec![
                "https://www.linkedin.com/login".to_string(),
                "https://www.linkedin.com/in/someone".to_string()
            ]
        );
    }
}
