// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬取流程集成测试
///
/// 使用标准目录构建调度器：浏览器抽取器由脚本页面驱动，
/// HTTP 抽取器请求 wiremock 服务，验证文档落库和统计结果

#[cfg(test)]
mod tests {
    use crawl_dispatch::application::use_cases::crawl_links::{
        CrawlLinksUseCase, CRAWLED_LINKS_OUTPUT,
    };
    use crawl_dispatch::application::use_cases::get_or_create_user::{
        GetOrCreateUserUseCase, USER_OUTPUT,
    };
    use crawl_dispatch::crawlers::catalog::CrawlerCatalog;
    use crawl_dispatch::crawlers::scroll::ScrollSettings;
    use crawl_dispatch::crawlers::testing::{ScriptedLauncher, ScriptedPage};
    use crawl_dispatch::domain::models::crawl::DomainStats;
    use crawl_dispatch::domain::models::document::DocumentKind;
    use crawl_dispatch::domain::repositories::document_repository::DocumentRepository;
    use crawl_dispatch::infrastructure::metadata::InMemoryMetadataSink;
    use crawl_dispatch::infrastructure::storage::{
        InMemoryDocumentRepository, LocalDocumentRepository,
    };
    use crawl_dispatch::infrastructure::users::LocalUserRepository;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MEDIUM_HTML: &str = r#"<html><head><title>ignored</title></head><body>
        <h1 data-testid="storyTitle">Building an LLM twin</h1>
        <article><p>First paragraph.</p><p>Second paragraph.</p></article>
        </body></html>"#;

    const BLOG_HTML: &str = r#"<html><head><title>A blog post</title></head><body>
        <main><p>Plain article content.</p></main>
        </body></html>"#;

    fn quick_scroll() -> ScrollSettings {
        ScrollSettings {
            scroll_limit: 3,
            settle_delay: Duration::ZERO,
        }
    }

    async fn blog_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BLOG_HTML))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_standard_dispatcher_end_to_end() {
        let server = blog_server().await;
        let repository = Arc::new(InMemoryDocumentRepository::new());
        let launcher = ScriptedLauncher::new(
            ScriptedPage::with_heights(vec![1000, 1800, 1800]).with_html(MEDIUM_HTML),
        );
        let catalog = CrawlerCatalog::new(
            repository.clone(),
            Arc::new(launcher.clone()),
            reqwest::Client::new(),
            quick_scroll(),
        );
        let dispatcher = Arc::new(catalog.standard_dispatcher().unwrap());
        let sink = Arc::new(InMemoryMetadataSink::new());

        let owner = GetOrCreateUserUseCase::new(
            Arc::new(crawl_dispatch::infrastructure::users::InMemoryUserRepository::new()),
            sink.clone(),
        )
        .execute("Paul Iusztin")
        .await
        .unwrap();

        let links = vec![
            "https://medium.com/decodingml/llm-twin".to_string(),
            format!("{}/post", server.uri()),
            format!("{}/broken", server.uri()),
            "not a url".to_string(),
        ];
        let report = CrawlLinksUseCase::new(dispatcher, sink.clone())
            .execute(&owner, links.clone())
            .await;

        assert_eq!(report.links, links);
        assert_eq!(report.successful, 2);
        assert_eq!(report.metrics.total_attempts(), 4);
        assert_eq!(
            report.metrics.get("medium.com"),
            Some(&DomainStats {
                successful: 1,
                total: 1
            })
        );
        assert_eq!(
            report.metrics.get("127.0.0.1"),
            Some(&DomainStats {
                successful: 1,
                total: 2
            })
        );
        assert_eq!(
            report.metrics.get("not a url"),
            Some(&DomainStats {
                successful: 0,
                total: 1
            })
        );

        let medium = repository
            .find_by_link(DocumentKind::Article, &links[0])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(medium.platform, "medium");
        assert_eq!(medium.title.as_deref(), Some("Building an LLM twin"));
        assert_eq!(medium.author_id, owner.id);
        assert!(medium.content.contains("Second paragraph."));

        let blog = repository
            .find_by_link(DocumentKind::Article, &links[1])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(blog.platform, "custom");
        assert_eq!(repository.len().await, 2);

        // 浏览器会话在抽取后被释放
        assert_eq!(launcher.launched(), 1);
        assert_eq!(launcher.closed(), 1);
        assert_eq!(launcher.page().scroll_count(), 2);

        assert!(sink.get(USER_OUTPUT).is_some());
        assert_eq!(
            sink.get(CRAWLED_LINKS_OUTPUT).unwrap()["127.0.0.1"]["total"],
            2
        );
    }

    #[tokio::test]
    async fn test_second_run_skips_existing_documents() {
        let repository = Arc::new(InMemoryDocumentRepository::new());
        let launcher =
            ScriptedLauncher::new(ScriptedPage::with_heights(vec![500]).with_html(MEDIUM_HTML));
        let catalog = CrawlerCatalog::new(
            repository.clone(),
            Arc::new(launcher.clone()),
            reqwest::Client::new(),
            quick_scroll(),
        );
        let use_case = CrawlLinksUseCase::new(
            Arc::new(catalog.standard_dispatcher().unwrap()),
            Arc::new(InMemoryMetadataSink::new()),
        );
        let owner = crawl_dispatch::domain::models::user::UserIdentity::new("Paul", "Iusztin");
        let links = vec!["https://medium.com/p/1".to_string()];

        let first = use_case.execute(&owner, links.clone()).await;
        let second = use_case.execute(&owner, links).await;

        assert_eq!(first.successful, 1);
        assert_eq!(second.successful, 1);
        assert_eq!(repository.len().await, 1);
        // 第二次没有打开页面
        assert_eq!(launcher.page().visited().len(), 1);
        assert_eq!(launcher.closed(), launcher.launched());
    }

    #[tokio::test]
    async fn test_browser_launch_failure_is_a_failed_job() {
        let catalog = CrawlerCatalog::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(ScriptedLauncher::failing()),
            reqwest::Client::new(),
            quick_scroll(),
        );
        let use_case = CrawlLinksUseCase::new(
            Arc::new(catalog.standard_dispatcher().unwrap()),
            Arc::new(InMemoryMetadataSink::new()),
        );
        let owner = crawl_dispatch::domain::models::user::UserIdentity::new("Paul", "Iusztin");

        let report = use_case
            .execute(
                &owner,
                vec![
                    "https://www.linkedin.com/in/someone".to_string(),
                    "https://medium.com/p/2".to_string(),
                ],
            )
            .await;

        assert_eq!(report.successful, 0);
        assert_eq!(report.metrics.total_attempts(), 2);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_local_stores_persist_user_and_documents() {
        let dir = tempfile::tempdir().unwrap();
        let server = blog_server().await;
        let repository = Arc::new(LocalDocumentRepository::new(dir.path()));
        let sink = Arc::new(InMemoryMetadataSink::new());

        let users = Arc::new(LocalUserRepository::new(dir.path().join("users.json")));
        let owner = GetOrCreateUserUseCase::new(users.clone(), sink.clone())
            .execute("Maxime Labonne")
            .await
            .unwrap();
        let again = GetOrCreateUserUseCase::new(users, sink.clone())
            .execute("Maxime Labonne")
            .await
            .unwrap();
        assert_eq!(owner.id, again.id);

        let catalog = CrawlerCatalog::new(
            repository.clone(),
            Arc::new(ScriptedLauncher::new(ScriptedPage::with_heights(vec![0]))),
            reqwest::Client::new(),
            quick_scroll(),
        );
        let link = format!("{}/post", server.uri());
        let report = CrawlLinksUseCase::new(Arc::new(catalog.standard_dispatcher().unwrap()), sink)
            .execute(&owner, vec![link.clone()])
            .await;

        assert_eq!(report.successful, 1);
        let stored = repository.find_by_author(owner.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].link, link);
        assert!(dir.path().join("articles").is_dir());
    }
}
