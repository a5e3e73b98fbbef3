// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 批量爬取用例测试
///
/// 验证报告不变量：链接原样返回、每个域名 successful <= total、
/// total 之和等于输入数量，与执行顺序和并发度无关

#[cfg(test)]
mod tests {
    use crawl_dispatch::application::use_cases::crawl_links::CrawlLinksUseCase;
    use crawl_dispatch::crawlers::dispatcher::CrawlerDispatcher;
    use crawl_dispatch::crawlers::testing::{ScriptedBehaviour, ScriptedFactory};
    use crawl_dispatch::crawlers::traits::CrawlerKind;
    use crawl_dispatch::domain::models::crawl::CrawlReport;
    use crawl_dispatch::domain::models::user::UserIdentity;
    use crawl_dispatch::infrastructure::metadata::InMemoryMetadataSink;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct Fixture {
        dispatcher: Arc<CrawlerDispatcher>,
        factories: Vec<ScriptedFactory>,
    }

    fn fixture() -> Fixture {
        let linkedin = ScriptedFactory::new(
            CrawlerKind::LinkedIn,
            ScriptedBehaviour::Succeed(Duration::from_secs(3)),
        );
        let medium = ScriptedFactory::new(
            CrawlerKind::Medium,
            ScriptedBehaviour::Succeed(Duration::from_secs(1)),
        );
        let github = ScriptedFactory::failing(CrawlerKind::GitHub);
        let fallback = ScriptedFactory::new(CrawlerKind::CustomArticle, ScriptedBehaviour::Panic);

        let dispatcher = CrawlerDispatcher::builder()
            .register("linkedin.com", Arc::new(linkedin.clone()))
            .unwrap()
            .register("medium.com", Arc::new(medium.clone()))
            .unwrap()
            .register("github.com", Arc::new(github.clone()))
            .unwrap()
            .with_default(Arc::new(fallback.clone()))
            .build();

        Fixture {
            dispatcher: Arc::new(dispatcher),
            factories: vec![linkedin, medium, github, fallback],
        }
    }

    fn batch() -> Vec<String> {
        [
            "https://www.linkedin.com/in/a",
            "https://medium.com/p/1",
            "https://github.com/org/repo",
            "mailto:someone@example.com",
            "https://blog.example.org/post",
            "https://medium.com/p/2",
            "",
            "https://de.linkedin.com/in/b",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn assert_invariants(report: &CrawlReport, input: &[String]) {
        assert_eq!(report.links, input);
        assert_eq!(report.metrics.total_attempts(), input.len() as u64);
        assert_eq!(report.metrics.total_successful(), report.successful);
        for (domain, stats) in report.metrics.iter() {
            assert!(stats.successful <= stats.total, "{}", domain);
            assert!(stats.total > 0, "{}", domain);
        }
    }

    async fn run(concurrency: usize) -> (CrawlReport, Fixture) {
        let fixture = fixture();
        let use_case = CrawlLinksUseCase::new(
            fixture.dispatcher.clone(),
            Arc::new(InMemoryMetadataSink::new()),
        )
        .with_concurrency(concurrency);
        let owner = UserIdentity::new("Paul", "Iusztin");

        let report = use_case.execute(&owner, batch()).await;
        (report, fixture)
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_invariants_hold_sequentially() {
        let (report, fixture) = run(1).await;

        assert_invariants(&report, &batch());
        // linkedin x2 + medium x2
        assert_eq!(report.successful, 4);
        for factory in &fixture.factories {
            assert_eq!(factory.created(), factory.extracted().len());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_do_not_depend_on_concurrency() {
        let (sequential, _) = run(1).await;
        let (parallel, _) = run(8).await;

        assert_invariants(&parallel, &batch());
        assert_eq!(sequential.metrics, parallel.metrics);
        assert_eq!(sequential.successful, parallel.successful);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extractors_are_closed_after_every_job() {
        let (_, fixture) = run(3).await;

        let [linkedin, medium, github, fallback] = &fixture.factories[..] else {
            panic!("unexpected fixture");
        };
        assert_eq!(linkedin.closed(), 2);
        assert_eq!(medium.closed(), 2);
        assert_eq!(github.closed(), 1);
        // 抽取过程中 panic 也要显式关闭
        assert_eq!(fallback.created(), 1);
        assert_eq!(fallback.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_midway_keeps_invariants() {
        let fixture = fixture();
        let use_case = CrawlLinksUseCase::new(
            fixture.dispatcher.clone(),
            Arc::new(InMemoryMetadataSink::new()),
        );
        let owner = UserIdentity::new("Paul", "Iusztin");

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            // 第一个 linkedin 任务需要3秒
            tokio::time::sleep(Duration::from_secs(2)).await;
            trigger.cancel();
        });

        let report = use_case
            .execute_with_cancellation(&owner, batch(), cancel)
            .await;

        assert!(report.cancelled);
        assert_invariants(&report, &batch());
        assert_eq!(report.successful, 0);
        assert_eq!(fixture.factories[0].created(), 1);
        assert_eq!(fixture.factories[0].closed(), 1);
        assert_eq!(fixture.factories[1].created(), 0);
    }
}
