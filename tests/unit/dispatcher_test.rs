// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 调度器测试模块
///
/// 通过公开接口验证域名匹配、默认工厂和注册校验

#[cfg(test)]
mod tests {
    use crawl_dispatch::crawlers::dispatcher::CrawlerDispatcher;
    use crawl_dispatch::crawlers::testing::ScriptedFactory;
    use crawl_dispatch::crawlers::traits::{CrawlerError, CrawlerKind};
    use std::sync::Arc;

    fn factory(kind: CrawlerKind) -> Arc<ScriptedFactory> {
        Arc::new(ScriptedFactory::succeeding(kind))
    }

    #[test]
    fn test_more_specific_pattern_wins_over_parent_domain() {
        let dispatcher = CrawlerDispatcher::builder()
            .register("medium.com", factory(CrawlerKind::Medium))
            .unwrap()
            .register("towardsdatascience.medium.com", factory(CrawlerKind::CustomArticle))
            .unwrap()
            .build();

        let specific = dispatcher
            .resolve("https://towardsdatascience.medium.com/some-post")
            .unwrap();
        let generic = dispatcher.resolve("https://other.medium.com/x").unwrap();

        assert_eq!(specific.kind, CrawlerKind::CustomArticle);
        assert_eq!(generic.kind, CrawlerKind::Medium);
    }

    #[test]
    fn test_domain_is_reported_as_url_host() {
        let dispatcher = CrawlerDispatcher::builder()
            .register("LinkedIn.com", factory(CrawlerKind::LinkedIn))
            .unwrap()
            .build();

        let resolved = dispatcher
            .resolve("https://WWW.LinkedIn.com:443/in/someone?x=1")
            .unwrap();

        assert_eq!(resolved.domain, "www.linkedin.com");
        assert_eq!(resolved.kind, CrawlerKind::LinkedIn);
    }

    #[test]
    fn test_lookalike_domain_does_not_match() {
        let dispatcher = CrawlerDispatcher::builder()
            .register("github.com", factory(CrawlerKind::GitHub))
            .unwrap()
            .build();

        assert!(matches!(
            dispatcher.resolve("https://notgithub.com/repo"),
            Err(CrawlerError::NoExtractor(domain)) if domain == "notgithub.com"
        ));
    }

    #[test]
    fn test_invalid_registrations_are_setup_errors() {
        for pattern in ["", "   ", "https://medium.com/path", "bad host.com"] {
            let err = CrawlerDispatcher::builder()
                .register(pattern, factory(CrawlerKind::Medium))
                .err()
                .unwrap_or_else(|| panic!("pattern {:?} should be rejected", pattern));
            assert!(err.is_setup_error(), "{:?}", pattern);
        }
    }

    #[test]
    fn test_resolution_is_shared_across_threads() {
        let dispatcher = Arc::new(
            CrawlerDispatcher::builder()
                .register("medium.com", factory(CrawlerKind::Medium))
                .unwrap()
                .with_default(factory(CrawlerKind::CustomArticle))
                .build(),
        );

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let dispatcher = dispatcher.clone();
                std::thread::spawn(move || {
                    let link = if i % 2 == 0 {
                        "https://medium.com/p"
                    } else {
                        "https://example.com/p"
                    };
                    dispatcher.resolve(link).unwrap().kind
                })
            })
            .collect();

        let kinds: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            kinds,
            vec![
                CrawlerKind::Medium,
                CrawlerKind::CustomArticle,
                CrawlerKind::Medium,
                CrawlerKind::CustomArticle
            ]
        );
    }
}
