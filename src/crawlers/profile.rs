// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};

use crate::crawlers::traits::CrawlerError;
use crate::domain::models::document::DocumentKind;

/// 内容解析配置
///
/// 各平台抽取器只在这里有差别：平台名、文档类型和选择器
#[derive(Debug, Clone, Copy)]
pub struct ContentProfile {
    /// 平台名称
    pub platform: &'static str,
    /// 存储的文档类型
    pub kind: DocumentKind,
    /// 标题选择器，按顺序尝试
    pub title_selectors: &'static [&'static str],
    /// 正文选择器，按顺序尝试
    pub content_selectors: &'static [&'static str],
}

/// 解析出的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub content: String,
}

impl ContentProfile {
    pub const LINKEDIN: ContentProfile = ContentProfile {
        platform: "linkedin",
        kind: DocumentKind::Post,
        title_selectors: &["h1", "title"],
        content_selectors: &[
            "div.feed-shared-update-v2__description",
            "div.update-components-text",
            "main",
        ],
    };

    pub const MEDIUM: ContentProfile = ContentProfile {
        platform: "medium",
        kind: DocumentKind::Article,
        title_selectors: &["h1[data-testid=storyTitle]", "h1", "title"],
        content_selectors: &["article", "main"],
    };

    pub const GITHUB: ContentProfile = ContentProfile {
        platform: "github",
        kind: DocumentKind::Repository,
        title_selectors: &["strong[itemprop=name]", "title"],
        content_selectors: &["article.markdown-body", "#readme"],
    };

    pub const CUSTOM_ARTICLE: ContentProfile = ContentProfile {
        platform: "custom",
        kind: DocumentKind::Article,
        title_selectors: &["h1", "title"],
        content_selectors: &[
            "article",
            "main",
            "[role=main]",
            "#content",
            "[itemprop=articleBody]",
            ".post-content",
        ],
    };

    /// 解析HTML
    ///
    /// 正文先尝试选择器，都没有命中时退回到所有段落的文本。没有任何正文时返回错误。
    pub fn parse(&self, html: &str) -> Result<ExtractedContent, CrawlerError> {
        let doc = Html::parse_document(html);

        let title = self
            .title_selectors
            .iter()
            .find_map(|sel| select_text(&doc, sel));

        let content = self
            .content_selectors
            .iter()
            .find_map(|sel| select_text(&doc, sel))
            .or_else(|| paragraphs(&doc))
            .ok_or_else(|| {
                CrawlerError::Extraction(format!("no {} content found in page", self.platform))
            })?;

        Ok(ExtractedContent { title, content })
    }
}

fn select_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let node = doc.select(&sel).next()?;
    let text = normalize(&node.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn paragraphs(doc: &Html) -> Option<String> {
    let sel = Selector::parse("p").ok()?;
    let joined = doc
        .select(&sel)
        .map(|p| normalize(&p.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

// collapse whitespace inside each line, drop blank lines
fn normalize(s: &str) -> String {
    s.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
