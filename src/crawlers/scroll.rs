// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tracing::debug;

use crate::crawlers::browser::BrowserPage;
use crate::crawlers::traits::CrawlerError;

/// 滚动加载参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSettings {
    /// 最大滚动次数，0 表示不滚动
    pub scroll_limit: u32,
    /// 每次滚动后等待内容渲染的时间
    pub settle_delay: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            scroll_limit: 5,
            settle_delay: Duration::from_secs(5),
        }
    }
}

/// 滚动停止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStop {
    /// 页面高度不再变化
    Stabilized,
    /// 达到滚动次数上限，内容可能仍未加载完
    LimitReached,
    /// 滚动被配置关闭
    Disabled,
}

/// 滚动结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// 实际执行的滚动次数
    pub scrolls: u32,
    /// 停止原因
    pub stop: ScrollStop,
    /// 最后一次读取的页面高度
    pub final_height: u64,
}

/// 反复滚动到页面底部，直到页面高度不再增长或达到滚动上限
///
/// 每次滚动后挂起 `settle_delay` 让异步内容渲染。最多执行 `scroll_limit` 次滚动，
/// `scroll_limit == 0` 时只读取一次高度后立即返回。
pub async fn scroll_to_stability(
    page: &dyn BrowserPage,
    settings: &ScrollSettings,
) -> Result<ScrollOutcome, CrawlerError> {
    let mut last_height = page.scroll_height().await?;

    if settings.scroll_limit == 0 {
        return Ok(ScrollOutcome {
            scrolls: 0,
            stop: ScrollStop::Disabled,
            final_height: last_height,
        });
    }

    let mut scrolls = 0;
    while scrolls < settings.scroll_limit {
        page.scroll_to_bottom().await?;
        scrolls += 1;

        tokio::time::sleep(settings.settle_delay).await;

        let new_height = page.scroll_height().await?;
        debug!(scrolls, last_height, new_height, "Scrolled to bottom");

        if new_height == last_height {
            return Ok(ScrollOutcome {
                scrolls,
                stop: ScrollStop::Stabilized,
                final_height: new_height,
            });
        }
        last_height = new_height;
    }

    Ok(ScrollOutcome {
        scrolls,
        stop: ScrollStop::LimitReached,
        final_height: last_height,
    })
}
