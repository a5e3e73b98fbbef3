// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 测试用的浏览器替身
//!
//! 不启动真实浏览器，按脚本返回页面高度和HTML，并记录滚动、关闭等调用；
//! 另有按脚本成功、失败、崩溃或挂起的抽取器工厂

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::crawlers::browser::{BrowserPage, BrowserSession, SessionLauncher};
use crate::crawlers::traits::{CrawlerError, CrawlerKind, Extractor, ExtractorFactory};
use crate::domain::models::user::UserIdentity;

#[derive(Debug, Clone)]
enum HeightScript {
    /// 按顺序返回，用完后重复最后一个
    Sequence(Vec<u64>),
    /// 从 start 开始每次读取增加 step
    Growing { start: u64, step: u64 },
}

#[derive(Debug)]
struct PageState {
    script: HeightScript,
    reads: usize,
    crash_after_reads: Option<usize>,
    html: String,
    visited: Vec<String>,
}

/// 按脚本返回页面高度的模拟页面
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    state: Arc<Mutex<PageState>>,
    scrolls: Arc<AtomicUsize>,
}

impl ScriptedPage {
    fn from_script(script: HeightScript) -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState {
                script,
                reads: 0,
                crash_after_reads: None,
                html: String::new(),
                visited: Vec::new(),
            })),
            scrolls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 依次返回给定高度
    pub fn with_heights(heights: Vec<u64>) -> Self {
        Self::from_script(HeightScript::Sequence(heights))
    }

    /// 高度每次读取都在增长
    pub fn growing(start: u64, step: u64) -> Self {
        Self::from_script(HeightScript::Growing { start, step })
    }

    /// 设置 `content()` 返回的HTML
    pub fn with_html(self, html: impl Into<String>) -> Self {
        self.state.lock().html = html.into();
        self
    }

    /// 读取高度 `reads` 次之后模拟会话崩溃
    pub fn crash_after_reads(self, reads: usize) -> Self {
        self.state.lock().crash_after_reads = Some(reads);
        self
    }

    /// 已执行的滚动次数
    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    /// 访问过的链接
    pub fn visited(&self) -> Vec<String> {
        self.state.lock().visited.clone()
    }
}

#[async_trait]
impl BrowserPage for ScriptedPage {
    async fn goto(&self, url: &str) -> Result<(), CrawlerError> {
        self.state.lock().visited.push(url.to_string());
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64, CrawlerError> {
        let mut state = self.state.lock();
        if state.crash_after_reads.is_some_and(|limit| state.reads >= limit) {
            return Err(CrawlerError::Session("browser disconnected".to_string()));
        }
        let index = state.reads;
        state.reads += 1;

        let height = match &state.script {
            HeightScript::Sequence(heights) => heights
                .get(index)
                .or_else(|| heights.last())
                .copied()
                .unwrap_or_default(),
            HeightScript::Growing { start, step } => start + step * index as u64,
        };
        Ok(height)
    }

    async fn scroll_to_bottom(&self) -> Result<(), CrawlerError> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn content(&self) -> Result<String, CrawlerError> {
        Ok(self.state.lock().html.clone())
    }
}

/// 模拟会话，所有页面共享同一个脚本页面
pub struct ScriptedSession {
    page: ScriptedPage,
    closed: Arc<AtomicUsize>,
    is_closed: bool,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, CrawlerError> {
        if self.is_closed {
            return Err(CrawlerError::Session("session already closed".to_string()));
        }
        Ok(Box::new(self.page.clone()))
    }

    async fn close(&mut self) -> Result<(), CrawlerError> {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// 模拟启动器，记录启动和关闭的会话数
#[derive(Clone)]
pub struct ScriptedLauncher {
    page: ScriptedPage,
    launched: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    fail_launch: bool,
}

impl ScriptedLauncher {
    pub fn new(page: ScriptedPage) -> Self {
        Self {
            page,
            launched: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
            fail_launch: false,
        }
    }

    /// 启动总是失败（模拟找不到浏览器）
    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::new(ScriptedPage::with_heights(vec![0]))
        }
    }

    pub fn page(&self) -> &ScriptedPage {
        &self.page
    }

    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLauncher for ScriptedLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CrawlerError> {
        if self.fail_launch {
            return Err(CrawlerError::Session("no browser available".to_string()));
        }
        self.launched.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            page: self.page.clone(),
            closed: self.closed.clone(),
            is_closed: false,
        }))
    }
}

/// 模拟抽取器的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedBehaviour {
    /// 等待给定时间后成功
    Succeed(Duration),
    /// 立即返回抽取错误
    Fail,
    /// 在抽取过程中 panic
    Panic,
    /// 永不返回，只能被取消
    Hang,
}

#[derive(Debug, Default)]
struct FactoryCounters {
    created: AtomicUsize,
    closed: AtomicUsize,
    extracted: Mutex<Vec<(String, uuid::Uuid)>>,
}

/// 按脚本行为产出抽取器的工厂
#[derive(Clone)]
pub struct ScriptedFactory {
    kind: CrawlerKind,
    behaviour: ScriptedBehaviour,
    counters: Arc<FactoryCounters>,
}

impl ScriptedFactory {
    pub fn new(kind: CrawlerKind, behaviour: ScriptedBehaviour) -> Self {
        Self {
            kind,
            behaviour,
            counters: Arc::new(FactoryCounters::default()),
        }
    }

    pub fn succeeding(kind: CrawlerKind) -> Self {
        Self::new(kind, ScriptedBehaviour::Succeed(Duration::ZERO))
    }

    pub fn failing(kind: CrawlerKind) -> Self {
        Self::new(kind, ScriptedBehaviour::Fail)
    }

    /// 创建过的抽取器数量
    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// 关闭过的抽取器数量
    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// 调用过 `extract` 的 (链接, 所有者ID)
    pub fn extracted(&self) -> Vec<(String, uuid::Uuid)> {
        self.counters.extracted.lock().clone()
    }
}

#[async_trait]
impl ExtractorFactory for ScriptedFactory {
    fn kind(&self) -> CrawlerKind {
        self.kind
    }

    async fn create(&self) -> Result<Box<dyn Extractor>, CrawlerError> {
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedExtractor {
            kind: self.kind,
            behaviour: self.behaviour,
            counters: self.counters.clone(),
        }))
    }
}

struct ScriptedExtractor {
    kind: CrawlerKind,
    behaviour: ScriptedBehaviour,
    counters: Arc<FactoryCounters>,
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(&mut self, link: &str, owner: &UserIdentity) -> Result<(), CrawlerError> {
        self.counters
            .extracted
            .lock()
            .push((link.to_string(), owner.id));

        match self.behaviour {
            ScriptedBehaviour::Succeed(delay) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(())
            }
            ScriptedBehaviour::Fail => Err(CrawlerError::Extraction(format!(
                "scripted failure for {}",
                link
            ))),
            ScriptedBehaviour::Panic => panic!("scripted panic for {}", link),
            ScriptedBehaviour::Hang => {
                futures::future::pending::<()>().await;
                Ok(())
            }
        }
    }

    async fn close(&mut self) -> Result<(), CrawlerError> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.kind.name()
    }
}
