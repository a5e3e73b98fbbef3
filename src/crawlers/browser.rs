// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::settings::BrowserSettings;
use crate::crawlers::traits::CrawlerError;

/// 浏览器页面
///
/// 抽取器只依赖这几个操作，便于用模拟页面测试滚动逻辑
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// 导航到指定链接并等待加载
    async fn goto(&self, url: &str) -> Result<(), CrawlerError>;

    /// 当前页面高度 (`document.body.scrollHeight`)
    async fn scroll_height(&self) -> Result<u64, CrawlerError>;

    /// 滚动到页面底部
    async fn scroll_to_bottom(&self) -> Result<(), CrawlerError>;

    /// 当前页面的HTML
    async fn content(&self) -> Result<String, CrawlerError>;
}

/// 浏览器会话
///
/// 每个抽取器实例独占一个会话，用完必须调用 `close`
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 打开一个新页面
    async fn new_page(&self) -> Result<Box<dyn BrowserPage>, CrawlerError>;

    /// 关闭会话并释放浏览器进程和临时目录，可重复调用
    async fn close(&mut self) -> Result<(), CrawlerError>;
}

/// 浏览器会话启动器
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CrawlerError>;
}

/// 登录钩子
///
/// 需要登录的站点在构造抽取器时注入自己的实现，默认不做任何事
#[async_trait]
pub trait LoginHook: Send + Sync {
    async fn login(&self, _page: &dyn BrowserPage) -> Result<(), CrawlerError> {
        Ok(())
    }
}

/// 不登录
pub struct NoLogin;

impl LoginHook for NoLogin {}

/// 浏览器启动参数
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Chrome 可执行文件路径
    pub executable: Option<PathBuf>,
    /// CDP 请求超时时间
    pub request_timeout: Duration,
    /// 额外的启动参数，追加在默认参数之后
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            request_timeout: Duration::from_secs(30),
            extra_args: Vec::new(),
        }
    }
}

impl From<&BrowserSettings> for LaunchOptions {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            executable: settings.executable.as_ref().map(PathBuf::from),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            extra_args: settings.extra_args.clone(),
        }
    }
}
