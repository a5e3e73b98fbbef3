// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::crawlers::scroll::ScrollSettings;

/// 应用程序配置设置
///
/// 包含浏览器、爬虫、存储和日志等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 爬虫配置
    pub crawler: CrawlerSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 最大滚动次数，0 表示不滚动
    pub scroll_limit: u32,
    /// 每次滚动后的等待时间（秒）
    pub settle_delay_secs: u64,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// Chrome 可执行文件路径，未设置时自动探测
    pub executable: Option<String>,
    /// 额外的浏览器启动参数
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// 爬虫配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 同时处理的链接数，1 表示严格串行
    pub concurrency: usize,
    /// HTTP 请求超时时间（秒）
    pub http_timeout_secs: u64,
    /// HTTP 请求使用的 User-Agent
    pub user_agent: String,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, memory)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 默认日志级别
    pub level: String,
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CRAWL").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值创建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Default browser settings
            .set_default("browser.scroll_limit", 5)?
            .set_default("browser.settle_delay_secs", 5)?
            .set_default("browser.request_timeout_secs", 30)?
            .set_default("browser.extra_args", Vec::<String>::new())?
            // Default crawler settings
            .set_default("crawler.concurrency", 1)?
            .set_default("crawler.http_timeout_secs", 20)?
            .set_default(
                "crawler.user_agent",
                "Mozilla/5.0 (compatible; crawl-dispatch/0.1)",
            )?
            // Default storage settings
            .set_default("storage.storage_type", "local")?
            .set_default("storage.local_path", "./storage")?
            // Default logging settings
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)
    }

    /// 滚动加载参数
    pub fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            scroll_limit: self.browser.scroll_limit,
            settle_delay: Duration::from_secs(self.browser.settle_delay_secs),
        }
    }
}
