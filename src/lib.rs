// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含批量爬取和用户解析用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 爬虫模块
///
/// 域名调度、抽取器以及浏览器会话
pub mod crawlers;

/// 领域模块
///
/// 包含核心实体和仓库接口
pub mod domain;

/// 基础设施模块
///
/// 文档存储、用户存储和运行元数据的实现
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
