// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 爬取结果与统计（crawl）：单个链接的结果、按域名分组的统计和批次报告
/// - 文档（document）：抓取后持久化的内容及其类型
/// - 用户（user）：爬取内容的所有者
pub mod crawl;
pub mod document;
pub mod user;
