// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含流水线步骤的用例实现：解析用户身份、批量爬取链接
pub mod use_cases;
