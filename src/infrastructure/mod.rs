// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域仓库接口的具体实现：
/// - 元数据（metadata）：运行元数据的日志与内存接收端
/// - 存储（storage）：文档的本地文件和内存存储
/// - 用户（users）：用户的获取或创建
pub mod metadata;
pub mod storage;
pub mod users;
