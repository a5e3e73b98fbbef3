// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 文档仓库（document_repository）：保存抽取器产出的文档
/// - 用户仓库（user_repository）：按姓名获取或创建用户
/// - 元数据接收端（metadata_sink）：接收运行结束时的统计元数据
pub mod document_repository;
pub mod metadata_sink;
pub mod user_repository;
