// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 运行元数据接收端
///
/// 流水线步骤结束时把结构化元数据交给外部的观测/元数据收集器
pub trait RunMetadataSink: Send + Sync {
    /// 为指定输出附加元数据
    fn add_output_metadata(&self, output_name: &str, metadata: serde_json::Value);
}
