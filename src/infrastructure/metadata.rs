// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use tracing::info;

use crate::domain::repositories::metadata_sink::RunMetadataSink;

/// 把运行元数据写入日志
#[derive(Debug, Default)]
pub struct TracingMetadataSink;

impl RunMetadataSink for TracingMetadataSink {
    fn add_output_metadata(&self, output_name: &str, metadata: serde_json::Value) {
        info!(output = output_name, metadata = %metadata, "Run metadata");
    }
}

/// 在内存中记录运行元数据
#[derive(Debug, Default)]
pub struct InMemoryMetadataSink {
    entries: Mutex<Vec<(String, serde_json::Value)>>,
}

impl InMemoryMetadataSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定输出最近一次的元数据
    pub fn get(&self, output_name: &str) -> Option<serde_json::Value> {
        self.entries
            .lock()
            .iter()
            .rev()
            .find(|(name, _)| name == output_name)
            .map(|(_, value)| value.clone())
    }
}

impl RunMetadataSink for InMemoryMetadataSink {
    fn add_output_metadata(&self, output_name: &str, metadata: serde_json::Value) {
        self.entries.lock().push((output_name.to_string(), metadata));
    }
}
