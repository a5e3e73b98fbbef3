// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个链接的爬取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// 是否成功
    pub success: bool,
    /// 链接所属域名（无法解析时为原始链接）
    pub domain: String,
}

impl CrawlOutcome {
    pub fn succeeded(domain: impl Into<String>) -> Self {
        Self {
            success: true,
            domain: domain.into(),
        }
    }

    pub fn failed(domain: impl Into<String>) -> Self {
        Self {
            success: false,
            domain: domain.into(),
        }
    }
}

/// 单个域名的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainStats {
    /// 成功次数
    pub successful: u64,
    /// 尝试总次数
    pub total: u64,
}

/// 按域名分组的爬取统计
///
/// 每个域名满足 `successful <= total`，两个计数在一次运行中只增不减
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainMetrics {
    domains: BTreeMap<String, DomainStats>,
}

impl DomainMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次爬取结果
    pub fn record(&mut self, outcome: &CrawlOutcome) {
        let stats = self.domains.entry(outcome.domain.clone()).or_default();
        // true -> 1, false -> 0
        stats.successful += u64::from(outcome.success);
        stats.total += 1;
    }

    /// 获取指定域名的统计
    pub fn get(&self, domain: &str) -> Option<&DomainStats> {
        self.domains.get(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DomainStats)> {
        self.domains.iter()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// 所有域名的成功次数之和
    pub fn total_successful(&self) -> u64 {
        self.domains.values().map(|s| s.successful).sum()
    }

    /// 所有域名的尝试次数之和
    pub fn total_attempts(&self) -> u64 {
        self.domains.values().map(|s| s.total).sum()
    }

    /// 运行元数据格式: `{ domain: { successful, total } }`
    pub fn to_metadata(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// 一次批量爬取的报告
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// 原样返回的输入链接
    pub links: Vec<String>,
    /// 按域名分组的统计
    pub metrics: DomainMetrics,
    /// 成功的链接数
    pub successful: u64,
    /// 批次是否被取消
    pub cancelled: bool,
}
