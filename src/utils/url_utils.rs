// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 提取URL的主机部分（域名），用作指标分组键
///
/// 端口、路径和查询参数都会被忽略。无法解析或没有主机部分的URL返回 `None`。
pub fn host_of(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_ascii_lowercase())
}

/// 尽力推导链接的域名
///
/// 解析失败时回退为原始链接字符串，保证每个任务都有一个分组键。
pub fn domain_or_raw(link: &str) -> String {
    host_of(link).unwrap_or_else(|| link.to_string())
}

/// 规范化主机名：小写并去掉前导 `www.`
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => host,
    }
}
