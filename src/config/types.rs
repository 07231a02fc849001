//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 后端连接配置
    #[serde(default)]
    pub backend: BackendConfig,

    /// 搜索与分页配置
    #[serde(default)]
    pub search: SearchConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            search: SearchConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 后端连接配置
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// 后端基础 URL（/v2 前缀由客户端拼接）
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// 搜索与分页配置
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// 作者/体裁联想输入的防抖间隔（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// 选书器筛选变更的防抖间隔（毫秒）
    #[serde(default = "default_picker_debounce_ms")]
    pub picker_debounce_ms: u64,

    /// 展览目录每页条数
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_picker_debounce_ms() -> u64 {
    500
}

fn default_page_size() -> u32 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            picker_debounce_ms: default_picker_debounce_ms(),
            page_size: default_page_size(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn picker_debounce(&self) -> Duration {
        Duration::from_millis(self.picker_debounce_ms)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.picker_debounce_ms, 500);
        assert_eq!(config.search.page_size, 10);
    }

    #[test]
    fn test_search_durations() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.picker_debounce(), Duration::from_millis(500));
    }
}
