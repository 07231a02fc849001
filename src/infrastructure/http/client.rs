//! REST Client - 后端 /v2 API 的共享 HTTP 客户端
//!
//! 所有 HTTP 网关共用一个 reqwest::Client（连接池、统一超时）。
//! 非 2xx 响应读取响应体并提取 FastAPI 风格的错误描述：
//! {"detail": "..."}、{"detail": [{"msg": "..."}]}、{"error": "..."}，
//! 都取不到时退回原始响应体。

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::ports::GatewayError;

/// REST 客户端配置
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// 后端基础 URL（不含 /v2 前缀）
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl RestClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 共享 REST 客户端
pub struct RestClient {
    client: Client,
    config: RestClientConfig,
}

impl RestClient {
    pub fn new(config: RestClientConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn with_default_config() -> Result<Self, GatewayError> {
        Self::new(RestClientConfig::default())
    }

    /// 拼接 /v2 下的完整 URL（主 API）
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/v2{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 拼接根路径下的完整 URL（/admin 等未挂在 /v2 下的路由）
    pub(crate) fn root_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    // ========================================================================
    // 请求方法（传入已拼接的完整 URL）
    // ========================================================================

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let request = self.client.get(url).query(query);
        self.execute(request).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = self.client.post(url).json(body);
        self.execute(request).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = self.client.put(url).json(body);
        self.execute(request).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: String,
        form: Form,
    ) -> Result<T, GatewayError> {
        let request = self.client.post(url).multipart(form);
        self.execute(request).await
    }

    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        url: String,
        form: Form,
    ) -> Result<T, GatewayError> {
        let request = self.client.put(url).multipart(form);
        self.execute(request).await
    }

    /// DELETE 请求：只检查状态码，忽略响应体
    pub(crate) async fn delete(&self, url: String) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::server(status, extract_detail(&body, status)));
        }
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "backend returned error");
            return Err(GatewayError::server(status, extract_detail(&body, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::Network(format!("Cannot connect to backend: {}", e))
    } else {
        GatewayError::Network(e.to_string())
    }
}

/// 从错误响应体中提取可展示的描述
fn extract_detail(body: &str, status: reqwest::StatusCode) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.to_string()
            };
        }
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => return detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if !messages.is_empty() {
                return messages.join(", ");
            }
        }
        _ => {}
    }

    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return error.to_string();
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
