//! Gemini REST 客户端 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端和 API 密钥，只暴露 `generateContent` 能力

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ConfigError};
use crate::infrastructure::backend::GenerativeBackend;
use crate::models::gemini::{ErrorWrapper, GenerateContentRequest, GenerateContentResponse};

/// Gemini 客户端
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base_url: String,
}

impl GeminiClient {
    /// 创建新的客户端
    ///
    /// 超时策略交给传输层，核心流程不设超时
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        let endpoint = self.endpoint(model);
        debug!("调用 Gemini API，模型: {}", model);

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| {
                warn!("Gemini API 请求失败: {}", source);
                ApiError::RequestFailed {
                    endpoint: endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误响应体".to_string());
            warn!("Gemini API 返回错误: {} {}", status, body);
            return Err(map_http_error(endpoint, status, &body));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|source| ApiError::JsonParseFailed {
                endpoint: endpoint.clone(),
                source,
            })?;

        debug!("Gemini API 调用成功，候选数量: {}", parsed.candidates.len());
        Ok(parsed)
    }
}

/// 把非 2xx 响应映射为 `ApiError::BadResponse`
fn map_http_error(endpoint: String, status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    ApiError::BadResponse {
        endpoint,
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api_key: "test-key".to_string(),
            api_base_url: "https://example.invalid/v1beta/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(&test_config()).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash-image"),
            "https://example.invalid/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_map_http_error_with_envelope() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        match map_http_error("e".to_string(), StatusCode::FORBIDDEN, body) {
            ApiError::BadResponse { status, message, .. } => {
                assert_eq!(status, 403);
                assert_eq!(message, "PERMISSION_DENIED: API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_plain_body() {
        match map_http_error("e".to_string(), StatusCode::BAD_GATEWAY, "upstream down") {
            ApiError::BadResponse { status, message, .. } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// 真实 API 调用，需要 GEMINI_API_KEY
    ///
    /// ```bash
    /// cargo test test_live_text_call -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_text_call() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().expect("需要设置 GEMINI_API_KEY");
        let client = GeminiClient::new(&config).unwrap();
        let request = GenerateContentRequest {
            contents: vec![crate::models::gemini::Content::user(vec![
                crate::models::gemini::Part::text("Reply with the single word: ok"),
            ])],
            generation_config: None,
        };

        let response = client
            .generate_content(&config.text_model, &request)
            .await
            .expect("Gemini API 调用失败");
        println!("响应: {:?}", response.text());
        assert!(response.text().is_some());
    }
}
