#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use product_designer::error::ApiError;
use product_designer::models::gemini::{GenerateContentRequest, GenerateContentResponse, Part};
use product_designer::workflow::VARIANT_COUNT;
use product_designer::{Config, DesignerSession, GenerativeBackend, SourceImage};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const IMAGE_MODEL: &str = "test-image-model";
pub const TEXT_MODEL: &str = "test-text-model";

/// 可编排的测试后端
///
/// - 编辑请求按调用顺序编号（每轮 0..VARIANT_COUNT），返回 `variant-N`，越早发出的越晚完成
/// - 分析请求从图片内容识别是第几张变体
#[derive(Default)]
pub struct ScriptedBackend {
    pub edit_calls: AtomicUsize,
    pub analysis_calls: AtomicUsize,
    pub failing_edit: Option<usize>,
    pub empty_edit: Option<usize>,
    pub malformed_analysis: Option<usize>,
    pub edit_gate: Option<Arc<Semaphore>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn total_calls(&self) -> usize {
        self.edit_calls.load(Ordering::SeqCst) + self.analysis_calls.load(Ordering::SeqCst)
    }
}

pub fn variant_payload(n: usize) -> String {
    BASE64_STANDARD.encode(format!("variant-{n}"))
}

fn reversed_delay(n: usize) -> Duration {
    Duration::from_millis(((VARIANT_COUNT - n) * 15) as u64)
}

fn request_parts(request: &GenerateContentRequest) -> (Option<String>, Option<String>) {
    let mut data = None;
    let mut text = None;
    for part in &request.contents[0].parts {
        match part {
            Part::InlineData { inline_data } => data = Some(inline_data.data.clone()),
            Part::Text { text: t } => text = Some(t.clone()),
            Part::Other(_) => {}
        }
    }
    (data, text)
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        let (data, text) = request_parts(request);

        if model == IMAGE_MODEL {
            let n = self.edit_calls.fetch_add(1, Ordering::SeqCst) % VARIANT_COUNT;
            self.prompts.lock().unwrap().push(text.unwrap_or_default());
            if let Some(gate) = &self.edit_gate {
                gate.acquire().await.unwrap().forget();
            }
            tokio::time::sleep(reversed_delay(n)).await;

            if self.failing_edit == Some(n) {
                return Err(ApiError::BadResponse {
                    endpoint: model.to_string(),
                    status: 500,
                    message: "INTERNAL: boom".to_string(),
                });
            }
            if self.empty_edit == Some(n) {
                return Ok(serde_json::from_value(json!({
                    "candidates": [{"content": {"parts": [{"text": "no image for you"}]}}]
                }))
                .unwrap());
            }
            return Ok(serde_json::from_value(json!({
                "candidates": [{"content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": variant_payload(n)}}
                ]}}]
            }))
            .unwrap());
        }

        assert_eq!(model, TEXT_MODEL);
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        let decoded = BASE64_STANDARD.decode(data.expect("分析请求缺少图片")).unwrap();
        let label = String::from_utf8(decoded).unwrap();
        let n: usize = label.trim_start_matches("variant-").parse().unwrap();
        tokio::time::sleep(reversed_delay(n)).await;

        let body = if self.malformed_analysis == Some(n) {
            "Pros: nice. Cons: none.".to_string()
        } else {
            json!({"pros": [format!("pro of {label}")], "cons": [format!("con of {label}")]})
                .to_string()
        };
        Ok(serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": body}]}}]
        }))
        .unwrap())
    }
}

pub fn test_config() -> Config {
    Config {
        api_key: "test-key".to_string(),
        image_model: IMAGE_MODEL.to_string(),
        text_model: TEXT_MODEL.to_string(),
        ..Default::default()
    }
}

pub fn source_image() -> SourceImage {
    SourceImage::from_bytes(b"original product photo".to_vec(), "image/jpeg")
}

pub async fn ready_session(backend: Arc<ScriptedBackend>) -> DesignerSession {
    let session = DesignerSession::new(backend, &test_config());
    session.select_image(Some(source_image())).await;
    session.set_prompt("make it look like mid-century furniture").await;
    session
}
