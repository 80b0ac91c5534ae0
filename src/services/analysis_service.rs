//! 设计分析服务 - 业务能力层
//!
//! 只负责"对一张变体给出优缺点"，通过响应 schema 约束模型输出结构化 JSON

use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;

use crate::error::AnalysisFailure;
use crate::infrastructure::GenerativeBackend;
use crate::models::design::{Critique, GeneratedVariant};
use crate::models::gemini::{Content, GenerateContentRequest, GenerationConfig, Part};

/// 生成的图片统一按 PNG 提交分析
const ANALYSIS_IMAGE_MIME: &str = "image/png";

/// 设计分析服务
///
/// 职责：
/// - 把单张变体和原始提示词发给文本+视觉模型
/// - 严格校验 {pros, cons} 结构
/// - 失败时返回 `AnalysisFailure`，由调用方决定是否替换为占位评价
pub struct DesignAnalysisService {
    backend: Arc<dyn GenerativeBackend>,
    model_name: String,
}

impl DesignAnalysisService {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model_name: impl Into<String>) -> Self {
        Self {
            backend,
            model_name: model_name.into(),
        }
    }

    /// 分析一张变体
    pub async fn analyze_design(
        &self,
        variant: &GeneratedVariant,
        user_prompt: &str,
    ) -> Result<Critique, AnalysisFailure> {
        let request = build_analysis_request(variant, user_prompt);
        let response = self
            .backend
            .generate_content(&self.model_name, &request)
            .await?;

        let text = response.text().ok_or(AnalysisFailure::EmptyText)?;
        debug!("分析响应长度: {} 字符", text.len());

        parse_critique(&text)
    }
}

/// 严格解析模型返回的 JSON
///
/// 两个字段都必须存在且为字符串数组
pub fn parse_critique(text: &str) -> Result<Critique, AnalysisFailure> {
    Ok(serde_json::from_str::<Critique>(text.trim())?)
}

fn build_analysis_prompt(user_prompt: &str) -> String {
    format!(
        r#"As a product design expert, analyze the following product image based on the user's request.
User's request: "{user_prompt}"

Evaluate the design in the image and provide a list of its pros and cons in relation to the user's request.

Your response must be a JSON object with two keys: "pros" and "cons".
Each key should have a value of an array of strings. Each string in the array should be a concise point."#
    )
}

/// `{pros: string[], cons: string[]}`，两个字段都必填
fn critique_schema() -> JsonValue {
    json!({
        "type": "OBJECT",
        "properties": {
            "pros": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "Positive aspects of the design based on the user prompt."
            },
            "cons": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "Potential drawbacks or areas for improvement."
            }
        },
        "required": ["pros", "cons"]
    })
}

fn build_analysis_request(variant: &GeneratedVariant, user_prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::inline(ANALYSIS_IMAGE_MIME, &variant.data),
            Part::text(build_analysis_prompt(user_prompt)),
        ])],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(critique_schema()),
            ..Default::default()
        }),
    }
}
