//! 图片编辑服务 - 业务能力层
//!
//! 只负责"一次编辑请求"，不关心批量和流程

use std::sync::Arc;
use tracing::debug;

use crate::error::{EditError, NoContentError};
use crate::infrastructure::GenerativeBackend;
use crate::models::design::GeneratedVariant;
use crate::models::gemini::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::models::image::EncodedImage;

/// 图片编辑服务
///
/// 职责：
/// - 把源图片和提示词发给图片模型
/// - 取响应中的第一张图片
/// - 不出现 Vec<GeneratedVariant>
pub struct ImageEditService {
    backend: Arc<dyn GenerativeBackend>,
    model_name: String,
}

impl ImageEditService {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model_name: impl Into<String>) -> Self {
        Self {
            backend,
            model_name: model_name.into(),
        }
    }

    /// 生成一张编辑后的图片
    pub async fn generate_edited_image(
        &self,
        image: &EncodedImage,
        prompt: &str,
    ) -> Result<GeneratedVariant, EditError> {
        let request = build_edit_request(image, prompt);
        let response = self
            .backend
            .generate_content(&self.model_name, &request)
            .await?;

        let inline = response.first_inline_data().ok_or_else(|| NoContentError {
            model: self.model_name.clone(),
        })?;

        debug!("收到生成图片，{} 字符", inline.data.len());

        let mime_type = if inline.mime_type.is_empty() {
            "image/png"
        } else {
            inline.mime_type.as_str()
        };
        Ok(GeneratedVariant::new(inline.data.clone(), mime_type))
    }
}

fn build_edit_request(image: &EncodedImage, prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::inline(&image.mime_type, &image.data),
            Part::text(prompt),
        ])],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            ..Default::default()
        }),
    }
}
