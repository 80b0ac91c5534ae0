//! 一轮生成流程 - 流程层
//!
//! 核心职责：定义"一轮生成"的完整流程
//!
//! 流程顺序：
//! 1. 校验输入（图片 + 提示词）
//! 2. 编码源图片（只编码一次）
//! 3. 并发 4 个编辑请求，任一失败则整轮失败
//! 4. 并发 4 个分析请求，单个失败用占位评价代替
//! 5. 按请求顺序组装会话
//!
//! ```text
//! Idle → Validating → Encoding → EditingBatch → {Failed | AnalyzingBatch} → Completed
//! ```

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::GenerativeBackend;
use crate::models::design::{CycleStage, Critique, GeneratedVariant, Session};
use crate::models::image::SourceImage;
use crate::orchestrator::batch::{join_all_fail_fast, join_all_isolated, BatchFailure};
use crate::services::{encode_image, DesignAnalysisService, ImageEditService};
use crate::utils::logging::truncate_text;

/// 每轮生成的变体数量
pub const VARIANT_COUNT: usize = 4;

/// 校验输入，不产生任何网络调用
pub fn validate_inputs(image: Option<&SourceImage>, prompt: &str) -> Result<(), ValidationError> {
    if image.is_none() {
        return Err(ValidationError::MissingImage);
    }
    if prompt.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    Ok(())
}

/// 生成流程
///
/// - 编排一轮生成的各个阶段
/// - 不持有会话状态
/// - 只依赖业务能力（services）
pub struct GenerationCycle {
    edit_service: ImageEditService,
    analysis_service: DesignAnalysisService,
}

impl GenerationCycle {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: &Config) -> Self {
        Self {
            edit_service: ImageEditService::new(backend.clone(), config.image_model.clone()),
            analysis_service: DesignAnalysisService::new(backend, config.text_model.clone()),
        }
    }

    /// 执行一轮生成，返回填充好的会话
    pub async fn run_generation_cycle(
        &self,
        image: Option<&SourceImage>,
        prompt: &str,
    ) -> AppResult<Session> {
        let (stage, _) = watch::channel(CycleStage::Idle);
        self.run(image, prompt, &stage).await
    }

    /// 执行一轮生成，并把阶段变化发布到 `stage`
    pub async fn run(
        &self,
        image: Option<&SourceImage>,
        prompt: &str,
        stage: &watch::Sender<CycleStage>,
    ) -> AppResult<Session> {
        let result = self.run_stages(image, prompt, stage).await;
        match &result {
            Ok(_) => transition(stage, CycleStage::Completed),
            Err(e) => {
                error!("❌ 本轮生成失败: {}", e);
                transition(stage, CycleStage::Failed);
            }
        }
        result
    }

    async fn run_stages(
        &self,
        image: Option<&SourceImage>,
        prompt: &str,
        stage: &watch::Sender<CycleStage>,
    ) -> AppResult<Session> {
        transition(stage, CycleStage::Validating);
        validate_inputs(image, prompt)?;
        let image = image.ok_or(ValidationError::MissingImage)?;

        transition(stage, CycleStage::Encoding);
        let encoded = encode_image(image).await?;

        transition(stage, CycleStage::EditingBatch);
        info!(
            "🎨 并发生成 {} 张变体，提示词: {}",
            VARIANT_COUNT,
            truncate_text(prompt, 40)
        );
        let edits = (0..VARIANT_COUNT).map(|_| self.edit_service.generate_edited_image(&encoded, prompt));
        let variants: Vec<GeneratedVariant> = join_all_fail_fast(edits)
            .await
            .map_err(|BatchFailure { index, error }| AppError::generation_failed(index, error))?;
        info!("✓ {} 张变体生成完成", variants.len());

        transition(stage, CycleStage::AnalyzingBatch);
        let analyses = variants
            .iter()
            .map(|variant| self.analysis_service.analyze_design(variant, prompt));
        let critiques: Vec<Critique> = join_all_isolated(analyses, |index, err| {
            warn!("⚠️ 第 {} 张变体分析失败，使用占位评价: {}", index + 1, err);
            Critique::placeholder()
        })
        .await;

        let failed = critiques.iter().filter(|c| c.is_placeholder()).count();
        info!("✓ 分析完成: 成功 {}/{}", critiques.len() - failed, critiques.len());

        Ok(Session {
            source_image: Some(image.clone()),
            prompt: prompt.to_string(),
            variants,
            critiques,
            in_flight: false,
            last_error: None,
        })
    }
}

fn transition(stage: &watch::Sender<CycleStage>, next: CycleStage) {
    let previous = stage.send_replace(next);
    tracing::debug!("阶段: {} → {}", previous, next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_inputs() {
        let image = SourceImage::from_bytes(vec![1], "image/png");

        assert_eq!(
            validate_inputs(None, "prompt"),
            Err(ValidationError::MissingImage)
        );
        assert_eq!(
            validate_inputs(Some(&image), ""),
            Err(ValidationError::EmptyPrompt)
        );
        assert_eq!(validate_inputs(None, ""), Err(ValidationError::MissingImage));
        assert!(validate_inputs(Some(&image), "make it round").is_ok());
    }
}
