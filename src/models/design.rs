//! 生成结果与会话状态

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::models::image::SourceImage;

/// 一张 AI 生成的变体图片（base64，无前缀）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVariant {
    pub data: String,
    pub mime_type: String,
}

impl GeneratedVariant {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// 可直接展示的 data URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// 针对单张变体的优缺点评价
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl Critique {
    /// 分析失败时使用的占位评价
    pub fn placeholder() -> Self {
        Self {
            pros: vec!["Analysis failed to generate.".to_string()],
            cons: vec!["Could not connect to the analysis service.".to_string()],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

/// 展示层使用的（图片, 评价）对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignResult {
    pub image_url: String,
    pub critique: Critique,
}

/// 一轮生成的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Idle,
    Validating,
    Encoding,
    EditingBatch,
    AnalyzingBatch,
    Completed,
    Failed,
}

impl CycleStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, CycleStage::Completed | CycleStage::Failed)
    }
}

impl Display for CycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CycleStage::Idle => "空闲",
            CycleStage::Validating => "校验输入",
            CycleStage::Encoding => "编码图片",
            CycleStage::EditingBatch => "批量生成",
            CycleStage::AnalyzingBatch => "批量分析",
            CycleStage::Completed => "完成",
            CycleStage::Failed => "失败",
        };
        f.write_str(name)
    }
}

/// 生成会话
///
/// `critiques` 非空时与 `variants` 等长且按位置对齐
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub source_image: Option<SourceImage>,
    pub prompt: String,
    pub variants: Vec<GeneratedVariant>,
    pub critiques: Vec<Critique>,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

impl Session {
    /// 丢弃上一轮的生成结果
    pub fn clear_results(&mut self) {
        self.variants.clear();
        self.critiques.clear();
        self.last_error = None;
    }

    /// 按请求顺序组装展示结果
    pub fn results(&self) -> Vec<DesignResult> {
        if self.critiques.len() != self.variants.len() {
            return Vec::new();
        }
        self.variants
            .iter()
            .zip(&self.critiques)
            .map(|(variant, critique)| DesignResult {
                image_url: variant.data_url(),
                critique: critique.clone(),
            })
            .collect()
    }

    /// 展示层"生成"按钮是否可用
    pub fn can_generate(&self) -> bool {
        self.source_image.is_some() && !self.prompt.is_empty() && !self.in_flight
    }
}
