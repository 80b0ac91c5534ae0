//! 远程生成能力 - 基础设施层
//!
//! 上层只依赖这个 trait，不关心底层是 HTTP 还是测试桩

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};

/// 远程生成式 AI 能力
///
/// 职责：
/// - 对指定模型发起一次 `generateContent` 调用
/// - 不认识变体 / 评价
/// - 不处理重试
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError>;
}
