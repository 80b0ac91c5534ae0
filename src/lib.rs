//! # Product Designer
//!
//! 上传产品图片、用自然语言描述修改需求，生成 4 张 AI 变体并给出优缺点分析
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端 + API 密钥），只暴露能力
//! - `GenerativeBackend` - 远程生成能力的抽象
//! - `GeminiClient` - 基于 Gemini REST API 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片
//! - `encoding` - 源图片 → base64
//! - `ImageEditService` - 一次编辑请求
//! - `DesignAnalysisService` - 一次结构化分析请求
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一轮生成"的完整流程
//! - `GenerationCycle` - 校验 → 编码 → 批量生成 → 批量分析
//! - `DesignerSession` - 会话状态，所有修改的唯一入口
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch` - 两种批量并发原语
//! - `orchestrator/app` - 命令行应用，负责结果落盘
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{GeminiClient, GenerativeBackend};
pub use models::{Critique, CycleStage, DesignResult, GeneratedVariant, Session, SourceImage};
pub use orchestrator::App;
pub use workflow::{DesignerSession, GenerationCycle};
