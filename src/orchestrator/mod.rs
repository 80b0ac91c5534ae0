//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch` - 批量并发原语
//! - `join_all_fail_fast`：编辑阶段，全有或全无
//! - `join_all_isolated`：分析阶段，单项失败就地恢复
//!
//! ### `app` - 命令行应用
//! - 管理应用生命周期（初始化、运行）
//! - 持有 Gemini 客户端和设计会话
//! - 把结果写入输出目录
//!
//! ## 层次关系
//!
//! ```text
//! app (命令行一轮生成)
//!     ↓
//! workflow::DesignerSession (会话状态 + 并发保护)
//!     ↓
//! workflow::GenerationCycle (单轮流程)
//!     ↓
//! services (能力层：encoding / edit / analysis)
//!     ↓
//! infrastructure (基础设施：GeminiClient)
//! ```

pub mod app;
pub mod batch;

pub use app::App;
pub use batch::{join_all_fail_fast, join_all_isolated, BatchFailure};
