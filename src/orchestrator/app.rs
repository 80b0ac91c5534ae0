//! 命令行应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建 Gemini 客户端和设计会话
//! 2. **单轮生成**：加载源图片，委托 `DesignerSession` 完成一轮生成
//! 3. **结果落盘**：变体图片、评价 JSON、文本报告

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::infrastructure::{GeminiClient, GenerativeBackend};
use crate::models::design::{Critique, DesignResult, Session};
use crate::models::image::SourceImage;
use crate::utils::logging::{init_report_file, log_cycle_start, log_startup, print_cycle_summary};
use crate::workflow::DesignerSession;

/// 应用主结构
pub struct App {
    config: Config,
    session: DesignerSession,
}

/// `critiques.json` 中的一项
#[derive(Debug, Serialize)]
struct CritiqueRecord<'a> {
    index: usize,
    pros: &'a [String],
    cons: &'a [String],
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.image_model, &config.text_model);
        let client = GeminiClient::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(client)))
    }

    /// 使用指定的后端创建应用
    pub fn with_backend(config: Config, backend: Arc<dyn GenerativeBackend>) -> Self {
        let session = DesignerSession::new(backend, &config);
        Self { config, session }
    }

    /// 对一张图片运行一轮生成并保存结果
    pub async fn run(&self, image_path: &Path, prompt: &str) -> Result<PathBuf> {
        log_cycle_start(&image_path.display().to_string(), prompt);

        self.session
            .select_image(Some(SourceImage::from_path(image_path)))
            .await;
        self.session.set_prompt(prompt).await;

        let results = match self.session.generate().await {
            Ok(results) => results,
            Err(e) => {
                error!("❌ {}", e.user_message());
                return Err(e.into());
            }
        };

        let snapshot = self.session.snapshot().await;
        let output_dir = PathBuf::from(&self.config.output_dir);
        self.save_results(&output_dir, &snapshot, &results)?;

        let placeholders = results.iter().filter(|r| r.critique.is_placeholder()).count();
        print_cycle_summary(results.len(), placeholders, &self.config.output_dir);

        Ok(output_dir)
    }

    /// 写入 variant_N.png、critiques.json、report.txt
    fn save_results(
        &self,
        output_dir: &Path,
        session: &Session,
        results: &[DesignResult],
    ) -> Result<()> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;

        for (idx, variant) in session.variants.iter().enumerate() {
            let bytes = BASE64_STANDARD
                .decode(&variant.data)
                .with_context(|| format!("第 {} 张变体的 base64 数据无效", idx + 1))?;
            let path = output_dir.join(format!("variant_{}.png", idx + 1));
            fs::write(&path, bytes)
                .with_context(|| format!("写入文件失败: {}", path.display()))?;
            info!("💾 已保存: {}", path.display());
        }

        let records: Vec<CritiqueRecord> = results
            .iter()
            .enumerate()
            .map(|(idx, r)| CritiqueRecord {
                index: idx + 1,
                pros: &r.critique.pros,
                cons: &r.critique.cons,
            })
            .collect();
        fs::write(
            output_dir.join("critiques.json"),
            serde_json::to_string_pretty(&records)?,
        )?;

        let report_path = output_dir.join("report.txt");
        init_report_file(&report_path, &session.prompt)?;
        let mut report = fs::OpenOptions::new().append(true).open(&report_path)?;
        for (idx, result) in results.iter().enumerate() {
            report.write_all(format_critique(idx + 1, &result.critique).as_bytes())?;
        }

        Ok(())
    }
}

fn format_critique(index: usize, critique: &Critique) -> String {
    let mut text = format!("变体 {} (variant_{}.png)\n", index, index);
    text.push_str("  Pros:\n");
    for pro in &critique.pros {
        text.push_str(&format!("    + {}\n", pro));
    }
    text.push_str("  Cons:\n");
    for con in &critique.cons {
        text.push_str(&format!("    - {}\n", con));
    }
    text.push('\n');
    text
}
