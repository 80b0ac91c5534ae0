//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 info，`verbose` 时为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化报告文件
///
/// # 参数
/// - `report_path`: 报告文件路径
/// - `prompt`: 本轮提示词
pub fn init_report_file(report_path: &Path, prompt: &str) -> Result<()> {
    let header = format!(
        "{}\n设计生成报告 - {}\n提示词: {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        prompt,
        "=".repeat(60)
    );
    std::fs::write(report_path, header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `image_model`: 图片编辑模型
/// - `text_model`: 分析模型
pub fn log_startup(image_model: &str, text_model: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 产品设计生成模式");
    info!("🖼️ 图片模型: {}", image_model);
    info!("📝 分析模型: {}", text_model);
    info!("{}", "=".repeat(60));
}

/// 记录一轮生成开始
pub fn log_cycle_start(image_path: &str, prompt: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📦 源图片: {}", image_path);
    info!("💬 提示词: {}", truncate_text(prompt, 60));
    info!("{}", "=".repeat(60));
}

/// 打印本轮统计信息
///
/// # 参数
/// - `variants`: 生成的变体数量
/// - `placeholders`: 分析失败（占位评价）数量
/// - `output_dir`: 输出目录
pub fn print_cycle_summary(variants: usize, placeholders: usize, output_dir: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本轮生成完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 变体: {}", variants);
    info!("❌ 分析失败: {}", placeholders);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_dir);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
