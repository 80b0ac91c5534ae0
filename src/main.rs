use anyhow::{bail, Result};
use product_designer::utils::logging;
use product_designer::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（缺少 API 密钥时直接退出）
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    let mut args = std::env::args().skip(1);
    let Some(image_path) = args.next().map(PathBuf::from) else {
        bail!("用法: product_designer <图片路径> <设计提示词...>");
    };
    let prompt = args.collect::<Vec<_>>().join(" ");

    // 初始化并运行应用
    let app = App::initialize(config)?;
    app.run(&image_path, &prompt).await?;

    Ok(())
}
