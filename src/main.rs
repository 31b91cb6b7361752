use anyhow::{Context, Result};
use std::path::PathBuf;

use tiktok_save::{logger, App, Config};

const USAGE: &str = "用法: tiktok_save <输入清单.json> <输出目录>";

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 解析命令行参数
    let mut args = std::env::args().skip(1);
    let input_file = PathBuf::from(args.next().context(USAGE)?);
    let output_root = PathBuf::from(args.next().context(USAGE)?);

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    let app = App::initialize(config, &input_file, &output_root)?;
    app.run().await?;

    Ok(())
}
