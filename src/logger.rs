//! 日志初始化
//!
//! 控制台进度输出走 tracing；持久化的运行日志见 `services::run_log`。

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// 默认级别 info，可通过 `RUST_LOG` 覆盖。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
