use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error};

use crate::config::BrowserSettings;
use crate::error::BrowserError;

/// 启动一个全新的无头浏览器实例
///
/// 每次渲染操作都启动独立的实例，操作结束后由调用方关闭。
/// 返回浏览器本体和后台事件处理任务的句柄。
pub async fn launch_headless_browser(
    settings: &BrowserSettings,
) -> Result<(Browser, JoinHandle<()>)> {
    debug!("正在启动无头浏览器...");

    let mut builder = BrowserConfig::builder();
    if settings.headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    let config = builder
        .args(settings.launch_args.clone())
        .build()
        .map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            BrowserError::ConfigurationFailed(e)
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BrowserError::LaunchFailed { source: e }
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok((browser, handler_task))
}
