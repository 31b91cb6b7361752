//! 页面渲染会话
//!
//! 一次会话对应一个独立的无头浏览器实例：打开、导航、固定等待让动态内容
//! 加载完毕，然后暴露 DOM 查询能力。会话不在内部重试，失败直接交给调用方；
//! 调用方用"先干活、后关闭"的模式保证每条退出路径都释放浏览器。

use anyhow::Result;
use chromiumoxide::{Browser, Element, Page};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::browser::headless::launch_headless_browser;
use crate::config::BrowserSettings;
use crate::error::BrowserError;

/// 已渲染页面的句柄
pub struct PageSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl PageSession {
    /// 打开一次性的浏览器会话，导航到 `url` 并等待固定的安定延迟
    pub async fn open(settings: &BrowserSettings, url: &str, settle: Duration) -> Result<Self> {
        let (mut browser, handler_task) = launch_headless_browser(settings).await?;

        let page = match browser.new_page(url).await {
            Ok(page) => page,
            Err(e) => {
                // 导航失败也必须关闭刚启动的浏览器
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(BrowserError::NavigationFailed {
                    url: url.to_string(),
                    source: e,
                }
                .into());
            }
        };
        debug!("已导航到: {}，等待页面安定", url);
        sleep(settle).await;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// 滚动到页面底部并再等待一次，触发 feed 类页面的懒加载
    pub async fn scroll_to_bottom(&self, settle: Duration) -> Result<()> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await?;
        sleep(settle).await;
        Ok(())
    }

    /// 按 CSS 选择器查询所有元素
    pub async fn elements(&self, selector: &str) -> Result<Vec<Element>> {
        Ok(self.page.find_elements(selector).await?)
    }

    /// 读取元素属性，读不到一律视为缺失
    pub async fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.attribute(name).await.ok().flatten()
    }

    /// 显式的标题查找：找不到元素或文本为空都返回 None，不是错误
    pub async fn find_title(&self, selector: &str) -> Option<String> {
        let element = self.page.find_element(selector).await.ok()?;
        let text = element.inner_text().await.ok().flatten()?;
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// 无条件关闭会话
    ///
    /// 消耗 self：关闭之后句柄不复存在。浏览器实例被 drop 时 chromiumoxide
    /// 也会杀掉子进程，作为异常路径上的兜底。
    pub async fn close(mut self) {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        debug!("浏览器会话已关闭");
    }
}
