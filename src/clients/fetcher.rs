//! 媒体抓取器
//!
//! 下载单个二进制资源：拉取字节流、解码为图片、保存到指定路径。

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::error::FetchError;

/// 图片抓取器，内部共享一个 HTTP 客户端
#[derive(Clone)]
pub struct MediaFetcher {
    client: reqwest::Client,
}

impl MediaFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// 抓取一张图片，解码后保存到 `output_path`
    pub async fn fetch_image(&self, url: &str, output_path: &Path) -> Result<()> {
        debug!("抓取图片: {}", url);
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Http)?
            .error_for_status()
            .map_err(FetchError::Http)?
            .bytes()
            .await
            .map_err(FetchError::Http)?;

        let decoded = image::load_from_memory(&bytes).map_err(FetchError::Decode)?;
        // JPEG 不支持透明通道
        decoded
            .into_rgb8()
            .save(output_path)
            .map_err(FetchError::Decode)?;
        Ok(())
    }
}

impl Default for MediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}
