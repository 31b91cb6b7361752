//! 视频下载 - 业务能力层
//!
//! 非轮播条目的直通路径：先只取元数据算出净化后的文件名，再下载。
//! 整个操作由重试驱动按均匀策略执行（默认 2 次，无退避）。

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::clients::MediaExtractor;
use crate::config::Config;
use crate::utils::{run_with_retry, sanitize_filename, RetryPolicy};

/// 视频下载服务
pub struct VideoDownloader {
    extractor: MediaExtractor,
    retry_policy: RetryPolicy,
}

impl VideoDownloader {
    pub fn new(config: &Config, extractor: MediaExtractor) -> Self {
        Self {
            extractor,
            retry_policy: RetryPolicy::uniform(config.video_download_attempts),
        }
    }

    /// 下载单个视频帖到 `videos_dir/<标题>.mp4`，返回净化后的标题
    ///
    /// `item_index` 只用于标题缺失时合成后备文件名。
    pub async fn download(&self, url: &str, item_index: usize, videos_dir: &Path) -> Result<String> {
        run_with_retry(&self.retry_policy, |attempt| {
            self.attempt_download(url, item_index, videos_dir, attempt)
        })
        .await
    }

    async fn attempt_download(
        &self,
        url: &str,
        item_index: usize,
        videos_dir: &Path,
        attempt: usize,
    ) -> Result<String> {
        if attempt > 1 {
            info!("🔁 第 {} 次尝试下载视频: {}", attempt, url);
        }
        let metadata = self.extractor.metadata(url).await?;
        let title = sanitize_filename(
            &metadata
                .title
                .unwrap_or_else(|| format!("video_{item_index}")),
        );
        let output_path = videos_dir.join(format!("{title}.mp4"));
        self.extractor.download_video(url, &output_path).await?;
        Ok(title)
    }
}
