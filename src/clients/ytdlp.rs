//! 提取引擎封装
//!
//! 以子进程方式驱动 yt-dlp：一个"只取元数据"入口和两个"下载"入口
//! （视频容器固定 mp4，音频回退转码为固定编码/码率）。
//! 这里不做重试，重试策略属于调用方。

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::error::ExtractorError;

/// 帖子的规范化元数据（`--dump-single-json` 输出中我们关心的字段）
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMetadata {
    /// 帖子标题，缺失不算错误
    #[serde(default)]
    pub title: Option<String>,
}

/// yt-dlp 提取引擎
#[derive(Clone)]
pub struct MediaExtractor {
    bin: String,
    audio_codec: String,
    audio_quality: String,
}

impl MediaExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            bin: config.ytdlp_bin.clone(),
            audio_codec: config.audio_codec.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    /// 仅提取元数据，不下载
    pub async fn metadata(&self, url: &str) -> Result<MediaMetadata> {
        debug!("提取元数据: {}", url);
        let output = Command::new(&self.bin)
            .args(["--dump-single-json", "--skip-download", "--quiet", "--no-warnings"])
            .arg(url)
            .output()
            .await
            .map_err(|e| ExtractorError::SpawnFailed {
                bin: self.bin.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::MetadataFailed {
                url: url.to_string(),
                detail: stderr_excerpt(&output.stderr),
            }
            .into());
        }

        let metadata: MediaMetadata = serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractorError::MetadataParseFailed { source: e })?;
        Ok(metadata)
    }

    /// 下载视频（mp4 容器）到指定路径
    pub async fn download_video(&self, url: &str, output_path: &Path) -> Result<()> {
        debug!("下载视频: {} -> {}", url, output_path.display());
        let output = Command::new(&self.bin)
            .args(["--format", "mp4", "--quiet", "--no-warnings", "--output"])
            .arg(output_path)
            .arg(url)
            .output()
            .await
            .map_err(|e| ExtractorError::SpawnFailed {
                bin: self.bin.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::DownloadFailed {
                url: url.to_string(),
                detail: stderr_excerpt(&output.stderr),
            }
            .into());
        }
        Ok(())
    }

    /// 仅提取音轨并转码为固定编码/码率，覆盖之前的残留文件
    pub async fn download_audio(&self, url: &str, output_path: &Path) -> Result<()> {
        debug!("提取音频: {} -> {}", url, output_path.display());
        let output = Command::new(&self.bin)
            .args(["--format", "bestaudio/best", "--extract-audio"])
            .args(["--audio-format", &self.audio_codec])
            .args(["--audio-quality", &self.audio_quality])
            .args(["--force-overwrites", "--quiet", "--no-warnings", "--output"])
            .arg(output_path)
            .arg(url)
            .output()
            .await
            .map_err(|e| ExtractorError::SpawnFailed {
                bin: self.bin.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::DownloadFailed {
                url: url.to_string(),
                detail: stderr_excerpt(&output.stderr),
            }
            .into());
        }
        Ok(())
    }
}

/// 取 stderr 的最后一行非空内容作为错误详情，避免把整屏输出塞进日志
fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("提取引擎未输出错误信息")
        .to_string()
}
