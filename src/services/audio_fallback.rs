//! 音频回退解析 - 业务能力层
//!
//! 轮播帖的音乐只是指向共享"音乐页"的引用，没有可直接下载的音轨。
//! 唯一的取法：在音乐页上枚举使用同一音乐的普通视频帖，逐个尝试
//! 提取音频，第一个成功的即停止。每个候选只试一次，按 DOM 顺序。

use anyhow::Result;
use std::future::Future;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::browser::PageSession;
use crate::clients::MediaExtractor;
use crate::config::Config;

/// 回退音频的固定输出文件名
pub const AUDIO_FILENAME: &str = "musique.mp3";

/// 视频帖链接的路径标记
const VIDEO_LINK_MARKER: &str = "/video/";

/// 音频回退解析器
pub struct AudioFallbackResolver {
    config: Config,
    extractor: MediaExtractor,
}

impl AudioFallbackResolver {
    pub fn new(config: Config, extractor: MediaExtractor) -> Self {
        Self { config, extractor }
    }

    /// 尝试通过音乐页的候选视频提取音频
    ///
    /// 返回 Ok(true) 表示 `output_dir/musique.mp3` 已写入；Ok(false) 是
    /// 软失败：候选为空或全部失败，轮播帖的图片仍算交付成功。
    pub async fn resolve(&self, music_url: &str, output_dir: &Path) -> Result<bool> {
        let candidates = self.collect_candidates(music_url).await?;
        if candidates.is_empty() {
            info!("🎵 音乐页上没有可用的候选视频");
            return Ok(false);
        }
        info!("🎵 找到 {} 个候选视频", candidates.len());

        let target = output_dir.join(AUDIO_FILENAME);
        let winner = first_success(candidates.len(), |index| {
            info!("🎧 尝试通过第 {} 个候选视频提取音频", index + 1);
            self.try_candidate(&candidates[index], &target)
        })
        .await;

        match winner {
            Some(index) => {
                info!("✅ 第 {} 个候选视频提取成功: {}", index + 1, target.display());
                Ok(true)
            }
            None => {
                warn!("❌ 所有候选视频都无法提取出音乐");
                Ok(false)
            }
        }
    }

    /// 渲染音乐页并按 DOM 顺序收集视频帖链接（不去重，空列表是合法结果）
    async fn collect_candidates(&self, music_url: &str) -> Result<Vec<String>> {
        info!("🔍 正在加载音乐页: {}", music_url);
        let session =
            PageSession::open(&self.config.browser, music_url, self.config.settle_delay()).await?;
        let result = self.collect_from(&session).await;
        session.close().await;
        result
    }

    async fn collect_from(&self, session: &PageSession) -> Result<Vec<String>> {
        // 音乐页是 feed 式页面，滚到底部触发懒加载后再读
        session.scroll_to_bottom(self.config.scroll_settle()).await?;

        let mut hrefs = Vec::new();
        for element in &session.elements("a").await? {
            if let Some(href) = session.attribute(element, "href").await {
                hrefs.push(href);
            }
        }
        Ok(video_candidates(hrefs))
    }

    async fn try_candidate(&self, candidate: &str, target: &Path) -> Result<()> {
        let metadata = self.extractor.metadata(candidate).await?;
        debug!("候选视频标题: {:?}", metadata.title);
        self.extractor.download_audio(candidate, target).await
    }
}

/// 按顺序尝试 `count` 个候选，返回第一个成功的下标
///
/// 每个候选恰好尝试一次，失败记录后继续下一个；全部失败返回 None。
pub(crate) async fn first_success<F, Fut>(count: usize, mut attempt: F) -> Option<usize>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    for index in 0..count {
        match attempt(index).await {
            Ok(()) => return Some(index),
            Err(e) => warn!("⚠️ 候选 {} 失败: {:#}", index + 1, e),
        }
    }
    None
}

/// 过滤出指向视频帖的链接，保持 DOM 顺序
pub(crate) fn video_candidates(hrefs: impl IntoIterator<Item = String>) -> Vec<String> {
    hrefs
        .into_iter()
        .filter(|href| href.contains(VIDEO_LINK_MARKER))
        .collect()
}
