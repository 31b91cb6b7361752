//! 轮播帖解析 - 业务能力层
//!
//! 渲染轮播帖页面，收集标题和图片，并顺带发现页面引用的音乐页链接。
//! 单张图片的抓取/解码失败只记录并跳过，绝不中断整个轮播帖。

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::browser::PageSession;
use crate::clients::MediaFetcher;
use crate::config::Config;
use crate::models::{fallback_carousel_title, CarouselResult};
use crate::utils::sanitize_filename;

/// 轮播帖标题所在的元素
const TITLE_SELECTOR: &str = r#"h1[data-e2e="browse-video-title"]"#;

/// 音乐页链接的路径标记
const MUSIC_LINK_MARKER: &str = "/music/";

/// 轮播帖解析器
pub struct CarouselResolver {
    config: Config,
    fetcher: MediaFetcher,
}

impl CarouselResolver {
    pub fn new(config: Config, fetcher: MediaFetcher) -> Self {
        Self { config, fetcher }
    }

    /// 解析一个轮播帖
    ///
    /// 即使一张图片都没有、或没有音乐链接，也返回 Ok——那是内容缺失，
    /// 不是错误。页面本身渲染失败才向上抛。
    pub async fn resolve(&self, url: &str, carousels_root: &Path) -> Result<CarouselResult> {
        info!("🔍 正在加载页面: {}", url);
        let session =
            PageSession::open(&self.config.browser, url, self.config.settle_delay()).await?;
        let result = self.scrape(&session, url, carousels_root).await;
        session.close().await;
        result
    }

    async fn scrape(
        &self,
        session: &PageSession,
        url: &str,
        carousels_root: &Path,
    ) -> Result<CarouselResult> {
        let title = match self.read_title(session).await {
            Some(title) => title,
            None => {
                warn!("⚠️ 未能读取标题，改用 URL 派生的后备标题");
                fallback_carousel_title(url)
            }
        };
        let title = sanitize_filename(&title);

        let output_dir = carousels_root.join(&title);
        fs::create_dir_all(&output_dir)?;

        // 收集图片源：跳过内联 data: 源，按字符串精确去重
        let mut raw_sources = Vec::new();
        for element in &session.elements("img").await? {
            if let Some(src) = session.attribute(element, "src").await {
                raw_sources.push(src);
            }
        }
        let sources = unique_image_sources(raw_sources);

        let fetcher = &self.fetcher;
        let sources_ref = &sources;
        let image_paths = save_numbered_images(&output_dir, &sources, |index, filename| {
            async move { fetcher.fetch_image(&sources_ref[index], &filename).await }
        })
        .await;
        info!("📁 轮播帖处理完毕: {} ({} 张图片)", title, image_paths.len());

        let music_page = self.find_music_link(session).await;

        Ok(CarouselResult {
            title,
            image_paths,
            music_page,
        })
    }

    /// 读取标题，最多尝试配置的次数（标题可能比 DOM 安定得更晚）
    async fn read_title(&self, session: &PageSession) -> Option<String> {
        for attempt in 1..=self.config.title_retry_attempts {
            if let Some(title) = session.find_title(TITLE_SELECTOR).await {
                return Some(title);
            }
            if attempt < self.config.title_retry_attempts {
                tokio::time::sleep(self.config.title_retry_pause()).await;
            }
        }
        None
    }

    /// 扫描页面超链接，取第一个指向音乐页的；查询出错按"没有链接"处理
    async fn find_music_link(&self, session: &PageSession) -> Option<String> {
        let elements = match session.elements("a").await {
            Ok(elements) => elements,
            Err(e) => {
                warn!("⚠️ 扫描超链接失败: {:#}", e);
                return None;
            }
        };
        let mut hrefs = Vec::new();
        for element in &elements {
            if let Some(href) = session.attribute(element, "href").await {
                hrefs.push(href);
            }
        }
        first_music_link(hrefs)
    }
}

/// 按遇到顺序抓取图片源，只有保存成功才消耗编号
///
/// `fetch` 收到源的下标和目标路径，负责把那一张图落盘；失败记录后跳过，
/// 不占用编号，因此 N 次成功产出稠密的 `image_1..image_N` 序列。
pub(crate) async fn save_numbered_images<F, Fut>(
    output_dir: &Path,
    sources: &[String],
    mut fetch: F,
) -> Vec<PathBuf>
where
    F: FnMut(usize, PathBuf) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut image_paths = Vec::new();
    for (index, src) in sources.iter().enumerate() {
        let filename = output_dir.join(format!("image_{}.jpg", image_paths.len() + 1));
        match fetch(index, filename.clone()).await {
            Ok(()) => {
                info!("✅ 图片已保存: {}", filename.display());
                image_paths.push(filename);
            }
            Err(e) => {
                warn!("❌ 图片下载失败: {} -> {:#}", src, e);
            }
        }
    }
    image_paths
}

/// 过滤图片源：去掉 data: 内联源，按字符串精确去重并保持遇到顺序
///
/// 字符串级去重是对"按内容去重"的近似，带查询串的同图异址会漏判，属于
/// 接受的局限。
pub(crate) fn unique_image_sources(sources: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|src| !src.starts_with("data:") && seen.insert(src.clone()))
        .collect()
}

/// DOM 顺序下第一个音乐页链接
pub(crate) fn first_music_link(hrefs: impl IntoIterator<Item = String>) -> Option<String> {
    hrefs.into_iter().find(|href| href.contains(MUSIC_LINK_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_image_numbering_is_dense_over_interleaved_failures() {
        let dir = tempfile::tempdir().unwrap();
        let sources = owned(&["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]);

        // 第 2、4 张抓取失败：失败不占编号，成功序列不留空洞
        let paths = save_numbered_images(dir.path(), &sources, |index, filename| async move {
            if index == 1 || index == 3 {
                Err(anyhow!("décodage impossible"))
            } else {
                std::fs::write(&filename, b"img")?;
                Ok(())
            }
        })
        .await;

        assert_eq!(
            file_names(&paths),
            vec!["image_1.jpg", "image_2.jpg", "image_3.jpg"],
            "编号必须从 1 开始连续，无空洞"
        );
        for path in &paths {
            assert!(path.is_file(), "保存成功的路径应该真实存在: {}", path.display());
        }
        assert!(!dir.path().join("image_4.jpg").exists(), "失败的抓取不应留下文件");
    }

    #[tokio::test]
    async fn test_image_numbering_all_failures_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sources = owned(&["a.jpg", "b.jpg"]);

        let paths = save_numbered_images(dir.path(), &sources, |_, _| async move {
            Err(anyhow!("réseau injoignable"))
        })
        .await;

        assert!(paths.is_empty());
        assert!(!dir.path().join("image_1.jpg").exists());
    }

    #[test]
    fn test_unique_sources_skips_data_urls() {
        let sources = owned(&[
            "https://cdn.example/a.jpg",
            "data:image/png;base64,AAAA",
            "https://cdn.example/b.jpg",
        ]);
        assert_eq!(
            unique_image_sources(sources),
            owned(&["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"])
        );
    }

    #[test]
    fn test_unique_sources_dedups_exact_strings_in_order() {
        let sources = owned(&[
            "https://cdn.example/a.jpg",
            "https://cdn.example/b.jpg",
            "https://cdn.example/a.jpg",
            "https://cdn.example/a.jpg?v=2",
        ]);
        // 精确字符串去重：带查询串的变体算不同的源
        assert_eq!(
            unique_image_sources(sources),
            owned(&[
                "https://cdn.example/a.jpg",
                "https://cdn.example/b.jpg",
                "https://cdn.example/a.jpg?v=2",
            ])
        );
    }

    #[test]
    fn test_first_music_link_takes_dom_order() {
        let hrefs = owned(&[
            "https://www.tiktok.com/@user",
            "https://www.tiktok.com/music/son-original-724",
            "https://www.tiktok.com/music/autre-son-999",
        ]);
        assert_eq!(
            first_music_link(hrefs).as_deref(),
            Some("https://www.tiktok.com/music/son-original-724")
        );
    }

    #[test]
    fn test_no_music_link_is_none() {
        let hrefs = owned(&["https://www.tiktok.com/@user", "https://www.tiktok.com/@user/video/1"]);
        assert_eq!(first_music_link(hrefs), None);
    }
}
