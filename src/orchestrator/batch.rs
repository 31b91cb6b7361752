//! 批量下载编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量条目的处理和结果簿记。
//!
//! 1. **初始化**：读取输入清单（致命错误在此中止）、创建输出目录
//! 2. **顺序处理**：逐条解析，一个条目（含其嵌套的音频回退扫描）
//!    完全结束后才开始下一条
//! 3. **分类分派**：每条 URL 在入口处判定一次类型，分派到视频路径
//!    或轮播路径
//! 4. **结果簿记**：每个输入恰好产生一条 [`DownloadOutcome`]，写入
//!    运行日志；失败条目另记入失败清单，绝不中断批次
//!
//! 轮播条目的音频回退是尽力而为：页面本身处理成功即算条目成功，
//! 音频的成败单独记录。

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::clients::{MediaExtractor, MediaFetcher};
use crate::config::Config;
use crate::error::InputError;
use crate::models::{DownloadOutcome, OutcomeStatus, PostKind};
use crate::services::{AudioFallbackResolver, CarouselResolver, RunLog, VideoDownloader};

/// 输出目录布局，以调用方指定的根目录为基准
pub struct OutputLayout {
    pub root: PathBuf,
    pub videos_dir: PathBuf,
    pub carousels_dir: PathBuf,
    pub log_path: PathBuf,
    pub failed_path: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            videos_dir: root.join("videos"),
            carousels_dir: root.join("carousels"),
            log_path: root.join("download_log.txt"),
            failed_path: root.join("failed_downloads.txt"),
        }
    }

    fn create_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.videos_dir)?;
        fs::create_dir_all(&self.carousels_dir)?;
        Ok(())
    }
}

/// 批次处理报告
#[derive(Debug)]
pub struct BatchReport {
    /// 每个输入条目恰好一条，保持输入顺序
    pub outcomes: Vec<DownloadOutcome>,
    pub success: usize,
    pub failed: usize,
}

/// 应用主结构
pub struct App {
    posts: Vec<String>,
    layout: OutputLayout,
    run_log: RunLog,
    carousel: CarouselResolver,
    audio_fallback: AudioFallbackResolver,
    video: VideoDownloader,
}

impl App {
    /// 初始化应用
    ///
    /// 读不到输入文件或清单不是合法的 URL 数组都是致命错误，
    /// 在处理任何条目之前中止。
    pub fn initialize(config: Config, input_file: &Path, output_root: &Path) -> Result<Self> {
        let posts = load_post_list(input_file)?;

        let layout = OutputLayout::new(output_root);
        layout.create_dirs()?;

        let fetcher = MediaFetcher::new();
        let extractor = MediaExtractor::new(&config);
        let run_log = RunLog::new(&layout.log_path, &layout.failed_path);

        Ok(Self {
            carousel: CarouselResolver::new(config.clone(), fetcher),
            audio_fallback: AudioFallbackResolver::new(config.clone(), extractor.clone()),
            video: VideoDownloader::new(&config, extractor),
            posts,
            layout,
            run_log,
        })
    }

    /// 运行整个批次
    ///
    /// 循环对输入列表是全函数：任何条目的失败都不会中断批次。
    pub async fn run(&self) -> Result<BatchReport> {
        let total = self.posts.len();
        log_startup(total, &self.layout.root);

        let mut outcomes = Vec::with_capacity(total);
        let mut success = 0usize;
        let mut failed = 0usize;

        for (index, url) in self.posts.iter().enumerate() {
            info!("\n📥 {}/{} : {}", index + 1, total, url);

            let outcome = self.process_item(index + 1, url).await;
            match outcome.status {
                OutcomeStatus::Success => success += 1,
                OutcomeStatus::Failed => failed += 1,
            }
            outcomes.push(outcome);
        }

        print_final_stats(success, failed, total, &self.layout.log_path);

        Ok(BatchReport {
            outcomes,
            success,
            failed,
        })
    }

    /// 处理一个条目并完成簿记，永远返回一条结果
    async fn process_item(&self, item_index: usize, url: &str) -> DownloadOutcome {
        let result = match PostKind::classify(url) {
            PostKind::Carousel => self.process_carousel(url).await,
            PostKind::Video => self.process_video(url, item_index).await,
        };

        match result {
            Ok(detail) => {
                if let Err(e) = self.run_log.log(&detail) {
                    error!("无法写入运行日志: {:#}", e);
                }
                DownloadOutcome {
                    item: url.to_string(),
                    status: OutcomeStatus::Success,
                    detail,
                }
            }
            Err(e) => {
                error!("❌ 条目处理失败: {:#}", e);
                let detail = format!("Erreur : {url} - {e:#}");
                if let Err(log_err) = self.run_log.log(&detail) {
                    error!("无法写入运行日志: {:#}", log_err);
                }
                if let Err(log_err) = self.run_log.record_failure(url) {
                    error!("无法写入失败清单: {:#}", log_err);
                }
                DownloadOutcome {
                    item: url.to_string(),
                    status: OutcomeStatus::Failed,
                    detail,
                }
            }
        }
    }

    /// 轮播路径：页面处理成功即算条目成功，音频回退只是尽力而为
    async fn process_carousel(&self, url: &str) -> Result<String> {
        info!("📸 处理图片轮播帖...");
        let result = self.carousel.resolve(url, &self.layout.carousels_dir).await?;

        match &result.music_page {
            Some(music_url) => {
                let carousel_dir = self.layout.carousels_dir.join(&result.title);
                match self.audio_fallback.resolve(music_url, &carousel_dir).await {
                    Ok(true) => info!("🎶 音频回退提取成功"),
                    Ok(false) => warn!("❌ 没有候选视频能提取出音乐"),
                    // 音乐页渲染失败同样是软失败，图片已经交付
                    Err(e) => warn!("❌ 音频回退出错: {:#}", e),
                }
            }
            None => warn!("❌ 轮播帖上未检测到音乐链接"),
        }

        Ok(format!("Carrousel traité : {url}"))
    }

    /// 视频路径：内部重试耗尽即条目失败
    async fn process_video(&self, url: &str, item_index: usize) -> Result<String> {
        let title = self
            .video
            .download(url, item_index, &self.layout.videos_dir)
            .await?;
        info!("✅ 视频已提取: {}", title);
        Ok(format!("Vidéo : {title} ({url})"))
    }
}

/// 读取并解析输入清单（JSON 字符串数组）
fn load_post_list(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|e| InputError::ReadFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    let posts: Vec<String> = serde_json::from_str(&raw).map_err(|e| InputError::ParseFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(posts)
}

// ========== 日志辅助函数 ==========

fn log_startup(total: usize, output_root: &Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量下载模式");
    info!("📋 待处理条目: {} 个（顺序处理）", total);
    info!("📂 输出目录: {}", output_root.display());
    info!("{}", "=".repeat(60));
}

fn print_final_stats(success: usize, failed: usize, total: usize, log_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_input(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("liste.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_post_list_parses_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            r#"["https://x/@u/video/1", "https://x/@u/photo/2"]"#,
        );
        let posts = load_post_list(&input).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0], "https://x/@u/video/1");
    }

    #[test]
    fn test_load_post_list_rejects_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), r#"{"pas": "une liste"}"#);
        let err = load_post_list(&input).unwrap_err();
        assert!(err.to_string().contains("不是合法的 URL 数组"));
    }

    #[test]
    fn test_load_post_list_missing_file_is_fatal() {
        let err = load_post_list(Path::new("/introuvable/liste.json")).unwrap_err();
        assert!(err.to_string().contains("无法读取输入清单"));
    }

    #[test]
    fn test_output_layout_paths() {
        let layout = OutputLayout::new(Path::new("/sortie"));
        assert_eq!(layout.root, Path::new("/sortie"));
        assert_eq!(layout.videos_dir, Path::new("/sortie/videos"));
        assert_eq!(layout.carousels_dir, Path::new("/sortie/carousels"));
        assert_eq!(layout.log_path, Path::new("/sortie/download_log.txt"));
        assert_eq!(layout.failed_path, Path::new("/sortie/failed_downloads.txt"));
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "[]");
        let output_root = dir.path().join("sortie");

        let app = App::initialize(Config::default(), &input, &output_root).unwrap();
        let report = app.run().await.unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(report.success, 0);
        assert_eq!(report.failed, 0);
        assert!(output_root.join("videos").is_dir());
        assert!(output_root.join("carousels").is_dir());
    }
}
