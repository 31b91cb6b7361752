//! # TikTok Save
//!
//! 把一批 TikTok 帖子 URL 批量解析为本地媒体文件的下载工具。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Browser / Clients）
//! - `browser/` - 无头浏览器会话：一次渲染操作独占一个浏览器实例
//! - `clients/ytdlp` - 提取引擎封装（元数据 / 视频 / 音频转码）
//! - `clients/fetcher` - 图片字节流抓取与解码保存
//!
//! ### ② 业务能力层（Services）
//! - `services/carousel` - 轮播帖解析（标题、图片、音乐页链接）
//! - `services/audio_fallback` - 音频回退：音乐页 → 候选视频 → 首个成功
//! - `services/video` - 视频直通路径（元数据 → 净化标题 → 下载）
//! - `services/run_log` - 追加式运行日志与失败清单
//!
//! ### ③ 编排层（Orchestrator）
//! - `orchestrator/batch` - 顺序遍历输入清单，分类分派，结果簿记
//!
//! ## 核心流程
//!
//! 视频条目：提取元数据 → 下载 mp4（均匀重试 2 次）。
//! 轮播条目：渲染页面收集图片 → 发现音乐页链接 → 枚举使用同一音乐的
//! 候选视频 → 依序尝试提取音频，第一个成功的即停止（音频是尽力而为，
//! 失败不影响条目成功）。

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use browser::PageSession;
pub use clients::{MediaExtractor, MediaFetcher, MediaMetadata};
pub use config::{BrowserSettings, Config};
pub use models::{CarouselResult, DownloadOutcome, OutcomeStatus, PostKind};
pub use orchestrator::{App, BatchReport, OutputLayout};
pub use services::{AudioFallbackResolver, CarouselResolver, RunLog, VideoDownloader};
pub use utils::{sanitize_filename, RetryPolicy};
