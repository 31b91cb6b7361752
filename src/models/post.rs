//! 帖子相关的数据模型

use std::path::PathBuf;

/// 帖子类型
///
/// 由 URL 的句法标记一次性判定（编排层入口处），之后各处只看这个标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    /// 普通视频帖
    Video,
    /// 图片轮播帖（无内嵌音轨）
    Carousel,
}

impl PostKind {
    /// 按 URL 标记分类：包含 `/photo/` 的是轮播帖，其余按视频处理
    pub fn classify(url: &str) -> Self {
        if url.contains("/photo/") {
            PostKind::Carousel
        } else {
            PostKind::Video
        }
    }
}

/// 轮播帖的解析结果
#[derive(Debug, Clone)]
pub struct CarouselResult {
    /// 净化后的标题（也是输出子目录名）
    pub title: String,
    /// 成功保存的图片路径，按遇到顺序编号
    pub image_paths: Vec<PathBuf>,
    /// 页面上发现的第一个音乐页链接（很多轮播帖没有，不算错误）
    pub music_page: Option<String>,
}

/// 单个条目的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failed,
}

/// 单个条目的处理结果
///
/// 每个输入 URL 恰好产生一条，除下载文件外唯一的持久化状态。
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// 原始输入 URL
    pub item: String,
    pub status: OutcomeStatus,
    /// 成功详情或错误详情（即写入运行日志的消息体）
    pub detail: String,
}

/// 标题缺失时从 URL 的末段派生后备标题
pub fn fallback_carousel_title(url: &str) -> String {
    let last_segment = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("inconnu");
    format!("carrousel_{last_segment}")
}
