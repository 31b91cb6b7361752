//! 应用程序错误类型
//!
//! 按来源划分错误域：浏览器、提取引擎、图片抓取、输入清单。
//! 图片级与候选级的失败在各自的 resolver 内部记录并吞掉，不会传播到这里；
//! 条目级失败由编排层记录到日志与失败清单后继续处理下一条。

use thiserror::Error;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 无头浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 创建页面或导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
}

/// 提取引擎（yt-dlp 子进程）相关错误
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// 无法启动提取引擎进程
    #[error("无法启动提取引擎 {bin}: {source}")]
    SpawnFailed {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    /// 元数据提取失败
    #[error("元数据提取失败 ({url}): {detail}")]
    MetadataFailed { url: String, detail: String },
    /// 元数据 JSON 解析失败
    #[error("元数据 JSON 解析失败: {source}")]
    MetadataParseFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 下载失败
    #[error("下载失败 ({url}): {detail}")]
    DownloadFailed { url: String, detail: String },
}

/// 图片抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP 请求失败
    #[error("图片请求失败: {0}")]
    Http(#[from] reqwest::Error),
    /// 解码或保存失败
    #[error("图片解码或保存失败: {0}")]
    Decode(#[from] image::ImageError),
}

/// 输入清单错误（致命：在处理任何条目之前中止整个运行）
#[derive(Debug, Error)]
pub enum InputError {
    /// 无法读取输入清单文件
    #[error("无法读取输入清单 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 输入清单不是合法的 URL 字符串数组
    #[error("输入清单 {path} 不是合法的 URL 数组: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
