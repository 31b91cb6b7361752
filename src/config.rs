use std::time::Duration;

/// 浏览器启动设置
///
/// 纯配置值：每次渲染操作创建一个浏览器实例时传入，用完即弃，
/// 不存在进程级的浏览器状态。
#[derive(Clone, Debug)]
pub struct BrowserSettings {
    /// 是否使用无头模式
    pub headless: bool,
    /// Chromium 启动参数
    pub launch_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            launch_args: vec![
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--lang=en-US".to_string(),
                "--disable-logging".to_string(),
                "--log-level=3".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--enable-unsafe-swiftshader".to_string(),
            ],
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 页面加载后的固定等待秒数
    pub settle_delay_secs: u64,
    /// 滚动到底部后的额外等待秒数（触发懒加载）
    pub scroll_settle_secs: u64,
    /// 标题读取的尝试次数
    pub title_retry_attempts: usize,
    /// 标题读取的重试间隔（毫秒）
    pub title_retry_pause_ms: u64,
    /// 单个视频下载的总尝试次数
    pub video_download_attempts: usize,
    /// 提取引擎可执行文件（yt-dlp）
    pub ytdlp_bin: String,
    /// 音频回退的转码目标编码
    pub audio_codec: String,
    /// 音频回退的转码目标码率
    pub audio_quality: String,
    /// 浏览器启动设置
    pub browser: BrowserSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_secs: 5,
            scroll_settle_secs: 3,
            title_retry_attempts: 2,
            title_retry_pause_ms: 1000,
            video_download_attempts: 2,
            ytdlp_bin: "yt-dlp".to_string(),
            audio_codec: "mp3".to_string(),
            audio_quality: "192K".to_string(),
            browser: BrowserSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            settle_delay_secs: std::env::var("SETTLE_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_delay_secs),
            scroll_settle_secs: std::env::var("SCROLL_SETTLE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.scroll_settle_secs),
            title_retry_attempts: std::env::var("TITLE_RETRY_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.title_retry_attempts),
            title_retry_pause_ms: std::env::var("TITLE_RETRY_PAUSE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.title_retry_pause_ms),
            video_download_attempts: std::env::var("VIDEO_DOWNLOAD_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.video_download_attempts),
            ytdlp_bin: std::env::var("YTDLP_BIN").unwrap_or(default.ytdlp_bin),
            audio_codec: std::env::var("AUDIO_CODEC").unwrap_or(default.audio_codec),
            audio_quality: std::env::var("AUDIO_QUALITY").unwrap_or(default.audio_quality),
            browser: default.browser,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_secs(self.scroll_settle_secs)
    }

    pub fn title_retry_pause(&self) -> Duration {
        Duration::from_millis(self.title_retry_pause_ms)
    }
}
