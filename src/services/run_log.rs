//! 运行日志与失败清单 - 业务能力层
//!
//! 只负责"追加一行"能力，不关心流程。两个文件都是追加式：
//! 每次写入时打开、追加、关闭，重跑同一批次只追加不轮转。

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 运行日志写入服务
pub struct RunLog {
    log_path: PathBuf,
    failed_path: PathBuf,
}

impl RunLog {
    pub fn new(log_path: impl Into<PathBuf>, failed_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            failed_path: failed_path.into(),
        }
    }

    /// 追加一条带时间戳的日志行
    pub fn log(&self, message: &str) -> Result<()> {
        debug!("写入运行日志: {}", message);
        append_line(&self.log_path, &format_log_line(Local::now(), message))
    }

    /// 将失败条目的原始 URL 追加到失败清单（供后续重跑）
    pub fn record_failure(&self, url: &str) -> Result<()> {
        debug!("写入失败清单: {}", url);
        append_line(&self.failed_path, &format!("{url}\n"))
    }
}

/// `[YYYY-MM-DD HH:MM:SS] <message>` 格式的日志行
fn format_log_line(timestamp: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}\n", timestamp.format("%Y-%m-%d %H:%M:%S"), message)
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_line_format() {
        let timestamp = Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap();
        assert_eq!(
            format_log_line(timestamp, "Vidéo : titre (https://x)"),
            "[2026-03-14 15:09:26] Vidéo : titre (https://x)\n"
        );
    }

    #[test]
    fn test_log_appends_lines() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let run_log = RunLog::new(dir.path().join("download_log.txt"), dir.path().join("failed_downloads.txt"));

        run_log.log("première ligne").unwrap();
        run_log.log("deuxième ligne").unwrap();

        let content = std::fs::read_to_string(dir.path().join("download_log.txt")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['), "每行都应以时间戳开头");
        assert!(lines[0].ends_with("première ligne"));
        assert!(lines[1].ends_with("deuxième ligne"));
    }

    #[test]
    fn test_failure_list_keeps_raw_urls() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let run_log = RunLog::new(dir.path().join("download_log.txt"), dir.path().join("failed_downloads.txt"));

        run_log.record_failure("https://www.tiktok.com/@u/video/1").unwrap();

        let content = std::fs::read_to_string(dir.path().join("failed_downloads.txt")).unwrap();
        assert_eq!(content, "https://www.tiktok.com/@u/video/1\n", "失败清单只存原始 URL");
    }
}
