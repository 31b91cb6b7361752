//! 重试驱动
//!
//! 把"重试多少次"与"什么算可重试"从调用方的循环里抽出来：
//! 调用方声明一个 [`RetryPolicy`]，由 [`run_with_retry`] 统一执行。

use anyhow::{anyhow, Result};
use std::future::Future;
use tracing::warn;

/// 重试策略
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次）
    pub max_attempts: usize,
    /// 判断某个错误是否值得重试
    pub is_retryable: fn(&anyhow::Error) -> bool,
}

impl RetryPolicy {
    /// 均匀重试：所有错误一视同仁，不区分瞬时与永久失败
    pub fn uniform(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            is_retryable: |_| true,
        }
    }
}

/// 按策略执行操作，无退避间隔
///
/// `op` 的参数是从 1 开始的尝试序号。策略判定为不可重试的错误立即返回。
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 1..=policy.max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !(policy.is_retryable)(&e) {
                    return Err(e);
                }
                warn!("⚠️ 第 {}/{} 次尝试失败: {:#}", attempt, policy.max_attempts, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("重试策略未执行任何尝试")))
}
