pub mod retry;
pub mod sanitize;

pub use retry::{run_with_retry, RetryPolicy};
pub use sanitize::sanitize_filename;
