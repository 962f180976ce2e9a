//! Utility modules.

pub mod retry;
pub mod text;

pub use retry::{RetryOutcome, RetryPolicy, Retryable, with_retry};
pub use text::{escape_html, estimate_tokens, estimate_tokens_for_len, trim_browser, utf16_len};
