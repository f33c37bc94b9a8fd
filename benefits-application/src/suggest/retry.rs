use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use super::classifier::{ErrorInfo, categorize_error};
use crate::language::Language;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Delay before the retry that follows failed attempt `attempt` (0-based).
///
/// A server-suggested wait takes precedence over exponential backoff.
pub fn backoff_delay(info: &ErrorInfo, attempt: u32, base_delay: Duration) -> Duration {
    match info.retry_after_seconds {
        Some(seconds) => Duration::from_secs(seconds),
        None => base_delay.saturating_mul(2u32.saturating_pow(attempt)),
    }
}

/// Run `operation`, retrying transient failures with exponential backoff.
///
/// At most `max_retries + 1` attempts are made. A failure the classifier
/// marks as non-retryable is returned immediately, as is the failure of the
/// last allowed attempt. Waiting suspends only the calling task; there is no
/// way to cancel a sequence once started other than dropping the future.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    max_retries: u32,
    base_delay: Duration,
    language: Language,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if attempt >= max_retries {
            warn!(attempts = attempt + 1, error = %error, "Giving up after final attempt");
            return Err(error);
        }

        let info = categorize_error(&error.to_string(), language);
        if !info.retryable {
            return Err(error);
        }

        let delay = backoff_delay(&info, attempt, base_delay);
        info!(
            attempt = attempt + 1,
            max_retries,
            delay_ms = delay.as_millis() as u64,
            error_kind = info.kind.as_str(),
            "Retrying after transient failure"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
