use log::{error, warn};
use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::storage::StoreError;

const INITIAL_BACKOFF_MS: u64 = 200;
const MAX_BACKOFF_MS: u64 = 5_000;

/// Wait before the attempt after one that waited `current`
pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(Duration::from_millis(MAX_BACKOFF_MS))
}

/// Run a file operation, retrying up to `max_retries` more times on failure
///
/// The wait between attempts starts at 200 ms and doubles after every
/// failure, up to 5 s. The error of the final attempt is returned.
pub async fn execute_with_retry<F, Fut, T>(
    description: &str,
    max_retries: u32,
    operation: F,
) -> Result<T, StoreError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let attempts = max_retries.saturating_add(1);
    let mut backoff = Duration::from_millis(INITIAL_BACKOFF_MS);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                warn!(
                    "Attempt {}/{}: {} failed: {}. Retrying in {} ms",
                    attempt,
                    attempts,
                    description,
                    e,
                    backoff.as_millis()
                );
                sleep(backoff).await;
                backoff = next_backoff(backoff);
                attempt += 1;
            }
            Err(e) => {
                error!("Attempt {}/{}: {} failed: {}", attempt, attempts, description, e);
                return Err(e);
            }
        }
    }
}
