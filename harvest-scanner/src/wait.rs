use std::future::Future;
use std::time::Duration;

/// Poll `probe` every `interval` until it reports true or `timeout` elapses.
///
/// A probe that hangs is cut off by the same deadline.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let polling = async {
        loop {
            if probe().await {
                return;
            }
            tokio::time::sleep(interval).await;
        }
    };

    tokio::time::timeout(timeout, polling).await.is_ok()
}
