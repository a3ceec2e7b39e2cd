use async_trait::async_trait;
use std::time::Duration;

/// Something that can wait for a duration
///
/// Production code sleeps on the tokio timer; tests record the requested
/// durations and return immediately.
#[async_trait]
pub trait Sleeper: Send {
    async fn sleep(&mut self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
