//! Monotonic clock sampled by the render loop and the flows.

use tokio::time::Instant;

/// Milliseconds since an arbitrary fixed origin.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Clock backed by tokio's timer, so paused test runtimes control it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    /// Must be called inside a tokio runtime.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn follows_tokio_time() {
        let clock = TokioClock::new();
        assert_eq!(clock.now_ms(), 0.0);
        tokio::time::advance(Duration::from_millis(250)).await;
        assert!((clock.now_ms() - 250.0).abs() < 1e-6);
    }
}
