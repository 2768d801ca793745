use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;
use tracker_logging::tracker_debug;

/// Process-wide pacing for outbound page fetches.
///
/// A single "last request" timestamp is shared by every caller, not tracked
/// per origin. The lock is held across the sleep, so concurrent callers queue
/// up behind each other instead of firing together.
#[derive(Debug)]
pub struct RateLimiter {
    min: Duration,
    max: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
            last_request: Mutex::new(None),
        }
    }

    /// Sleep until a random interval in `[min, max]` has passed since the previous
    /// permitted request, then record now. Returns how long it slept.
    pub async fn wait_before_next_request(&self) -> Duration {
        let mut last = self.last_request.lock().await;
        let mut waited = Duration::ZERO;
        if let Some(previous) = *last {
            let interval = self.pick_interval();
            let elapsed = previous.elapsed();
            if elapsed < interval {
                waited = interval - elapsed;
                tracker_debug!("Rate limiter sleeping {:?}", waited);
                tokio::time::sleep(waited).await;
            }
        }
        *last = Some(Instant::now());
        waited
    }

    fn pick_interval(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}
