//! Minimum spacing between outbound calls, per call class.
//!
//! Each [`ThrottleClass`] owns its own lane: an interval derived from a
//! requests-per-second ceiling and the instant of the last granted call.
//! [`RateThrottle::check`] holds the lane's lock across the wait, so callers
//! of one class are granted in the order they arrived and two
//! near-simultaneous callers can never both pass the spacing check.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use url::Url;

use crate::constants::rate_limits;

/// Category of an outbound call, each with its own spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottleClass {
    /// Search / autocomplete lookups (higher throughput).
    Lookup,
    /// Everything else.
    Default,
}

impl ThrottleClass {
    /// Classify a request URL by its path segments; the query is ignored.
    pub fn for_url(url: &Url) -> Self {
        let lookup = url.path_segments().is_some_and(|mut segments| {
            segments.any(|segment| segment == "autocomplete" || segment == "lookup")
        });
        if lookup { Self::Lookup } else { Self::Default }
    }
}

/// Minimum interval for a requests-per-second ceiling: `ceil(1000 / rps)` ms.
pub fn interval_for_rps(rps: u32) -> Duration {
    let rps = u64::from(rps.max(1));
    Duration::from_millis(1000u64.div_ceil(rps))
}

#[derive(Debug)]
struct Lane {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Lane {
    fn new(rps: u32) -> Self {
        Self {
            interval: interval_for_rps(rps),
            last_call: Mutex::new(None),
        }
    }
}

/// Per-class request spacing owned by one session.
#[derive(Debug)]
pub struct RateThrottle {
    lookup: Lane,
    default: Lane,
}

impl RateThrottle {
    /// Create a throttle from per-class requests-per-second ceilings.
    pub fn new(lookup_rps: u32, default_rps: u32) -> Self {
        Self {
            lookup: Lane::new(lookup_rps),
            default: Lane::new(default_rps),
        }
    }

    /// The minimum spacing enforced for `class`.
    pub fn interval(&self, class: ThrottleClass) -> Duration {
        self.lane(class).interval
    }

    /// Wait until a call of `class` may be issued, then record it as issued now.
    ///
    /// Never fails; at worst it adds latency.
    pub async fn check(&self, class: ThrottleClass) {
        let lane = self.lane(class);
        let mut last_call = lane.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < lane.interval {
                let wait = lane.interval - elapsed;
                tracing::trace!(?class, wait_ms = wait.as_millis() as u64, "throttling");
                time::sleep(wait).await;
            }
        }

        // Stamped after the wait so back-to-back callers serialize.
        *last_call = Some(Instant::now());
    }

    fn lane(&self, class: ThrottleClass) -> &Lane {
        match class {
            ThrottleClass::Lookup => &self.lookup,
            ThrottleClass::Default => &self.default,
        }
    }
}

impl Default for RateThrottle {
    fn default() -> Self {
        Self::new(
            rate_limits::lookup::PER_SECOND,
            rate_limits::default::PER_SECOND,
        )
    }
}
