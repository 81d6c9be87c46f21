use std::time::{Duration, Instant};

/// Mutable state for one crawling session
///
/// Guarded by the context's request lock; the transport and the auth module
/// are the only writers. `last_request_time` drives the rate limiter.
#[derive(Debug)]
pub struct SessionState {
    /// Whether the session is currently authenticated against the site
    pub is_logged_in: bool,

    /// When the most recent outbound request was issued
    pub last_request_time: Option<Instant>,
}

impl SessionState {
    /// Creates a fresh, logged-out session state
    pub fn new() -> Self {
        Self {
            is_logged_in: false,
            last_request_time: None,
        }
    }

    /// Calculates how long to wait before the next request may go out
    ///
    /// Returns `None` if a request can be issued now, or the remaining
    /// portion of `min_delay` otherwise.
    pub fn time_until_next_request(
        &self,
        min_delay: Duration,
        now: Instant,
    ) -> Option<Duration> {
        if let Some(last) = self.last_request_time {
            let elapsed = now.duration_since(last);
            if elapsed < min_delay {
                return Some(min_delay - elapsed);
            }
        }
        None
    }

    /// Records that a request was issued
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
