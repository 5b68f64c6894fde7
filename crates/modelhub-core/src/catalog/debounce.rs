//! Quiet-period timer for the search box.

use std::future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Delays committing input until activity pauses for `quiet`.
///
/// The debouncer only tracks a deadline; the owner awaits [`expired`]
/// alongside its other event sources.
///
/// [`expired`]: Debouncer::expired
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given quiet period.
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Register activity: (re)arm the deadline `quiet` from now.
    pub fn touch(&mut self) {
        self.deadline = Some(Instant::now() + self.quiet);
    }

    /// Disarm without firing.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Configured quiet period.
    pub const fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Resolve once the deadline passes. Never resolves while disarmed.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(!debouncer.is_armed());

        debouncer.touch();
        let start = Instant::now();
        debouncer.expired().await;
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_rearms_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();

        debouncer.touch();
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.touch();
        debouncer.expired().await;

        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_never_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.touch();
        debouncer.cancel();

        let fired = tokio::time::timeout(Duration::from_secs(5), debouncer.expired()).await;
        assert!(fired.is_err());
    }
}
