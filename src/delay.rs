use std::time::Duration;

/// Randomized human-like pause between navigation actions.
///
/// Delays are plain sleeps: the run is a single logical task, so there is
/// nothing to yield to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayPolicy {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Routine pacing between ordinary navigation steps.
    pub const fn routine() -> Self {
        Self::new(200, 600)
    }

    /// Longer pause before re-attempting after a navigation timeout, to
    /// reduce the chance of tripping rate-based bot detection on the retry.
    pub const fn retry() -> Self {
        Self::new(500, 1500)
    }

    /// Draw a delay uniformly from `[min_ms, max_ms]`.
    pub fn sample(&self) -> u64 {
        use rand::prelude::*;
        let mut rng = rand::rng();
        rng.random_range(self.min_ms..=self.max_ms)
    }

    pub async fn pause(&self) {
        tokio::time::sleep(Duration::from_millis(self.sample())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ranges() {
        let routine = DelayPolicy::routine();
        assert_eq!(routine.min_ms, 200);
        assert_eq!(routine.max_ms, 600);

        let retry = DelayPolicy::retry();
        assert_eq!(retry.min_ms, 500);
        assert_eq!(retry.max_ms, 1500);
    }

    #[test]
    fn sample_stays_in_range() {
        let policy = DelayPolicy::new(50, 100);
        for _ in 0..200 {
            let d = policy.sample();
            assert!((50..=100).contains(&d), "sample {} out of range", d);
        }
    }

    #[test]
    fn degenerate_range_is_exact() {
        assert_eq!(DelayPolicy::new(75, 75).sample(), 75);
    }

    #[tokio::test]
    async fn pause_blocks_for_at_least_min() {
        let policy = DelayPolicy::new(20, 40);
        let start = std::time::Instant::now();
        policy.pause().await;
        assert!(start.elapsed().as_millis() >= 15); // allow timer slack
    }
}
