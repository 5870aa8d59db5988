use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

/// Highest value the indicator reaches while a fetch is still running.
pub const PROGRESS_CEILING: f64 = 90.0;
pub const PROGRESS_COMPLETE: f64 = 100.0;

const MAX_STEP: f64 = 10.0;
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Simulated progress of a fetch, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressIndicator {
    value: f64,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value rounded for display.
    pub fn percent(&self) -> u8 {
        self.value.round().clamp(0.0, PROGRESS_COMPLETE) as u8
    }

    /// Moves forward by `step`, never past [`PROGRESS_CEILING`].
    pub fn advance(&mut self, step: f64) -> f64 {
        if self.value < PROGRESS_CEILING {
            self.value = (self.value + step.max(0.0)).min(PROGRESS_CEILING);
        }
        self.value
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_with(&mut rand::rng())
    }

    pub fn tick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let step = rng.random_range(0.0..MAX_STEP);
        self.advance(step)
    }

    pub fn complete(&mut self) {
        self.value = PROGRESS_COMPLETE;
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Ticks a [`ProgressIndicator`] on a fixed interval for as long as one
/// piece of work is running.
#[derive(Debug, Clone)]
pub struct ProgressTicker {
    interval: Duration,
}

impl ProgressTicker {
    /// Intervals shorter than one millisecond are raised to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_TICK_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `work` to completion, publishing every tick on `sender`.
    ///
    /// The timer lives inside this call and is dropped as soon as `work`
    /// resolves, whatever its outcome.
    pub async fn drive<F>(
        &self,
        indicator: &mut ProgressIndicator,
        sender: &watch::Sender<f64>,
        work: F,
    ) -> F::Output
    where
        F: Future,
    {
        tokio::pin!(work);

        let mut timer = interval_at(Instant::now() + self.interval, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                output = &mut work => return output,
                _ = timer.tick() => {
                    let value = indicator.tick();
                    trace!(progress = value, "Progress tick");
                    sender.send_replace(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_advance_stops_at_ceiling() {
        let mut indicator = ProgressIndicator::new();
        assert_eq!(indicator.advance(9.5), 9.5);
        for _ in 0..20 {
            indicator.advance(9.9);
        }
        assert_eq!(indicator.value(), PROGRESS_CEILING);
        assert_eq!(indicator.advance(5.0), PROGRESS_CEILING);
    }

    #[test]
    fn test_negative_steps_are_ignored() {
        let mut indicator = ProgressIndicator::new();
        indicator.advance(12.0);
        assert_eq!(indicator.advance(-4.0), 12.0);
    }

    #[test]
    fn test_complete_and_reset() {
        let mut indicator = ProgressIndicator::new();
        indicator.advance(40.0);
        indicator.complete();
        assert_eq!(indicator.percent(), 100);
        assert_eq!(indicator.tick(), PROGRESS_COMPLETE);
        indicator.reset();
        assert_eq!(indicator.value(), 0.0);
    }

    #[test]
    fn test_random_ticks_stay_below_ceiling() {
        let mut indicator = ProgressIndicator::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut last = 0.0;
        for _ in 0..200 {
            let value = indicator.tick_with(&mut rng);
            assert!(value >= last);
            assert!(value <= PROGRESS_CEILING);
            last = value;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_publishes_until_work_finishes() {
        let (sender, receiver) = watch::channel(0.0);
        let ticker = ProgressTicker::new(Duration::from_millis(500));
        let mut indicator = ProgressIndicator::new();

        let output = ticker
            .drive(&mut indicator, &sender, async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "done"
            })
            .await;

        assert_eq!(output, "done");
        assert_eq!(*receiver.borrow(), indicator.value());
        assert!(indicator.value() <= PROGRESS_CEILING);

        // Ticker is gone: time passing no longer moves the indicator.
        let before = indicator.value();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(indicator.value(), before);
        assert_eq!(*receiver.borrow(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised() {
        let ticker = ProgressTicker::new(Duration::ZERO);
        assert_eq!(ticker.interval(), MIN_TICK_INTERVAL);

        let (sender, receiver) = watch::channel(0.0);
        let mut indicator = ProgressIndicator::new();
        let output = ticker
            .drive(&mut indicator, &sender, async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                "done"
            })
            .await;

        assert_eq!(output, "done");
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow(), indicator.value());
        assert!(indicator.value() <= PROGRESS_CEILING);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_work_returns_without_ticking() {
        let (sender, receiver) = watch::channel(0.0);
        let ticker = ProgressTicker::new(Duration::from_millis(500));
        let mut indicator = ProgressIndicator::new();

        let output = ticker.drive(&mut indicator, &sender, async { 7 }).await;

        assert_eq!(output, 7);
        assert_eq!(indicator.value(), 0.0);
        assert!(!receiver.has_changed().unwrap());
    }
}
