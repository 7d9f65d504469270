//! Fixed-step cadence driver.

/// Ticks per second unless configured otherwise.
pub const DEFAULT_TICK_RATE: f64 = 10.0;
/// Lowest accepted tick rate.
pub const MIN_TICK_RATE: f64 = 0.1;

/// Turns variable frame deltas into whole fixed steps.
///
/// The step length is `1 / max(1, rate)`, so rates below one tick per second
/// still step once per second.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStepTicker {
    rate: f64,
    accumulator: f64,
    running: bool,
}

impl FixedStepTicker {
    pub fn new(rate: f64) -> Self {
        let mut ticker = Self {
            rate: DEFAULT_TICK_RATE,
            accumulator: 0.0,
            running: true,
        };
        ticker.set_tick_rate(rate);
        ticker
    }

    pub fn tick_rate(&self) -> f64 {
        self.rate
    }

    /// Clamped to [`MIN_TICK_RATE`]. Non-finite input keeps the current rate.
    pub fn set_tick_rate(&mut self, rate: f64) {
        if rate.is_finite() {
            self.rate = rate.max(MIN_TICK_RATE);
        }
    }

    /// Length of one step in seconds.
    pub fn step(&self) -> f64 {
        1.0 / self.rate.max(1.0)
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add `delta` seconds and call `on_step` once per whole step now due.
    ///
    /// Paused tickers ignore `delta` entirely. Returns the number of steps run.
    pub fn advance<F: FnMut(f64)>(&mut self, delta: f64, mut on_step: F) -> u32 {
        if !self.running || delta.is_nan() || delta <= 0.0 {
            return 0;
        }
        self.accumulator += delta;
        let step = self.step();
        let mut steps = 0;
        while self.accumulator >= step {
            self.accumulator -= step;
            on_step(step);
            steps += 1;
        }
        steps
    }
}

impl Default for FixedStepTicker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn emits_whole_steps_and_carries_remainder() {
        let mut ticker = FixedStepTicker::new(4.0);
        let mut seen = Vec::new();
        assert_eq!(ticker.advance(0.625, |dt| seen.push(dt)), 2);
        assert_eq!(seen, vec![0.25, 0.25]);
        assert_eq!(ticker.advance(0.125, |_| {}), 1);
        assert_eq!(ticker.advance(0.125, |_| {}), 0);
    }

    #[test]
    fn pause_drops_time() {
        let mut ticker = FixedStepTicker::default();
        ticker.pause();
        assert_eq!(ticker.advance(5.0, |_| {}), 0);
        ticker.resume();
        assert!(ticker.is_running());
        assert_eq!(ticker.advance(0.05, |_| {}), 0);
    }

    #[test]
    fn rate_is_clamped() {
        let mut ticker = FixedStepTicker::new(0.0);
        assert_eq!(ticker.tick_rate(), MIN_TICK_RATE);
        assert_eq!(ticker.step(), 1.0);
        ticker.set_tick_rate(f64::NAN);
        assert_eq!(ticker.tick_rate(), MIN_TICK_RATE);
        ticker.set_tick_rate(20.0);
        assert_eq!(ticker.step(), 0.05);
    }

    proptest! {
        #[test]
        fn steps_never_exceed_elapsed(rate in 0.1f64..120.0, deltas in proptest::collection::vec(0.0f64..2.0, 0..50)) {
            let mut ticker = FixedStepTicker::new(rate);
            let mut stepped = 0.0;
            let total: f64 = deltas.iter().sum();
            for d in deltas {
                ticker.advance(d, |dt| stepped += dt);
            }
            prop_assert!(stepped <= total + 1e-9);
            prop_assert!(total - stepped < ticker.step() + 1e-9);
        }
    }
}
