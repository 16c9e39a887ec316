//! Fixed-rate timer that decides when automatic cycles fire

use crate::error::WireWorldError;
use std::time::Duration;

pub const DEFAULT_CYCLES_PER_SECOND: f64 = 3.0;
pub const DEFAULT_SPEED_STEP: f64 = 0.2;

/// Bounds on the rate, keeping the interval finite and non-zero
pub const MIN_CYCLES_PER_SECOND: f64 = 0.01;
pub const MAX_CYCLES_PER_SECOND: f64 = 1000.0;

/// Accumulates frame time and reports how many cycles are due.
///
/// Time left over after a cycle fires carries into the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoCycler {
    enabled: bool,
    cycles_per_second: f64,
    speed_step: f64,
    accumulated: Duration,
}

impl Default for AutoCycler {
    fn default() -> Self {
        Self {
            enabled: false,
            cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
            speed_step: DEFAULT_SPEED_STEP,
            accumulated: Duration::ZERO,
        }
    }
}

impl AutoCycler {
    pub fn new(cycles_per_second: f64, speed_step: f64) -> Result<Self, WireWorldError> {
        if !(speed_step > 0.0 && speed_step < 1.0) {
            return Err(WireWorldError::InvalidConfig(format!(
                "speed step must lie strictly between 0 and 1, got {speed_step}"
            )));
        }
        let mut cycler = Self {
            speed_step,
            ..Self::default()
        };
        cycler.set_rate(cycles_per_second)?;
        Ok(cycler)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable; disabling drops any partially accumulated time
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.accumulated = Duration::ZERO;
        }
    }

    pub fn toggle(&mut self) {
        self.set_enabled(!self.enabled);
    }

    pub fn rate(&self) -> f64 {
        self.cycles_per_second
    }

    pub fn speed_step(&self) -> f64 {
        self.speed_step
    }

    pub fn set_rate(&mut self, cycles_per_second: f64) -> Result<(), WireWorldError> {
        if !(MIN_CYCLES_PER_SECOND..=MAX_CYCLES_PER_SECOND).contains(&cycles_per_second) {
            return Err(WireWorldError::InvalidRate(cycles_per_second));
        }
        self.cycles_per_second = cycles_per_second;
        Ok(())
    }

    /// Time between two automatic cycles
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.cycles_per_second)
    }

    pub fn speed_up(&mut self) {
        self.scale_rate(1.0 + self.speed_step);
    }

    pub fn slow_down(&mut self) {
        self.scale_rate(1.0 - self.speed_step);
    }

    fn scale_rate(&mut self, factor: f64) {
        self.cycles_per_second =
            (self.cycles_per_second * factor).clamp(MIN_CYCLES_PER_SECOND, MAX_CYCLES_PER_SECOND);
    }

    /// Feed elapsed frame time and return how many cycles are due
    pub fn tick(&mut self, delta: Duration) -> u32 {
        if !self.enabled {
            return 0;
        }

        self.accumulated += delta;
        let interval = self.interval();
        let mut due = 0;
        while self.accumulated > interval {
            self.accumulated -= interval;
            due += 1;
        }
        due
    }

    /// Time accumulated towards the next cycle
    pub fn pending(&self) -> Duration {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(rate: f64) -> AutoCycler {
        let mut cycler = AutoCycler::new(rate, DEFAULT_SPEED_STEP).unwrap();
        cycler.set_enabled(true);
        cycler
    }

    #[test]
    fn test_disabled_never_fires() {
        let mut cycler = AutoCycler::default();
        assert_eq!(cycler.tick(Duration::from_secs(10)), 0);
        assert_eq!(cycler.pending(), Duration::ZERO);
    }

    #[test]
    fn test_leftover_time_carries_over() {
        // 4 cycles/s -> 250ms interval
        let mut cycler = enabled(4.0);
        assert_eq!(cycler.tick(Duration::from_millis(200)), 0);
        assert_eq!(cycler.tick(Duration::from_millis(100)), 1);
        assert_eq!(cycler.pending(), Duration::from_millis(50));
        assert_eq!(cycler.tick(Duration::from_millis(201)), 1);
        assert_eq!(cycler.pending(), Duration::from_millis(1));
    }

    #[test]
    fn test_long_frame_fires_several_cycles() {
        let mut cycler = enabled(10.0);
        assert_eq!(cycler.tick(Duration::from_millis(350)), 3);
        assert_eq!(cycler.pending(), Duration::from_millis(50));
    }

    #[test]
    fn test_toggle_off_clears_accumulator() {
        let mut cycler = enabled(1.0);
        cycler.tick(Duration::from_millis(900));
        cycler.toggle();
        assert!(!cycler.is_enabled());
        assert_eq!(cycler.pending(), Duration::ZERO);
    }

    #[test]
    fn test_speed_adjustment() {
        let mut cycler = AutoCycler::new(10.0, 0.5).unwrap();
        cycler.speed_up();
        assert!((cycler.rate() - 15.0).abs() < 1e-9);
        cycler.slow_down();
        assert!((cycler.rate() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_rate_never_reaches_zero() {
        let mut cycler = AutoCycler::new(1.0, 0.9).unwrap();
        for _ in 0..10_000 {
            cycler.slow_down();
        }
        assert!(cycler.rate() >= MIN_CYCLES_PER_SECOND);
        assert!(cycler.interval() > Duration::ZERO);

        for _ in 0..10_000 {
            cycler.speed_up();
        }
        assert_eq!(cycler.rate(), MAX_CYCLES_PER_SECOND);
        assert!(cycler.interval() > Duration::ZERO);
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let mut cycler = AutoCycler::default();
        assert!(matches!(cycler.set_rate(0.0), Err(WireWorldError::InvalidRate(_))));
        assert!(cycler.set_rate(-2.0).is_err());
        assert!(cycler.set_rate(f64::NAN).is_err());
        assert!(cycler.set_rate(f64::INFINITY).is_err());
        assert!(cycler.set_rate(MAX_CYCLES_PER_SECOND * 2.0).is_err());
        assert_eq!(cycler.rate(), DEFAULT_CYCLES_PER_SECOND);

        assert!(AutoCycler::new(3.0, 0.0).is_err());
        assert!(AutoCycler::new(3.0, 1.0).is_err());
    }
}
