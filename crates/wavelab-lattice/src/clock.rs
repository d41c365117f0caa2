//! Fixed-rate simulation clock.
//!
//! A classic fixed-timestep accumulator: wall-clock frame time is consumed
//! in arbitrary increments, solver steps fire at a constant simulated rate.
//! This keeps solver behavior bit-for-bit comparable across machines of
//! differing speed and decouples model fidelity from frame rate. Time is
//! accumulated in f64 so the step count over a run depends only on total
//! elapsed time, not on how callers partition it (up to the catch-up
//! bound; see `MAX_PENDING_PERIODS`).

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};

/// Upper bound on accumulated time debt, in periods.
///
/// A host that stalls for a long stretch (laptop sleep, debugger pause)
/// would otherwise replay hours of steps inside a single `advance` call.
/// Excess debt beyond this many periods is dropped; the bound is generous
/// enough that ordinary frame hitches still catch up in full.
const MAX_PENDING_PERIODS: f64 = 32.0;

/// Playback speed selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationSpeed {
    /// Real-time step rate.
    #[default]
    Normal,
    /// Half the step rate, for observing fast phenomena.
    Half,
}

impl SimulationSpeed {
    /// Scale factor applied to incoming wall-clock time.
    pub fn factor(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Half => 0.5,
        }
    }
}

/// Fixed-timestep accumulator driving a wave engine.
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    /// Target period between steps, in real seconds at normal speed.
    period: f64,
    /// Accumulated time debt, always in `[0, period)` between calls.
    accumulator: f64,
    speed: SimulationSpeed,
}

impl FixedRateClock {
    /// Create a clock firing `steps_per_second` steps per real second.
    ///
    /// The rate must be finite and positive.
    pub fn new(steps_per_second: f64) -> Result<Self> {
        if !steps_per_second.is_finite() || steps_per_second <= 0.0 {
            return Err(LatticeError::construction(format!(
                "step rate must be finite and positive, got {steps_per_second}"
            )));
        }
        Ok(Self {
            period: 1.0 / steps_per_second,
            accumulator: 0.0,
            speed: SimulationSpeed::default(),
        })
    }

    /// Consume `real_dt` seconds of wall-clock time, invoking `on_step`
    /// once per whole period accumulated. Returns the number of steps fired.
    ///
    /// Negative or non-finite `real_dt` is ignored (a stalled or jumping
    /// host clock must not rewind the accumulator). Debt is capped at
    /// `MAX_PENDING_PERIODS` periods, so a long host stall fires a
    /// bounded burst of steps instead of freezing the frame.
    pub fn advance<F: FnMut()>(&mut self, real_dt: f64, mut on_step: F) -> u32 {
        if !real_dt.is_finite() || real_dt <= 0.0 {
            return 0;
        }
        self.accumulator += real_dt * self.speed.factor();

        let max_debt = self.period * MAX_PENDING_PERIODS;
        if self.accumulator > max_debt {
            tracing::debug!(
                dropped = self.accumulator - max_debt,
                "host stall exceeded the catch-up bound, dropping excess debt"
            );
            self.accumulator = max_debt;
        }

        let mut steps = 0;
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            on_step();
            steps += 1;
        }
        steps
    }

    /// Fire exactly one step at the nominal fixed period, bypassing the
    /// accumulator (the "step" affordance while paused).
    pub fn manual_step<F: FnMut()>(&mut self, mut on_step: F) {
        on_step();
    }

    /// Fractional position within the current accumulating period, in
    /// `[0, 1)`. Used for smooth rendering between discrete steps.
    pub fn interpolation_ratio(&self) -> f32 {
        (self.accumulator / self.period).clamp(0.0, 1.0) as f32
    }

    /// Drop any accumulated time debt.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Current playback speed.
    pub fn speed(&self) -> SimulationSpeed {
        self.speed
    }

    /// Change playback speed. Pending debt is kept; it was already earned
    /// at the old speed.
    pub fn set_speed(&mut self, speed: SimulationSpeed) {
        self.speed = speed;
    }

    /// Target period between steps in real seconds at normal speed.
    pub fn period(&self) -> f64 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rate_rejected() {
        assert!(FixedRateClock::new(0.0).is_err());
        assert!(FixedRateClock::new(-5.0).is_err());
        assert!(FixedRateClock::new(f64::NAN).is_err());
    }

    #[test]
    fn test_steps_fire_at_fixed_rate() {
        let mut clock = FixedRateClock::new(20.0).unwrap();
        let mut count = 0;

        // 0.12s at 20 steps/s: two whole periods, 0.02s of debt left.
        let fired = clock.advance(0.12, || count += 1);
        assert_eq!(fired, 2);
        assert_eq!(count, 2);
        assert!((clock.interpolation_ratio() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_step_count_is_partition_invariant() {
        // 16 steps/s has a binary-exact period, so different partitions of
        // the same total accumulate identically.
        let mut a = FixedRateClock::new(16.0).unwrap();
        let mut b = FixedRateClock::new(16.0).unwrap();

        let mut steps_a = 0;
        for _ in 0..16 {
            a.advance(0.0625, || steps_a += 1);
        }

        let mut steps_b = 0;
        b.advance(0.25, || steps_b += 1);
        b.advance(0.75, || steps_b += 1);

        assert_eq!(steps_a, 16);
        assert_eq!(steps_a, steps_b);
        assert_eq!(a.interpolation_ratio(), b.interpolation_ratio());
    }

    #[test]
    fn test_long_stall_fires_bounded_burst() {
        // 16 steps/s: binary-exact period, so the burst count is exact.
        let mut clock = FixedRateClock::new(16.0).unwrap();
        let mut count = 0;

        // An hour of debt in one call: only the capped burst fires.
        let fired = clock.advance(3600.0, || count += 1);
        assert_eq!(fired, 32);
        assert_eq!(count, 32);
        assert_eq!(clock.interpolation_ratio(), 0.0);

        // Subsequent frames run at the normal rate again.
        let fired = clock.advance(0.125, || count += 1);
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_decimal_frame_times_stay_partition_invariant() {
        // 0.1 is not binary-exact, but at 20 steps/s it is exactly two
        // periods in f64, so decimal frame times accumulate without drift.
        let mut a = FixedRateClock::new(20.0).unwrap();
        let mut b = FixedRateClock::new(20.0).unwrap();

        let mut steps_a = 0;
        for _ in 0..30 {
            a.advance(0.1, || steps_a += 1);
        }

        let mut steps_b = 0;
        for _ in 0..15 {
            b.advance(0.2, || steps_b += 1);
        }

        assert_eq!(steps_a, 60);
        assert_eq!(steps_a, steps_b);
        assert_eq!(a.interpolation_ratio(), b.interpolation_ratio());
    }

    #[test]
    fn test_half_speed_halves_step_rate() {
        // 16 steps/s: binary-exact period, so the counts are exact.
        let mut clock = FixedRateClock::new(16.0).unwrap();
        clock.set_speed(SimulationSpeed::Half);

        let mut count = 0;
        clock.advance(1.0, || count += 1);
        assert_eq!(count, 8);
    }

    #[test]
    fn test_manual_step_bypasses_accumulator() {
        let mut clock = FixedRateClock::new(20.0).unwrap();
        clock.advance(0.03, || {});
        let ratio_before = clock.interpolation_ratio();

        let mut stepped = false;
        clock.manual_step(|| stepped = true);

        assert!(stepped);
        assert_eq!(clock.interpolation_ratio(), ratio_before);
    }

    #[test]
    fn test_bogus_dt_ignored() {
        let mut clock = FixedRateClock::new(20.0).unwrap();
        let mut count = 0;
        clock.advance(-1.0, || count += 1);
        clock.advance(f64::NAN, || count += 1);
        clock.advance(f64::INFINITY, || count += 1);
        assert_eq!(count, 0);
        assert_eq!(clock.interpolation_ratio(), 0.0);
    }

    #[test]
    fn test_reset_drops_debt() {
        let mut clock = FixedRateClock::new(20.0).unwrap();
        clock.advance(0.04, || {});
        assert!(clock.interpolation_ratio() > 0.0);
        clock.reset();
        assert_eq!(clock.interpolation_ratio(), 0.0);
    }
}
