//! Fixed-timestep driver
//!
//! Turns variable render-frame deltas into a whole number of simulation ticks.
//! Leftover time carries over to the next frame, so the tick sequence does not
//! depend on the frame rate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{FIXED_STEP_MS, MAX_FRAME_MS};
use crate::model::{Card, Faction};
use crate::sim::{Battle, OutcomeMonitor};
use crate::tuning::{Tuning, TuningError};

/// Speed multiplier selected by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeScale {
    Paused,
    #[default]
    Normal,
    Double,
    Quadruple,
}

impl TimeScale {
    pub fn multiplier(self) -> f32 {
        match self {
            TimeScale::Paused => 0.0,
            TimeScale::Normal => 1.0,
            TimeScale::Double => 2.0,
            TimeScale::Quadruple => 4.0,
        }
    }

    pub fn from_multiplier(multiplier: u32) -> Option<Self> {
        match multiplier {
            0 => Some(TimeScale::Paused),
            1 => Some(TimeScale::Normal),
            2 => Some(TimeScale::Double),
            4 => Some(TimeScale::Quadruple),
            _ => None,
        }
    }
}

/// Time accumulator for a fixed simulation step
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step_ms: f32,
    max_frame_ms: f32,
    accumulator: f32,
    time_scale: TimeScale,
    last_time: Option<f64>,
}

impl FixedTimestep {
    /// Fails unless `step_ms` is positive and `max_frame_ms` is non-negative
    pub fn new(step_ms: f32, max_frame_ms: f32) -> Result<Self, TuningError> {
        if !(step_ms.is_finite() && step_ms > 0.0) {
            return Err(TuningError::Invalid {
                field: "tick_ms",
                reason: format!("must be positive, got {step_ms}"),
            });
        }
        if !(max_frame_ms.is_finite() && max_frame_ms >= 0.0) {
            return Err(TuningError::Invalid {
                field: "max_frame_ms",
                reason: format!("must not be negative, got {max_frame_ms}"),
            });
        }
        Ok(Self {
            step_ms,
            max_frame_ms,
            accumulator: 0.0,
            time_scale: TimeScale::Normal,
            last_time: None,
        })
    }

    pub fn from_tuning(tuning: &Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Self::new(tuning.tick_ms, tuning.max_frame_ms)
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Unspent time carried into the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: TimeScale) {
        self.time_scale = scale;
    }

    /// Drop carried time and forget the last frame timestamp
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Feed one frame's elapsed wall time, running `tick` once per whole step
    ///
    /// Elapsed time is clamped to `max_frame_ms` before scaling; a
    /// non-finite delta counts as no time at all. Returns the number of
    /// ticks run.
    pub fn advance(&mut self, elapsed_ms: f32, mut tick: impl FnMut()) -> u32 {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, self.max_frame_ms)
        } else {
            log::warn!("Ignoring non-finite frame delta {elapsed_ms}");
            0.0
        };
        self.accumulator += elapsed * self.time_scale.multiplier();

        let mut ticks = 0;
        while self.accumulator >= self.step_ms {
            tick();
            self.accumulator -= self.step_ms;
            ticks += 1;
        }
        ticks
    }

    /// Like [`advance`](Self::advance), but from an absolute frame timestamp
    ///
    /// The first frame has no predecessor and counts as one step.
    pub fn frame(&mut self, now_ms: f64, tick: impl FnMut()) -> u32 {
        let elapsed = match self.last_time {
            Some(last) => (now_ms - last) as f32,
            None => self.step_ms,
        };
        self.last_time = Some(now_ms);
        self.advance(elapsed, tick)
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self {
            step_ms: FIXED_STEP_MS,
            max_frame_ms: MAX_FRAME_MS,
            accumulator: 0.0,
            time_scale: TimeScale::Normal,
            last_time: None,
        }
    }
}

/// Callback fired once with the winning side
pub type EndCallback = Box<dyn FnMut(Faction)>;

/// A battle driven by a fixed timestep, with end-of-battle reporting
pub struct BattleSession {
    pub battle: Battle,
    pub timestep: FixedTimestep,
    monitor: OutcomeMonitor,
    on_end: Option<EndCallback>,
}

impl fmt::Debug for BattleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleSession")
            .field("battle", &self.battle)
            .field("timestep", &self.timestep)
            .field("monitor", &self.monitor)
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl BattleSession {
    /// Fails if `tuning` does not validate
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        let timestep = FixedTimestep::from_tuning(&tuning)?;
        Ok(Self {
            battle: Battle::new(tuning, seed),
            timestep,
            monitor: OutcomeMonitor::new(),
            on_end: None,
        })
    }

    /// Set up a fresh round; any pending outcome is discarded
    pub fn start(&mut self, player: &[Option<Card>], enemy: &[Option<Card>]) {
        self.battle.init(player, enemy);
        self.monitor.reset();
        self.timestep.reset();
    }

    pub fn set_on_end(&mut self, callback: impl FnMut(Faction) + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    pub fn set_time_scale(&mut self, scale: TimeScale) {
        self.timestep.set_time_scale(scale);
    }

    /// Advance by one render frame's elapsed time; returns ticks run
    ///
    /// The battle keeps ticking after the outcome so effects can finish.
    pub fn frame(&mut self, elapsed_ms: f32) -> u32 {
        let Self {
            battle,
            timestep,
            monitor,
            on_end,
        } = self;

        timestep.advance(elapsed_ms, || {
            battle.update();
            if let Some(winner) = monitor.observe(battle) {
                if let Some(callback) = on_end.as_mut() {
                    callback(winner);
                }
            }
        })
    }

    pub fn winner(&self) -> Option<Faction> {
        self.monitor.winner()
    }

    pub fn is_finished(&self) -> bool {
        self.monitor.winner().is_some()
    }

    /// True once a wipe has been seen and the grace delay is running
    pub fn is_ending(&self) -> bool {
        self.monitor.is_ending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_and_a_half_steps() {
        let mut ts = FixedTimestep::new(10.0, 100.0).unwrap();
        let mut ticks = 0;
        assert_eq!(ts.advance(25.0, || ticks += 1), 2);
        assert_eq!(ticks, 2);
        assert!((ts.accumulator() - 5.0).abs() < 1e-4);

        // Carry plus half a step completes a third tick
        assert_eq!(ts.advance(5.0, || ticks += 1), 1);
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_paused_accumulates_nothing() {
        let mut ts = FixedTimestep::new(10.0, 100.0).unwrap();
        ts.set_time_scale(TimeScale::Paused);
        assert_eq!(ts.advance(50.0, || {}), 0);
        assert_eq!(ts.accumulator(), 0.0);
    }

    #[test]
    fn test_fast_forward_and_clamp() {
        let mut ts = FixedTimestep::new(10.0, 100.0).unwrap();
        ts.set_time_scale(TimeScale::Quadruple);
        assert_eq!(ts.advance(20.0, || {}), 8);

        ts.set_time_scale(TimeScale::Normal);
        // A 5 second stall is clamped to one 100 ms frame
        assert_eq!(ts.advance(5000.0, || {}), 10);
    }

    #[test]
    fn test_frame_timestamps() {
        let mut ts = FixedTimestep::new(10.0, 100.0).unwrap();
        assert_eq!(ts.frame(1000.0, || {}), 1);
        assert_eq!(ts.frame(1030.0, || {}), 3);
        ts.reset();
        assert_eq!(ts.frame(5000.0, || {}), 1);
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let mut ts = FixedTimestep::new(10.0, 100.0).unwrap();
        assert_eq!(ts.advance(f32::NAN, || {}), 0);
        assert_eq!(ts.advance(f32::INFINITY, || {}), 0);
        assert_eq!(ts.accumulator(), 0.0);

        let mut ticks = 0;
        for _ in 0..10 {
            ticks += ts.advance(16.0, || {});
        }
        assert_eq!(ticks, 16);
    }

    #[test]
    fn test_rejects_bad_step_and_clamp() {
        assert!(matches!(
            FixedTimestep::new(0.0, 100.0),
            Err(TuningError::Invalid { field: "tick_ms", .. })
        ));
        assert!(FixedTimestep::new(f32::NAN, 100.0).is_err());
        assert!(matches!(
            FixedTimestep::new(10.0, -1.0),
            Err(TuningError::Invalid {
                field: "max_frame_ms",
                ..
            })
        ));
        assert!(FixedTimestep::new(10.0, 0.0).is_ok());
    }

    #[test]
    fn test_session_validates_tuning() {
        let mut tuning = Tuning::default();
        tuning.tick_ms = 0.0;
        assert!(BattleSession::new(tuning, 1).is_err());

        let mut tuning = Tuning::default();
        tuning.max_frame_ms = -5.0;
        assert!(FixedTimestep::from_tuning(&tuning).is_err());

        assert!(BattleSession::new(Tuning::default(), 1).is_ok());
    }

    #[test]
    fn test_default_matches_tuning() {
        let ts = FixedTimestep::default();
        assert_eq!(ts.step_ms(), Tuning::default().tick_ms);
    }

    #[test]
    fn test_time_scale_multipliers() {
        for m in [0, 1, 2, 4] {
            let scale = TimeScale::from_multiplier(m).unwrap();
            assert_eq!(scale.multiplier(), m as f32);
        }
        assert_eq!(TimeScale::from_multiplier(3), None);
    }
}
