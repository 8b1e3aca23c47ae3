//! Balance tuning
//!
//! Tick timings and balance floors are data, not code: the defaults mirror the
//! shipped game and can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Simulation and driver tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed tick duration (ms)
    pub tick_ms: f32,
    /// Clamp on a single frame's elapsed time (ms)
    pub max_frame_ms: f32,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub max_formation_slots: usize,

    // === Combat balance ===
    /// Effective cooldown never drops below this, whatever the buffs
    pub min_cooldown_ticks: f32,
    pub projectile_min_flight_ticks: f32,
    /// Distance per tick used to derive projectile flight time
    pub projectile_speed: f32,
    /// AOE used by projectile units without their own radius
    pub default_aoe_radius: f32,

    // === Cosmetics ===
    pub magic_wave_strength: f32,
    pub magic_wave_frequency: f32,
    pub attack_anim_ticks: u32,
    pub hit_flash_ticks: u32,

    // === Ending ===
    /// A wipe is not accepted before the battle has run this long
    pub min_battle_ticks: u64,
    /// Ticks between an accepted wipe and the outcome report
    pub ending_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: FIXED_STEP_MS,
            max_frame_ms: MAX_FRAME_MS,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            max_formation_slots: MAX_FORMATION_SLOTS,

            min_cooldown_ticks: MIN_COOLDOWN_TICKS,
            projectile_min_flight_ticks: PROJECTILE_MIN_FLIGHT_TICKS,
            projectile_speed: PROJECTILE_SPEED,
            default_aoe_radius: DEFAULT_AOE_RADIUS,

            magic_wave_strength: MAGIC_WAVE_STRENGTH,
            magic_wave_frequency: MAGIC_WAVE_FREQUENCY,
            attack_anim_ticks: ATTACK_ANIM_TICKS,
            hit_flash_ticks: HIT_FLASH_TICKS,

            min_battle_ticks: MIN_BATTLE_TICKS,
            ending_delay_ticks: ENDING_DELAY_TICKS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json_string(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("tick_ms", self.tick_ms)?;
        positive("max_frame_ms", self.max_frame_ms)?;
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("min_cooldown_ticks", self.min_cooldown_ticks)?;
        positive("projectile_min_flight_ticks", self.projectile_min_flight_ticks)?;
        positive("projectile_speed", self.projectile_speed)?;

        if self.max_formation_slots == 0 {
            return Err(TuningError::Invalid {
                field: "max_formation_slots",
                reason: "at least one slot is required".into(),
            });
        }
        if self.max_formation_slots > MAX_FORMATION_SLOTS {
            return Err(TuningError::Invalid {
                field: "max_formation_slots",
                reason: format!(
                    "the formation has {MAX_FORMATION_SLOTS} slots, got {}",
                    self.max_formation_slots
                ),
            });
        }
        if self.default_aoe_radius < 0.0 {
            return Err(TuningError::Invalid {
                field: "default_aoe_radius",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}
