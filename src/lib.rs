//! Tavern Brawl - combat engine for a tavern auto-battler
//!
//! Core modules:
//! - `sim`: Deterministic combat simulation (units, projectiles, effects)
//! - `driver`: Fixed-timestep scheduling and battle session plumbing
//! - `energy`: Backtracking payment matcher for typed energy tokens
//! - `model`: Card and unit templates handed over by the shop layer
//! - `templates`, `waves`: Built-in cards and the scripted enemy waves
//! - `tuning`: Data-driven balance constants

pub mod driver;
pub mod energy;
pub mod model;
pub mod sim;
pub mod templates;
pub mod tuning;
pub mod waves;

pub use driver::{BattleSession, FixedTimestep, TimeScale};
pub use energy::{Cost, EnergyQueue, EnergyType, Payment, try_pay};
pub use model::{BuffStats, Card, Faction, Flourish, UnitModel, UnitRole, UnitStats};
pub use sim::{Battle, CombatUnit, DamageTracker, Impact, Projectile};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const FIXED_STEP_MS: f32 = 1000.0 / TICKS_PER_SECOND as f32;
    /// Largest frame delta accepted by the driver (avoids spiral of death)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Formation anchors
    pub const PLAYER_BASE_X: f32 = 200.0;
    pub const ENEMY_BASE_X: f32 = 600.0;
    pub const FORMATION_BASE_Y: f32 = 250.0;
    pub const MAX_FORMATION_SLOTS: usize = 7;

    /// Collision radii by role
    pub const UNIT_RADIUS: f32 = 10.0;
    pub const BUFFER_RADIUS: f32 = 14.0;
    pub const HERO_RADIUS: f32 = 28.0;

    /// Timings (ticks)
    pub const MIN_COOLDOWN_TICKS: f32 = 10.0;
    pub const HIT_FLASH_TICKS: u32 = 5;
    pub const ATTACK_ANIM_TICKS: u32 = 15;
    pub const EXPLOSION_TICKS: u32 = 20;
    pub const FLOAT_TEXT_TICKS: u32 = 50;
    pub const PARTICLE_BASE_LIFE: u32 = 20;
    pub const MIN_BATTLE_TICKS: u64 = 60;
    pub const ENDING_DELAY_TICKS: u32 = 60;

    /// Projectiles
    pub const PROJECTILE_MIN_FLIGHT_TICKS: f32 = 20.0;
    /// Distance covered per tick, used to derive flight time
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const DEFAULT_AOE_RADIUS: f32 = 30.0;
    pub const MAGIC_WAVE_STRENGTH: f32 = 8.0;
    pub const MAGIC_WAVE_FREQUENCY: f32 = 3.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Move `from` a fixed `step` along the straight line toward `to`
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, step: f32) -> Vec2 {
    let delta = to - from;
    let angle = delta.y.atan2(delta.x);
    from + Vec2::new(angle.cos(), angle.sin()) * step
}

/// Point on a circle of `radius` around `center` at angle `theta`
#[inline]
pub fn polar_offset(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::new(radius * theta.cos(), radius * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_step_toward() {
        let p = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.5);
        assert!((p.x - 1.5).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
    }

    #[test]
    fn test_polar_offset() {
        let p = polar_offset(Vec2::new(1.0, 1.0), 2.0, std::f32::consts::FRAC_PI_2);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 3.0).abs() < 1e-5);
    }
}
