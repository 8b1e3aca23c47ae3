//! Deterministic combat simulation
//!
//! All battle logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Fixed timestep only (one `Battle::update` per tick)
//! - Seeded RNG only
//! - Stable iteration order (by unit index)

pub mod collision;
pub mod damage;
pub mod effects;
pub mod formation;
pub mod outcome;
pub mod state;
pub mod tick;

pub use collision::{clamp_to_arena, separate_units};
pub use damage::{DamageEntry, DamageTracker};
pub use effects::{AttackTrail, Effects, Explosion, FloatingText, Particle};
pub use formation::{order_roster, slot_position};
pub use outcome::OutcomeMonitor;
pub use state::{
    AnimState, Battle, Buffs, CombatUnit, Impact, ImpactHook, Projectile, ProjectileStyle, UnitId,
    parse_color,
};
