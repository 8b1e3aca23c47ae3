//! Card and unit templates
//!
//! Read-only data handed to the simulation by the shop/roster layer. Stats are
//! expected to already include upgrades and traits; the simulation only derives
//! buff-adjusted damage and cooldown on top of them.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Battlefield role, drives attack resolution and collision size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitRole {
    Melee,
    Ranged,
    Buffer,
    Splasher,
    Hero,
}

impl UnitRole {
    /// Collision radius of one body of this role
    pub fn radius(self) -> f32 {
        match self {
            UnitRole::Buffer => BUFFER_RADIUS,
            UnitRole::Hero => HERO_RADIUS,
            UnitRole::Melee | UnitRole::Ranged | UnitRole::Splasher => UNIT_RADIUS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitRole::Melee => "Melee",
            UnitRole::Ranged => "Ranged",
            UnitRole::Buffer => "Buffer",
            UnitRole::Splasher => "Splasher",
            UnitRole::Hero => "Hero",
        }
    }
}

/// Side of the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn opponent(self) -> Self {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }
}

/// Cosmetic attack variant
///
/// Only changes the effects an attack spawns, never its damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flourish {
    #[default]
    Plain,
    /// Muzzle flash and a heavy double trail (gunpowder and heavy bows)
    Power,
    /// Wavering arcane projectile with sparkles
    Magic,
}

/// Aura radiated by buffer units to nearby allies
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BuffStats {
    /// Flat damage bonus
    pub damage: f32,
    /// Attack speed bonus (0.1 = 10% faster)
    pub attack_speed: f32,
    /// Optional range bonus
    #[serde(default)]
    pub range: Option<f32>,
}

impl BuffStats {
    pub const fn new(damage: f32, attack_speed: f32) -> Self {
        Self {
            damage,
            attack_speed,
            range: None,
        }
    }

    pub const fn with_range(mut self, range: f32) -> Self {
        self.range = Some(range);
        self
    }
}

/// Combat stats shared by every body of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub hp: f32,
    pub damage: f32,
    pub range: f32,
    /// Ticks between attacks before buffs
    pub attack_cooldown: f32,
    /// Distance moved per tick
    pub move_speed: f32,
    /// Display color (hex)
    pub color: String,
    #[serde(default)]
    pub aoe_radius: Option<f32>,
    #[serde(default)]
    pub buff_radius: Option<f32>,
    #[serde(default)]
    pub buff_stats: Option<BuffStats>,
}

impl UnitStats {
    pub fn new(
        hp: f32,
        damage: f32,
        range: f32,
        attack_cooldown: f32,
        move_speed: f32,
        color: &str,
    ) -> Self {
        Self {
            hp,
            damage,
            range,
            attack_cooldown,
            move_speed,
            color: color.to_string(),
            aoe_radius: None,
            buff_radius: None,
            buff_stats: None,
        }
    }

    pub fn with_aoe(mut self, radius: f32) -> Self {
        self.aoe_radius = Some(radius);
        self
    }

    pub fn with_aura(mut self, radius: f32, buff: BuffStats) -> Self {
        self.buff_radius = Some(radius);
        self.buff_stats = Some(buff);
        self
    }

    /// Attack cooldown floored at the minimum cooldown
    pub fn cooldown_ticks(&self, floor: f32) -> f32 {
        self.attack_cooldown.max(floor)
    }

    /// Aura, if both radius and stats are configured
    pub fn aura(&self) -> Option<(f32, BuffStats)> {
        match (self.buff_radius, self.buff_stats) {
            (Some(radius), Some(stats)) if radius > 0.0 => Some((radius, stats)),
            _ => None,
        }
    }
}

/// Unit template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitModel {
    pub template_id: String,
    pub name: String,
    pub role: UnitRole,
    /// Relative combat value, used by the host for scoring
    pub value: f32,
    pub stats: UnitStats,
    #[serde(default)]
    pub flourish: Flourish,
    /// Fires travel-time projectiles regardless of role
    #[serde(default)]
    pub fires_projectiles: bool,
    /// Attacks shake the screen
    #[serde(default)]
    pub heavy_hitter: bool,
}

impl UnitModel {
    pub fn new(
        template_id: &str,
        name: &str,
        role: UnitRole,
        value: f32,
        stats: UnitStats,
    ) -> Self {
        Self {
            template_id: template_id.to_string(),
            name: name.to_string(),
            role,
            value,
            stats,
            flourish: Flourish::Plain,
            fires_projectiles: false,
            heavy_hitter: false,
        }
    }

    pub fn with_flourish(mut self, flourish: Flourish) -> Self {
        self.flourish = flourish;
        self
    }

    /// Route attacks through projectiles even for non-splasher roles
    pub fn firing_projectiles(mut self) -> Self {
        self.fires_projectiles = true;
        self
    }

    pub fn heavy_hitter(mut self) -> Self {
        self.heavy_hitter = true;
        self
    }
}

/// One roster slot: a template and how many bodies it fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub model: UnitModel,
    pub unit_count: u32,
}

impl Card {
    pub fn new(id: impl Into<String>, model: UnitModel, unit_count: u32) -> Self {
        Self {
            id: id.into(),
            model,
            unit_count,
        }
    }

    /// Share of the card's value carried by each body
    pub fn value_per_unit(&self) -> f32 {
        self.model.value / self.unit_count.max(1) as f32
    }
}
