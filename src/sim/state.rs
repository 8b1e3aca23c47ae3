//! Battle state and core simulation types
//!
//! Everything a tick reads or writes lives on [`Battle`]. Units are never
//! removed during a round: dead units stay in place (hp 0) and are skipped,
//! so indices remain stable until the next `init`.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::damage::DamageTracker;
use super::effects::Effects;
use crate::model::{BuffStats, Faction, Flourish, UnitRole};
use crate::tuning::Tuning;

/// Stable handle of a unit within one round (its index in `Battle::units`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Animation state shown by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Move,
    Attack,
}

/// Buff totals received this tick (recomputed from scratch every tick)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Buffs {
    pub damage: f32,
    pub attack_speed: f32,
    pub range: f32,
}

impl Buffs {
    pub fn add(&mut self, aura: &BuffStats) {
        self.damage += aura.damage;
        self.attack_speed += aura.attack_speed;
        if let Some(range) = aura.range {
            self.range += range;
        }
    }
}

/// One physical body on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatUnit {
    pub id: UnitId,
    /// Card this body was spawned from
    pub card_id: String,
    pub template_id: String,
    pub name: String,
    pub faction: Faction,
    pub role: UnitRole,
    pub flourish: Flourish,
    pub fires_projectiles: bool,
    pub heavy_hitter: bool,
    /// Share of the card value carried by this body
    pub value: f32,
    /// Packed 0xRRGGBB
    pub color: u32,

    pub pos: Vec2,
    pub radius: f32,

    pub max_hp: f32,
    pub current_hp: f32,
    pub base_damage: f32,
    /// Base damage plus this tick's damage buffs
    pub damage: f32,
    pub range: f32,
    pub base_cooldown: f32,
    /// Base cooldown shortened by this tick's attack speed buffs
    pub max_cooldown: f32,
    /// Ticks until the next attack
    pub cooldown: f32,
    pub move_speed: f32,

    pub aoe_radius: Option<f32>,
    pub buff_radius: Option<f32>,
    pub buff_stats: Option<BuffStats>,
    pub buffs: Buffs,

    /// Weak reference, re-resolved every tick
    pub target: Option<UnitId>,

    pub anim_state: AnimState,
    pub anim_timer: u32,
    /// Where the unit is facing/aiming
    pub last_aim: Option<Vec2>,
    pub hit_flash: u32,
}

impl CombatUnit {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    /// Aura radiated to allies, if any
    pub fn aura(&self) -> Option<(f32, BuffStats)> {
        match (self.buff_radius, self.buff_stats) {
            (Some(radius), Some(stats)) if radius > 0.0 => Some((radius, stats)),
            _ => None,
        }
    }

    /// Splash radius of instant attacks (zero means single target)
    pub fn instant_aoe(&self) -> Option<f32> {
        self.aoe_radius.filter(|&r| r > 0.0)
    }

    pub fn uses_projectiles(&self) -> bool {
        self.role == UnitRole::Splasher || self.fires_projectiles
    }

    /// Reach including this tick's range buff
    pub fn effective_range(&self) -> f32 {
        self.range + self.buffs.range
    }
}

/// Projectile flight style (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileStyle {
    /// Straight, spinning shot (ballista bolts, boulders)
    Siege,
    /// Wavering arcane orb
    Magic,
}

/// A splash attack in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub start: Vec2,
    pub pos: Vec2,
    pub target: Vec2,
    /// Flight progress in [0, 1]
    pub progress: f32,
    /// Progress gained per tick
    pub speed: f32,
    pub damage: f32,
    pub aoe_radius: f32,
    pub style: ProjectileStyle,
    /// Spin angle for siege shots
    pub rotation: f32,
    pub faction: Faction,
    pub color: u32,
    /// Attacker identity, kept for damage attribution after it moves or dies
    pub source_name: String,
    pub source_role: UnitRole,
}

/// High-impact moments the host may answer with camera shake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// A unit died
    Death,
    /// A hero or heavy hitter landed a blow
    HeavyStrike,
    /// A projectile exploded
    Explosion,
}

pub type ImpactHook = Box<dyn FnMut(Impact)>;

/// One battle instance
pub struct Battle {
    pub tuning: Tuning,
    /// Every body spawned this round, dead ones included
    pub units: Vec<CombatUnit>,
    pub projectiles: Vec<Projectile>,
    /// Visual effects (no gameplay authority)
    pub effects: Effects,
    pub player_damage: DamageTracker,
    pub enemy_damage: DamageTracker,
    /// Ticks simulated since `init`
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    impact_hook: Option<ImpactHook>,
}

impl fmt::Debug for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("time_ticks", &self.time_ticks)
            .field("units", &self.units.len())
            .field("projectiles", &self.projectiles.len())
            .field("impact_hook", &self.impact_hook.is_some())
            .finish()
    }
}

impl Battle {
    /// Create an empty battle; all randomness is drawn from `seed`
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            units: Vec::new(),
            projectiles: Vec::new(),
            effects: Effects::default(),
            player_damage: DamageTracker::default(),
            enemy_damage: DamageTracker::default(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            impact_hook: None,
        }
    }

    /// Install the camera-shake style feedback hook
    pub fn set_impact_hook(&mut self, hook: impl FnMut(Impact) + 'static) {
        self.impact_hook = Some(Box::new(hook));
    }

    pub(crate) fn emit_impact(&mut self, impact: Impact) {
        if let Some(hook) = self.impact_hook.as_mut() {
            hook(impact);
        }
    }

    pub fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.units.get(id.index())
    }

    pub fn damage_tracker(&self, faction: Faction) -> &DamageTracker {
        match faction {
            Faction::Player => &self.player_damage,
            Faction::Enemy => &self.enemy_damage,
        }
    }

    pub(crate) fn damage_tracker_mut(&mut self, faction: Faction) -> &mut DamageTracker {
        match faction {
            Faction::Player => &mut self.player_damage,
            Faction::Enemy => &mut self.enemy_damage,
        }
    }

    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &CombatUnit> {
        self.units
            .iter()
            .filter(move |u| u.faction == faction && u.is_alive())
    }

    pub fn living_count(&self, faction: Faction) -> usize {
        self.living(faction).count()
    }

    pub fn has_living(&self, faction: Faction) -> bool {
        self.living(faction).next().is_some()
    }

    /// Combined value of a side's surviving bodies
    pub fn living_value(&self, faction: Faction) -> f32 {
        self.living(faction).map(|u| u.value).sum()
    }

    /// Hash of the gameplay-relevant state, for determinism checks
    ///
    /// Covers unit positions, hp, cooldowns and targets plus projectiles in
    /// flight. Visual effects are left out.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.time_ticks.hash(&mut hasher);
        for u in &self.units {
            u.pos.x.to_bits().hash(&mut hasher);
            u.pos.y.to_bits().hash(&mut hasher);
            u.current_hp.to_bits().hash(&mut hasher);
            u.cooldown.to_bits().hash(&mut hasher);
            u.target.hash(&mut hasher);
        }
        for p in &self.projectiles {
            p.pos.x.to_bits().hash(&mut hasher);
            p.pos.y.to_bits().hash(&mut hasher);
            p.progress.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into packed RGB; unknown input maps to grey
pub fn parse_color(hex: &str) -> u32 {
    let digits = hex.trim().trim_start_matches('#');
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).unwrap_or(GREY),
        3 => {
            let Ok(short) = u32::from_str_radix(digits, 16) else {
                return GREY;
            };
            let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
            ((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)
        }
        _ => GREY,
    }
}

const GREY: u32 = 0x64748b;
pub const WHITE: u32 = 0xffffff;
