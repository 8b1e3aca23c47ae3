//! Battle setup: roster ordering, formation slots and unit spawning

use std::cmp::Ordering;

use glam::Vec2;
use rand::Rng;

use super::state::{AnimState, Battle, Buffs, CombatUnit, UnitId, parse_color};
use crate::consts::*;
use crate::model::{Card, Faction};
use crate::polar_offset;

/// Slot offsets from the side's base, front line first (player facing +x)
const SLOT_OFFSETS: [(f32, f32); MAX_FORMATION_SLOTS] = [
    (50.0, 0.0),
    (50.0, -80.0),
    (50.0, 80.0),
    (-20.0, -40.0),
    (-20.0, 40.0),
    (-90.0, -60.0),
    (-90.0, 60.0),
];

/// Anchor point of formation slot `index` for `faction` (mirrored for the enemy)
pub fn slot_position(index: usize, faction: Faction) -> Vec2 {
    let (dx, dy) = SLOT_OFFSETS[index.min(SLOT_OFFSETS.len() - 1)];
    match faction {
        Faction::Player => Vec2::new(PLAYER_BASE_X + dx, FORMATION_BASE_Y + dy),
        Faction::Enemy => Vec2::new(ENEMY_BASE_X - dx, FORMATION_BASE_Y + dy),
    }
}

/// Front-to-back order: shortest reach first, sturdier card first on equal reach
fn formation_order(a: &Card, b: &Card) -> Ordering {
    a.model
        .stats
        .range
        .total_cmp(&b.model.stats.range)
        .then_with(|| b.model.stats.hp.total_cmp(&a.model.stats.hp))
}

/// Non-empty cards of one side in formation order
pub fn order_roster<'a>(roster: &'a [Option<Card>]) -> Vec<&'a Card> {
    let mut cards: Vec<&Card> = roster.iter().flatten().collect();
    cards.sort_by(|a, b| formation_order(a, b));
    cards
}

/// Offset of body `i` out of `count` around its slot anchor
fn spawn_offset(i: u32, count: u32) -> (f32, f32) {
    let spread = (5.0 + i as f32 * 5.0).min(20.0);
    let angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
    (spread, angle)
}

impl Battle {
    /// Reset all state and spawn both rosters
    ///
    /// Empty slots (`None`) are skipped and cards with zero bodies spawn
    /// nothing. Any previous round's units, projectiles, effects, damage
    /// statistics and tick count are discarded.
    pub fn init(&mut self, player: &[Option<Card>], enemy: &[Option<Card>]) {
        self.units.clear();
        self.projectiles.clear();
        self.effects.clear();
        self.player_damage.clear();
        self.enemy_damage.clear();
        self.time_ticks = 0;

        self.spawn_side(player, Faction::Player);
        self.spawn_side(enemy, Faction::Enemy);

        log::info!(
            "Battle init: {} player units vs {} enemy units",
            self.living_count(Faction::Player),
            self.living_count(Faction::Enemy)
        );
    }

    fn spawn_side(&mut self, roster: &[Option<Card>], faction: Faction) {
        let max_slot = self.tuning.max_formation_slots.max(1) - 1;
        let cooldown_floor = self.tuning.min_cooldown_ticks;

        for (index, card) in order_roster(roster).into_iter().enumerate() {
            if card.unit_count == 0 {
                log::warn!("Card {} ({}) has no units, skipping", card.id, card.model.name);
                continue;
            }

            let anchor = slot_position(index.min(max_slot), faction);
            let stats = &card.model.stats;
            let cooldown = stats.cooldown_ticks(cooldown_floor);
            let value = card.value_per_unit();
            let color = parse_color(&stats.color);
            let aura = stats.aura();

            for i in 0..card.unit_count {
                let (spread, angle) = spawn_offset(i, card.unit_count);
                let jitter = if cooldown > 0.0 {
                    self.rng.random_range(0.0..cooldown)
                } else {
                    0.0
                };
                let id = UnitId(self.units.len() as u32);

                self.units.push(CombatUnit {
                    id,
                    card_id: card.id.clone(),
                    template_id: card.model.template_id.clone(),
                    name: card.model.name.clone(),
                    faction,
                    role: card.model.role,
                    flourish: card.model.flourish,
                    fires_projectiles: card.model.fires_projectiles,
                    heavy_hitter: card.model.heavy_hitter,
                    value,
                    color,
                    pos: polar_offset(anchor, spread, angle),
                    radius: card.model.role.radius(),
                    max_hp: stats.hp,
                    current_hp: stats.hp,
                    base_damage: stats.damage,
                    damage: stats.damage,
                    range: stats.range,
                    base_cooldown: cooldown,
                    max_cooldown: cooldown,
                    cooldown: jitter,
                    move_speed: stats.move_speed,
                    aoe_radius: stats.aoe_radius,
                    buff_radius: aura.map(|(radius, _)| radius),
                    buff_stats: aura.map(|(_, buff)| buff),
                    buffs: Buffs::default(),
                    target: None,
                    anim_state: AnimState::Idle,
                    anim_timer: 0,
                    last_aim: None,
                    hit_flash: 0,
                });
            }
        }
    }
}
