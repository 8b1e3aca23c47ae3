//! Fixed timestep battle tick
//!
//! One call to [`Battle::update`] advances combat by exactly one tick. Phase
//! order matters: each phase sees what earlier phases did this same tick.

use glam::Vec2;
use rand::Rng;

use super::collision::separate_units;
use super::state::{AnimState, Battle, Buffs, Impact, Projectile, ProjectileStyle, UnitId, WHITE};
use crate::model::{BuffStats, Faction, Flourish, UnitRole};
use crate::{distance, step_toward};

const POWER_GLOW_PLAYER: u32 = 0xfbbf24;
const POWER_GLOW_ENEMY: u32 = 0xf87171;
const ARROW_PLAYER: u32 = 0x60a5fa;
const ARROW_ENEMY: u32 = 0xf87171;
const HIT_SPARK: u32 = 0xfca5a5;
/// Chance per tick that a magic projectile leaves a sparkle
const SPARKLE_CHANCE: f32 = 0.3;
/// Siege projectile spin per tick (radians)
const SIEGE_SPIN: f32 = 0.3;
/// Floor on the attack-speed divisor
const MIN_ATTACK_RATE: f32 = 0.1;

/// Who landed a blow, copied out so the unit list can be mutated
struct Attacker {
    faction: Faction,
    name: String,
    role: UnitRole,
    color: u32,
    pos: Vec2,
    flourish: Flourish,
    heavy_hitter: bool,
}

impl Battle {
    /// Advance the battle by one fixed tick
    pub fn update(&mut self) {
        self.time_ticks += 1;

        self.apply_buffs();
        self.advance_projectiles();

        for i in 0..self.units.len() {
            self.think(i);
        }

        let (width, height) = (self.tuning.arena_width, self.tuning.arena_height);
        separate_units(&mut self.units, &mut self.rng, width, height);

        self.effects.age();
    }

    /// Recompute every aura from this tick's positions
    fn apply_buffs(&mut self) {
        for unit in &mut self.units {
            unit.buffs = Buffs::default();
        }

        let auras: Vec<(usize, Vec2, Faction, f32, BuffStats)> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_alive())
            .filter_map(|(i, u)| u.aura().map(|(radius, stats)| (i, u.pos, u.faction, radius, stats)))
            .collect();

        for (source, pos, faction, radius, stats) in auras {
            for (i, target) in self.units.iter_mut().enumerate() {
                if i == source || target.faction != faction || !target.is_alive() {
                    continue;
                }
                if distance(pos, target.pos) <= radius {
                    target.buffs.add(&stats);
                }
            }
        }
    }

    fn advance_projectiles(&mut self) {
        let projectiles = std::mem::take(&mut self.projectiles);
        let mut in_flight = Vec::with_capacity(projectiles.len());

        for mut p in projectiles {
            p.progress += p.speed;
            if p.progress >= 1.0 {
                p.progress = 1.0;
                p.pos = p.target;
                self.detonate(&p);
            } else {
                self.steer_projectile(&mut p);
                in_flight.push(p);
            }
        }

        self.projectiles = in_flight;
    }

    fn steer_projectile(&mut self, p: &mut Projectile) {
        let line = p.target - p.start;
        let base = p.start + line * p.progress;

        match p.style {
            ProjectileStyle::Magic => {
                let len = line.length();
                let normal = if len > 0.0 {
                    Vec2::new(-line.y, line.x) / len
                } else {
                    Vec2::ZERO
                };
                let wave = (p.progress * std::f32::consts::PI * self.tuning.magic_wave_frequency)
                    .sin()
                    * self.tuning.magic_wave_strength;
                p.pos = base + normal * wave;

                if self.rng.random::<f32>() < SPARKLE_CHANCE {
                    self.effects.sparkle(&mut self.rng, p.pos, p.color);
                }
            }
            ProjectileStyle::Siege => {
                p.pos = base;
                p.rotation += SIEGE_SPIN;
            }
        }
    }

    /// Flat area damage at the projectile's target point
    fn detonate(&mut self, p: &Projectile) {
        self.effects.explosion(p.target, p.aoe_radius, p.color);
        self.effects.hit_particles(&mut self.rng, p.target, p.color, 8);
        self.emit_impact(Impact::Explosion);

        let victims: Vec<usize> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| {
                u.faction != p.faction
                    && u.is_alive()
                    && distance(u.pos, p.target) <= p.aoe_radius + u.radius
            })
            .map(|(i, _)| i)
            .collect();

        log::trace!(
            "{} projectile from {} hit {} units",
            p.source_role.as_str(),
            p.source_name,
            victims.len()
        );

        for v in victims {
            let dealt = self.apply_damage(v, p.damage);
            self.damage_tracker_mut(p.faction)
                .record(&p.source_name, dealt, p.color, p.source_role);
        }
    }

    /// Per-unit AI: buffs, timers, targeting, then attack or advance
    fn think(&mut self, i: usize) {
        let cooldown_floor = self.tuning.min_cooldown_ticks;
        let unit = &mut self.units[i];
        if !unit.is_alive() {
            return;
        }

        if unit.anim_timer > 0 {
            unit.anim_timer -= 1;
        }
        if unit.anim_timer == 0 {
            unit.anim_state = AnimState::Idle;
        }

        unit.damage = unit.base_damage + unit.buffs.damage;
        let rate = (1.0 + unit.buffs.attack_speed).max(MIN_ATTACK_RATE);
        unit.max_cooldown = (unit.base_cooldown / rate).max(cooldown_floor);

        if unit.cooldown > 0.0 {
            unit.cooldown -= 1.0;
        }
        if unit.hit_flash > 0 {
            unit.hit_flash -= 1;
        }

        let Some(t) = self.resolve_target(i) else {
            return;
        };
        let (target_pos, target_radius) = (self.units[t].pos, self.units[t].radius);

        let unit = &mut self.units[i];
        let dist = distance(unit.pos, target_pos);
        let reach = unit.effective_range() + unit.radius + target_radius;

        if dist <= reach {
            unit.last_aim = Some(target_pos);
            if unit.cooldown <= 0.0 {
                unit.cooldown = unit.max_cooldown;
                unit.anim_state = AnimState::Attack;
                unit.anim_timer = self.tuning.attack_anim_ticks;
                self.attack(i, t, dist);
            }
        } else {
            let heading = (target_pos - unit.pos).normalize_or_zero();
            unit.pos = step_toward(unit.pos, target_pos, unit.move_speed);
            unit.last_aim = Some(unit.pos + heading * 10.0);
            if unit.anim_timer == 0 {
                unit.anim_state = AnimState::Move;
            }
        }
    }

    /// Keep the current target while it lives, otherwise take the nearest enemy
    fn resolve_target(&mut self, i: usize) -> Option<usize> {
        let unit = &self.units[i];

        if let Some(current) = unit.target.and_then(|id| self.units.get(id.index())) {
            if current.is_alive() && current.faction != unit.faction {
                return Some(current.id.index());
            }
        }

        let mut nearest = None;
        let mut best = f32::INFINITY;
        for (j, other) in self.units.iter().enumerate() {
            if other.faction == unit.faction || !other.is_alive() {
                continue;
            }
            let d = distance(unit.pos, other.pos);
            if d < best {
                best = d;
                nearest = Some(j);
            }
        }

        self.units[i].target = nearest.map(|j| UnitId(j as u32));
        nearest
    }

    fn attack(&mut self, i: usize, t: usize, dist: f32) {
        if self.units[i].uses_projectiles() {
            self.launch_projectile(i, t, dist);
        } else {
            self.strike(i, t);
        }
    }

    /// Splash path: damage is deferred until the projectile lands
    fn launch_projectile(&mut self, i: usize, t: usize, dist: f32) {
        let unit = &self.units[i];
        let target = self.units[t].pos;
        let flight_ticks =
            (dist / self.tuning.projectile_speed).max(self.tuning.projectile_min_flight_ticks);
        let delta = target - unit.pos;

        let projectile = Projectile {
            start: unit.pos,
            pos: unit.pos,
            target,
            progress: 0.0,
            speed: 1.0 / flight_ticks,
            damage: unit.damage,
            aoe_radius: unit.instant_aoe().unwrap_or(self.tuning.default_aoe_radius),
            style: match unit.flourish {
                Flourish::Magic => ProjectileStyle::Magic,
                Flourish::Plain | Flourish::Power => ProjectileStyle::Siege,
            },
            rotation: delta.y.atan2(delta.x),
            faction: unit.faction,
            color: unit.color,
            source_name: unit.name.clone(),
            source_role: unit.role,
        };
        self.projectiles.push(projectile);
    }

    /// Instant path: melee and hitscan, optionally splashing around the target
    fn strike(&mut self, i: usize, t: usize) {
        let unit = &self.units[i];
        let attacker = Attacker {
            faction: unit.faction,
            name: unit.name.clone(),
            role: unit.role,
            color: unit.color,
            pos: unit.pos,
            flourish: unit.flourish,
            heavy_hitter: unit.heavy_hitter,
        };
        let damage = unit.damage;
        let aoe = unit.instant_aoe();
        let center = self.units[t].pos;

        match aoe {
            Some(radius) => {
                self.effects.explosion(center, radius, attacker.color);
                let victims: Vec<usize> = self
                    .units
                    .iter()
                    .enumerate()
                    .filter(|(_, u)| {
                        u.faction != attacker.faction
                            && u.is_alive()
                            && distance(u.pos, center) <= radius + u.radius
                    })
                    .map(|(j, _)| j)
                    .collect();
                for v in victims {
                    self.hit(&attacker, v, damage, v != t);
                }
            }
            None => self.hit(&attacker, t, damage, false),
        }
    }

    fn hit(&mut self, attacker: &Attacker, victim: usize, damage: f32, splash: bool) {
        if !splash {
            let to = self.units[victim].pos;
            self.strike_flourish(attacker, to);
        }
        let dealt = self.apply_damage(victim, damage);
        self.damage_tracker_mut(attacker.faction)
            .record(&attacker.name, dealt, attacker.color, attacker.role);
    }

    /// Cosmetic effects of a direct blow
    fn strike_flourish(&mut self, attacker: &Attacker, to: Vec2) {
        let is_player = attacker.faction == Faction::Player;

        if matches!(attacker.role, UnitRole::Melee | UnitRole::Hero) {
            if attacker.heavy_hitter || attacker.role == UnitRole::Hero {
                self.emit_impact(Impact::HeavyStrike);
            }
            self.effects.hit_particles(&mut self.rng, to, attacker.color, 6);
        }

        match attacker.flourish {
            Flourish::Power => {
                let glow = if is_player {
                    POWER_GLOW_PLAYER
                } else {
                    POWER_GLOW_ENEMY
                };
                self.effects.explosion(attacker.pos, 12.0, glow);
                self.effects.trail(attacker.pos, to, WHITE, 10, 2.0);
                self.effects.trail(attacker.pos, to, glow, 15, 6.0);
            }
            _ if attacker.role == UnitRole::Ranged => {
                let color = if is_player { ARROW_PLAYER } else { ARROW_ENEMY };
                self.effects.trail(attacker.pos, to, color, 8, 1.5);
            }
            _ => {}
        }

        self.effects.hit_particles(&mut self.rng, to, HIT_SPARK, 5);
    }

    /// Remove hp from a living unit; returns the hp actually lost
    fn apply_damage(&mut self, victim: usize, damage: f32) -> f32 {
        let damage = damage.max(0.0);
        let flash = self.tuning.hit_flash_ticks;

        let unit = &mut self.units[victim];
        let dealt = unit.current_hp.min(damage);
        unit.current_hp = (unit.current_hp - damage).max(0.0);
        unit.hit_flash = flash;

        let (pos, radius, color, died) = (unit.pos, unit.radius, unit.color, !unit.is_alive());
        self.effects.damage_text(&mut self.rng, pos, damage);

        if died {
            log::debug!(
                "{} ({:?}) died at tick {}",
                self.units[victim].name,
                self.units[victim].faction,
                self.time_ticks
            );
            self.effects.hit_particles(&mut self.rng, pos, color, 15);
            self.effects.explosion(pos, radius * 2.0, WHITE);
            self.emit_impact(Impact::Death);
        }

        dealt
    }
}
