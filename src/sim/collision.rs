//! Body separation
//!
//! Units are discs that must not stack. Overlapping pairs are pushed apart
//! half the overlap each along the line between their centers; dense clumps
//! may keep a little residual overlap, which the next tick works out.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::CombatUnit;

/// Push overlapping living units apart, then clamp them into the arena
pub fn separate_units(units: &mut [CombatUnit], rng: &mut Pcg32, width: f32, height: f32) {
    for i in 0..units.len() {
        if !units[i].is_alive() {
            continue;
        }
        for j in (i + 1)..units.len() {
            if !units[j].is_alive() {
                continue;
            }

            let delta = units[j].pos - units[i].pos;
            let min_dist = units[i].radius + units[j].radius;
            let dist_sq = delta.length_squared();
            if dist_sq >= min_dist * min_dist {
                continue;
            }

            let dist = dist_sq.sqrt();
            let normal = if dist == 0.0 {
                // Exactly stacked: any direction will do
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                Vec2::new(angle.cos(), angle.sin())
            } else {
                delta / dist
            };

            let push = normal * (min_dist - dist) * 0.5;
            units[i].pos -= push;
            units[j].pos += push;
        }
    }

    for unit in units.iter_mut().filter(|u| u.is_alive()) {
        unit.pos = clamp_to_arena(unit.pos, unit.radius, width, height);
    }
}

/// Keep a disc of `radius` fully inside the arena
pub fn clamp_to_arena(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, (width - radius).max(radius)),
        pos.y.clamp(radius, (height - radius).max(radius)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, Faction, Flourish, UnitModel, UnitRole, UnitStats};
    use crate::sim::Battle;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    fn two_units() -> Vec<CombatUnit> {
        let model = UnitModel {
            template_id: "t".into(),
            name: "T".into(),
            role: UnitRole::Melee,
            value: 1.0,
            stats: UnitStats {
                hp: 10.0,
                damage: 1.0,
                range: 10.0,
                attack_cooldown: 40.0,
                move_speed: 1.0,
                color: "#ffffff".into(),
                aoe_radius: None,
                buff_radius: None,
                buff_stats: None,
            },
            flourish: Flourish::Plain,
            fires_projectiles: false,
            heavy_hitter: false,
        };
        let mut battle = Battle::new(Tuning::default(), 1);
        battle.init(&[Some(Card::new("a", model.clone(), 1))], &[Some(Card::new("b", model, 1))]);
        battle.units
    }

    #[test]
    fn test_overlap_pushed_apart_symmetrically() {
        let mut units = two_units();
        units[0].pos = Vec2::new(100.0, 100.0);
        units[1].pos = Vec2::new(110.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(1);

        separate_units(&mut units, &mut rng, 800.0, 500.0);

        assert!((units[0].pos.x - 95.0).abs() < 1e-4);
        assert!((units[1].pos.x - 115.0).abs() < 1e-4);
        assert!((units[0].pos.distance(units[1].pos) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_stacked_units_separate() {
        let mut units = two_units();
        units[0].pos = Vec2::new(300.0, 300.0);
        units[1].pos = Vec2::new(300.0, 300.0);
        let mut rng = Pcg32::seed_from_u64(9);

        separate_units(&mut units, &mut rng, 800.0, 500.0);

        assert!((units[0].pos.distance(units[1].pos) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_dead_units_ignored() {
        let mut units = two_units();
        units[0].pos = Vec2::new(100.0, 100.0);
        units[1].pos = Vec2::new(105.0, 100.0);
        units[1].current_hp = 0.0;
        let mut rng = Pcg32::seed_from_u64(1);

        separate_units(&mut units, &mut rng, 800.0, 500.0);

        assert_eq!(units[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(units[1].pos, Vec2::new(105.0, 100.0));
        assert_eq!(units[1].faction, Faction::Enemy);
    }

    #[test]
    fn test_clamp_to_arena() {
        let p = clamp_to_arena(Vec2::new(-50.0, 600.0), 10.0, 800.0, 500.0);
        assert_eq!(p, Vec2::new(10.0, 490.0));
    }
}
