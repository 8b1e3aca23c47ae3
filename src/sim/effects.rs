//! Transient visual effects
//!
//! Particles, explosions, floating damage numbers and attack trails. The
//! renderer is stateless, so the simulation owns their lifetimes to keep them
//! in step with ticks. Nothing here feeds back into combat.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{EXPLOSION_TICKS, FLOAT_TEXT_TICKS, PARTICLE_BASE_LIFE};

/// A spark or debris particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub color: u32,
    pub size: f32,
}

/// Expanding ring drawn at an impact point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub life: u32,
    pub max_life: u32,
    pub color: u32,
}

/// Rising damage number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub amount: f32,
    pub color: u32,
    pub life: u32,
    pub max_life: u32,
    /// Vertical drift per tick
    pub rise: f32,
}

/// Line from attacker to target (arrows, musket shots)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackTrail {
    pub from: Vec2,
    pub to: Vec2,
    pub color: u32,
    pub life: u32,
    pub max_life: u32,
    pub width: f32,
}

/// All live visual effects of a battle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
    pub texts: Vec<FloatingText>,
    pub trails: Vec<AttackTrail>,
}

impl Effects {
    pub fn clear(&mut self) {
        self.particles.clear();
        self.explosions.clear();
        self.texts.clear();
        self.trails.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
            && self.explosions.is_empty()
            && self.texts.is_empty()
            && self.trails.is_empty()
    }

    /// Burst of sparks flying outward from `pos`
    pub fn hit_particles(&mut self, rng: &mut Pcg32, pos: Vec2, color: u32, count: usize) {
        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = rng.random::<f32>() * 2.0 + 0.5;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: PARTICLE_BASE_LIFE + rng.random_range(0..10),
                max_life: PARTICLE_BASE_LIFE + 10,
                color,
                size: rng.random::<f32>() * 2.0 + 1.0,
            });
        }
    }

    /// Short-lived sparkle left behind a magic projectile
    pub fn sparkle(&mut self, rng: &mut Pcg32, pos: Vec2, color: u32) {
        self.particles.push(Particle {
            pos,
            vel: Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5),
            life: 10,
            max_life: 10,
            color,
            size: 2.0,
        });
    }

    pub fn explosion(&mut self, pos: Vec2, radius: f32, color: u32) {
        self.explosions.push(Explosion {
            pos,
            radius,
            life: EXPLOSION_TICKS,
            max_life: EXPLOSION_TICKS,
            color,
        });
    }

    pub fn damage_text(&mut self, rng: &mut Pcg32, pos: Vec2, amount: f32) {
        self.texts.push(FloatingText {
            pos: pos + Vec2::new(rng.random::<f32>() * 20.0 - 10.0, -15.0),
            amount,
            color: 0xffffff,
            life: FLOAT_TEXT_TICKS,
            max_life: FLOAT_TEXT_TICKS,
            rise: -0.8,
        });
    }

    pub fn trail(&mut self, from: Vec2, to: Vec2, color: u32, life: u32, width: f32) {
        self.trails.push(AttackTrail {
            from,
            to,
            color,
            life,
            max_life: life,
            width,
        });
    }

    /// Advance one tick and drop everything that has expired
    pub fn age(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        for e in &mut self.explosions {
            e.life = e.life.saturating_sub(1);
        }
        self.explosions.retain(|e| e.life > 0);

        for t in &mut self.texts {
            t.pos.y += t.rise;
            t.life = t.life.saturating_sub(1);
        }
        self.texts.retain(|t| t.life > 0);

        for t in &mut self.trails {
            t.life = t.life.saturating_sub(1);
        }
        self.trails.retain(|t| t.life > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_effects_expire() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fx = Effects::default();
        fx.hit_particles(&mut rng, Vec2::ZERO, 0xff0000, 5);
        fx.explosion(Vec2::ZERO, 20.0, 0xffffff);
        fx.damage_text(&mut rng, Vec2::ZERO, 3.0);
        fx.trail(Vec2::ZERO, Vec2::ONE, 0x60a5fa, 8, 1.5);
        assert_eq!(fx.particles.len(), 5);

        for _ in 0..7 {
            fx.age();
        }
        assert_eq!(fx.trails.len(), 1);
        fx.age();
        assert!(fx.trails.is_empty());

        for _ in 0..FLOAT_TEXT_TICKS {
            fx.age();
        }
        assert!(fx.is_empty());
    }

    #[test]
    fn test_text_rises() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut fx = Effects::default();
        fx.damage_text(&mut rng, Vec2::new(100.0, 100.0), 8.0);
        let y0 = fx.texts[0].pos.y;
        fx.age();
        assert!(fx.texts[0].pos.y < y0);
    }
}
