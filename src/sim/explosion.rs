//! Bomb explosions and their particle bursts

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::error::{GameError, Result};

pub const DEFAULT_MAX_DURATION: f32 = 1.5;
pub const DEFAULT_MAX_RADIUS: f32 = 80.0;
pub const DEFAULT_PARTICLE_COUNT: usize = 30;
/// Bright inner flash lasts this long
pub const FLASH_DURATION: f32 = 0.3;

const PARTICLE_GRAVITY: f32 = 200.0;
const AIR_RESISTANCE: f32 = 0.98;
const ANGLE_JITTER: f32 = 0.2;
const PARTICLE_SPEED: (f32, f32) = (100.0, 250.0);
const PARTICLE_LIFE: (f32, f32) = (0.8, 1.5);
const PARTICLE_SIZE: (f32, f32) = (3.0, 8.0);

pub const DEFAULT_MAX_EXPLOSIONS: usize = 50;
const MIN_MAX_EXPLOSIONS: usize = 1;
const MAX_MAX_EXPLOSIONS: usize = 500;

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub initial_size: f32,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life in [0, 1]
    pub fn life_ratio(&self) -> f32 {
        (self.life / self.max_life).max(0.0)
    }

    fn update(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.pos += self.vel * dt;
        self.vel.y += PARTICLE_GRAVITY * dt;
        self.vel *= AIR_RESISTANCE;
        self.life -= dt;
        self.size = self.initial_size * self.life_ratio();
    }
}

/// White, cooling through yellow, orange and red to maroon, fading out
pub fn particle_color(life_ratio: f32) -> [f32; 4] {
    let rgb = if life_ratio > 0.8 {
        [1.0, 1.0, 1.0]
    } else if life_ratio > 0.6 {
        [0.99, 0.98, 0.0]
    } else if life_ratio > 0.4 {
        [1.0, 0.63, 0.0]
    } else if life_ratio > 0.2 {
        [0.9, 0.16, 0.22]
    } else {
        [0.75, 0.13, 0.22]
    };
    [rgb[0], rgb[1], rgb[2], life_ratio.clamp(0.0, 1.0)]
}

#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    timer: f32,
    max_duration: f32,
    max_radius: f32,
    particle_count: usize,
    particles: Vec<Particle>,
    active: bool,
}

impl Default for Explosion {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            timer: 0.0,
            max_duration: DEFAULT_MAX_DURATION,
            max_radius: DEFAULT_MAX_RADIUS,
            particle_count: DEFAULT_PARTICLE_COUNT,
            particles: Vec::with_capacity(DEFAULT_PARTICLE_COUNT),
            active: false,
        }
    }
}

impl Explosion {
    pub fn set_max_duration(&mut self, duration: f32) -> Result<()> {
        if !(0.1..=10.0).contains(&duration) {
            return Err(GameError::InvalidDuration(duration));
        }
        self.max_duration = duration;
        Ok(())
    }

    pub fn set_max_radius(&mut self, radius: f32) -> Result<()> {
        if !(1.0..=1000.0).contains(&radius) {
            return Err(GameError::InvalidExplosionRadius(radius));
        }
        self.max_radius = radius;
        Ok(())
    }

    pub fn set_particle_count(&mut self, count: usize) -> Result<()> {
        if !(5..=100).contains(&count) {
            return Err(GameError::InvalidParticleCount(count));
        }
        self.particle_count = count;
        Ok(())
    }

    /// Go off at `pos` with a fresh burst of particles
    pub fn start(&mut self, pos: Vec2, rng: &mut Pcg32) {
        self.pos = pos;
        self.timer = 0.0;
        self.active = true;

        self.particles.clear();
        let step = 2.0 * PI / self.particle_count as f32;
        for i in 0..self.particle_count {
            let angle = i as f32 * step + rng.random_range(-ANGLE_JITTER..ANGLE_JITTER);
            let speed = rng.random_range(PARTICLE_SPEED.0..PARTICLE_SPEED.1);
            let life = rng.random_range(PARTICLE_LIFE.0..PARTICLE_LIFE.1);
            let size = rng.random_range(PARTICLE_SIZE.0..PARTICLE_SIZE.1);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                max_life: life,
                size,
                initial_size: size,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active || dt <= 0.0 {
            return;
        }
        self.timer += dt;
        for p in &mut self.particles {
            p.update(dt);
        }
        if self.timer >= self.max_duration {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Fraction of the lifetime elapsed; 1 once finished
    pub fn progress(&self) -> f32 {
        if !self.active {
            return 1.0;
        }
        (self.timer / self.max_duration).min(1.0)
    }

    /// Current blast radius, growing linearly to the maximum
    pub fn radius(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        self.progress() * self.max_radius
    }

    /// Explosions hurt for as long as they are active
    pub fn in_damage_phase(&self) -> bool {
        self.active
    }

    pub fn hits(&self, pos: Vec2, radius: f32) -> bool {
        self.in_damage_phase() && self.pos.distance(pos) < self.radius() + radius
    }
}

/// Pool of explosions, reusing finished ones
#[derive(Debug, Clone)]
pub struct ExplosionManager {
    explosions: Vec<Explosion>,
    max_explosions: usize,
}

impl Default for ExplosionManager {
    fn default() -> Self {
        Self {
            explosions: Vec::new(),
            max_explosions: DEFAULT_MAX_EXPLOSIONS,
        }
    }
}

impl ExplosionManager {
    /// Set off an explosion; returns false when the pool is full
    pub fn create(&mut self, pos: Vec2, rng: &mut Pcg32) -> bool {
        if let Some(idle) = self.explosions.iter_mut().find(|e| !e.is_active()) {
            idle.start(pos, rng);
            return true;
        }

        if self.explosions.len() >= self.max_explosions {
            self.cleanup_inactive();
        }
        if self.explosions.len() < self.max_explosions {
            let mut explosion = Explosion::default();
            explosion.start(pos, rng);
            self.explosions.push(explosion);
            true
        } else {
            log::warn!(
                "Explosion limit ({}) reached, skipping explosion",
                self.max_explosions
            );
            false
        }
    }

    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for e in &mut self.explosions {
            e.update(dt);
        }
    }

    pub fn clear(&mut self) {
        self.explosions.clear();
    }

    fn cleanup_inactive(&mut self) {
        self.explosions.retain(|e| e.is_active());
    }

    /// Any active explosion reaching the circle
    pub fn check_damage(&self, pos: Vec2, radius: f32) -> bool {
        self.explosions.iter().any(|e| e.hits(pos, radius))
    }

    pub fn active_positions(&self) -> Vec<Vec2> {
        self.explosions
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.pos)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.explosions.iter().filter(|e| e.is_active()).count()
    }

    pub fn has_active(&self) -> bool {
        self.explosions.iter().any(|e| e.is_active())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.explosions.iter()
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }

    pub fn max_explosions(&self) -> usize {
        self.max_explosions
    }

    /// Lower or raise the pool size, dropping finished then oldest explosions
    pub fn set_max_explosions(&mut self, max: usize) -> Result<()> {
        if !(MIN_MAX_EXPLOSIONS..=MAX_MAX_EXPLOSIONS).contains(&max) {
            return Err(GameError::InvalidCapacity(max));
        }
        self.max_explosions = max;
        if self.explosions.len() > max {
            self.cleanup_inactive();
            if self.explosions.len() > max {
                let excess = self.explosions.len() - max;
                self.explosions.drain(..excess);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_radius_grows_then_vanishes() {
        let mut rng = rng();
        let mut e = Explosion::default();
        assert_eq!(e.radius(), 0.0);
        e.start(Vec2::new(100.0, 100.0), &mut rng);
        assert_eq!(e.radius(), 0.0);
        assert_eq!(e.particles().len(), DEFAULT_PARTICLE_COUNT);

        e.update(0.75);
        assert!((e.radius() - 40.0).abs() < 1e-3);
        assert!(e.in_damage_phase());

        e.update(0.75);
        assert!(!e.is_active());
        assert_eq!(e.radius(), 0.0);
        assert_eq!(e.progress(), 1.0);
    }

    #[test]
    fn test_particles_within_ranges() {
        let mut rng = rng();
        let mut e = Explosion::default();
        e.set_particle_count(12).unwrap();
        e.start(Vec2::ZERO, &mut rng);
        assert_eq!(e.particles().len(), 12);
        for p in e.particles() {
            let speed = p.vel.length();
            assert!((100.0..=250.0).contains(&speed), "speed {}", speed);
            assert!((0.8..=1.5).contains(&p.life));
            assert!((3.0..=8.0).contains(&p.size));
        }
    }

    #[test]
    fn test_particles_fall_and_fade() {
        let mut rng = rng();
        let mut e = Explosion::default();
        e.start(Vec2::ZERO, &mut rng);
        let before: Vec<f32> = e.particles().iter().map(|p| p.vel.y).collect();
        e.update(0.1);
        for (p, vy) in e.particles().iter().zip(before) {
            assert!(p.vel.y > vy * 0.98);
            assert!(p.size < p.initial_size);
            assert!(p.life_ratio() < 1.0);
        }
    }

    #[test]
    fn test_particle_colors() {
        assert_eq!(particle_color(0.9), [1.0, 1.0, 1.0, 0.9]);
        assert_eq!(particle_color(0.1)[3], 0.1);
        assert_ne!(particle_color(0.5), particle_color(0.3));
    }

    #[test]
    fn test_setter_validation() {
        let mut e = Explosion::default();
        assert!(e.set_max_duration(0.05).is_err());
        assert!(e.set_max_duration(11.0).is_err());
        assert!(e.set_max_radius(0.0).is_err());
        assert!(e.set_particle_count(4).is_err());
        assert!(e.set_particle_count(101).is_err());
        e.set_max_duration(1.0).unwrap();
        e.set_max_radius(100.0).unwrap();
    }

    #[test]
    fn test_damage_check() {
        let mut rng = rng();
        let mut m = ExplosionManager::default();
        assert!(m.create(Vec2::new(0.0, 0.0), &mut rng));
        // Radius 0 right at the start: only overlapping circles hit
        assert!(m.check_damage(Vec2::new(10.0, 0.0), 16.0));
        assert!(!m.check_damage(Vec2::new(100.0, 0.0), 16.0));
        m.update(1.4);
        assert!(m.check_damage(Vec2::new(100.0, 0.0), 32.0));
        m.update(0.2);
        assert!(!m.check_damage(Vec2::new(10.0, 0.0), 16.0));
    }

    #[test]
    fn test_manager_reuses_finished_explosions() {
        let mut rng = rng();
        let mut m = ExplosionManager::default();
        m.create(Vec2::ZERO, &mut rng);
        m.create(Vec2::ONE, &mut rng);
        assert_eq!(m.len(), 2);
        assert_eq!(m.active_count(), 2);

        m.update(2.0);
        assert!(!m.has_active());
        m.create(Vec2::new(5.0, 5.0), &mut rng);
        assert_eq!(m.len(), 2);
        assert_eq!(m.active_positions(), vec![Vec2::new(5.0, 5.0)]);
    }

    #[test]
    fn test_manager_capacity() {
        let mut rng = rng();
        let mut m = ExplosionManager::default();
        m.set_max_explosions(2).unwrap();
        assert!(m.create(Vec2::ZERO, &mut rng));
        assert!(m.create(Vec2::ONE, &mut rng));
        assert!(!m.create(Vec2::new(2.0, 2.0), &mut rng));
        assert_eq!(m.len(), 2);

        assert!(m.set_max_explosions(0).is_err());
        assert!(m.set_max_explosions(501).is_err());

        // Shrinking drops the oldest active explosion
        m.set_max_explosions(1).unwrap();
        assert_eq!(m.active_positions(), vec![Vec2::ONE]);

        m.clear();
        assert!(m.is_empty());
    }

    proptest! {
        #[test]
        fn prop_radius_never_shrinks_while_active(
            steps in proptest::collection::vec(0.0f32..0.2, 1..40),
        ) {
            let mut rng = rng();
            let mut e = Explosion::default();
            e.start(Vec2::ZERO, &mut rng);
            let mut last = e.radius();
            for dt in steps {
                e.update(dt);
                if !e.is_active() {
                    prop_assert_eq!(e.radius(), 0.0);
                    break;
                }
                prop_assert!(e.radius() >= last);
                prop_assert!(e.radius() <= DEFAULT_MAX_RADIUS);
                last = e.radius();
            }
        }
    }
}
