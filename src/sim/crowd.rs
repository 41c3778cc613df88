//! Simple actor-on-foot population
//!
//! The game proper owns its pedestrians and foot police. This is a minimal
//! population that honors the [`CrowdPopulation`] contract, used by the
//! headless driver and tests.

use glam::Vec2;

use super::combat::{AttackShape, ConeHits, CrowdPopulation};
use super::scratch::KillPositions;

/// Fleeing speed (m/s)
const FLEE_SPEED: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrowdKind {
    Civilian,
    Police,
}

impl CrowdKind {
    /// Starting health of one actor
    pub fn health(self) -> f32 {
        match self {
            CrowdKind::Civilian => 40.0,
            CrowdKind::Police => 100.0,
        }
    }
}

/// One actor on foot
#[derive(Debug, Clone)]
pub struct Walker {
    pub pos: Vec2,
    pub health: f32,
    pub alive: bool,
    /// Running away from the last panic source
    pub panicked: bool,
    flee_dir: Vec2,
}

#[derive(Debug, Clone)]
pub struct Crowd {
    kind: CrowdKind,
    walkers: Vec<Walker>,
    /// (distance², index) reused by every query
    candidates: Vec<(f32, usize)>,
}

impl Crowd {
    pub fn new(kind: CrowdKind) -> Self {
        Self {
            kind,
            walkers: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn kind(&self) -> CrowdKind {
        self.kind
    }

    pub fn spawn(&mut self, pos: Vec2) -> usize {
        self.walkers.push(Walker {
            pos,
            health: self.kind.health(),
            alive: true,
            panicked: false,
            flee_dir: Vec2::ZERO,
        });
        self.candidates.reserve(1);
        self.walkers.len() - 1
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn alive_count(&self) -> usize {
        self.walkers.iter().filter(|w| w.alive).count()
    }

    pub fn panicked_count(&self) -> usize {
        self.walkers.iter().filter(|w| w.alive && w.panicked).count()
    }

    /// Move fleeing actors
    pub fn update(&mut self, dt: f32) {
        for walker in self.walkers.iter_mut().filter(|w| w.alive && w.panicked) {
            walker.pos += walker.flee_dir * FLEE_SPEED * dt;
        }
    }

    /// Forget corpses
    pub fn remove_dead(&mut self) {
        self.walkers.retain(|w| w.alive);
    }
}

impl CrowdPopulation for Crowd {
    fn damage_in_cone(
        &mut self,
        shape: &AttackShape,
        max_kills: u32,
        positions: &mut KillPositions,
    ) -> ConeHits {
        self.candidates.clear();
        for (i, walker) in self.walkers.iter().enumerate() {
            if walker.alive && shape.contains(walker.pos) {
                self.candidates.push((walker.pos.distance_squared(shape.origin), i));
            }
        }
        self.candidates.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut hits = ConeHits::default();
        for &(_, i) in self.candidates.iter().take(max_kills as usize) {
            let walker = &mut self.walkers[i];
            hits.struck += 1;
            walker.health -= shape.damage;
            if walker.health <= 0.0 {
                walker.alive = false;
                hits.kills += 1;
                if walker.panicked {
                    hits.panic_kills += 1;
                }
                positions.push(walker.pos);
            }
        }
        hits
    }

    fn panic(&mut self, origin: Vec2, radius: f32) {
        let radius_sq = radius * radius;
        for walker in self.walkers.iter_mut().filter(|w| w.alive) {
            let away = walker.pos - origin;
            if away.length_squared() <= radius_sq {
                walker.panicked = true;
                walker.flee_dir = away.normalize_or(Vec2::X);
            }
        }
    }
}
