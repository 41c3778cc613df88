//! Police pursuit vehicles
//!
//! Owns the small population of police cars chasing the player: heat-gated
//! spawning, per-frame chase steering, and the two ways cars die (instant
//! trample, graduated damage).
//!
//! Car lifecycle: spawned -> alive -> dead (still visible) -> removed. A dead
//! car keeps its slot until the presentation layer reports its exit
//! animation finished via [`PursuitManager::mark_hidden`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::scratch::{CarIds, KillPositions};
use crate::heading_to_dir;
use crate::tuning::PursuitTuning;

/// Where a car is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarPhase {
    Alive,
    /// Dead, death animation still showing
    Wrecked,
    /// Dead and hidden; evicted on the next update
    Removable,
}

/// A pursuing police car
#[derive(Debug, Clone)]
pub struct PoliceCar {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
    /// Presentation-side visibility; cleared once the exit animation ends
    pub visible: bool,
    /// Points awarded for destroying this car
    pub points: f32,
}

impl PoliceCar {
    pub fn phase(&self) -> CarPhase {
        match (self.dead, self.visible) {
            (false, _) => CarPhase::Alive,
            (true, true) => CarPhase::Wrecked,
            (true, false) => CarPhase::Removable,
        }
    }

    fn kill(&mut self) {
        self.dead = true;
        self.health = self.health.min(0.0);
    }
}

/// HUD/audio view of one alive car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarSnapshot {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
}

/// Result of a trample or damage call.
///
/// `ids` and `positions` borrow the manager's scratch buffers: at most five
/// entries each, index-aligned, gone with the next mutating call. `kills`
/// and `points` are always exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitHits<'a> {
    /// Cars touched (equal to `kills` for a trample)
    pub hits: u32,
    pub kills: u32,
    /// Sum of the destroyed cars' point values
    pub points: f32,
    pub ids: &'a [u32],
    pub positions: &'a [Vec2],
}

/// Spawns, steers and destroys police cars
#[derive(Debug, Clone)]
pub struct PursuitManager {
    tuning: PursuitTuning,
    cars: Vec<PoliceCar>,
    /// Seconds until the next spawn attempt
    spawn_timer: f32,
    next_id: u32,
    rng: Pcg32,
    kill_ids: CarIds,
    kill_positions: KillPositions,
    /// Alive cars dropped for distance by the latest update
    despawned: Vec<u32>,
    snapshot: Vec<CarSnapshot>,
}

impl PursuitManager {
    pub fn new(tuning: PursuitTuning, seed: u64) -> Self {
        let max_cars = tuning.max_cars;
        Self {
            tuning,
            // Dead cars linger, so leave room beyond the alive cap
            cars: Vec::with_capacity(max_cars * 2),
            spawn_timer: 0.0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            kill_ids: CarIds::new(),
            kill_positions: KillPositions::new(),
            despawned: Vec::with_capacity(max_cars),
            snapshot: Vec::with_capacity(max_cars),
        }
    }

    pub fn tuning(&self) -> &PursuitTuning {
        &self.tuning
    }

    pub fn trample_radius(&self) -> f32 {
        self.tuning.trample_radius
    }

    /// Every car still in the live collection, dead ones included
    pub fn cars(&self) -> &[PoliceCar] {
        &self.cars
    }

    pub fn alive_count(&self) -> usize {
        self.cars.iter().filter(|c| !c.dead).count()
    }

    /// Cap on alive cars for a heat level: none below the spawn threshold,
    /// the initial cap up to the full threshold, then the maximum.
    pub fn population_cap(&self, heat: f32) -> usize {
        if heat < self.tuning.spawn_heat {
            0
        } else if heat < self.tuning.full_heat {
            self.tuning.initial_cars
        } else {
            self.tuning.max_cars
        }
    }

    /// Seconds left before the next spawn attempt
    pub fn spawn_cooldown(&self) -> f32 {
        self.spawn_timer.max(0.0)
    }

    /// Run the spawn controller for one frame. Returns the new car, if any.
    pub fn spawn_step(
        &mut self,
        dt: f32,
        heat: f32,
        player_pos: Vec2,
        player_vel: Vec2,
    ) -> Option<&PoliceCar> {
        if self.spawn_timer > 0.0 {
            self.spawn_timer -= dt;
            if self.spawn_timer > 0.0 {
                return None;
            }
        }

        let cap = self.population_cap(heat);
        if cap == 0 || self.alive_count() >= cap {
            return None;
        }

        let pos = self.spawn_position(player_pos, player_vel);
        self.spawn_timer = self.tuning.spawn_cooldown;
        let id = self.spawn_at(pos);
        log::debug!("Police car {id} spawned at {pos:?} (heat {heat:.0}, cap {cap})");
        self.cars.last()
    }

    /// Place a fresh car at `pos`, bypassing the spawn controller
    pub fn spawn_at(&mut self, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.cars.push(PoliceCar {
            id,
            pos,
            vel: Vec2::ZERO,
            health: self.tuning.car_health,
            max_health: self.tuning.car_health,
            dead: false,
            visible: true,
            points: self.tuning.car_points,
        });
        id
    }

    /// Behind the player relative to their velocity, or any direction when
    /// they are standing still, with sideways jitter.
    fn spawn_position(&mut self, player_pos: Vec2, player_vel: Vec2) -> Vec2 {
        let speed = player_vel.length();
        let back = if speed < self.tuning.stationary_speed {
            heading_to_dir(self.rng.random::<f32>() * std::f32::consts::TAU)
        } else {
            -player_vel / speed
        };
        let jitter = (self.rng.random::<f32>() * 2.0 - 1.0) * self.tuning.lateral_jitter;
        player_pos + back * self.tuning.spawn_distance + back.perp() * jitter
    }

    /// Steer alive cars toward the player and evict finished cars.
    ///
    /// Alive cars beyond the despawn distance are dropped and their ids
    /// returned. Wrecks stay until hidden, however far away they are.
    pub fn update(&mut self, dt: f32, player_pos: Vec2) -> &[u32] {
        let chase_speed = self.tuning.chase_speed;
        let blend = (dt * 2.0).min(1.0);

        for car in &mut self.cars {
            if car.dead {
                car.vel *= 0.9;
            } else {
                let desired = (player_pos - car.pos).normalize_or_zero() * chase_speed;
                car.vel = car.vel.lerp(desired, blend);
            }
            car.pos += car.vel * dt;
        }

        let despawn_sq = self.tuning.despawn_distance * self.tuning.despawn_distance;
        let despawned = &mut self.despawned;
        despawned.clear();
        self.cars.retain(|car| match car.phase() {
            CarPhase::Removable => false,
            CarPhase::Wrecked => true,
            CarPhase::Alive => {
                if car.pos.distance_squared(player_pos) > despawn_sq {
                    log::debug!("Police car {} left the area", car.id);
                    despawned.push(car.id);
                    return false;
                }
                true
            }
        });
        &self.despawned
    }

    /// Presentation finished the car's exit animation
    pub fn mark_hidden(&mut self, id: u32) {
        if let Some(car) = self.cars.iter_mut().find(|c| c.id == id) {
            car.visible = false;
        }
    }

    /// Instantly destroy alive cars within `radius` that sit in the
    /// trampler's forward arc (dot product above the trample threshold).
    pub fn trample(&mut self, position: Vec2, forward: Vec2, radius: f32) -> PursuitHits<'_> {
        self.kill_ids.clear();
        self.kill_positions.clear();
        let forward = forward.normalize_or_zero();
        let radius_sq = radius * radius;
        let mut kills = 0;
        let mut points = 0.0;

        for car in self.cars.iter_mut().filter(|c| !c.dead) {
            let to_car = car.pos - position;
            if to_car.length_squared() > radius_sq {
                continue;
            }
            if to_car.normalize_or_zero().dot(forward) <= self.tuning.trample_dot {
                continue;
            }
            car.kill();
            kills += 1;
            points += car.points;
            self.kill_ids.push(car.id);
            self.kill_positions.push(car.pos);
            log::debug!("Police car {} trampled", car.id);
        }

        PursuitHits {
            hits: kills,
            kills,
            points,
            ids: self.kill_ids.as_slice(),
            positions: self.kill_positions.as_slice(),
        }
    }

    /// Damage and knock back every alive car within `radius`, in any
    /// direction. Cars whose health drops to zero or below die.
    pub fn damage_in_radius(&mut self, center: Vec2, radius: f32, damage: f32) -> PursuitHits<'_> {
        self.kill_ids.clear();
        self.kill_positions.clear();
        let radius_sq = radius * radius;
        let knockback = self.tuning.knockback;
        let mut hits = 0;
        let mut kills = 0;
        let mut points = 0.0;

        for car in self.cars.iter_mut().filter(|c| !c.dead) {
            let away = car.pos - center;
            if away.length_squared() > radius_sq {
                continue;
            }
            hits += 1;
            car.health -= damage;
            car.vel += away.normalize_or_zero() * knockback;
            if car.health <= 0.0 {
                car.kill();
                kills += 1;
                points += car.points;
                self.kill_ids.push(car.id);
                self.kill_positions.push(car.pos);
                log::debug!("Police car {} destroyed", car.id);
            }
        }

        PursuitHits {
            hits,
            kills,
            points,
            ids: self.kill_ids.as_slice(),
            positions: self.kill_positions.as_slice(),
        }
    }

    /// Position and health of alive cars, rebuilt in place on every call
    pub fn snapshots(&mut self) -> &[CarSnapshot] {
        self.snapshot.clear();
        for car in self.cars.iter().filter(|c| !c.dead).take(self.tuning.max_cars) {
            self.snapshot.push(CarSnapshot {
                position: car.pos,
                health: car.health,
                max_health: car.max_health,
            });
        }
        &self.snapshot
    }

    /// Drop every car and restart the spawn timer
    pub fn reset(&mut self) {
        self.cars.clear();
        self.spawn_timer = 0.0;
        self.kill_ids.clear();
        self.kill_positions.clear();
        self.despawned.clear();
        self.snapshot.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> PursuitManager {
        PursuitManager::new(PursuitTuning::default(), 42)
    }

    #[test]
    fn test_no_spawn_below_heat_threshold() {
        let mut pursuit = manager();
        assert_eq!(pursuit.spawn_cooldown(), 0.0);
        assert!(pursuit.spawn_step(0.016, 40.0, Vec2::ZERO, Vec2::ZERO).is_none());
        assert_eq!(pursuit.cars().len(), 0);
    }

    #[test]
    fn test_initial_cap_blocks_spawn() {
        let mut pursuit = manager();
        pursuit.spawn_at(Vec2::new(30.0, 0.0));
        pursuit.spawn_at(Vec2::new(-30.0, 0.0));
        assert!(pursuit.spawn_step(0.016, 60.0, Vec2::ZERO, Vec2::ZERO).is_none());
        assert_eq!(pursuit.alive_count(), 2);
    }

    #[test]
    fn test_population_cap_is_staggered() {
        let pursuit = manager();
        assert_eq!(pursuit.population_cap(0.0), 0);
        assert_eq!(pursuit.population_cap(49.9), 0);
        assert_eq!(pursuit.population_cap(50.0), 2);
        assert_eq!(pursuit.population_cap(74.9), 2);
        assert_eq!(pursuit.population_cap(75.0), 4);
        assert_eq!(pursuit.population_cap(100.0), 4);
    }

    #[test]
    fn test_spawn_respects_cooldown() {
        let mut pursuit = manager();
        assert!(pursuit.spawn_step(0.016, 90.0, Vec2::ZERO, Vec2::ZERO).is_some());
        assert!(pursuit.spawn_step(0.016, 90.0, Vec2::ZERO, Vec2::ZERO).is_none());

        let cooldown = pursuit.tuning().spawn_cooldown;
        assert!(pursuit.spawn_step(cooldown, 90.0, Vec2::ZERO, Vec2::ZERO).is_some());
        assert_eq!(pursuit.alive_count(), 2);
    }

    #[test]
    fn test_dead_cars_do_not_count_against_cap() {
        let mut pursuit = manager();
        pursuit.spawn_at(Vec2::new(2.0, 0.0));
        pursuit.spawn_at(Vec2::new(30.0, 0.0));
        pursuit.trample(Vec2::ZERO, Vec2::X, 4.0);
        assert_eq!(pursuit.cars().len(), 2);
        assert!(pursuit.spawn_step(0.016, 60.0, Vec2::ZERO, Vec2::ZERO).is_some());
    }

    #[test]
    fn test_spawns_behind_moving_player() {
        let mut pursuit = manager();
        let player_pos = Vec2::new(10.0, 10.0);
        let player_vel = Vec2::new(0.0, 20.0);
        let car = pursuit
            .spawn_step(0.016, 80.0, player_pos, player_vel)
            .cloned()
            .unwrap();
        let offset = car.pos - player_pos;
        let tuning = PursuitTuning::default();
        assert!((offset.y + tuning.spawn_distance).abs() < 1e-3);
        assert!(offset.x.abs() <= tuning.lateral_jitter + 1e-3);
    }

    #[test]
    fn test_stationary_spawn_distance() {
        let tuning = PursuitTuning::default();
        let max = (tuning.spawn_distance.powi(2) + tuning.lateral_jitter.powi(2)).sqrt();
        for seed in 0..20 {
            let mut pursuit = PursuitManager::new(tuning.clone(), seed);
            let car = pursuit.spawn_step(0.016, 80.0, Vec2::ZERO, Vec2::ZERO).cloned().unwrap();
            let dist = car.pos.length();
            assert!(dist >= tuning.spawn_distance - 1e-3 && dist <= max + 1e-3);
        }
    }

    #[test]
    fn test_trample_is_gated_by_forward_arc() {
        let mut pursuit = manager();
        // dot 0.5 with forward, inside radius
        let ahead = pursuit.spawn_at(Vec2::new(0.5, 0.75_f32.sqrt()) * 2.0);
        // dot 0.1, same distance
        let beside = pursuit.spawn_at(Vec2::new(0.1, 0.99_f32.sqrt()) * 2.0);
        // behind
        pursuit.spawn_at(Vec2::new(-2.0, 0.0));

        let hits = pursuit.trample(Vec2::ZERO, Vec2::X, 4.0);
        assert_eq!(hits.kills, 1);
        assert_eq!(hits.points, PursuitTuning::default().car_points);
        assert_eq!(hits.positions.len(), 1);
        assert_eq!(hits.ids, &[ahead]);

        let dead: Vec<u32> = pursuit.cars().iter().filter(|c| c.dead).map(|c| c.id).collect();
        assert_eq!(dead, vec![ahead]);
        assert!(!dead.contains(&beside));
    }

    #[test]
    fn test_graduated_damage_kills_at_zero() {
        let tuning = PursuitTuning {
            car_health: 10.0,
            ..Default::default()
        };
        let mut pursuit = PursuitManager::new(tuning, 1);
        pursuit.spawn_at(Vec2::new(1.0, 0.0));

        let hits = pursuit.damage_in_radius(Vec2::ZERO, 3.0, 15.0);
        assert_eq!(hits.hits, 1);
        assert_eq!(hits.kills, 1);
        assert_eq!(hits.positions, &[Vec2::new(1.0, 0.0)]);
        assert!(pursuit.cars()[0].dead);

        // Dead cars are not hit again
        let hits = pursuit.damage_in_radius(Vec2::ZERO, 3.0, 15.0);
        assert_eq!(hits.hits, 0);
        assert_eq!(hits.kills, 0);
        assert!(hits.positions.is_empty());
    }

    #[test]
    fn test_graduated_damage_is_omnidirectional_with_knockback() {
        let mut pursuit = manager();
        pursuit.spawn_at(Vec2::new(-2.0, 0.0));
        pursuit.spawn_at(Vec2::new(0.0, 2.0));
        pursuit.spawn_at(Vec2::new(20.0, 0.0));

        let hits = pursuit.damage_in_radius(Vec2::ZERO, 3.0, 5.0);
        assert_eq!(hits.hits, 2);
        assert_eq!(hits.kills, 0);
        let behind = &pursuit.cars()[0];
        assert_eq!(behind.health, PursuitTuning::default().car_health - 5.0);
        assert!(behind.vel.x < 0.0);
        assert_eq!(pursuit.cars()[2].vel, Vec2::ZERO);
    }

    #[test]
    fn test_kill_positions_truncate_but_counts_are_exact() {
        let tuning = PursuitTuning {
            max_cars: 8,
            ..Default::default()
        };
        let mut pursuit = PursuitManager::new(tuning, 1);
        for i in 0..7 {
            pursuit.spawn_at(Vec2::new(0.2 + i as f32 * 0.1, 0.0));
        }
        let hits = pursuit.damage_in_radius(Vec2::ZERO, 3.0, 1000.0);
        assert_eq!(hits.kills, 7);
        assert_eq!(hits.positions.len(), KillPositions::CAPACITY);
        assert_eq!(hits.ids, &[1, 2, 3, 4, 5]);
        assert_eq!(hits.positions[0], Vec2::new(0.2, 0.0));
    }

    #[test]
    fn test_dead_cars_removed_only_when_hidden() {
        let mut pursuit = manager();
        let id = pursuit.spawn_at(Vec2::new(2.0, 0.0));
        pursuit.trample(Vec2::ZERO, Vec2::X, 4.0);
        assert_eq!(pursuit.cars()[0].phase(), CarPhase::Wrecked);

        pursuit.update(0.016, Vec2::ZERO);
        assert_eq!(pursuit.cars().len(), 1);
        assert_eq!(pursuit.alive_count(), 0);

        pursuit.mark_hidden(id);
        assert_eq!(pursuit.cars()[0].phase(), CarPhase::Removable);
        pursuit.update(0.016, Vec2::ZERO);
        assert!(pursuit.cars().is_empty());
    }

    #[test]
    fn test_update_chases_and_despawns() {
        let mut pursuit = manager();
        pursuit.spawn_at(Vec2::new(20.0, 0.0));
        let far = pursuit.spawn_at(Vec2::new(500.0, 0.0));

        assert_eq!(pursuit.update(0.016, Vec2::ZERO), &[far]);
        for _ in 0..29 {
            assert!(pursuit.update(0.016, Vec2::ZERO).is_empty());
        }
        assert_eq!(pursuit.cars().len(), 1);
        let car = &pursuit.cars()[0];
        assert!(car.pos.x < 20.0);
        assert!(car.vel.x < 0.0);
    }

    #[test]
    fn test_snapshots_list_alive_cars() {
        let mut pursuit = manager();
        pursuit.spawn_at(Vec2::new(2.0, 0.0));
        pursuit.spawn_at(Vec2::new(-10.0, 0.0));
        pursuit.trample(Vec2::ZERO, Vec2::X, 4.0);

        let snapshots = pursuit.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].position, Vec2::new(-10.0, 0.0));
        assert_eq!(snapshots[0].health, snapshots[0].max_health);
    }

    #[test]
    fn test_distant_wreck_waits_for_hidden() {
        let mut pursuit = manager();
        let id = pursuit.spawn_at(Vec2::new(2.0, 0.0));
        pursuit.trample(Vec2::ZERO, Vec2::X, 4.0);

        // Player drives far away before the exit animation finishes
        let despawned = pursuit.update(0.016, Vec2::new(500.0, 0.0));
        assert!(despawned.is_empty());
        assert_eq!(pursuit.cars().len(), 1);
        assert_eq!(pursuit.cars()[0].phase(), CarPhase::Wrecked);

        pursuit.mark_hidden(id);
        pursuit.update(0.016, Vec2::new(500.0, 0.0));
        assert!(pursuit.cars().is_empty());
    }
}
