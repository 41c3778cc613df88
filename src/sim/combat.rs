//! Combat resolution
//!
//! Turns one attack into kills, score, heat and combo. Actor populations are
//! owned elsewhere and reached through [`CrowdPopulation`]; police cars go
//! through the [`PursuitManager`]. A missing population simply contributes
//! nothing.
//!
//! Scoring, per kill:
//! `base[population][attack] * pursuit_multiplier (if chasing) * panic_multiplier (if fleeing)`

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{EventQueue, GameEvent, KillNotification};
use super::messages::MessagePool;
use super::pursuit::{PursuitHits, PursuitManager};
use super::scratch::KillPositions;
use super::state::RunState;
use crate::in_cone;
use crate::tuning::{AttackProfile, CombatTuning, KindTable, RunTuning};

/// Source of an attack, used to pick point and heat tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// On-foot punch
    Melee,
    /// Bicycle swipe
    Bicycle,
    /// Motorbike shot
    Motorbike,
    /// Running actors over
    Roadkill,
}

/// Which actor population a kill came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    Civilian,
    Police,
}

/// Angular gate of a directional attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub direction: Vec2,
    /// Half-width (radians)
    pub half_angle: f32,
}

/// Area an attack affects. Built per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackShape {
    pub origin: Vec2,
    pub radius: f32,
    /// `None` hits in every direction
    pub cone: Option<Cone>,
    pub damage: f32,
}

impl AttackShape {
    /// Radius and cone test for a target position
    pub fn contains(&self, point: Vec2) -> bool {
        if point.distance_squared(self.origin) > self.radius * self.radius {
            return false;
        }
        match self.cone {
            Some(cone) => in_cone(self.origin, cone.direction, cone.half_angle, point),
            None => true,
        }
    }
}

/// Result of a cone damage query against one population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConeHits {
    /// Actors damaged, dead or not; each one uses up kill budget
    pub struck: u32,
    pub kills: u32,
    /// How many of `kills` were already fleeing
    pub panic_kills: u32,
}

/// A population of actors on foot (civilians, police) that can be attacked
pub trait CrowdPopulation {
    /// Damage actors inside `shape`, nearest first, striking at most
    /// `max_kills` of them whether they die or not. Kill positions are
    /// appended to `positions` until it is full.
    fn damage_in_cone(
        &mut self,
        shape: &AttackShape,
        max_kills: u32,
        positions: &mut KillPositions,
    ) -> ConeHits;

    /// Make actors around `origin` start fleeing
    fn panic(&mut self, origin: Vec2, radius: f32);
}

/// Everything an attack may hit. Absent entries are skipped.
#[derive(Default)]
pub struct Targets<'a> {
    pub civilians: Option<&'a mut dyn CrowdPopulation>,
    pub police: Option<&'a mut dyn CrowdPopulation>,
    pub pursuit: Option<&'a mut PursuitManager>,
}

/// Attacker position and facing (on foot) or body forward (mounted)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attacker {
    pub position: Vec2,
    pub forward: Vec2,
}

/// What one combat call did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatOutcome {
    /// Always `civilian_kills + police_kills`
    pub kills: u32,
    pub civilian_kills: u32,
    /// Police on foot plus police cars
    pub police_kills: u32,
    /// Police cars destroyed (already counted in `police_kills`)
    pub cars_destroyed: u32,
    pub score_delta: u64,
    /// Heat actually applied after clamping
    pub heat_delta: f32,
}

/// Resolves attacks against the run state
#[derive(Debug, Clone)]
pub struct CombatResolver {
    tuning: CombatTuning,
    run: RunTuning,
    rng: Pcg32,
    positions: KillPositions,
}

impl CombatResolver {
    pub fn new(tuning: CombatTuning, run: RunTuning, seed: u64) -> Self {
        Self {
            tuning,
            run,
            rng: Pcg32::seed_from_u64(seed),
            positions: KillPositions::new(),
        }
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    /// Kill positions from the most recent call (at most five)
    pub fn kill_positions(&self) -> &[Vec2] {
        self.positions.as_slice()
    }

    /// On-foot punch: one victim, unlimited once the combo is hot
    pub fn melee(
        &mut self,
        state: &mut RunState,
        attacker: Attacker,
        targets: &mut Targets<'_>,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        let profile = self.tuning.melee;
        let outcome = self.strike(AttackKind::Melee, profile, state, attacker, targets, events);
        if outcome.kills > 0 {
            let shake = self.tuning.shake.melee_per_kill * outcome.kills as f32;
            self.shake(shake, events);
        }
        outcome
    }

    /// Bicycle swipe: small cap, lifted by combo
    pub fn bicycle_attack(
        &mut self,
        state: &mut RunState,
        attacker: Attacker,
        targets: &mut Targets<'_>,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        let profile = self.tuning.bicycle;
        let outcome = self.strike(AttackKind::Bicycle, profile, state, attacker, targets, events);
        self.vehicle_shake(outcome.kills, events);
        outcome
    }

    /// Motorbike shot: long narrow cone, fixed cap
    pub fn motorbike_attack(
        &mut self,
        state: &mut RunState,
        attacker: Attacker,
        targets: &mut Targets<'_>,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        let profile = self.tuning.motorbike;
        let outcome = self.strike(AttackKind::Motorbike, profile, state, attacker, targets, events);
        self.vehicle_shake(outcome.kills, events);
        outcome
    }

    /// Passive kills from a moving vehicle. A `heavy` vehicle also tramples
    /// police cars in its forward arc.
    pub fn roadkill(
        &mut self,
        state: &mut RunState,
        attacker: Attacker,
        speed: f32,
        heavy: bool,
        targets: &mut Targets<'_>,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        self.positions.clear();
        let rk = self.tuning.roadkill;
        if speed < rk.min_speed {
            return CombatOutcome::default();
        }

        let shape = AttackShape {
            origin: attacker.position,
            radius: rk.radius,
            cone: Some(Cone {
                direction: attacker.forward,
                half_angle: rk.cone_half_angle,
            }),
            damage: rk.damage,
        };
        let mut outcome =
            self.hit_crowds(AttackKind::Roadkill, &shape, u32::MAX, state, attacker, targets, events);

        if heavy {
            if let Some(pursuit) = targets.pursuit.as_deref_mut() {
                let radius = pursuit.trample_radius();
                let hits = pursuit.trample(attacker.position, attacker.forward, radius);
                self.score_cars(&hits, state, events, &mut outcome);
            }
        }

        if outcome.kills > 0 {
            let shake = self.tuning.shake.roadkill_per_kill * outcome.kills as f32;
            self.shake(shake, events);
            self.panic_crowds(attacker.position, targets);
        }
        outcome
    }

    /// A destructible structure went down. Fixed score and heat, no caps.
    /// Structures always earn the pursuit multiplier.
    pub fn destroy_structure(
        &mut self,
        state: &mut RunState,
        position: Vec2,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        self.positions.clear();
        let points = self.apply_multipliers(self.tuning.structure_points, true, false);
        state.add_score(points);
        let heat_delta = state.add_heat(self.tuning.structure_heat);
        if state.bump_combo(&self.run) {
            events.push(GameEvent::RampageStarted);
        }

        events.push(GameEvent::StructureDestroyed { position });
        events.push(GameEvent::Kill(KillNotification {
            message: MessagePool::Structure.pick(&mut self.rng),
            pursuit: true,
            points,
        }));
        self.shake(self.tuning.shake.structure, events);
        log::debug!("Structure destroyed at {position:?} for {points} points");

        CombatOutcome {
            score_delta: points,
            heat_delta,
            ..Default::default()
        }
    }

    /// Shared directional attack path
    fn strike(
        &mut self,
        kind: AttackKind,
        profile: AttackProfile,
        state: &mut RunState,
        attacker: Attacker,
        targets: &mut Targets<'_>,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        self.positions.clear();
        let shape = AttackShape {
            origin: attacker.position,
            radius: profile.radius,
            cone: Some(Cone {
                direction: attacker.forward,
                half_angle: profile.cone_half_angle,
            }),
            damage: profile.damage,
        };
        let cap = if profile.combo_uncapped && state.combo_uncapped(&self.run) {
            u32::MAX
        } else {
            profile.max_kills
        };

        let mut outcome = self.hit_crowds(kind, &shape, cap, state, attacker, targets, events);

        if profile.vehicle_damage > 0.0 {
            if let Some(pursuit) = targets.pursuit.as_deref_mut() {
                let hits =
                    pursuit.damage_in_radius(attacker.position, profile.radius, profile.vehicle_damage);
                self.score_cars(&hits, state, events, &mut outcome);
            }
        }

        if outcome.kills > 0 {
            self.panic_crowds(attacker.position, targets);
        }
        log::debug!(
            "{kind:?} attack: {} kills ({} civ, {} police), +{} points",
            outcome.kills,
            outcome.civilian_kills,
            outcome.police_kills,
            outcome.score_delta
        );
        outcome
    }

    /// Query civilians then police, sharing one kill budget
    #[allow(clippy::too_many_arguments)]
    fn hit_crowds(
        &mut self,
        kind: AttackKind,
        shape: &AttackShape,
        cap: u32,
        state: &mut RunState,
        attacker: Attacker,
        targets: &mut Targets<'_>,
        events: &mut EventQueue,
    ) -> CombatOutcome {
        let mut outcome = CombatOutcome::default();
        let mut budget = cap;

        for population in [Population::Civilian, Population::Police] {
            if budget == 0 {
                break;
            }
            let crowd = match population {
                Population::Civilian => targets.civilians.as_deref_mut(),
                Population::Police => targets.police.as_deref_mut(),
            };
            let Some(crowd) = crowd else { continue };

            let first_position = self.positions.len();
            let hits = crowd.damage_in_cone(shape, budget, &mut self.positions);
            budget = budget.saturating_sub(hits.struck);
            self.score_crowd(population, kind, hits, state, events, &mut outcome);

            for i in first_position..self.positions.len() {
                let position = self.positions.as_slice()[i];
                let direction = (position - attacker.position).normalize_or(attacker.forward);
                events.push(GameEvent::BloodSpray { position, direction });
            }
        }
        outcome
    }

    /// Apply score, heat, combo and notifications for one population's kills
    fn score_crowd(
        &mut self,
        population: Population,
        kind: AttackKind,
        hits: ConeHits,
        state: &mut RunState,
        events: &mut EventQueue,
        outcome: &mut CombatOutcome,
    ) {
        let (points_table, heat_table): (KindTable, KindTable) = match population {
            Population::Civilian => (self.tuning.civilian_points, self.tuning.civilian_heat),
            Population::Police => (self.tuning.police_points, self.tuning.police_heat),
        };
        let police = population == Population::Police;

        for i in 0..hits.kills {
            let panicked = i < hits.panic_kills;
            let points = self.apply_multipliers(points_table.get(kind), state.pursuit, panicked);
            let pool = match population {
                Population::Police => MessagePool::Police,
                Population::Civilian if kind == AttackKind::Roadkill => MessagePool::Roadkill,
                Population::Civilian if panicked => MessagePool::PanickedCivilian,
                Population::Civilian if state.pursuit => MessagePool::Pursuit,
                Population::Civilian => MessagePool::Civilian,
            };
            self.apply_kill(points, heat_table.get(kind), police, pool, state, events, outcome);
        }

        if police {
            outcome.police_kills += hits.kills;
        } else {
            outcome.civilian_kills += hits.kills;
        }
    }

    /// Police car kills from a trample or graduated damage call
    fn score_cars(
        &mut self,
        hits: &PursuitHits<'_>,
        state: &mut RunState,
        events: &mut EventQueue,
        outcome: &mut CombatOutcome,
    ) {
        if hits.kills == 0 {
            return;
        }
        for (&id, &position) in hits.ids.iter().zip(hits.positions) {
            events.push(GameEvent::PoliceCarDestroyed { id, position });
        }
        // Cars may carry different values; the burst total is exact and each
        // popup shows its share.
        let total = self.apply_multipliers(hits.points, state.pursuit, false);
        let share = total / u64::from(hits.kills);
        let mut remainder = total - share * u64::from(hits.kills);
        let heat = self.tuning.car_kill_heat;

        for _ in 0..hits.kills {
            let extra = remainder.min(1);
            remainder -= extra;
            self.apply_kill(share + extra, heat, true, MessagePool::Police, state, events, outcome);
        }
        self.positions.extend_from(hits.positions);
        outcome.police_kills += hits.kills;
        outcome.cars_destroyed += hits.kills;
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_kill(
        &mut self,
        points: u64,
        heat: f32,
        police: bool,
        pool: MessagePool,
        state: &mut RunState,
        events: &mut EventQueue,
        outcome: &mut CombatOutcome,
    ) {
        state.add_score(points);
        outcome.score_delta += points;
        outcome.heat_delta += state.add_heat(heat);
        outcome.kills += 1;

        let effects = state.register_kill(&self.run, police);
        events.push(GameEvent::Kill(KillNotification {
            message: pool.pick(&mut self.rng),
            pursuit: state.pursuit,
            points,
        }));
        if let Some(level) = effects.wanted_raised {
            events.push(GameEvent::WantedLevelRaised { level });
        }
        if effects.rampage_started {
            events.push(GameEvent::RampageStarted);
        }
    }

    fn apply_multipliers(&self, base: f32, pursuit: bool, panicked: bool) -> u64 {
        let mut points = base;
        if pursuit {
            points *= self.tuning.pursuit_multiplier;
        }
        if panicked {
            points *= self.tuning.panic_multiplier;
        }
        points.max(0.0).round() as u64
    }

    fn panic_crowds(&self, origin: Vec2, targets: &mut Targets<'_>) {
        let radius = self.tuning.panic_radius;
        if let Some(civilians) = targets.civilians.as_deref_mut() {
            civilians.panic(origin, radius);
        }
        if let Some(police) = targets.police.as_deref_mut() {
            police.panic(origin, radius);
        }
    }

    /// Hit pulse scaled by kills, or the small miss pulse
    fn vehicle_shake(&self, kills: u32, events: &mut EventQueue) {
        let shake = &self.tuning.shake;
        let intensity = if kills > 0 {
            shake.vehicle_hit_base + shake.vehicle_hit_per_kill * kills as f32
        } else {
            shake.vehicle_miss
        };
        self.shake(intensity, events);
    }

    fn shake(&self, intensity: f32, events: &mut EventQueue) {
        let intensity = intensity.min(self.tuning.shake.max);
        if intensity > 0.0 {
            events.push(GameEvent::CameraShake { intensity });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::crowd::{Crowd, CrowdKind};
    use crate::tuning::{PursuitTuning, Tuning};

    fn resolver() -> CombatResolver {
        let tuning = Tuning::default();
        CombatResolver::new(tuning.combat, tuning.run, 1)
    }

    fn facing_east() -> Attacker {
        Attacker {
            position: Vec2::ZERO,
            forward: Vec2::X,
        }
    }

    fn kills_of(events: &EventQueue) -> Vec<KillNotification> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Kill(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_melee_caps_at_one_kill_below_combo_threshold() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        civilians.spawn(Vec2::new(1.0, 0.0));
        civilians.spawn(Vec2::new(1.5, 0.2));
        civilians.spawn(Vec2::new(2.0, -0.2));

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        let outcome = combat.melee(&mut state, facing_east(), &mut targets, &mut events);

        assert_eq!(outcome.kills, 1);
        assert_eq!(outcome.civilian_kills, 1);
        assert_eq!(civilians.alive_count(), 2);
        // Nearest victim goes first
        assert_eq!(combat.kill_positions(), &[Vec2::new(1.0, 0.0)]);
        assert_eq!(state.score, 100);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_melee_uncapped_when_combo_is_hot() {
        let tuning = Tuning::default();
        let mut combat = resolver();
        let mut state = RunState::new();
        state.combo = tuning.run.combo_threshold;
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        for i in 0..3 {
            civilians.spawn(Vec2::new(1.0 + i as f32 * 0.4, 0.0));
        }

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        let outcome = combat.melee(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.kills, 3);
        assert_eq!(civilians.alive_count(), 0);
    }

    #[test]
    fn test_melee_ignores_targets_behind() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        civilians.spawn(Vec2::new(-1.0, 0.0));

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        let outcome = combat.melee(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome, CombatOutcome::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_collaborators_are_no_ops() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut targets = Targets::default();
        let outcome = combat.motorbike_attack(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.kills, 0);
        // Vehicle attacks still send the miss pulse
        assert_eq!(
            events.iter().next(),
            Some(&GameEvent::CameraShake {
                intensity: CombatTuning::default().shake.vehicle_miss
            })
        );
    }

    #[test]
    fn test_pursuit_and_panic_multipliers() {
        let mut combat = resolver();
        let mut state = RunState::new();
        state.pursuit = true;
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        civilians.spawn(Vec2::new(1.0, 0.0));
        civilians.panic(Vec2::ZERO, 5.0);

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        let outcome = combat.melee(&mut state, facing_east(), &mut targets, &mut events);
        // 100 * 2.0 (pursuit) * 1.5 (panic)
        assert_eq!(outcome.score_delta, 300);

        let kills = kills_of(&events);
        assert_eq!(kills.len(), 1);
        assert!(kills[0].pursuit);
        assert_eq!(kills[0].points, 300);
        assert!(MessagePool::PanickedCivilian.messages().contains(&kills[0].message));
    }

    #[test]
    fn test_police_kills_raise_wanted_level() {
        let tuning = Tuning::default();
        let mut combat = resolver();
        let mut state = RunState::new();
        state.combo = tuning.run.combo_threshold;
        let mut events = EventQueue::default();
        let mut police = Crowd::new(CrowdKind::Police);
        for i in 0..4 {
            police.spawn(Vec2::new(1.0, i as f32 * 0.2));
        }

        let mut targets = Targets {
            police: Some(&mut police),
            ..Default::default()
        };
        let attacker = facing_east();
        // Police take two punches each
        combat.melee(&mut state, attacker, &mut targets, &mut events);
        let outcome = combat.melee(&mut state, attacker, &mut targets, &mut events);

        assert_eq!(outcome.police_kills, 4);
        assert_eq!(state.police_kills, 4);
        assert_eq!(state.wanted_level, 1);
        assert!(events.iter().any(|e| *e == GameEvent::WantedLevelRaised { level: 1 }));
        assert!(kills_of(&events)
            .iter()
            .all(|k| MessagePool::Police.messages().contains(&k.message)));
    }

    #[test]
    fn test_bicycle_cap_shared_across_populations() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        civilians.spawn(Vec2::new(1.0, 0.0));
        let mut police = Crowd::new(CrowdKind::Police);
        police.spawn(Vec2::new(1.2, 0.0));
        police.spawn(Vec2::new(1.4, 0.0));

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            police: Some(&mut police),
            ..Default::default()
        };
        let outcome = combat.bicycle_attack(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.kills, outcome.civilian_kills + outcome.police_kills);
        assert_eq!(outcome.civilian_kills, 1);
        // Bicycle damage (60) doesn't drop police (100 hp); one strike left in budget
        assert_eq!(outcome.police_kills, 0);
        assert_eq!(police.alive_count(), 2);
        assert_eq!(police.walkers()[0].health, 40.0);
        assert_eq!(police.walkers()[1].health, 100.0);
    }

    #[test]
    fn test_surviving_victims_use_up_budget() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        // Two sturdy actors absorb both bicycle strikes without dying
        let mut sturdy = Crowd::new(CrowdKind::Police);
        sturdy.spawn(Vec2::new(1.0, 0.0));
        sturdy.spawn(Vec2::new(1.2, 0.0));
        let mut fragile = Crowd::new(CrowdKind::Civilian);
        fragile.spawn(Vec2::new(1.4, 0.0));

        let mut targets = Targets {
            civilians: Some(&mut sturdy),
            police: Some(&mut fragile),
            ..Default::default()
        };
        let outcome = combat.bicycle_attack(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.kills, 0);
        assert_eq!(fragile.alive_count(), 1);
        assert_eq!(fragile.walkers()[0].health, CrowdKind::Civilian.health());
    }

    #[test]
    fn test_motorbike_cap_never_lifts() {
        let tuning = Tuning::default();
        let mut combat = resolver();
        let mut state = RunState::new();
        state.combo = tuning.run.combo_threshold + 10;
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        for i in 0..6 {
            civilians.spawn(Vec2::new(2.0 + i as f32, 0.0));
        }

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        let outcome = combat.motorbike_attack(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.kills, tuning.combat.motorbike.max_kills);
    }

    #[test]
    fn test_kill_side_effects() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        civilians.spawn(Vec2::new(1.0, 0.0));
        civilians.spawn(Vec2::new(-6.0, 0.0));

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        combat.melee(&mut state, facing_east(), &mut targets, &mut events);

        let blood: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BloodSpray { .. }))
            .collect();
        assert_eq!(
            blood,
            vec![&GameEvent::BloodSpray {
                position: Vec2::new(1.0, 0.0),
                direction: Vec2::X
            }]
        );
        assert!(events.iter().any(|e| matches!(e, GameEvent::CameraShake { .. })));
        // Survivor behind the attacker was within panic radius
        assert_eq!(civilians.panicked_count(), 1);
    }

    #[test]
    fn test_roadkill_needs_speed() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        civilians.spawn(Vec2::new(1.0, 0.0));

        let mut targets = Targets {
            civilians: Some(&mut civilians),
            ..Default::default()
        };
        let slow = combat.roadkill(&mut state, facing_east(), 1.0, false, &mut targets, &mut events);
        assert_eq!(slow.kills, 0);

        let fast = combat.roadkill(&mut state, facing_east(), 10.0, false, &mut targets, &mut events);
        assert_eq!(fast.kills, 1);
        let kills = kills_of(&events);
        assert!(MessagePool::Roadkill.messages().contains(&kills[0].message));
    }

    #[test]
    fn test_heavy_roadkill_tramples_cars() {
        let mut combat = resolver();
        let mut state = RunState::new();
        state.pursuit = true;
        let mut events = EventQueue::default();
        let mut pursuit = PursuitManager::new(PursuitTuning::default(), 3);
        let ahead = pursuit.spawn_at(Vec2::new(3.0, 0.0));
        pursuit.spawn_at(Vec2::new(0.0, 3.0));

        let mut targets = Targets {
            pursuit: Some(&mut pursuit),
            ..Default::default()
        };
        let outcome = combat.roadkill(&mut state, facing_east(), 12.0, true, &mut targets, &mut events);
        assert_eq!(outcome.cars_destroyed, 1);
        assert_eq!(outcome.police_kills, 1);
        assert_eq!(outcome.kills, 1);
        // 500 * 2.0 pursuit
        assert_eq!(outcome.score_delta, 1000);
        assert_eq!(pursuit.alive_count(), 1);
        assert!(events
            .iter()
            .any(|e| *e == GameEvent::PoliceCarDestroyed { id: ahead, position: Vec2::new(3.0, 0.0) }));

        // The wreck can be handed back once its animation ends
        pursuit.mark_hidden(ahead);
        pursuit.update(0.016, Vec2::ZERO);
        assert_eq!(pursuit.cars().len(), 1);
    }

    #[test]
    fn test_bicycle_damages_cars_gradually() {
        let mut combat = resolver();
        let mut state = RunState::new();
        let mut events = EventQueue::default();
        let mut pursuit = PursuitManager::new(PursuitTuning::default(), 3);
        pursuit.spawn_at(Vec2::new(2.0, 0.0));

        let mut targets = Targets {
            pursuit: Some(&mut pursuit),
            ..Default::default()
        };
        // 30 hp car, 5 damage per swipe
        for _ in 0..5 {
            let outcome = combat.bicycle_attack(&mut state, facing_east(), &mut targets, &mut events);
            assert_eq!(outcome.cars_destroyed, 0);
        }
        let outcome = combat.bicycle_attack(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.cars_destroyed, 1);
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_structure_destruction() {
        let mut combat = resolver();
        let mut state = RunState::new();
        assert!(!state.pursuit);
        let mut events = EventQueue::default();
        let outcome = combat.destroy_structure(&mut state, Vec2::new(5.0, 5.0), &mut events);

        // 500 * 2.0, pursuit multiplier applies even with no chase running
        assert_eq!(outcome.score_delta, 1000);
        assert_eq!(state.score, 1000);
        assert_eq!(outcome.heat_delta, 15.0);
        assert_eq!(outcome.kills, 0);
        assert_eq!(state.combo, 1);
        let kills = kills_of(&events);
        assert_eq!(kills.len(), 1);
        assert!(kills[0].pursuit);
        assert_eq!(kills[0].points, 1000);
        assert!(MessagePool::Structure.messages().contains(&kills[0].message));
    }

    #[test]
    fn test_heat_never_exceeds_max() {
        let tuning = Tuning::default();
        let mut combat = resolver();
        let mut state = RunState::new();
        state.set_heat(99.0);
        state.combo = tuning.run.combo_threshold;
        let mut events = EventQueue::default();
        let mut police = Crowd::new(CrowdKind::Police);
        for i in 0..5 {
            police.spawn(Vec2::new(3.0 + i as f32, 0.0));
        }

        let mut targets = Targets {
            police: Some(&mut police),
            ..Default::default()
        };
        let outcome = combat.motorbike_attack(&mut state, facing_east(), &mut targets, &mut events);
        assert_eq!(outcome.kills, 3);
        assert_eq!(state.heat(), 100.0);
        assert_eq!(outcome.heat_delta, 1.0);
    }
}
