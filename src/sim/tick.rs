//! Per-frame simulation tick
//!
//! One call per frame runs everything in a fixed order: combo countdown,
//! action resolution, attacks, passive roadkill, structure kills, heat decay,
//! then the pursuit spawn step and chase update.

use glam::Vec2;

use super::action::{ActionContext, ActionResolver, Intent, StuckDetector};
use super::combat::{AttackKind, Attacker, CombatOutcome, CombatResolver, Targets};
use super::events::{EventQueue, GameEvent};
use super::state::RunState;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// How the player is currently getting around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mobility {
    #[default]
    OnFoot,
    Bicycle,
    Motorbike,
    Car,
}

impl Mobility {
    pub fn is_mounted(self) -> bool {
        self != Mobility::OnFoot
    }

    /// Heavy vehicles trample police cars
    pub fn is_heavy(self) -> bool {
        self == Mobility::Car
    }

    /// Attack fired by the action button, if any
    pub fn attack(self) -> Option<AttackKind> {
        match self {
            Mobility::OnFoot => Some(AttackKind::Melee),
            Mobility::Bicycle => Some(AttackKind::Bicycle),
            Mobility::Motorbike => Some(AttackKind::Motorbike),
            Mobility::Car => None,
        }
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Action button held
    pub action: bool,
    pub mobility: Mobility,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing on foot, body forward when mounted
    pub forward: Vec2,
    /// A mountable vehicle is in range
    pub vehicle_nearby: bool,
    /// A better vehicle is in range while mounted
    pub upgrade_nearby: bool,
    /// Structures the physics layer knocked down this frame
    pub destroyed_structures: Vec<Vec2>,
}

/// What happened this frame, beyond the events queued
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub intent: Intent,
    pub new_press: bool,
    pub attack: Option<CombatOutcome>,
    pub roadkill: Option<CombatOutcome>,
    pub spawned_car: Option<u32>,
    pub escaped: bool,
}

/// Everything the core keeps between frames for one game session
#[derive(Debug)]
pub struct Session {
    pub state: RunState,
    pub events: EventQueue,
    tuning: Tuning,
    actions: ActionResolver,
    combat: CombatResolver,
    stuck: StuckDetector,
    /// Seconds until the held button may attack again
    attack_cooldown: f32,
    captured: bool,
    escape_progress: f32,
}

impl Session {
    pub fn new(tuning: Tuning, settings: &Settings, seed: u64) -> Self {
        let combat = CombatResolver::new(tuning.combat.clone(), tuning.run.clone(), seed);
        Self {
            state: RunState::new(),
            events: EventQueue::new(settings),
            tuning,
            actions: ActionResolver::new(),
            combat,
            stuck: StuckDetector::new(),
            attack_cooldown: 0.0,
            captured: false,
            escape_progress: 0.0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    /// The player has been grabbed and must mash to escape
    pub fn capture(&mut self) {
        log::debug!("Player captured");
        self.captured = true;
        self.escape_progress = 0.0;
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Escape progress in [0, 1]
    pub fn escape_progress(&self) -> f32 {
        self.escape_progress
    }

    /// Start a fresh run, keeping tuning and settings
    pub fn reset(&mut self) {
        self.state = RunState::new();
        self.actions.reset();
        self.stuck.reset();
        self.attack_cooldown = 0.0;
        self.captured = false;
        self.escape_progress = 0.0;
        self.events.drain().for_each(drop);
    }

    fn attack_interval(&self, mobility: Mobility) -> f32 {
        let intervals = &self.tuning.action.attack_interval;
        match mobility {
            Mobility::OnFoot => intervals.on_foot,
            Mobility::Bicycle => intervals.bicycle,
            Mobility::Motorbike => intervals.motorbike,
            Mobility::Car => 0.0,
        }
    }
}

/// Advance the session by one frame
pub fn tick(session: &mut Session, input: &TickInput, targets: &mut Targets<'_>, dt: f32) -> FrameReport {
    let mut report = FrameReport::default();

    session.state.tick_combo(dt);
    session.attack_cooldown = (session.attack_cooldown - dt).max(0.0);

    let speed = input.velocity.length();
    let mounted = input.mobility.is_mounted();
    let vehicle_stuck = if mounted {
        let action = &session.tuning.action;
        session.stuck.update(
            speed,
            session.tuning.pursuit.stationary_speed,
            action.stuck_threshold,
            dt,
        )
    } else {
        session.stuck.reset();
        false
    };

    let ctx = ActionContext {
        captured: session.captured,
        vehicle_nearby: input.vehicle_nearby,
        upgrade_nearby: input.upgrade_nearby,
        mounted,
        vehicle_stuck,
    };
    let resolution = session.actions.resolve(input.action, &ctx);
    report.intent = resolution.intent;
    report.new_press = resolution.new_press;

    let attacker = Attacker {
        position: input.position,
        forward: input.forward,
    };

    match resolution.intent {
        Intent::EscapeCapture if resolution.new_press => {
            session.escape_progress += session.tuning.action.escape_per_press;
            if session.escape_progress >= 1.0 {
                session.captured = false;
                session.escape_progress = 0.0;
                session.events.push(GameEvent::EscapedCapture);
                report.escaped = true;
                log::debug!("Player broke free");
            }
        }
        Intent::Attack if session.attack_cooldown <= 0.0 => {
            let outcome = match input.mobility.attack() {
                Some(AttackKind::Melee) => Some(session.combat.melee(
                    &mut session.state,
                    attacker,
                    targets,
                    &mut session.events,
                )),
                Some(AttackKind::Bicycle) => Some(session.combat.bicycle_attack(
                    &mut session.state,
                    attacker,
                    targets,
                    &mut session.events,
                )),
                Some(AttackKind::Motorbike) => Some(session.combat.motorbike_attack(
                    &mut session.state,
                    attacker,
                    targets,
                    &mut session.events,
                )),
                Some(AttackKind::Roadkill) | None => None,
            };
            if outcome.is_some() {
                session.attack_cooldown = session.attack_interval(input.mobility);
            }
            report.attack = outcome;
        }
        _ => {}
    }

    if mounted && !session.captured {
        let outcome = session.combat.roadkill(
            &mut session.state,
            attacker,
            speed,
            input.mobility.is_heavy(),
            targets,
            &mut session.events,
        );
        if outcome.kills > 0 {
            report.roadkill = Some(outcome);
        }
    }

    for &position in &input.destroyed_structures {
        session
            .combat
            .destroy_structure(&mut session.state, position, &mut session.events);
    }

    session
        .state
        .decay_heat(session.tuning.run.heat_decay_per_sec, dt);

    if let Some(pursuit) = targets.pursuit.as_deref_mut() {
        let heat = session.state.heat();
        let spawned = pursuit
            .spawn_step(dt, heat, input.position, input.velocity)
            .map(|car| (car.id, car.pos));
        if let Some((id, position)) = spawned {
            session.events.push(GameEvent::PoliceCarSpawned { id, position });
            report.spawned_car = Some(id);
        }
        for &id in pursuit.update(dt, input.position) {
            session.events.push(GameEvent::PoliceCarDespawned { id });
        }
        session.state.pursuit = pursuit.alive_count() > 0;
    }

    report
}
