//! Data-driven game balance
//!
//! Every constant the combat, pursuit and action code reads lives here so a
//! balance pass never has to touch simulation code. Defaults are the shipped
//! values; `Tuning::from_json` overlays a (possibly partial) JSON document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{HEAT_MAX, HEAT_MIN, STATIONARY_SPEED};
use crate::sim::AttackKind;

/// Errors produced while loading a tuning document
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Run-wide rules: combo window, wanted thresholds, heat decay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTuning {
    /// Seconds a combo survives without a new kill
    pub combo_window: f32,
    /// Combo count at which kill caps lift and rampage mode starts
    pub combo_threshold: u32,
    /// Police kills needed for wanted tier 1 and tier 2
    pub wanted_thresholds: [u32; 2],
    /// Heat lost per second while no combo is running
    pub heat_decay_per_sec: f32,
}

impl Default for RunTuning {
    fn default() -> Self {
        Self {
            combo_window: 4.0,
            combo_threshold: 10,
            wanted_thresholds: [3, 8],
            heat_decay_per_sec: 1.5,
        }
    }
}

/// Shape and limits of one directional attack
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttackProfile {
    pub radius: f32,
    /// Cone half-angle (radians)
    pub cone_half_angle: f32,
    /// Damage dealt to actors on foot
    pub damage: f32,
    /// Damage dealt to police cars (0 = cars unaffected)
    pub vehicle_damage: f32,
    /// Kill cap per attack
    pub max_kills: u32,
    /// Whether the cap lifts once the combo threshold is reached
    pub combo_uncapped: bool,
}

/// Per-attack-kind value table (points or heat)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KindTable {
    pub melee: f32,
    pub bicycle: f32,
    pub motorbike: f32,
    pub roadkill: f32,
}

impl KindTable {
    pub fn get(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Melee => self.melee,
            AttackKind::Bicycle => self.bicycle,
            AttackKind::Motorbike => self.motorbike,
            AttackKind::Roadkill => self.roadkill,
        }
    }
}

/// Camera shake pulses
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShakeTuning {
    pub melee_per_kill: f32,
    pub vehicle_hit_base: f32,
    pub vehicle_hit_per_kill: f32,
    pub vehicle_miss: f32,
    pub roadkill_per_kill: f32,
    pub structure: f32,
    pub max: f32,
}

/// Passive vehicular roadkill
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoadkillTuning {
    /// Minimum vehicle speed (m/s) before anything is run over
    pub min_speed: f32,
    pub radius: f32,
    pub cone_half_angle: f32,
    pub damage: f32,
}

/// Combat resolution tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub melee: AttackProfile,
    pub bicycle: AttackProfile,
    pub motorbike: AttackProfile,
    pub roadkill: RoadkillTuning,
    pub civilian_points: KindTable,
    pub police_points: KindTable,
    pub civilian_heat: KindTable,
    pub police_heat: KindTable,
    /// Heat added per police car destroyed
    pub car_kill_heat: f32,
    pub pursuit_multiplier: f32,
    pub panic_multiplier: f32,
    /// Radius of the panic wave sent out after a kill burst
    pub panic_radius: f32,
    pub structure_points: f32,
    pub structure_heat: f32,
    pub shake: ShakeTuning,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee: AttackProfile {
                radius: 2.5,
                cone_half_angle: 1.05,
                damage: 50.0,
                vehicle_damage: 0.0,
                max_kills: 1,
                combo_uncapped: true,
            },
            bicycle: AttackProfile {
                radius: 3.0,
                cone_half_angle: 0.9,
                damage: 60.0,
                vehicle_damage: 5.0,
                max_kills: 2,
                combo_uncapped: true,
            },
            motorbike: AttackProfile {
                radius: 9.0,
                cone_half_angle: 0.35,
                damage: 100.0,
                vehicle_damage: 10.0,
                max_kills: 3,
                combo_uncapped: false,
            },
            roadkill: RoadkillTuning {
                min_speed: 4.0,
                radius: 2.2,
                cone_half_angle: 1.2,
                damage: 1000.0,
            },
            civilian_points: KindTable {
                melee: 100.0,
                bicycle: 150.0,
                motorbike: 200.0,
                roadkill: 120.0,
            },
            police_points: KindTable {
                melee: 300.0,
                bicycle: 350.0,
                motorbike: 450.0,
                roadkill: 400.0,
            },
            civilian_heat: KindTable {
                melee: 2.0,
                bicycle: 2.0,
                motorbike: 3.0,
                roadkill: 3.0,
            },
            police_heat: KindTable {
                melee: 8.0,
                bicycle: 8.0,
                motorbike: 10.0,
                roadkill: 10.0,
            },
            car_kill_heat: 12.0,
            pursuit_multiplier: 2.0,
            panic_multiplier: 1.5,
            panic_radius: 12.0,
            structure_points: 500.0,
            structure_heat: 15.0,
            shake: ShakeTuning {
                melee_per_kill: 0.15,
                vehicle_hit_base: 0.3,
                vehicle_hit_per_kill: 0.1,
                vehicle_miss: 0.05,
                roadkill_per_kill: 0.2,
                structure: 0.6,
                max: 1.0,
            },
        }
    }
}

/// Police car spawning and behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    /// Heat below which no car ever spawns
    pub spawn_heat: f32,
    /// Heat at which the population cap rises to `max_cars`
    pub full_heat: f32,
    pub initial_cars: usize,
    pub max_cars: usize,
    /// Seconds between spawn attempts
    pub spawn_cooldown: f32,
    /// Distance behind the player at which cars appear
    pub spawn_distance: f32,
    /// Max sideways offset of the spawn point
    pub lateral_jitter: f32,
    /// Player speed below which the spawn direction is random
    pub stationary_speed: f32,
    pub chase_speed: f32,
    /// Cars farther than this from the player are removed
    pub despawn_distance: f32,
    pub car_health: f32,
    pub car_points: f32,
    pub trample_radius: f32,
    /// Minimum forward dot product for a trample to land
    pub trample_dot: f32,
    /// Knockback impulse applied by graduated damage
    pub knockback: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            spawn_heat: 50.0,
            full_heat: 75.0,
            initial_cars: 2,
            max_cars: 4,
            spawn_cooldown: 4.0,
            spawn_distance: 45.0,
            lateral_jitter: 12.0,
            stationary_speed: STATIONARY_SPEED,
            chase_speed: 16.0,
            despawn_distance: 160.0,
            car_health: 30.0,
            car_points: 500.0,
            trample_radius: 4.0,
            trample_dot: 0.3,
            knockback: 6.0,
        }
    }
}

/// Seconds between attacks while the button is held, per mobility tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttackIntervals {
    pub on_foot: f32,
    pub bicycle: f32,
    pub motorbike: f32,
}

/// Input-level rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTuning {
    /// Seconds a mounted vehicle must sit still before it counts as stuck
    pub stuck_threshold: f32,
    /// Escape progress gained per new press while captured (1.0 = free)
    pub escape_per_press: f32,
    pub attack_interval: AttackIntervals,
}

impl Default for ActionTuning {
    fn default() -> Self {
        Self {
            stuck_threshold: 2.0,
            escape_per_press: 0.15,
            attack_interval: AttackIntervals {
                on_foot: 0.35,
                bicycle: 0.5,
                motorbike: 0.25,
            },
        }
    }
}

/// Complete balance document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub run: RunTuning,
    pub combat: CombatTuning,
    pub pursuit: PursuitTuning,
    pub action: ActionTuning,
}

impl Tuning {
    /// Parse and validate a tuning document. Missing sections keep defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning document");
        Ok(tuning)
    }

    /// Check cross-field invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.pursuit;
        let heat_range = HEAT_MIN..=HEAT_MAX;
        if !heat_range.contains(&p.spawn_heat) {
            return Err(invalid("pursuit.spawn_heat", "must be within [0, 100]"));
        }
        if !heat_range.contains(&p.full_heat) {
            return Err(invalid("pursuit.full_heat", "must be within [0, 100]"));
        }
        if p.full_heat < p.spawn_heat {
            return Err(invalid(
                "pursuit.full_heat",
                format!("{} is below spawn_heat {}", p.full_heat, p.spawn_heat),
            ));
        }
        if p.initial_cars > p.max_cars {
            return Err(invalid(
                "pursuit.initial_cars",
                format!("{} exceeds max_cars {}", p.initial_cars, p.max_cars),
            ));
        }
        if p.car_health <= 0.0 {
            return Err(invalid("pursuit.car_health", "must be positive"));
        }
        if p.trample_radius <= 0.0 {
            return Err(invalid("pursuit.trample_radius", "must be positive"));
        }

        let c = &self.combat;
        for (field, profile) in [
            ("combat.melee.radius", &c.melee),
            ("combat.bicycle.radius", &c.bicycle),
            ("combat.motorbike.radius", &c.motorbike),
        ] {
            if profile.radius <= 0.0 {
                return Err(invalid(field, "must be positive"));
            }
        }
        if c.roadkill.radius <= 0.0 {
            return Err(invalid("combat.roadkill.radius", "must be positive"));
        }

        let r = &self.run;
        if r.wanted_thresholds[0] > r.wanted_thresholds[1] {
            return Err(invalid("run.wanted_thresholds", "must be ascending"));
        }
        if r.combo_window <= 0.0 {
            return Err(invalid("run.combo_window", "must be positive"));
        }

        Ok(())
    }
}
