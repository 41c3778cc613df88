//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering,
//! audio and platform code:
//! - Driven by one external per-frame tick, single-threaded
//! - Seeded RNG only
//! - No heap allocation on the kill path (scratch buffers are reused)

pub mod action;
pub mod combat;
pub mod crowd;
pub mod events;
pub mod messages;
pub mod pursuit;
pub mod scratch;
pub mod state;
pub mod tick;

pub use action::{ActionContext, ActionResolver, Intent, Resolution, StuckDetector};
pub use combat::{
    AttackKind, AttackShape, Attacker, CombatOutcome, CombatResolver, Cone, ConeHits,
    CrowdPopulation, Population, Targets,
};
pub use crowd::{Crowd, CrowdKind};
pub use events::{EventQueue, GameEvent, KillNotification};
pub use messages::MessagePool;
pub use pursuit::{CarPhase, CarSnapshot, PoliceCar, PursuitHits, PursuitManager};
pub use scratch::KillPositions;
pub use state::{KillEffects, RunState, wanted_level_for};
pub use tick::{FrameReport, Mobility, Session, TickInput, tick};
