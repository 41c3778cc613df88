//! Rampage - combat and pursuit core for an arcade rampage game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (action resolution, combat, police pursuit)
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences that shape the event stream
//!
//! Rendering, physics, audio and raw input fusion live outside this crate.
//! Everything here works on the ground plane: `Vec2` is the world (x, z).

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Heat bounds
    pub const HEAT_MIN: f32 = 0.0;
    pub const HEAT_MAX: f32 = 100.0;

    /// Highest wanted tier
    pub const MAX_WANTED_LEVEL: u8 = 2;

    /// Capacity of the per-call kill position buffer
    pub const KILL_POSITION_CAPACITY: usize = 5;

    /// Default event queue capacity (events per frame before dropping)
    pub const EVENT_QUEUE_CAPACITY: usize = 128;

    /// Speed below which a kinematic body counts as stationary (m/s)
    pub const STATIONARY_SPEED: f32 = 0.5;
}

/// Clamp a heat value into the valid range
#[inline]
pub fn clamp_heat(heat: f32) -> f32 {
    heat.clamp(consts::HEAT_MIN, consts::HEAT_MAX)
}

/// Unit vector for a heading angle (radians, 0 = +x)
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Heading angle of a direction vector
#[inline]
pub fn dir_to_heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Check whether `point` lies inside the cone starting at `origin`.
///
/// `dir` does not need to be normalized. A point sitting on the origin is
/// always inside; a zero direction disables the angular test.
#[inline]
pub fn in_cone(origin: Vec2, dir: Vec2, half_angle: f32, point: Vec2) -> bool {
    let to_point = point - origin;
    let dist = to_point.length();
    let dir = dir.normalize_or_zero();
    if dist < 1e-4 || dir == Vec2::ZERO {
        return true;
    }
    to_point.dot(dir) / dist >= half_angle.cos()
}
