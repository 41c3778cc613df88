//! Action button resolution
//!
//! A single "action" button does everything: punch, hop on a bike, swap to a
//! better ride, bail out of a wreck, break free when grabbed. This module
//! turns the raw button level plus a few situational flags into exactly one
//! intent per frame.

/// High-level intent for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    #[default]
    None,
    /// Mash to break out of a capture
    EscapeCapture,
    /// Leave a vehicle that has stopped moving
    ExitVehicle,
    /// Swap the current vehicle for a better one in range
    SwitchVehicle,
    /// Mount a vehicle in range
    EnterVehicle,
    Attack,
}

/// Situational flags sampled by the caller each frame
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionContext {
    pub captured: bool,
    pub vehicle_nearby: bool,
    pub upgrade_nearby: bool,
    pub mounted: bool,
    pub vehicle_stuck: bool,
}

/// Resolved intent plus edge information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    /// The button went down this frame
    pub new_press: bool,
}

/// Edge-detecting action resolver. Only remembers last frame's button.
#[derive(Debug, Clone, Default)]
pub struct ActionResolver {
    was_pressed: bool,
}

impl ActionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve this frame's intent. Priority, highest first:
    /// escape capture, exit stuck vehicle, switch vehicle, enter vehicle
    /// (new press only), attack.
    pub fn resolve(&mut self, pressed: bool, ctx: &ActionContext) -> Resolution {
        let new_press = pressed && !self.was_pressed;
        self.was_pressed = pressed;

        if !pressed {
            return Resolution::default();
        }

        let intent = if ctx.captured {
            Intent::EscapeCapture
        } else if ctx.mounted && ctx.vehicle_stuck {
            Intent::ExitVehicle
        } else if ctx.mounted && ctx.upgrade_nearby {
            Intent::SwitchVehicle
        } else if !ctx.mounted && ctx.vehicle_nearby && new_press {
            Intent::EnterVehicle
        } else {
            Intent::Attack
        };

        Resolution { intent, new_press }
    }

    /// Forget the held state (e.g. after a scene change)
    pub fn reset(&mut self) {
        self.was_pressed = false;
    }
}

/// Tracks how long the mounted vehicle has been stationary
#[derive(Debug, Clone, Default)]
pub struct StuckDetector {
    still_for: f32,
}

impl StuckDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's vehicle speed. Returns true once the vehicle has
    /// stayed below `stationary_speed` for longer than `threshold` seconds.
    pub fn update(&mut self, speed: f32, stationary_speed: f32, threshold: f32, dt: f32) -> bool {
        if speed < stationary_speed {
            self.still_for += dt;
        } else {
            self.still_for = 0.0;
        }
        self.still_for > threshold
    }

    pub fn reset(&mut self) {
        self.still_for = 0.0;
    }
}
