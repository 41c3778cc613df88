//! Player presentation preferences
//!
//! These never change gameplay outcomes; they only shape the events the core
//! hands to the presentation layer (shake strength, gore, queue size).

use serde::{Deserialize, Serialize};

use crate::consts::EVENT_QUEUE_CAPACITY;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Camera shake on kills and impacts
    pub camera_shake: bool,
    /// Blood spray effects
    pub blood_effects: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake)
    pub reduced_motion: bool,

    // === Plumbing ===
    /// Max events buffered between presentation drains
    pub event_queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_shake: true,
            blood_effects: true,
            reduced_motion: false,
            event_queue_capacity: EVENT_QUEUE_CAPACITY,
        }
    }
}

impl Settings {
    /// Multiplier applied to every camera shake pulse
    pub fn effective_shake_scale(&self) -> f32 {
        if !self.camera_shake {
            0.0
        } else if self.reduced_motion {
            0.25
        } else {
            1.0
        }
    }

    /// Parse settings from JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings ({e}), using defaults");
                Self::default()
            }
        }
    }
}
