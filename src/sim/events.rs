//! Frame events for the presentation layer
//!
//! The core never calls into HUD, audio or camera code. It pushes events into
//! a bounded queue which the presentation layer drains once per frame.

use std::collections::VecDeque;

use glam::Vec2;

use crate::settings::Settings;

/// A kill popup / voice-over trigger
#[derive(Debug, Clone, PartialEq)]
pub struct KillNotification {
    pub message: &'static str,
    /// Kill happened during an active police pursuit
    pub pursuit: bool,
    /// Points awarded for this single kill
    pub points: u64,
}

/// Something the presentation layer should react to this frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Kill(KillNotification),
    CameraShake { intensity: f32 },
    BloodSpray { position: Vec2, direction: Vec2 },
    RampageStarted,
    WantedLevelRaised { level: u8 },
    PoliceCarSpawned { id: u32, position: Vec2 },
    PoliceCarDestroyed { id: u32, position: Vec2 },
    /// An alive car fell too far behind and was dropped without a wreck
    PoliceCarDespawned { id: u32 },
    StructureDestroyed { position: Vec2 },
    EscapedCapture,
}

/// Bounded FIFO of frame events; the oldest event is dropped on overflow
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
    capacity: usize,
    shake_scale: f32,
    blood: bool,
    dropped: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl EventQueue {
    pub fn new(settings: &Settings) -> Self {
        let capacity = settings.event_queue_capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            shake_scale: settings.effective_shake_scale(),
            blood: settings.blood_effects,
            dropped: 0,
        }
    }

    /// Re-read presentation preferences (queue capacity is fixed at creation)
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.shake_scale = settings.effective_shake_scale();
        self.blood = settings.blood_effects;
    }

    pub fn push(&mut self, event: GameEvent) {
        let event = match event {
            GameEvent::CameraShake { intensity } => {
                let intensity = intensity * self.shake_scale;
                if intensity <= 0.0 {
                    return;
                }
                GameEvent::CameraShake { intensity }
            }
            GameEvent::BloodSpray { .. } if !self.blood => return,
            other => other,
        };

        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
            if self.dropped.is_power_of_two() {
                log::warn!("Event queue full, {} events dropped so far", self.dropped);
            }
        }
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Total events lost to overflow since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
