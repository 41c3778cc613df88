//! Run state shared by every combat operation
//!
//! One instance per game session. The frame driver is its only writer; the
//! HUD polls it once per frame.

use serde::Serialize;

use crate::clamp_heat;
use crate::consts::MAX_WANTED_LEVEL;
use crate::tuning::RunTuning;

/// Wanted tier for a cumulative police kill count.
///
/// Pure step function: tier `n` is reached once `police_kills` meets the
/// `n`-th threshold.
pub fn wanted_level_for(police_kills: u32, thresholds: &[u32; 2]) -> u8 {
    let level = thresholds.iter().filter(|&&t| police_kills >= t).count() as u8;
    level.min(MAX_WANTED_LEVEL)
}

/// What a single registered kill changed beyond the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillEffects {
    /// New wanted tier, if this kill raised it
    pub wanted_raised: Option<u8>,
    /// This kill pushed the combo into rampage mode
    pub rampage_started: bool,
}

/// Score, combo, heat and wanted state of the current run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunState {
    /// Total kills (civilians + police, including police cars)
    pub kills: u32,
    /// Police kills only
    pub police_kills: u32,
    pub score: u64,
    /// Current kill streak
    pub combo: u32,
    /// Seconds left before the combo expires
    pub combo_timer: f32,
    /// Aggression meter, always within [0, 100]
    heat: f32,
    /// 0..=2, only ever raised by kills
    pub wanted_level: u8,
    /// Police are actively chasing the player
    pub pursuit: bool,
    /// Combo is at or past the threshold; kill caps are lifted
    pub rampage: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn heat(&self) -> f32 {
        self.heat
    }

    pub fn set_heat(&mut self, heat: f32) {
        self.heat = clamp_heat(heat);
    }

    /// Add heat and re-clamp. Returns the change actually applied.
    pub fn add_heat(&mut self, delta: f32) -> f32 {
        let before = self.heat;
        self.heat = clamp_heat(self.heat + delta);
        self.heat - before
    }

    /// Kill caps are lifted once the combo reaches the threshold
    #[inline]
    pub fn combo_uncapped(&self, tuning: &RunTuning) -> bool {
        self.combo >= tuning.combo_threshold
    }

    /// Count one kill: bump counters, refresh the combo, raise wanted tier.
    pub fn register_kill(&mut self, tuning: &RunTuning, police: bool) -> KillEffects {
        self.kills += 1;
        let mut effects = KillEffects::default();

        if police {
            self.police_kills += 1;
            let level = wanted_level_for(self.police_kills, &tuning.wanted_thresholds);
            if level > self.wanted_level {
                self.wanted_level = level;
                effects.wanted_raised = Some(level);
                log::info!("Wanted level raised to {level}");
            }
        }

        effects.rampage_started = self.bump_combo(tuning);
        effects
    }

    /// Extend the combo without counting a kill (e.g. structure destruction).
    /// Returns true when rampage mode starts.
    pub fn bump_combo(&mut self, tuning: &RunTuning) -> bool {
        self.combo += 1;
        self.combo_timer = tuning.combo_window;
        if !self.rampage && self.combo >= tuning.combo_threshold {
            self.rampage = true;
            log::info!("Rampage! combo {}", self.combo);
            return true;
        }
        false
    }

    /// Count down the combo window; an expired window zeroes the combo.
    pub fn tick_combo(&mut self, dt: f32) {
        if self.combo == 0 {
            return;
        }
        self.combo_timer -= dt;
        if self.combo_timer <= 0.0 {
            log::debug!("Combo of {} expired", self.combo);
            self.combo = 0;
            self.combo_timer = 0.0;
            self.rampage = false;
        }
    }

    /// Cool heat down while no combo is running
    pub fn decay_heat(&mut self, rate_per_sec: f32, dt: f32) {
        if self.combo == 0 && self.heat > 0.0 {
            self.add_heat(-rate_per_sec * dt);
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}
