//! Rampage headless driver
//!
//! Runs a scripted rampage through a synthetic crowd for a fixed number of
//! frames and prints the run summary. Useful for balance passes:
//!
//! ```text
//! RUST_LOG=debug rampage-sim [tuning.json] [seed]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is embedded by the web build; there is no wasm driver
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use rampage::consts::FRAME_DT;
    use rampage::sim::{
        Crowd, CrowdKind, GameEvent, Mobility, PursuitManager, Session, Targets, TickInput, tick,
    };
    use rampage::{Settings, Tuning, TuningError, heading_to_dir};

    /// Simulated seconds
    const RUN_SECONDS: f32 = 90.0;
    /// Seconds spent in each mobility tier before upgrading
    const TIER_SECONDS: f32 = 20.0;
    const CIVILIANS: usize = 300;
    const FOOT_POLICE: usize = 40;
    const WORLD_RADIUS: f32 = 120.0;

    #[derive(Debug, Default)]
    struct Tally {
        notifications: u32,
        shakes: u32,
        sprays: u32,
        cars_spawned: u32,
        cars_destroyed: u32,
        cars_despawned: u32,
        peak_heat: f32,
    }

    fn load_tuning(path: Option<&str>) -> Result<Tuning, TuningError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| TuningError::Invalid {
            field: "path",
            reason: format!("{path}: {e}"),
        })?;
        Tuning::from_json(&json)
    }

    fn populate(crowd: &mut Crowd, count: usize, rng: &mut Pcg32) {
        for _ in 0..count {
            let r = WORLD_RADIUS * rng.random::<f32>().sqrt();
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            crowd.spawn(heading_to_dir(theta) * r);
        }
    }

    fn mobility_at(t: f32) -> Mobility {
        match (t / TIER_SECONDS) as u32 {
            0 => Mobility::OnFoot,
            1 => Mobility::Bicycle,
            2 => Mobility::Motorbike,
            _ => Mobility::Car,
        }
    }

    fn speed_for(mobility: Mobility) -> f32 {
        match mobility {
            Mobility::OnFoot => 4.0,
            Mobility::Bicycle => 8.0,
            Mobility::Motorbike => 18.0,
            Mobility::Car => 25.0,
        }
    }

    pub fn run() -> Result<(), TuningError> {
        let args: Vec<String> = std::env::args().collect();
        let tuning = load_tuning(args.get(1).map(String::as_str))?;
        let seed = args
            .get(2)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0x5eed);
        log::info!("Rampage sim starting (seed {seed})");

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut civilians = Crowd::new(CrowdKind::Civilian);
        let mut police = Crowd::new(CrowdKind::Police);
        populate(&mut civilians, CIVILIANS, &mut rng);
        populate(&mut police, FOOT_POLICE, &mut rng);

        let mut pursuit = PursuitManager::new(tuning.pursuit.clone(), seed.wrapping_add(1));
        let mut session = Session::new(tuning, &Settings::default(), seed);
        let mut tally = Tally::default();

        let frames = (RUN_SECONDS / FRAME_DT) as u32;
        let mut heading = 0.0_f32;
        let mut position = Vec2::ZERO;
        let mut input = TickInput::default();

        for frame in 0..frames {
            let t = frame as f32 * FRAME_DT;
            let mobility = mobility_at(t);
            if mobility != input.mobility {
                log::info!("t={t:.0}s upgrading to {mobility:?}");
            }

            // Wander in a slow spiral so the crowd keeps coming into range
            heading += (0.4 + 0.3 * (t * 0.2).sin()) * FRAME_DT;
            let forward = heading_to_dir(heading);
            let velocity = forward * speed_for(mobility);
            position += velocity * FRAME_DT;
            if position.length() > WORLD_RADIUS {
                position = position.normalize() * WORLD_RADIUS;
                heading += std::f32::consts::PI;
            }

            input.action = true;
            input.mobility = mobility;
            input.position = position;
            input.velocity = velocity;
            input.forward = forward;
            input.destroyed_structures.clear();
            if frame % 600 == 599 {
                input.destroyed_structures.push(position + forward * 3.0);
            }

            {
                let mut targets = Targets {
                    civilians: Some(&mut civilians),
                    police: Some(&mut police),
                    pursuit: Some(&mut pursuit),
                };
                tick(&mut session, &input, &mut targets, FRAME_DT);
            }
            civilians.update(FRAME_DT);
            police.update(FRAME_DT);

            for event in session.events.drain() {
                match event {
                    GameEvent::Kill(n) => {
                        tally.notifications += 1;
                        log::debug!("{} (+{}{})", n.message, n.points, if n.pursuit { ", pursuit" } else { "" });
                    }
                    GameEvent::CameraShake { .. } => tally.shakes += 1,
                    GameEvent::BloodSpray { .. } => tally.sprays += 1,
                    GameEvent::PoliceCarSpawned { .. } => tally.cars_spawned += 1,
                    GameEvent::PoliceCarDestroyed { id, .. } => {
                        tally.cars_destroyed += 1;
                        // No exit animation here, the wreck is gone at once
                        pursuit.mark_hidden(id);
                    }
                    GameEvent::PoliceCarDespawned { .. } => tally.cars_despawned += 1,
                    GameEvent::RampageStarted => log::info!("t={t:.1}s RAMPAGE"),
                    GameEvent::WantedLevelRaised { level } => {
                        log::info!("t={t:.1}s wanted level {level}")
                    }
                    GameEvent::StructureDestroyed { .. } | GameEvent::EscapedCapture => {}
                }
            }
            tally.peak_heat = tally.peak_heat.max(session.state.heat());
        }

        let state = &session.state;
        println!("Rampage summary ({RUN_SECONDS:.0}s, seed {seed})");
        println!("  score          {}", state.score);
        println!("  kills          {} ({} police)", state.kills, state.police_kills);
        println!("  wanted level   {}", state.wanted_level);
        println!("  heat           {:.1} (peak {:.1})", state.heat(), tally.peak_heat);
        println!("  notifications  {}", tally.notifications);
        println!("  camera shakes  {}", tally.shakes);
        println!("  blood sprays   {}", tally.sprays);
        println!(
            "  police cars    {} spawned, {} destroyed, {} lost, {} chasing",
            tally.cars_spawned,
            tally.cars_destroyed,
            tally.cars_despawned,
            pursuit.alive_count()
        );
        if session.events.dropped() > 0 {
            log::warn!("{} events dropped", session.events.dropped());
        }
        Ok(())
    }
}
