//! Kill popup message pools

use rand::Rng;

/// Which pool a kill draws its popup from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePool {
    Civilian,
    PanickedCivilian,
    Pursuit,
    Police,
    Roadkill,
    Structure,
}

const CIVILIAN: &[&str] = &[
    "WASTED!",
    "SPLAT!",
    "BYSTANDER DOWN",
    "WRONG PLACE, WRONG TIME",
    "NOTHING PERSONAL",
];

const PANICKED: &[&str] = &[
    "CAN'T OUTRUN ME!",
    "RUN FASTER!",
    "NO ESCAPE",
    "CAUGHT YOU!",
];

const PURSUIT: &[&str] = &[
    "SHOWING OFF FOR THE COPS",
    "CHASE KILL!",
    "WITNESS REMOVED",
    "STILL GOT IT",
];

const POLICE: &[&str] = &[
    "COP KILLER!",
    "OFFICER DOWN",
    "BADGE COLLECTED",
    "RESISTING ARREST",
];

const ROADKILL: &[&str] = &[
    "ROADKILL!",
    "HIT AND RUN",
    "SPEED BUMP",
    "CROSSWALK VIOLATION",
];

const STRUCTURE: &[&str] = &[
    "DEMOLISHED!",
    "PROPERTY DAMAGE",
    "RENOVATION COMPLETE",
];

impl MessagePool {
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            MessagePool::Civilian => CIVILIAN,
            MessagePool::PanickedCivilian => PANICKED,
            MessagePool::Pursuit => PURSUIT,
            MessagePool::Police => POLICE,
            MessagePool::Roadkill => ROADKILL,
            MessagePool::Structure => STRUCTURE,
        }
    }

    /// Draw one message uniformly at random
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        let pool = self.messages();
        pool[rng.random_range(0..pool.len())]
    }
}
