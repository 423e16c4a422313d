//! Headless kinematic driver for the checkrace engine.
//!
//! [`SimCar`] and [`SimCarFactory`] implement the engine's agent interfaces
//! with simple steer-toward-the-next-checkpoint cars, and [`Simulation`] runs
//! them through a [`Race`](checkrace_engine::Race) tick by tick while
//! recording the per-tick reward signal and every change of leader.
//!
//! # Example
//!
//! ```
//! use checkrace_engine::{CheckpointPlacement, Point2, RaceConfig};
//! use checkrace_sim::{DriveParams, SimSeed, Simulation};
//!
//! let track = [
//!     CheckpointPlacement::new(Point2::new(5.0, 0.0), 2.0),
//!     CheckpointPlacement::new(Point2::new(25.0, 0.0), 2.0),
//!     CheckpointPlacement::new(Point2::new(45.0, 0.0), 2.0),
//! ];
//! let mut sim = Simulation::new(
//!     RaceConfig::default(),
//!     &track,
//!     DriveParams::default(),
//!     SimSeed::from(7),
//! )
//! .unwrap();
//! sim.set_cars(2).unwrap();
//! sim.run(100, None);
//!
//! assert!(sim.race().leader_score() > 0.0);
//! ```

pub use self::{car::*, factory::*, seed::*, simulation::*};

mod car;
mod factory;
mod seed;
mod simulation;
pub mod track;

/// Errors raised while setting up or resizing a simulation.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SimError {
    #[display("invalid track: {source}")]
    Track {
        source: checkrace_engine::TrackError,
    },
    #[display("invalid roster size: {source}")]
    Roster {
        source: checkrace_engine::RosterError,
    },
    #[display("heading noise must be a finite, non-negative deviation, got {heading_noise}")]
    InvalidNoise { heading_noise: f32 },
    #[display("a loop needs at least 3 checkpoints, got {requested}")]
    TooFewCheckpoints { requested: usize },
}
