//! Track-progress and ranking engine for checkpoint races.
//!
//! The crate is split the same way a race is run:
//!
//! - [`core`] - immutable track data: points, transforms, checkpoints and the
//!   precomputed [`CheckpointGraph`]
//! - [`engine`] - per-tick state: the [`Roster`] of agents and their cursors, the
//!   progress evaluation, the [`RankTracker`] and the [`Race`] context tying them
//!   together
//!
//! # Example
//!
//! ```
//! use checkrace_engine::{CheckpointGraph, CheckpointPlacement, Point2, progress};
//!
//! let graph = CheckpointGraph::build(&[
//!     CheckpointPlacement::new(Point2::new(0.0, 0.0), 1.0),
//!     CheckpointPlacement::new(Point2::new(10.0, 0.0), 1.0),
//!     CheckpointPlacement::new(Point2::new(20.0, 0.0), 1.0),
//! ])
//! .unwrap();
//!
//! let evaluation = progress::evaluate(&graph, Point2::new(10.0, 0.0), 0.0, 1);
//! assert_eq!(evaluation.cursor, 2);
//! assert!((evaluation.score - 0.5).abs() < 1e-6);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Errors raised while building a [`CheckpointGraph`] from raw placements.
#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum TrackError {
    #[display("track needs at least 2 checkpoints, got {checkpoints}")]
    InvalidTrack { checkpoints: usize },
    #[display("track has no usable length (total distance {length})")]
    DegenerateTrack { length: f32 },
    #[display("checkpoint {index} has an unusable capture radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },
}

/// Errors raised by roster configuration calls.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum RosterError {
    #[display("roster size may not be negative, got {requested}")]
    InvalidArgument { requested: isize },
}
