//! Immutable track data.
//!
//! - [`Point2`] / [`Transform`] - planar geometry shared with agents
//! - [`CheckpointPlacement`] - a checkpoint as authored in a track file
//! - [`Checkpoint`] - a placement plus its precomputed distance and reward fields
//! - [`CheckpointGraph`] - the finalized, ordered checkpoint sequence

pub use self::{checkpoint::*, checkpoint_graph::*, geometry::*};

mod checkpoint;
mod checkpoint_graph;
mod geometry;
