use serde::{Deserialize, Serialize};

use super::Point2;

/// A checkpoint exactly as authored for a track.
///
/// Placement order is significant: the track runs from the first placement
/// to the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointPlacement {
    pub position: Point2,
    pub capture_radius: f32,
    /// Capturing this checkpoint moves the track's respawn point here.
    #[serde(default)]
    pub respawn_here: bool,
}

impl CheckpointPlacement {
    #[must_use]
    pub const fn new(position: Point2, capture_radius: f32) -> Self {
        Self {
            position,
            capture_radius,
            respawn_here: false,
        }
    }

    #[must_use]
    pub const fn with_respawn(mut self) -> Self {
        self.respawn_here = true;
        self
    }
}

/// A finalized checkpoint with its precomputed distance and reward fields.
///
/// Checkpoints are only created by [`CheckpointGraph::build`](super::CheckpointGraph::build)
/// and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Checkpoint {
    pub(crate) position: Point2,
    pub(crate) capture_radius: f32,
    pub(crate) respawn_here: bool,
    pub(crate) distance_to_previous: f32,
    pub(crate) accumulated_distance: f32,
    pub(crate) reward_share: f32,
    pub(crate) accumulated_reward: f32,
}

impl Checkpoint {
    pub(crate) const fn from_placement(placement: CheckpointPlacement) -> Self {
        Self {
            position: placement.position,
            capture_radius: placement.capture_radius,
            respawn_here: placement.respawn_here,
            distance_to_previous: 0.0,
            accumulated_distance: 0.0,
            reward_share: 0.0,
            accumulated_reward: 0.0,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Point2 {
        self.position
    }

    #[must_use]
    pub const fn capture_radius(&self) -> f32 {
        self.capture_radius
    }

    #[must_use]
    pub const fn respawn_here(&self) -> bool {
        self.respawn_here
    }

    /// Length of the segment ending at this checkpoint (0 for the start).
    #[must_use]
    pub const fn distance_to_previous(&self) -> f32 {
        self.distance_to_previous
    }

    /// Path length from the start through this checkpoint.
    #[must_use]
    pub const fn accumulated_distance(&self) -> f32 {
        self.accumulated_distance
    }

    /// This checkpoint's share of the total reward.
    #[must_use]
    pub const fn reward_share(&self) -> f32 {
        self.reward_share
    }

    /// Total reward granted once this checkpoint is captured.
    #[must_use]
    pub const fn accumulated_reward(&self) -> f32 {
        self.accumulated_reward
    }

    #[must_use]
    pub fn is_captured_from(&self, position: Point2) -> bool {
        self.position.distance(position) <= self.capture_radius
    }

    /// Part of this checkpoint's reward share earned while still `distance` away.
    ///
    /// Linear in the remaining distance relative to the segment length: the
    /// full share at distance 0, nothing at or beyond one segment length.
    /// A zero-length segment grants nothing until captured.
    #[must_use]
    pub fn partial_reward(&self, distance: f32) -> f32 {
        if self.distance_to_previous <= 0.0 {
            return 0.0;
        }
        let fraction = (1.0 - distance / self.distance_to_previous).clamp(0.0, 1.0);
        self.reward_share * fraction
    }
}
