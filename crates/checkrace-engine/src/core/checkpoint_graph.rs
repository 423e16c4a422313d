use std::ops::Index;

use serde::Serialize;

use crate::TrackError;

use super::{Checkpoint, CheckpointPlacement};

/// The finalized, ordered checkpoint sequence of a track.
///
/// Built once per track load and shared read-only by every evaluation.
///
/// # Reward normalization
///
/// Each checkpoint's reward share is the gap between its fraction of the
/// track length and the reward already granted by earlier checkpoints:
///
/// ```text
/// reward_share[i]       = accumulated_distance[i] / track_length - accumulated_reward[i-1]
/// accumulated_reward[i] = accumulated_reward[i-1] + reward_share[i]
/// ```
///
/// The sum telescopes, so `accumulated_reward` follows
/// `accumulated_distance / track_length` and the last checkpoint ends at 1.0
/// up to floating-point error.
///
/// # Example
///
/// ```
/// use checkrace_engine::{CheckpointGraph, CheckpointPlacement, Point2};
///
/// let graph = CheckpointGraph::build(&[
///     CheckpointPlacement::new(Point2::new(0.0, 0.0), 1.0),
///     CheckpointPlacement::new(Point2::new(3.0, 4.0), 1.0),
/// ])
/// .unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert!((graph.track_length() - 5.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CheckpointGraph {
    checkpoints: Vec<Checkpoint>,
    track_length: f32,
}

impl CheckpointGraph {
    /// Minimum number of placements: a start and at least one goal.
    pub const MIN_CHECKPOINTS: usize = 2;

    /// Builds the graph and precomputes distances and reward shares.
    ///
    /// Capture radii must be finite and non-negative.
    pub fn build(placements: &[CheckpointPlacement]) -> Result<Self, TrackError> {
        if placements.len() < Self::MIN_CHECKPOINTS {
            return Err(TrackError::InvalidTrack {
                checkpoints: placements.len(),
            });
        }

        if let Some((index, placement)) = placements
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.capture_radius.is_finite() && p.capture_radius >= 0.0))
        {
            return Err(TrackError::InvalidRadius {
                index,
                radius: placement.capture_radius,
            });
        }

        let mut checkpoints = placements
            .iter()
            .copied()
            .map(Checkpoint::from_placement)
            .collect::<Vec<_>>();

        for i in 1..checkpoints.len() {
            let previous = checkpoints[i - 1];
            let current = &mut checkpoints[i];
            current.distance_to_previous = current.position.distance(previous.position);
            current.accumulated_distance =
                previous.accumulated_distance + current.distance_to_previous;
        }

        let track_length = checkpoints[checkpoints.len() - 1].accumulated_distance;
        if !(track_length.is_finite() && track_length > 0.0) {
            return Err(TrackError::DegenerateTrack {
                length: track_length,
            });
        }

        for i in 1..checkpoints.len() {
            let granted = checkpoints[i - 1].accumulated_reward;
            let current = &mut checkpoints[i];
            // rounding can leave the granted total a hair above the current fraction
            current.reward_share = (current.accumulated_distance / track_length - granted).max(0.0);
            current.accumulated_reward = granted + current.reward_share;
        }

        tracing::info!(
            checkpoints = checkpoints.len(),
            track_length,
            respawn_points = checkpoints.iter().filter(|c| c.respawn_here).count(),
            "built checkpoint graph",
        );

        Ok(Self {
            checkpoints,
            track_length,
        })
    }

    /// Total path length: the last checkpoint's accumulated distance.
    #[must_use]
    pub const fn track_length(&self) -> f32 {
        self.track_length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Always `false`: a built graph holds at least [`Self::MIN_CHECKPOINTS`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    #[must_use]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Accumulated reward of the checkpoint before `cursor`.
    ///
    /// A cursor of 0 has no predecessor and counts as the start (0).
    #[must_use]
    pub fn reward_before(&self, cursor: usize) -> f32 {
        cursor
            .checked_sub(1)
            .and_then(|i| self.checkpoints.get(i))
            .map_or(0.0, |c| c.accumulated_reward)
    }
}

impl Index<usize> for CheckpointGraph {
    type Output = Checkpoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.checkpoints[index]
    }
}
