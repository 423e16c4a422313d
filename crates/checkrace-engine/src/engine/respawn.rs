use serde::{Deserialize, Serialize};

use crate::{Point2, Transform};

/// Track-wide respawn point.
///
/// Moved forward whenever an agent captures a checkpoint flagged
/// `respawn_here`; read when agents are spawned or restarted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnState {
    pub spawn_position: Point2,
    pub spawn_rotation: f32,
    /// Cursor given to agents (re)starting at this point.
    pub spawn_checkpoint_index: usize,
}

impl Default for RespawnState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl RespawnState {
    /// Start of the track: checkpoint 0 is implicitly passed.
    pub const INITIAL: Self = Self {
        spawn_position: Point2::ORIGIN,
        spawn_rotation: 0.0,
        spawn_checkpoint_index: 1,
    };

    #[must_use]
    pub const fn new(spawn: Transform, spawn_checkpoint_index: usize) -> Self {
        Self {
            spawn_position: spawn.position,
            spawn_rotation: spawn.rotation,
            spawn_checkpoint_index,
        }
    }

    /// The spawn transform, or `None` while it is still the default origin.
    #[must_use]
    pub fn spawn_transform(&self) -> Option<Transform> {
        (!self.spawn_position.is_origin())
            .then_some(Transform::new(self.spawn_position, self.spawn_rotation))
    }
}
