use serde::{Deserialize, Serialize};

use crate::{Point2, Transform};

/// Stable identity the roster assigns to every spawned agent.
///
/// Ids are never reused within a roster, so a stale id held by an observer
/// can not alias a newer agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[display("agent#{_0}")]
pub struct AgentId(pub u64);

/// Presentation state an agent shows for its current rank.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum RankMarker {
    #[default]
    None,
    First,
    Second,
}

/// Capabilities the engine needs from an externally owned agent (car).
///
/// Implementations are handles: the engine stores whatever the
/// [`AgentFactory`] hands out and never creates or destroys the underlying
/// object itself.
pub trait Agent {
    fn position(&self) -> Point2;

    /// Heading in radians.
    fn rotation(&self) -> f32;

    /// Disabled agents are skipped by [`Race::tick`](crate::Race::tick).
    fn is_enabled(&self) -> bool;

    /// Called once for every checkpoint the agent captures.
    fn on_checkpoint_captured(&mut self);

    fn set_rank_marker(&mut self, marker: RankMarker);

    /// Moves the point the agent returns to on [`Agent::restart`].
    fn set_spawn(&mut self, spawn: Transform);

    fn restart(&mut self);

    /// Marks the agent as the one driven by outside input.
    fn set_primary_control(&mut self, primary: bool);

    #[must_use]
    fn transform(&self) -> Transform {
        Transform::new(self.position(), self.rotation())
    }
}

/// Creates and destroys agents on behalf of the roster.
pub trait AgentFactory {
    type Agent: Agent;

    /// Spawns a new agent.
    ///
    /// `spawn` is the current track respawn point, or `None` when no respawn
    /// checkpoint has been captured yet and the factory should use its own
    /// start position.
    fn spawn(&mut self, id: AgentId, spawn: Option<Transform>) -> Self::Agent;

    /// Destroys an agent the roster no longer needs.
    fn despawn(&mut self, agent: Self::Agent);
}
