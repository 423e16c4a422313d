//! Per-tick race state and the logic that advances it.
//!
//! - [`Agent`] / [`AgentFactory`] - the capability set the engine needs from the
//!   externally owned cars, and the spawner that creates and destroys them
//! - [`progress`] - completion-score evaluation with checkpoint capture
//! - [`Roster`] - active agents with their checkpoint cursors
//! - [`RankTracker`] - best / second-best bookkeeping and rank-change events
//! - [`RespawnState`] - the track-wide respawn point
//! - [`Race`] - the context object owning all of the above
//!
//! # Tick Flow
//!
//! 1. The host moves its agents (physics is not part of this crate)
//! 2. [`Race::tick`] evaluates every enabled agent in roster order:
//!    score and cursor update, capture callbacks, respawn point update
//! 3. Each new score is offered to the [`RankTracker`]; observers hear about a
//!    new leader synchronously
//! 4. Rank markers are pushed to the agents whose rank changed during the pass

pub use self::{agent::*, race::*, rank::*, respawn::*, roster::*};

mod agent;
pub mod progress;
mod race;
mod rank;
mod respawn;
mod roster;
