use serde::{Deserialize, Serialize};

use crate::{CheckpointGraph, CheckpointPlacement, RosterError, TrackError, Transform};

use super::{
    Agent, AgentFactory, AgentId, Podium, RaceEntry, RankMarker, RankObserver, RankSlot,
    RankTracker, RespawnState, Roster, progress,
};

/// Engine options that are not part of the track itself.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Flag the first roster entry as the agent driven by outside input.
    pub manual_control: bool,
}

/// What an external mirror needs to follow the current leader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaderSnapshot {
    pub agent: AgentId,
    pub transform: Transform,
    pub score: f32,
}

/// One line of the current standings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standing {
    pub agent: AgentId,
    pub score: f32,
    pub cursor: usize,
    pub marker: RankMarker,
}

/// A race on one track: the context object owning every piece of race state.
///
/// `Race` is constructed explicitly and passed around by the host; several
/// races can run side by side. All mutation goes through `&mut self`, so a
/// track reload can never overlap a tick. A multi-threaded host wraps the
/// race in a mutex.
///
/// # Example
///
/// ```
/// use checkrace_engine::{
///     Agent, AgentFactory, AgentId, CheckpointPlacement, Point2, Race, RaceConfig, RankMarker,
///     Transform,
/// };
///
/// struct Car(Transform);
///
/// impl Agent for Car {
///     fn position(&self) -> Point2 { self.0.position }
///     fn rotation(&self) -> f32 { self.0.rotation }
///     fn is_enabled(&self) -> bool { true }
///     fn on_checkpoint_captured(&mut self) {}
///     fn set_rank_marker(&mut self, _marker: RankMarker) {}
///     fn set_spawn(&mut self, spawn: Transform) { self.0 = spawn; }
///     fn restart(&mut self) {}
///     fn set_primary_control(&mut self, _primary: bool) {}
/// }
///
/// struct Garage;
///
/// impl AgentFactory for Garage {
///     type Agent = Car;
///     fn spawn(&mut self, _id: AgentId, spawn: Option<Transform>) -> Car {
///         Car(spawn.unwrap_or_default())
///     }
///     fn despawn(&mut self, _car: Car) {}
/// }
///
/// let track = [
///     CheckpointPlacement::new(Point2::new(0.0, 0.0), 1.0),
///     CheckpointPlacement::new(Point2::new(10.0, 0.0), 1.0),
///     CheckpointPlacement::new(Point2::new(20.0, 0.0), 1.0),
/// ];
/// let mut race = Race::from_placements(RaceConfig::default(), &track, Garage, Vec::new()).unwrap();
/// race.set_size(2).unwrap();
/// race.get_mut(1).unwrap().0.position = Point2::new(10.0, 0.0);
/// race.tick();
///
/// assert_eq!(race.best().unwrap().agent, AgentId(1));
/// assert!((race.leader_score() - 0.5).abs() < 1e-6);
/// ```
pub struct Race<F>
where
    F: AgentFactory,
{
    config: RaceConfig,
    graph: CheckpointGraph,
    roster: Roster<F>,
    ranks: RankTracker,
    respawn: RespawnState,
    leader_score: f32,
    ticks: u64,
}

impl<F> Race<F>
where
    F: AgentFactory,
{
    /// Creates an empty race on `graph`.
    ///
    /// `observers` are told about every change of the best agent.
    #[must_use]
    pub fn new(
        config: RaceConfig,
        graph: CheckpointGraph,
        factory: F,
        observers: Vec<Box<dyn RankObserver>>,
    ) -> Self {
        Self {
            config,
            graph,
            roster: Roster::new(factory),
            ranks: RankTracker::new(observers),
            respawn: RespawnState::INITIAL,
            leader_score: 0.0,
            ticks: 0,
        }
    }

    pub fn from_placements(
        config: RaceConfig,
        placements: &[CheckpointPlacement],
        factory: F,
        observers: Vec<Box<dyn RankObserver>>,
    ) -> Result<Self, TrackError> {
        let graph = CheckpointGraph::build(placements)?;
        Ok(Self::new(config, graph, factory, observers))
    }

    #[must_use]
    pub const fn config(&self) -> &RaceConfig {
        &self.config
    }

    #[must_use]
    pub const fn graph(&self) -> &CheckpointGraph {
        &self.graph
    }

    #[must_use]
    pub const fn track_length(&self) -> f32 {
        self.graph.track_length()
    }

    #[must_use]
    pub const fn respawn(&self) -> &RespawnState {
        &self.respawn
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster<F> {
        &self.roster
    }

    /// The factory, for retuning how future agents are spawned.
    pub const fn factory_mut(&mut self) -> &mut F {
        self.roster.factory_mut()
    }

    /// Number of completed [`Race::tick`] calls.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Replaces the track, resets the respawn point and restarts every agent.
    ///
    /// On error the current track stays in place.
    pub fn load_track(&mut self, placements: &[CheckpointPlacement]) -> Result<(), TrackError> {
        self.graph = CheckpointGraph::build(placements)?;
        self.respawn = RespawnState::INITIAL;
        self.restart();
        Ok(())
    }

    /// Runs one evaluation and ranking pass over every enabled agent.
    pub fn tick(&mut self) {
        let before = self.ranks.podium();
        let mut leader_score = 0.0_f32;

        for entry in self.roster.entries_mut() {
            let agent = entry.agent();
            if !agent.is_enabled() {
                continue;
            }

            let evaluation =
                progress::evaluate(&self.graph, agent.position(), agent.rotation(), entry.cursor());
            for _ in 0..evaluation.captured {
                entry.agent_mut().on_checkpoint_captured();
            }
            if let Some(respawn) = evaluation.respawn {
                tracing::debug!(
                    agent = %entry.id(),
                    spawn_checkpoint_index = respawn.spawn_checkpoint_index,
                    "respawn point moved",
                );
                self.respawn = respawn;
            }

            entry.record(&evaluation);
            leader_score = leader_score.max(evaluation.score);
            self.ranks.observe(entry.id(), evaluation.score);
        }

        self.leader_score = leader_score;
        self.ticks += 1;
        self.apply_markers(before);
    }

    /// Grows or shrinks the roster to exactly `amount` agents.
    pub fn set_size(&mut self, amount: isize) -> Result<(), RosterError> {
        let before = self.ranks.podium();
        let despawned = self.roster.set_size(amount, &self.respawn)?;
        self.after_resize(before, &despawned);
        Ok(())
    }

    /// Removes every agent.
    pub fn stop(&mut self) {
        let before = self.ranks.podium();
        let despawned = self.roster.resize(0, &self.respawn);
        self.after_resize(before, &despawned);
    }

    fn after_resize(&mut self, before: Podium, despawned: &[AgentId]) {
        for id in despawned {
            self.ranks.forget(*id);
        }
        if self.config.manual_control {
            self.roster.flag_primary();
        }
        self.apply_markers(before);
        tracing::info!(
            agents = self.roster.len(),
            despawned = despawned.len(),
            "roster resized"
        );
    }

    /// Puts every agent back at the respawn point and clears the ranks.
    pub fn restart(&mut self) {
        let before = self.ranks.podium();
        self.roster.restart(&self.respawn);
        self.ranks.clear();
        self.leader_score = 0.0;
        self.apply_markers(before);
        tracing::info!(
            agents = self.roster.len(),
            spawn_checkpoint_index = self.respawn.spawn_checkpoint_index,
            "race restarted"
        );
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&F::Agent> {
        self.roster.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut F::Agent> {
        self.roster.get_mut(index)
    }

    /// Takes the agent at `index` out of the race and returns it.
    ///
    /// The agent is not handed to the factory; its rank marker is reset and a
    /// best agent leaving promotes the second best.
    pub fn remove(&mut self, index: usize) -> Option<F::Agent> {
        let before = self.ranks.podium();
        let entry = self.roster.remove(index)?;
        let id = entry.id();
        self.ranks.forget(id);
        self.apply_markers(before);

        let mut agent = entry.into_agent();
        if !before.marker_of(id).is_none() {
            agent.set_rank_marker(RankMarker::None);
        }
        tracing::debug!(agent = %id, "agent removed from race");
        Some(agent)
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut F::Agent> + '_ {
        self.roster.agents_mut()
    }

    #[must_use]
    pub fn entries(&self) -> &[RaceEntry<F::Agent>] {
        self.roster.entries()
    }

    #[must_use]
    pub const fn best(&self) -> Option<RankSlot> {
        self.ranks.best()
    }

    #[must_use]
    pub const fn second_best(&self) -> Option<RankSlot> {
        self.ranks.second_best()
    }

    #[must_use]
    pub fn best_agent(&self) -> Option<&F::Agent> {
        let slot = self.ranks.best()?;
        self.roster.find(slot.agent).map(RaceEntry::agent)
    }

    #[must_use]
    pub fn second_best_agent(&self) -> Option<&F::Agent> {
        let slot = self.ranks.second_best()?;
        self.roster.find(slot.agent).map(RaceEntry::agent)
    }

    /// Highest score among the agents evaluated by the latest tick.
    #[must_use]
    pub const fn leader_score(&self) -> f32 {
        self.leader_score
    }

    /// Transform and score of the best agent, for mirroring it elsewhere.
    #[must_use]
    pub fn leader(&self) -> Option<LeaderSnapshot> {
        let slot = self.ranks.best()?;
        let entry = self.roster.find(slot.agent)?;
        Some(LeaderSnapshot {
            agent: slot.agent,
            transform: entry.agent().transform(),
            score: entry.score(),
        })
    }

    /// Every agent ordered by latest score, highest first.
    ///
    /// Equal scores keep roster order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let podium = self.ranks.podium();
        let mut standings = self
            .roster
            .entries()
            .iter()
            .map(|entry| Standing {
                agent: entry.id(),
                score: entry.score(),
                cursor: entry.cursor(),
                marker: podium.marker_of(entry.id()),
            })
            .collect::<Vec<_>>();
        standings.sort_by(|a, b| b.score.total_cmp(&a.score));
        standings
    }

    fn apply_markers(&mut self, before: Podium) {
        let after = self.ranks.podium();
        for (agent, marker) in before.transitions(&after) {
            if let Some(entry) = self.roster.find_mut(agent) {
                entry.agent_mut().set_rank_marker(marker);
            }
        }
    }
}
