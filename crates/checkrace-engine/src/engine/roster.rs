use crate::{RosterError, progress::Evaluation};

use super::{Agent, AgentFactory, AgentId, RespawnState};

/// One active agent and the engine's bookkeeping for it.
#[derive(Debug, Clone)]
pub struct RaceEntry<A> {
    id: AgentId,
    agent: A,
    cursor: usize,
    score: f32,
}

impl<A> RaceEntry<A> {
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub const fn agent(&self) -> &A {
        &self.agent
    }

    pub const fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    /// Index of the next checkpoint this agent must reach.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Score from the latest evaluation of this agent.
    #[must_use]
    pub const fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn into_agent(self) -> A {
        self.agent
    }

    pub(crate) const fn record(&mut self, evaluation: &Evaluation) {
        self.cursor = evaluation.cursor;
        self.score = evaluation.score;
    }
}

/// The active agents of a race, in spawn order.
///
/// Growing the roster spawns agents through the [`AgentFactory`]; shrinking
/// it removes the most recently added entries first and hands them back to
/// the factory. Retained entries keep their cursor across resizes.
pub struct Roster<F>
where
    F: AgentFactory,
{
    factory: F,
    entries: Vec<RaceEntry<F::Agent>>,
    next_id: u64,
}

impl<F> Roster<F>
where
    F: AgentFactory,
{
    #[must_use]
    pub const fn new(factory: F) -> Self {
        Self {
            factory,
            entries: Vec::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub const fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Grows or shrinks the roster to exactly `amount` entries.
    ///
    /// New agents start at `respawn`. Returns the ids of the agents that were
    /// despawned, most recently added first.
    pub fn set_size(
        &mut self,
        amount: isize,
        respawn: &RespawnState,
    ) -> Result<Vec<AgentId>, RosterError> {
        let amount = usize::try_from(amount)
            .map_err(|_| RosterError::InvalidArgument { requested: amount })?;
        Ok(self.resize(amount, respawn))
    }

    /// Infallible form of [`Roster::set_size`].
    pub fn resize(&mut self, amount: usize, respawn: &RespawnState) -> Vec<AgentId> {
        let mut despawned = Vec::new();
        while self.entries.len() > amount {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            despawned.push(entry.id);
            self.factory.despawn(entry.agent);
        }

        let spawn = respawn.spawn_transform();
        while self.entries.len() < amount {
            let id = AgentId(self.next_id);
            self.next_id += 1;
            let agent = self.factory.spawn(id, spawn);
            self.entries.push(RaceEntry {
                id,
                agent,
                cursor: respawn.spawn_checkpoint_index,
                score: 0.0,
            });
        }

        despawned
    }

    /// Flags the first entry as driven by outside input.
    pub fn flag_primary(&mut self) {
        if let Some(first) = self.entries.first_mut() {
            first.agent.set_primary_control(true);
        }
    }

    /// Sends every agent back to the respawn point and resets its cursor.
    pub fn restart(&mut self, respawn: &RespawnState) {
        let spawn = respawn.spawn_transform();
        for entry in &mut self.entries {
            if let Some(spawn) = spawn {
                entry.agent.set_spawn(spawn);
            }
            entry.agent.restart();
            entry.cursor = respawn.spawn_checkpoint_index;
            entry.score = 0.0;
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&F::Agent> {
        self.entries.get(index).map(RaceEntry::agent)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut F::Agent> {
        self.entries.get_mut(index).map(RaceEntry::agent_mut)
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&RaceEntry<F::Agent>> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn find(&self, id: AgentId) -> Option<&RaceEntry<F::Agent>> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, id: AgentId) -> Option<&mut RaceEntry<F::Agent>> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Takes the entry at `index` out of the roster.
    ///
    /// The factory is not involved: the caller receives the agent handle.
    pub fn remove(&mut self, index: usize) -> Option<RaceEntry<F::Agent>> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    #[must_use]
    pub fn entries(&self) -> &[RaceEntry<F::Agent>] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [RaceEntry<F::Agent>] {
        &mut self.entries
    }

    pub fn agents(&self) -> impl Iterator<Item = &F::Agent> + '_ {
        self.entries.iter().map(RaceEntry::agent)
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut F::Agent> + '_ {
        self.entries.iter_mut().map(RaceEntry::agent_mut)
    }
}
