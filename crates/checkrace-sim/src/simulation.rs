use std::{
    collections::BTreeMap,
    sync::{Arc, mpsc},
};

use checkrace_engine::{
    AgentId, CheckpointGraph, CheckpointPlacement, Race, RaceConfig, RankChange, RankObserver,
};
use serde::Serialize;

use crate::{DriveParams, SimCar, SimCarFactory, SimError, SimSeed};

/// Seconds of simulated time per tick.
pub const DEFAULT_TIME_STEP: f32 = 0.1;

/// A change of leader together with the tick it happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankEvent {
    pub tick: u64,
    pub previous: Option<AgentId>,
    pub current: Option<AgentId>,
}

/// Reward earned by one car during one tick: the change in its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepReward {
    pub agent: AgentId,
    pub reward: f32,
}

/// Runs [`SimCar`]s through a [`Race`].
///
/// Each [`Simulation::step`] moves every car by one time step and then runs
/// one race tick. The difference between a car's score before and after the
/// tick is its reward for that step; rewards are summed per car over the
/// whole run. Leader changes arrive through an `mpsc` observer and are kept
/// as a log.
pub struct Simulation {
    race: Race<SimCarFactory>,
    rank_changes: mpsc::Receiver<RankChange>,
    rank_log: Vec<RankEvent>,
    total_rewards: BTreeMap<AgentId, f32>,
    time_step: f32,
}

impl Simulation {
    pub fn new(
        config: RaceConfig,
        placements: &[CheckpointPlacement],
        params: DriveParams,
        seed: SimSeed,
    ) -> Result<Self, SimError> {
        let graph =
            CheckpointGraph::build(placements).map_err(|source| SimError::Track { source })?;
        let factory = SimCarFactory::new(&graph, params, seed)?;
        let (tx, rx) = mpsc::channel();
        let observers: Vec<Box<dyn RankObserver>> = vec![Box::new(tx)];

        tracing::info!(
            checkpoints = graph.len(),
            track_length = graph.track_length(),
            "simulation created"
        );
        Ok(Self {
            race: Race::new(config, graph, factory, observers),
            rank_changes: rx,
            rank_log: Vec::new(),
            total_rewards: BTreeMap::new(),
            time_step: DEFAULT_TIME_STEP,
        })
    }

    #[must_use]
    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    #[must_use]
    pub const fn race(&self) -> &Race<SimCarFactory> {
        &self.race
    }

    /// Moves the race and every car onto another track and restarts it.
    ///
    /// On error the current track stays in place.
    pub fn load_track(&mut self, placements: &[CheckpointPlacement]) -> Result<(), SimError> {
        let graph =
            CheckpointGraph::build(placements).map_err(|source| SimError::Track { source })?;
        let factory = self.race.factory_mut();
        factory.set_track(&graph);
        let waypoints = Arc::clone(factory.waypoints());
        let start = factory.start_transform();
        for car in self.race.agents_mut() {
            car.retarget(Arc::clone(&waypoints), start);
        }
        self.race
            .load_track(placements)
            .map_err(|source| SimError::Track { source })?;
        self.drain_rank_changes();

        tracing::info!(
            checkpoints = graph.len(),
            track_length = graph.track_length(),
            "track loaded"
        );
        Ok(())
    }

    /// Leader changes so far, oldest first.
    #[must_use]
    pub fn rank_log(&self) -> &[RankEvent] {
        &self.rank_log
    }

    /// Reward accumulated by every car that has been in the race.
    #[must_use]
    pub const fn total_rewards(&self) -> &BTreeMap<AgentId, f32> {
        &self.total_rewards
    }

    /// Number of cars that have captured the final checkpoint.
    #[must_use]
    pub fn finished_cars(&self) -> usize {
        self.race
            .entries()
            .iter()
            .filter(|entry| entry.agent().is_finished())
            .count()
    }

    pub fn set_cars(&mut self, amount: isize) -> Result<(), SimError> {
        self.race
            .set_size(amount)
            .map_err(|source| SimError::Roster { source })?;
        for entry in self.race.entries() {
            self.total_rewards.entry(entry.id()).or_insert(0.0);
        }
        self.drain_rank_changes();
        Ok(())
    }

    /// Feeds outside input to the car flagged as primary, if any.
    pub fn steer_primary(&mut self, heading: f32) {
        for car in self.race.agents_mut() {
            if car.is_primary() {
                car.steer(heading);
            }
        }
    }

    /// Moves every car one time step and runs one race tick.
    pub fn step(&mut self) -> Vec<StepReward> {
        let before = self
            .race
            .entries()
            .iter()
            .map(|entry| entry.score())
            .collect::<Vec<_>>();

        let time_step = self.time_step;
        for car in self.race.agents_mut() {
            car.step(time_step);
        }
        self.race.tick();

        let rewards = self
            .race
            .entries()
            .iter()
            .zip(before)
            .map(|(entry, before)| StepReward {
                agent: entry.id(),
                reward: entry.score() - before,
            })
            .collect::<Vec<_>>();
        for reward in &rewards {
            *self.total_rewards.entry(reward.agent).or_insert(0.0) += reward.reward;
        }
        self.drain_rank_changes();
        rewards
    }

    /// Runs `ticks` steps, restarting the race every `restart_every` ticks.
    pub fn run(&mut self, ticks: u64, restart_every: Option<u64>) {
        for _ in 0..ticks {
            self.step();
            let tick = self.race.ticks();
            if restart_every.is_some_and(|every| every > 0 && tick % every == 0) {
                self.restart();
            }
        }
        tracing::info!(
            ticks = self.race.ticks(),
            finished = self.finished_cars(),
            leader_changes = self.rank_log.len(),
            "simulation finished"
        );
    }

    pub fn restart(&mut self) {
        self.race.restart();
        self.drain_rank_changes();
    }

    /// Cars in the race, in roster order.
    pub fn cars(&self) -> impl Iterator<Item = &SimCar> + '_ {
        self.race.entries().iter().map(|entry| entry.agent())
    }

    fn drain_rank_changes(&mut self) {
        let tick = self.race.ticks();
        self.rank_log
            .extend(self.rank_changes.try_iter().map(|change| RankEvent {
                tick,
                previous: change.previous,
                current: change.current,
            }));
    }
}
