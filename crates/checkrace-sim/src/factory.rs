use std::sync::Arc;

use checkrace_engine::{AgentFactory, AgentId, CheckpointGraph, Point2, Transform};
use rand::SeedableRng as _;
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::{DriveParams, SimCar, SimError, SimSeed};

/// Spawns [`SimCar`]s for a race on one track.
///
/// Cars without a respawn point start on checkpoint 0 facing checkpoint 1.
/// Each car gets its own generator drawn from the factory generator.
#[derive(Debug, Clone)]
pub struct SimCarFactory {
    waypoints: Arc<[Point2]>,
    params: DriveParams,
    noise: Normal<f32>,
    rng: Pcg32,
    retired: Vec<AgentId>,
}

impl SimCarFactory {
    pub fn new(
        graph: &CheckpointGraph,
        params: DriveParams,
        seed: SimSeed,
    ) -> Result<Self, SimError> {
        let noise = Normal::new(0.0, params.heading_noise).map_err(|_| SimError::InvalidNoise {
            heading_noise: params.heading_noise,
        })?;
        Ok(Self {
            waypoints: waypoints_of(graph),
            params,
            noise,
            rng: seed.rng(),
            retired: Vec::new(),
        })
    }

    /// Checkpoint 0, facing checkpoint 1.
    #[must_use]
    pub fn start_transform(&self) -> Transform {
        match &*self.waypoints {
            [first, second, ..] => Transform::new(*first, first.heading_to(*second)),
            [first] => Transform::new(*first, 0.0),
            [] => Transform::default(),
        }
    }

    /// Switches future spawns to the track of `graph`.
    pub fn set_track(&mut self, graph: &CheckpointGraph) {
        self.waypoints = waypoints_of(graph);
    }

    /// Checkpoint positions shared by every car spawned from now on.
    #[must_use]
    pub fn waypoints(&self) -> &Arc<[Point2]> {
        &self.waypoints
    }

    /// Ids of the cars handed back by the roster, in despawn order.
    #[must_use]
    pub fn retired(&self) -> &[AgentId] {
        &self.retired
    }
}

impl AgentFactory for SimCarFactory {
    type Agent = SimCar;

    fn spawn(&mut self, id: AgentId, spawn: Option<Transform>) -> SimCar {
        let spawn = spawn.unwrap_or_else(|| self.start_transform());
        let rng = Pcg32::from_rng(&mut self.rng);
        SimCar::new(id, Arc::clone(&self.waypoints), self.params, self.noise, rng, spawn)
    }

    fn despawn(&mut self, car: SimCar) {
        tracing::debug!(car = %car.id(), captures = car.captures(), "car despawned");
        self.retired.push(car.id());
    }
}

fn waypoints_of(graph: &CheckpointGraph) -> Arc<[Point2]> {
    graph
        .checkpoints()
        .iter()
        .map(|checkpoint| checkpoint.position())
        .collect()
}
