use checkrace_engine::{AgentId, LeaderSnapshot, RaceConfig, Standing};
use checkrace_sim::{DriveParams, RankEvent, SimSeed};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a `simulate` run.
#[derive(Debug, Clone, Serialize)]
pub struct RaceReport {
    pub track: String,
    pub generated_at: DateTime<Utc>,
    pub seed: SimSeed,
    pub config: RaceConfig,
    pub drive: DriveParams,
    pub ticks: u64,
    pub track_length: f32,
    pub finished_cars: usize,
    pub leader: Option<LeaderSnapshot>,
    pub standings: Vec<Standing>,
    pub rank_changes: Vec<RankEvent>,
    pub rewards: Vec<CarReward>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CarReward {
    pub agent: AgentId,
    pub total_reward: f32,
}
