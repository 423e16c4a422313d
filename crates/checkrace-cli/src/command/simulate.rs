use std::path::PathBuf;

use checkrace_engine::RaceConfig;
use checkrace_sim::{DriveParams, SimSeed, Simulation};
use chrono::Utc;
use rand::Rng as _;

use crate::{
    schema::report::{CarReward, RaceReport},
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Track JSON file
    pub(crate) track: PathBuf,
    /// Number of cars in the race
    #[arg(long, default_value_t = 8)]
    pub(crate) cars: isize,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1000)]
    pub(crate) ticks: u64,
    /// Seed for reproducible runs (random when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Flag the first car as driven by outside input
    #[arg(long)]
    pub(crate) manual_control: bool,
    /// Restart the race every N ticks
    #[arg(long)]
    pub(crate) restart_every: Option<u64>,
    /// Standard deviation of the cars' heading noise, in radians
    #[arg(long, default_value_t = DriveParams::default().heading_noise)]
    pub(crate) heading_noise: f32,
    /// Output file path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        track,
        cars,
        ticks,
        seed,
        manual_control,
        restart_every,
        heading_noise,
        output,
    } = arg;

    let track = util::read_track_file(track)?;
    let seed = seed.map_or_else(|| rand::rng().random(), SimSeed::from);
    let config = RaceConfig {
        manual_control: *manual_control,
    };
    let drive = DriveParams {
        heading_noise: *heading_noise,
        ..DriveParams::default()
    };

    tracing::info!(track = %track.name, cars, ticks, %seed, "simulating");
    let mut sim = Simulation::new(config.clone(), &track.checkpoints, drive, seed)?;
    sim.set_cars(*cars)?;
    sim.run(*ticks, *restart_every);

    let race = sim.race();
    let report = RaceReport {
        track: track.name,
        generated_at: Utc::now(),
        seed,
        config,
        drive,
        ticks: race.ticks(),
        track_length: race.track_length(),
        finished_cars: sim.finished_cars(),
        leader: race.leader(),
        standings: race.standings(),
        rank_changes: sim.rank_log().to_vec(),
        rewards: sim
            .total_rewards()
            .iter()
            .map(|(agent, total_reward)| CarReward {
                agent: *agent,
                total_reward: *total_reward,
            })
            .collect(),
    };

    eprintln!(
        "Finished: {} of {} cars completed the track, {} leader changes.",
        report.finished_cars,
        report.standings.len(),
        report.rank_changes.len()
    );
    if let Some(leader) = &report.leader {
        eprintln!("Leader: {} (score {:.3})", leader.agent, leader.score);
    }

    util::save_json(&report, output.as_deref())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_simulate_writes_report() {
        let track = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tracks/oval.json");
        let output =
            std::env::temp_dir().join(format!("checkrace-report-{}.json", std::process::id()));
        let arg = SimulateArg {
            track,
            cars: 3,
            ticks: 200,
            seed: Some(4),
            heading_noise: 0.0,
            output: Some(output.clone()),
            ..SimulateArg::default()
        };
        run(&arg).unwrap();

        let report: serde_json::Value = util::read_json_file("report", &output).unwrap();
        std::fs::remove_file(&output).unwrap();

        assert_eq!(report["track"], "oval");
        assert_eq!(report["ticks"], 200);
        assert_eq!(report["seed"], "00000000000000000000000000000004");
        assert_eq!(report["standings"].as_array().unwrap().len(), 3);
        assert_eq!(report["rewards"].as_array().unwrap().len(), 3);
        assert_eq!(report["leader"]["agent"], 0);
        assert!(report["generated_at"].is_string());
    }
}
