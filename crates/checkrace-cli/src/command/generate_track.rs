use std::path::PathBuf;

use checkrace_sim::track;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{schema::track::TrackFile, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateTrackArg {
    /// Checkpoints per lap, not counting the finish
    #[arg(long, default_value_t = 16)]
    pub(crate) checkpoints: usize,
    /// Capture radius of every checkpoint
    #[arg(long, default_value_t = 3.0)]
    pub(crate) radius: f32,
    /// Seed for the track shape (random when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Track name stored in the file
    #[arg(long, default_value = "generated")]
    pub(crate) name: String,
    /// Output file path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateTrackArg) -> anyhow::Result<()> {
    let GenerateTrackArg {
        checkpoints,
        radius,
        seed,
        name,
        output,
    } = arg;

    let mut rng = match seed {
        Some(seed) => Pcg32::seed_from_u64(*seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let placements = track::generate_loop(&mut rng, *checkpoints, *radius)?;
    tracing::info!(checkpoints = placements.len(), radius, "generated loop track");

    let track = TrackFile {
        name: name.clone(),
        checkpoints: placements,
    };
    util::save_json(&track, output.as_deref())?;

    Ok(())
}
