use std::path::PathBuf;

use checkrace_engine::CheckpointGraph;
use serde::Serialize;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InspectTrackArg {
    /// Track JSON file
    track: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrackSummary<'a> {
    name: &'a str,
    #[serde(flatten)]
    graph: &'a CheckpointGraph,
}

pub(crate) fn run(arg: &InspectTrackArg) -> anyhow::Result<()> {
    let InspectTrackArg { track, output } = arg;

    let track = util::read_track_file(track)?;
    let graph = CheckpointGraph::build(&track.checkpoints)?;

    eprintln!(
        "Track '{}': {} checkpoints, length {:.2}",
        track.name,
        graph.len(),
        graph.track_length()
    );

    let summary = TrackSummary {
        name: &track.name,
        graph: &graph,
    };
    util::save_json(&summary, output.as_deref())?;

    Ok(())
}
