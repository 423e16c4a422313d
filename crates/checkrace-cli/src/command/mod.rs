use clap::{Parser, Subcommand};

use self::{
    generate_track::GenerateTrackArg, inspect_track::InspectTrackArg, simulate::SimulateArg,
};

mod generate_track;
mod inspect_track;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless race and write a JSON report
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the finalized checkpoint table of a track
    InspectTrack(#[clap(flatten)] InspectTrackArg),
    /// Generate a random loop-shaped track
    GenerateTrack(#[clap(flatten)] GenerateTrackArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::InspectTrack(arg) => inspect_track::run(&arg)?,
        Mode::GenerateTrack(arg) => generate_track::run(&arg)?,
    }
    Ok(())
}
