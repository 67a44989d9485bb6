use anyhow::Context;
use clap::Parser;
use ertobs_tools::cli::{run, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = match &cli.command {
        Commands::Generate { .. } => "generate",
        Commands::MergeRft { .. } => "merge-rft",
        Commands::Observations { .. } => "observations",
    };
    run(cli).with_context(|| format!("{} failed", command))
}
