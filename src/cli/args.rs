use crate::utils::constants::{DEFAULT_MERGED_OUTPUT, DEFAULT_ROW_GROUP_SIZE, INACTIVE_SENTINEL};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ertobs-tools")]
#[command(about = "Generate ERT observation files and compare RFT simulations with observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors, hide progress"
    )]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write ERT observation files from a configuration
    Generate {
        #[arg(short, long, help = "Observation configuration (toml, yaml or json)")]
        config: PathBuf,

        #[arg(
            short,
            long,
            help = "Output directory, replaced if it exists [default: output_dir from config]"
        )]
        output_dir: Option<PathBuf>,
    },

    /// Merge GENDATA_RFT results with RFT observations
    MergeRft {
        #[arg(help = "csv written by GENDATA_RFT")]
        gendata_csv: PathBuf,

        #[arg(help = "Directory with <well>_<report_step>.obs files")]
        obs_dir: PathBuf,

        #[arg(
            short,
            long,
            default_value = DEFAULT_MERGED_OUTPUT,
            help = "Output file, format chosen by extension (csv, json, parquet)"
        )]
        output: PathBuf,

        #[arg(
            long,
            default_value_t = INACTIVE_SENTINEL,
            allow_negative_numbers = true,
            help = "Simulated value marking inactive cells"
        )]
        inactive_value: f64,

        #[arg(short, long, default_value = "snappy", help = "Parquet compression")]
        compression: String,

        #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE, help = "Parquet row group size")]
        row_group_size: usize,
    },

    /// List the RFT observations found in a directory
    Observations {
        #[arg(help = "Directory with .obs files")]
        obs_dir: PathBuf,
    },
}
