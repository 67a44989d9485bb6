use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::models::{MergedRftTable, ObservedRftPoint};
use crate::processors::{MergeSummary, RftMerger};
use crate::readers::{get_observations, ConfigReader};
use crate::utils::logging::{init_logging, log_level};
use crate::utils::progress::ProgressReporter;
use crate::writers::{ErtObsWriter, MergedTableWriter, ParquetWriter};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(log_level(cli.verbose, cli.quiet), cli.log_file.as_deref())?;
    debug!("Verbose logging enabled");

    match cli.command {
        Commands::Generate { config, output_dir } => {
            generate(&config, output_dir, cli.quiet)?;
        }

        Commands::MergeRft {
            gendata_csv,
            obs_dir,
            output,
            inactive_value,
            compression,
            row_group_size,
        } => {
            let progress = ProgressReporter::new_spinner("Merging RFT data...", cli.quiet);

            let merger = RftMerger::with_inactive_sentinel(inactive_value);
            let table = merger.merge_files(&gendata_csv, &obs_dir)?;

            progress.set_message(&format!("Writing {}", output.display()));
            let parquet = ParquetWriter::new()
                .with_compression(&compression)?
                .with_row_group_size(row_group_size);
            write_merged(&table, &output, &parquet)?;
            progress.finish_with_message(&format!("Merged {} rows", table.len()));

            if !cli.quiet {
                println!("\n{}", MergeSummary::from_table(&table));
                println!("Output written to {}", output.display());
            }
        }

        Commands::Observations { obs_dir } => {
            let observations = get_observations(&obs_dir)?;
            if observations.is_empty() {
                println!("No RFT observations found in {}", obs_dir.display());
                return Ok(());
            }

            println!("RFT observations in {}:", obs_dir.display());
            for ((well, report_step), count) in count_per_well(&observations) {
                println!("  {:<20} report step {:>4}: {} points", well, report_step, count);
            }
            println!("Total: {} points", observations.len());
        }
    }

    Ok(())
}

fn generate(config_path: &Path, output_dir: Option<PathBuf>, quiet: bool) -> Result<()> {
    let progress = ProgressReporter::new_spinner("Reading observation config...", quiet);

    let reader = ConfigReader::new();
    let mut config = reader.load(config_path)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    progress.set_message("Reading observation tables...");
    let groups = reader.load_observation_groups(&config)?;

    progress.set_message(&format!("Writing {}", config.output_dir.display()));
    ErtObsWriter::new(&config.output_dir).write(&groups)?;

    progress.finish_with_message(&format!(
        "Written {} observation groups to {}",
        groups.len(),
        config.output_dir.display()
    ));
    Ok(())
}

/// Write the merged table in the format given by the file extension
fn write_merged(table: &MergedRftTable, output: &Path, parquet: &ParquetWriter) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let extension = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => MergedTableWriter::write_csv(table, output),
        "json" => MergedTableWriter::write_json(table, output),
        "parquet" => {
            parquet.write_merged(table, output)?;
            let file_info = parquet.get_file_info(output)?;
            info!("\n{}", file_info.summary());
            Ok(())
        }
        other => Err(ProcessingError::InvalidFormat(format!(
            "Unsupported output format '{}' for {}, use csv, json or parquet",
            other,
            output.display()
        ))),
    }
}

fn count_per_well(observations: &[ObservedRftPoint]) -> BTreeMap<(&str, u32), usize> {
    let mut counts = BTreeMap::new();
    for obs in observations {
        *counts.entry((obs.well.as_str(), obs.report_step)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergedRftRecord, SimulatedRftRecord};
    use crate::utils::constants::ERTOBS_FILE;
    use std::fs;
    use tempfile::TempDir;

    fn observed(well: &str, report_step: u32, order: usize) -> ObservedRftPoint {
        ObservedRftPoint {
            well: well.to_string(),
            report_step,
            order,
            observed: 300.0,
            error: 3.0,
            position: None,
        }
    }

    fn table() -> MergedRftTable {
        MergedRftTable {
            sim_headers: vec!["well".to_string(), "order".to_string(), "pressure".to_string()],
            records: vec![MergedRftRecord {
                simulated: SimulatedRftRecord {
                    well: "R_A2".to_string(),
                    time: None,
                    report_step: None,
                    order: 0,
                    pressure: Some(301.0),
                    fields: vec!["R_A2".to_string(), "0".to_string(), "301.0".to_string()],
                },
                observation: Some(observed("R_A2", 1, 0)),
            }],
        }
    }

    #[test]
    fn test_count_per_well() {
        let observations = vec![
            observed("R_A3", 1, 0),
            observed("R_A2", 2, 0),
            observed("R_A2", 2, 1),
            observed("R_A2", 1, 0),
        ];
        let counts: Vec<_> = count_per_well(&observations).into_iter().collect();
        assert_eq!(
            counts,
            vec![(("R_A2", 1), 1), (("R_A2", 2), 2), (("R_A3", 1), 1)]
        );
    }

    #[test]
    fn test_write_merged_by_extension() {
        let dir = TempDir::new().unwrap();
        let parquet = ParquetWriter::new();

        for name in ["out/merged.csv", "merged.json", "merged.parquet"] {
            let path = dir.path().join(name);
            write_merged(&table(), &path, &parquet).unwrap();
            assert!(path.exists(), "{} not written", name);
        }

        let result = write_merged(&table(), &dir.path().join("merged.xlsx"), &parquet);
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }

    #[test]
    fn test_generate_output_dir_override() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("from_config");
        let override_dir = dir.path().join("from_flag");

        fs::write(
            dir.path().join("summary.csv"),
            "vector,label,date,value,error\nFOPR,FOPR_1,2018-01-01,100.0,10.0\n",
        )
        .unwrap();
        let config_path = dir.path().join("observations.toml");
        fs::write(
            &config_path,
            format!(
                "output_dir = \"{}\"\n\n[[observations]]\nname = \"rates\"\n\
                 type = \"summary\"\ndata = \"summary.csv\"\n",
                config_dir.display()
            ),
        )
        .unwrap();

        generate(&config_path, Some(override_dir.clone()), true).unwrap();

        assert!(override_dir.join(ERTOBS_FILE).exists());
        assert!(!config_dir.exists());
        let obs = fs::read_to_string(override_dir.join(ERTOBS_FILE)).unwrap();
        assert!(obs.contains("SUMMARY_OBSERVATION FOPR_1"));
    }
}
