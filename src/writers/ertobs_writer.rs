use crate::error::Result;
use crate::models::{
    ObservationData, ObservationGroup, RftObservations, RftSubtype, RftWellObservation,
    SummaryVector,
};
use crate::utils::constants::{
    ERTOBS_FILE, ERT_COMMENT, GEN_DATA_FILE, OUTPUT_DIR_MODE, README_FILE, RFT_DIR,
    WELL_DATE_FILE,
};
use crate::utils::filename::sanitize_well_name;
use crate::utils::timestamp::{add_time_stamp, RecordType};
use crate::writers::keywords::{
    gendata_rft_block, group_header, rft_gendata_entry, rft_observation_entry,
    summary_observation_line, GENDATA_EXPLAINER,
};
use crate::writers::table_writer::SpaceSeparatedWriter;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// `(well, date, restart)` line of the GENDATA_RFT well/time file
#[derive(Debug, Clone, PartialEq, Eq)]
struct WellDate {
    well: String,
    date: NaiveDate,
    restart: u32,
}

/// Text produced for one RFT group
#[derive(Debug, Default)]
struct RftGroupOutput {
    ertobs: String,
    gen_data: String,
}

/// Writes a complete ERT observation tree under one directory
///
/// Layout:
/// - `ert_observations.obs`: all observation declarations
/// - `gen_data_rft_wells.ert`: GENDATA_RFT call and GEN_DATA declarations
/// - `rft/`: per-well `.obs` and `.txt` files and `well_date_restart.txt`
/// - `readme.txt`
pub struct ErtObsWriter {
    parent: PathBuf,
}

impl ErtObsWriter {
    pub fn new(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: parent.into(),
        }
    }

    pub fn rft_dir(&self) -> PathBuf {
        self.parent.join(RFT_DIR)
    }

    pub fn well_date_file(&self) -> PathBuf {
        self.rft_dir().join(WELL_DATE_FILE)
    }

    /// Write all groups, returning the content of the observation file
    pub fn write(&self, groups: &[ObservationGroup]) -> Result<String> {
        debug!("{} observation groups to write", groups.len());
        self.prepare_output_dir()?;

        fs::write(
            self.parent.join(README_FILE),
            add_time_stamp("", RecordType::Folder, ERT_COMMENT),
        )?;

        let mut obs_str = add_time_stamp("", RecordType::File, ERT_COMMENT);
        let mut gendata_rft_str: Option<String> = None;
        let mut gen_data = String::new();
        let mut well_dates: Vec<WellDate> = Vec::new();
        let mut has_rft = false;

        for group in groups {
            obs_str.push_str(&group_header(&group.name));

            match &group.data {
                ObservationData::Summary(vectors) => {
                    obs_str.push_str(&Self::timeseries_ertobs(vectors));
                }
                ObservationData::Rft(rft) => {
                    if gendata_rft_str.is_none() {
                        gendata_rft_str = Some(gendata_rft_block(
                            &self.rft_dir(),
                            &self.well_date_file(),
                            &rft.zonemap,
                        ));
                    }
                    let output = self.write_rft_group(rft, &mut well_dates)?;
                    obs_str.push_str(&output.ertobs);
                    gen_data.push_str(&output.gen_data);
                    has_rft = true;
                }
                ObservationData::Unsupported(kind) => {
                    warn!(
                        "Observation '{}' ({}) skipped: only summary and rft are supported",
                        group.name, kind
                    );
                }
            }
        }

        let ertobs_file = self.parent.join(ERTOBS_FILE);
        fs::write(&ertobs_file, &obs_str)?;
        debug!("Written {}", ertobs_file.display());

        if has_rft {
            self.write_well_dates(&well_dates)?;
        }

        if !gen_data.is_empty() {
            let content = format!(
                "{}{}{}",
                gendata_rft_str.unwrap_or_default(),
                GENDATA_EXPLAINER,
                gen_data
            );
            let gen_data_file = self.parent.join(GEN_DATA_FILE);
            fs::write(&gen_data_file, add_time_stamp(&content, RecordType::File, ERT_COMMENT))?;
            debug!("Written {}", gen_data_file.display());
        }

        set_dir_mode(&self.parent)?;

        info!(
            "Written {} observation groups to {}",
            groups.len(),
            self.parent.display()
        );
        Ok(obs_str)
    }

    /// Remove any previous output and recreate the directory
    fn prepare_output_dir(&self) -> Result<()> {
        if self.parent.exists() {
            warn!(
                "{} exists, deleting and overwriting contents",
                self.parent.display()
            );
            fs::remove_dir_all(&self.parent)?;
        }
        fs::create_dir_all(&self.parent)?;
        Ok(())
    }

    /// SUMMARY_OBSERVATION lines for all active observations
    pub fn timeseries_ertobs(vectors: &[SummaryVector]) -> String {
        let mut out = String::new();
        for vector in vectors {
            debug!("Writing summary observations for {}", vector.vector);
            for observation in vector.active_observations() {
                out.push_str(&summary_observation_line(&vector.vector, observation));
            }
        }
        out
    }

    fn write_rft_group(
        &self,
        rft: &RftObservations,
        well_dates: &mut Vec<WellDate>,
    ) -> Result<RftGroupOutput> {
        let rft_dir = self.rft_dir();
        fs::create_dir_all(&rft_dir)?;

        let mut output = RftGroupOutput::default();
        debug!("prefix is {}", rft.subtype);

        for well in &rft.wells {
            if !well.has_active_points() {
                warn!(
                    "No active {} observations for {} at {}, skipping",
                    rft.subtype, well.well_name, well.date
                );
                continue;
            }
            let Some(obs_file) = Self::write_well_rft_files(&rft_dir, rft.subtype, well)? else {
                continue;
            };

            let well_date = WellDate {
                well: well.well_name.clone(),
                date: well.date,
                restart: well.restart,
            };
            if !well_dates.contains(&well_date) {
                well_dates.push(well_date);
            }

            output
                .ertobs
                .push_str(&rft_observation_entry(well, rft.subtype, &obs_file));
            output
                .gen_data
                .push_str(&rft_gendata_entry(well, rft.subtype));
        }

        Ok(output)
    }

    /// Write the `.obs` and `.txt` files of one well
    ///
    /// Returns the absolute path of the `.obs` file, or `None` when the well
    /// has no active points.
    pub fn write_well_rft_files(
        rft_dir: &Path,
        subtype: RftSubtype,
        well: &RftWellObservation,
    ) -> Result<Option<PathBuf>> {
        let points = well.active_points();
        if points.is_empty() {
            return Ok(None);
        }

        let file_name = sanitize_well_name(&well.well_name);
        let obs_file = rft_dir.join(format!("{}_{}.obs", subtype.file_prefix(), file_name));
        let position_file = rft_dir.join(format!("{}.txt", file_name));
        debug!(
            "Writing {} and {}",
            obs_file.display(),
            position_file.display()
        );

        SpaceSeparatedWriter::write_values(&obs_file, &points)?;
        SpaceSeparatedWriter::write_positions(&position_file, &points)?;

        Ok(Some(fs::canonicalize(&obs_file)?))
    }

    fn write_well_dates(&self, well_dates: &[WellDate]) -> Result<()> {
        let path = self.well_date_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        SpaceSeparatedWriter::write_rows(
            &path,
            well_dates.iter().map(|wd| {
                [
                    wd.well.clone(),
                    wd.date.format("%Y-%m-%d").to_string(),
                    wd.restart.to_string(),
                ]
            }),
        )
    }
}

#[cfg(unix)]
fn set_dir_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(OUTPUT_DIR_MODE))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_dir_mode(_path: &Path) -> Result<()> {
    Ok(())
}

/// Write all observation groups under `parent`
pub fn write_dict_to_ertobs(groups: &[ObservationGroup], parent: &Path) -> Result<String> {
    ErtObsWriter::new(parent).write(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RftPoint, SummaryObservation, WellPosition};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(value: f64, zone: &str) -> RftPoint {
        RftPoint::new(
            value,
            3.0,
            WellPosition::new(462000.0, 5934000.0, 1850.0, 1620.0, zone.to_string()),
        )
    }

    fn summary_group() -> ObservationGroup {
        ObservationGroup::new(
            "rates".to_string(),
            ObservationData::Summary(vec![SummaryVector::new(
                "FOPR".to_string(),
                vec![
                    SummaryObservation::new("FOPR_1".to_string(), date(2018, 1, 1), 100.0, 10.0),
                    SummaryObservation::new("FOPR_2".to_string(), date(2018, 2, 1), 120.0, 12.0)
                        .inactive(),
                ],
            )]),
        )
    }

    fn rft_group(subtype: RftSubtype) -> ObservationGroup {
        ObservationGroup::new(
            format!("rft_{}", subtype.file_prefix()),
            ObservationData::Rft(RftObservations::new(
                subtype,
                PathBuf::from("rms/output/zone/layer_zone_table.txt"),
                vec![
                    RftWellObservation::new(
                        "R_A2".to_string(),
                        date(2018, 3, 1),
                        1,
                        vec![point(304.5, "Valysar"), point(306.0, "Therys").inactive()],
                    ),
                    RftWellObservation::new(
                        "R_A3".to_string(),
                        date(2018, 3, 1),
                        1,
                        vec![point(310.0, "Volon").inactive()],
                    ),
                    RftWellObservation::new(
                        "25/11-A 4".to_string(),
                        date(2019, 3, 1),
                        2,
                        vec![point(290.0, "Valysar")],
                    ),
                ],
            )),
        )
    }

    #[test]
    fn test_timeseries_ertobs_skips_inactive() {
        let ObservationData::Summary(vectors) = summary_group().data else {
            panic!("expected summary data");
        };
        assert_eq!(
            ErtObsWriter::timeseries_ertobs(&vectors),
            "SUMMARY_OBSERVATION FOPR_1 {VALUE=100.0; ERROR=10.0; DATE=2018-01-01; KEY=FOPR;};\n"
        );
    }

    #[test]
    fn test_write_summary_only() -> Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().join("ert_obs");

        let obs_str = ErtObsWriter::new(&parent).write(&[summary_group()])?;

        assert!(obs_str.contains("--\n--rates\nSUMMARY_OBSERVATION FOPR_1"));
        assert_eq!(fs::read_to_string(parent.join(ERTOBS_FILE))?, obs_str);
        assert!(parent.join(README_FILE).exists());
        // no rft, no gen_data
        assert!(!parent.join(GEN_DATA_FILE).exists());
        assert!(!parent.join(RFT_DIR).exists());

        Ok(())
    }

    #[test]
    fn test_write_rft_files() -> Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().join("ert_obs");
        let writer = ErtObsWriter::new(&parent);

        let obs_str = writer.write(&[rft_group(RftSubtype::Pressure)])?;
        let rft_dir = parent.join(RFT_DIR);

        // inactive rows never reach the files
        assert_eq!(
            fs::read_to_string(rft_dir.join("pressure_R_A2.obs"))?,
            "304.5 3.0\n"
        );
        assert_eq!(
            fs::read_to_string(rft_dir.join("R_A2.txt"))?,
            "462000.0 5934000.0 1850.0 1620.0 Valysar\n"
        );
        // well with only inactive points is skipped
        assert!(!rft_dir.join("pressure_R_A3.obs").exists());
        assert!(!obs_str.contains("R_A3_PRESSURE_OBS"));
        // file names are sanitized, keys are not
        assert!(rft_dir.join("pressure_25_11-A_4.obs").exists());
        assert!(obs_str.contains("GENERAL_OBSERVATION 25/11-A 4_PRESSURE_OBS"));

        let obs_file = fs::canonicalize(rft_dir.join("pressure_R_A2.obs"))?;
        assert!(obs_str.contains(&format!(
            "GENERAL_OBSERVATION R_A2_PRESSURE_OBS {{DATA=R_A2_PRESSURE_SIM; RESTART = 1; OBS_FILE = {};}};\n",
            obs_file.display()
        )));

        assert_eq!(
            fs::read_to_string(writer.well_date_file())?,
            "R_A2 2018-03-01 1\n\"25/11-A 4\" 2019-03-01 2\n"
        );

        let gen_data = fs::read_to_string(parent.join(GEN_DATA_FILE))?;
        assert!(gen_data.starts_with("--This file is autogenerated by "));
        assert!(gen_data.contains("FORWARD_MODEL GENDATA_RFT("));
        assert!(gen_data.contains(GENDATA_EXPLAINER));
        assert!(gen_data.ends_with(
            "GEN_DATA R_A2_PRESSURE_SIM RESULT_FILE:gendata_rft/RFT_R_A2_%d REPORT_STEPS:1\n\
             GEN_DATA 25/11-A 4_PRESSURE_SIM RESULT_FILE:gendata_rft/RFT_25/11-A 4_%d REPORT_STEPS:2\n"
        ));

        Ok(())
    }

    #[test]
    fn test_two_rft_groups_share_gendata_block() -> Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().join("ert_obs");
        let writer = ErtObsWriter::new(&parent);

        writer.write(&[rft_group(RftSubtype::Pressure), rft_group(RftSubtype::Swat)])?;

        let gen_data = fs::read_to_string(parent.join(GEN_DATA_FILE))?;
        assert_eq!(gen_data.matches("FORWARD_MODEL GENDATA_RFT(").count(), 1);
        assert!(gen_data.contains("RESULT_FILE:gendata_rft/RFT_SWAT_R_A2_%d"));
        assert!(parent.join(RFT_DIR).join("swat_R_A2.obs").exists());

        // well/date lines are not repeated per group
        let well_dates = fs::read_to_string(writer.well_date_file())?;
        assert_eq!(well_dates.lines().count(), 2);

        Ok(())
    }

    #[test]
    fn test_unsupported_group_only_gets_header() -> Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().join("ert_obs");
        let group = ObservationGroup::new(
            "tracers".to_string(),
            ObservationData::Unsupported("tracer.csv".to_string()),
        );

        let obs_str = ErtObsWriter::new(&parent).write(&[group])?;
        assert!(obs_str.ends_with("--\n--tracers\n"));

        Ok(())
    }

    #[test]
    fn test_existing_output_is_replaced() -> Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().join("ert_obs");
        fs::create_dir_all(&parent)?;
        fs::write(parent.join("stale.txt"), "old")?;

        write_dict_to_ertobs(&[summary_group()], &parent)?;

        assert!(!parent.join("stale.txt").exists());
        assert!(parent.join(ERTOBS_FILE).exists());

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_output_dir_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new()?;
        let parent = dir.path().join("ert_obs");
        ErtObsWriter::new(&parent).write(&[summary_group()])?;

        let mode = fs::metadata(&parent)?.permissions().mode() & 0o777;
        assert_eq!(mode, OUTPUT_DIR_MODE);

        Ok(())
    }
}
