//! Text templates for the ERT configuration keywords written by this crate.
//!
//! ERT syntax reference:
//! <https://ert.readthedocs.io/en/latest/reference/configuration/observations.html>

use crate::models::{RftSubtype, RftWellObservation, SummaryObservation};
use crate::utils::constants::{
    GENDATA_RFT_OUTPUT_DIR, GENERAL_OBSERVATION, GEN_DATA, SUMMARY_OBSERVATION,
};
use std::path::Path;
use tracing::warn;

pub const GENDATA_RFT_EXPLAINER: &str = "\
-------------------------
-- GENDATA_RFT  -- Create files with simulated rft pressure
-------------------------
-- ERT doc: https://ert.readthedocs.io/en/latest/reference/configuration/forward_model.html#GENDATA_RFT

";

pub const GENDATA_EXPLAINER: &str = "\
-------------------------
-- GEN_DATA  -- Create GEN_DATA of rft for usage in AHM
-------------------------
-- ERT doc: https://ert.readthedocs.io/en/latest/reference/configuration/keywords.html#gen-data

--       ert id       Result file name           input format         report step
";

/// Render a float the way ERT's Python tooling prints it
///
/// Integral values keep one decimal, so `100.0` stays `100.0` rather than `100`.
///
/// ```
/// use ertobs_tools::writers::keywords::format_float;
///
/// assert_eq!(format_float(100.0), "100.0");
/// assert_eq!(format_float(0.25), "0.25");
/// assert_eq!(format_float(-3.0), "-3.0");
/// ```
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Header that opens each observation group in the observation file
pub fn group_header(name: &str) -> String {
    format!("--\n--{}\n", name)
}

pub fn summary_observation_line(vector: &str, observation: &SummaryObservation) -> String {
    format!(
        "{} {} {{VALUE={}; ERROR={}; DATE={}; KEY={};}};\n",
        SUMMARY_OBSERVATION,
        observation.label,
        format_float(observation.value),
        format_float(observation.error),
        observation.date.format("%Y-%m-%d"),
        vector,
    )
}

pub fn rft_observation_entry(
    well: &RftWellObservation,
    subtype: RftSubtype,
    obs_file: &Path,
) -> String {
    let prefix = subtype.key_prefix();
    format!(
        "{keyword} {well}_{prefix}_OBS {{DATA={well}_{prefix}_SIM; RESTART = {restart}; OBS_FILE = {obs_file};}};\n",
        keyword = GENERAL_OBSERVATION,
        well = well.well_name,
        prefix = prefix,
        restart = well.restart,
        obs_file = obs_file.display(),
    )
}

/// GEN_DATA line reading the GENDATA_RFT result of one well
///
/// GENDATA_RFT names pressure results `RFT_<WELL>_<step>` and other
/// properties `RFT_<PROPERTY>_<WELL>_<step>`.
pub fn rft_gendata_entry(well: &RftWellObservation, subtype: RftSubtype) -> String {
    let prefix = subtype.key_prefix();
    let separator = match subtype {
        RftSubtype::Pressure => "_".to_string(),
        _ => format!("_{}_", prefix),
    };
    format!(
        "{keyword} {well}_{prefix}_SIM RESULT_FILE:{dir}/RFT{sep}{well}_%d REPORT_STEPS:{restart}\n",
        keyword = GEN_DATA,
        well = well.well_name,
        prefix = prefix,
        dir = GENDATA_RFT_OUTPUT_DIR,
        sep = separator,
        restart = well.restart,
    )
}

/// Block defining the GENDATA_RFT forward model call
pub fn gendata_rft_block(rft_dir: &Path, well_date_file: &Path, zonemap: &Path) -> String {
    warn!(
        "The zone layer file {} must have a path relative to the runpath of each realization, \
         otherwise ERT will fail when running GENDATA_RFT",
        zonemap.display()
    );

    let well_date_name = well_date_file
        .strip_prefix(rft_dir)
        .unwrap_or(well_date_file)
        .display()
        .to_string();

    format!(
        "{explainer}DEFINE <RFT_INPUT> {rft_dir}\n\
         FORWARD_MODEL MAKE_DIRECTORY(<DIRECTORY>={out})\n\
         FORWARD_MODEL GENDATA_RFT(<PATH_TO_TRAJECTORY_FILES>=<RFT_INPUT>,\
         <WELL_AND_TIME_FILE>=<RFT_INPUT>/{well_date},\
         <ZONEMAP>={zonemap}, <OUTPUTDIRECTORY>={out})\n\n",
        explainer = GENDATA_RFT_EXPLAINER,
        rft_dir = rft_dir.display(),
        out = GENDATA_RFT_OUTPUT_DIR,
        well_date = well_date_name,
        zonemap = zonemap.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RftPoint, WellPosition};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn well() -> RftWellObservation {
        RftWellObservation::new(
            "R_A2".to_string(),
            NaiveDate::from_ymd_opt(2018, 3, 1).unwrap(),
            3,
            vec![RftPoint::new(
                304.5,
                3.0,
                WellPosition::new(1.0, 2.0, 3.0, 4.0, "Valysar".to_string()),
            )],
        )
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(304.5), "304.5");
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e20), "100000000000000000000");
    }

    #[test]
    fn test_summary_observation_line() {
        let observation = SummaryObservation::new(
            "FOPR_1".to_string(),
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            100.0,
            10.0,
        );
        assert_eq!(
            summary_observation_line("FOPR", &observation),
            "SUMMARY_OBSERVATION FOPR_1 {VALUE=100.0; ERROR=10.0; DATE=2018-01-01; KEY=FOPR;};\n"
        );
    }

    #[test]
    fn test_rft_observation_entry() {
        let entry = rft_observation_entry(
            &well(),
            RftSubtype::Pressure,
            &PathBuf::from("/obs/rft/pressure_R_A2.obs"),
        );
        assert_eq!(
            entry,
            "GENERAL_OBSERVATION R_A2_PRESSURE_OBS {DATA=R_A2_PRESSURE_SIM; RESTART = 3; OBS_FILE = /obs/rft/pressure_R_A2.obs;};\n"
        );
    }

    #[test]
    fn test_rft_gendata_entry_separator() {
        assert_eq!(
            rft_gendata_entry(&well(), RftSubtype::Pressure),
            "GEN_DATA R_A2_PRESSURE_SIM RESULT_FILE:gendata_rft/RFT_R_A2_%d REPORT_STEPS:3\n"
        );
        assert_eq!(
            rft_gendata_entry(&well(), RftSubtype::Swat),
            "GEN_DATA R_A2_SWAT_SIM RESULT_FILE:gendata_rft/RFT_SWAT_R_A2_%d REPORT_STEPS:3\n"
        );
    }

    #[test]
    fn test_gendata_rft_block() {
        let block = gendata_rft_block(
            Path::new("/obs/rft"),
            Path::new("/obs/rft/well_date_restart.txt"),
            Path::new("rms/output/zone/layer_zone_table.txt"),
        );

        assert!(block.starts_with(GENDATA_RFT_EXPLAINER));
        assert!(block.contains("DEFINE <RFT_INPUT> /obs/rft\n"));
        assert!(block.contains("FORWARD_MODEL MAKE_DIRECTORY(<DIRECTORY>=gendata_rft)\n"));
        assert!(block.contains(
            "FORWARD_MODEL GENDATA_RFT(<PATH_TO_TRAJECTORY_FILES>=<RFT_INPUT>,\
             <WELL_AND_TIME_FILE>=<RFT_INPUT>/well_date_restart.txt,\
             <ZONEMAP>=rms/output/zone/layer_zone_table.txt, <OUTPUTDIRECTORY>=gendata_rft)\n\n"
        ));
    }

    #[test]
    fn test_group_header() {
        assert_eq!(group_header("rft_pressure"), "--\n--rft_pressure\n");
    }
}
