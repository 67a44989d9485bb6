/// File names inside the generated observation tree
pub const ERTOBS_FILE: &str = "ert_observations.obs";
pub const GEN_DATA_FILE: &str = "gen_data_rft_wells.ert";
pub const README_FILE: &str = "readme.txt";
pub const WELL_DATE_FILE: &str = "well_date_restart.txt";

/// Directory names
pub const RFT_DIR: &str = "rft";
pub const GENDATA_RFT_OUTPUT_DIR: &str = "gendata_rft";
pub const DEFAULT_OUTPUT_DIR: &str = "ert_observations";

/// ERT keywords
pub const SUMMARY_OBSERVATION: &str = "SUMMARY_OBSERVATION";
pub const GENERAL_OBSERVATION: &str = "GENERAL_OBSERVATION";
pub const GEN_DATA: &str = "GEN_DATA";

/// Comment marker in ERT configuration files
pub const ERT_COMMENT: &str = "--";

/// GENDATA_RFT writes this value for cells that are inactive in the grid
pub const INACTIVE_SENTINEL: f64 = -1.0;

/// Report step assumed when an observation file name carries none
pub const DEFAULT_REPORT_STEP: u32 = 1;

/// Merge defaults
pub const DEFAULT_MERGED_OUTPUT: &str = "rft_ert_df.csv";
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Permissions for the generated tree: group may delete, others read only
pub const OUTPUT_DIR_MODE: u32 = 0o774;

/// Column names in the GENDATA_RFT csv
pub const COL_WELL: &str = "well";
pub const COL_TIME: &str = "time";
pub const COL_ORDER: &str = "order";
pub const COL_PRESSURE: &str = "pressure";
pub const COL_REPORT_STEP: &str = "report_step";

/// Columns appended by the merge
pub const MERGED_OBS_COLUMNS: [&str; 7] = [
    "observed",
    "error",
    "obs_x",
    "obs_y",
    "obs_md",
    "obs_tvd",
    "obs_zone",
];
