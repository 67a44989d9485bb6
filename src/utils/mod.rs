pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;
pub mod timestamp;

pub use constants::*;
pub use filename::{parse_obs_filename, sanitize_well_name};
pub use logging::{init_logging, log_level};
pub use progress::ProgressReporter;
pub use timestamp::{add_time_stamp, RecordType};
