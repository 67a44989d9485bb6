pub mod config_reader;
pub mod gendata_reader;
pub mod obs_reader;
pub mod table_reader;

pub use config_reader::ConfigReader;
pub use gendata_reader::GendataReader;
pub use obs_reader::{get_observations, ObsReader};
pub use table_reader::ObservationTableReader;
