pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use processors::merge_rft_ertobs;
pub use readers::get_observations;
pub use writers::write_dict_to_ertobs;
