use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{ObservationType, RftSubtype};
use crate::utils::constants::DEFAULT_OUTPUT_DIR;

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Top level of an observation generation config file
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerationConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[validate(length(min = 1), nested)]
    pub observations: Vec<ObservationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservationConfig {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(rename = "type")]
    pub obs_type: ObservationType,

    #[serde(default)]
    pub subtype: RftSubtype,

    /// Table holding the observations, relative to the config file
    pub data: PathBuf,

    #[serde(default)]
    pub zonemap: Option<PathBuf>,
}

impl GenerationConfig {
    /// Check the parts serde and the derives cannot express
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        for obs in &self.observations {
            if obs.obs_type == ObservationType::Rft && obs.zonemap.is_none() {
                return Err(ProcessingError::Config(format!(
                    "RFT observation '{}' requires a zonemap",
                    obs.name
                )));
            }
        }

        Ok(())
    }

    /// Join relative data paths onto `base`; absolute paths are kept
    pub fn resolve_data_paths(&mut self, base: &Path) {
        for obs in &mut self.observations {
            if obs.data.is_relative() {
                obs.data = base.join(&obs.data);
            }
        }
    }
}
