use crate::error::{ProcessingError, Result};
use crate::models::{
    GenerationConfig, ObservationConfig, ObservationData, ObservationGroup, ObservationType,
    RftObservations,
};
use crate::readers::ObservationTableReader;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::{debug, info};

/// Environment prefix for overriding config values, e.g. `ERTOBS_OUTPUT_DIR`
pub const ENV_PREFIX: &str = "ERTOBS";

pub struct ConfigReader {
    use_environment: bool,
}

impl ConfigReader {
    pub fn new() -> Self {
        Self {
            use_environment: true,
        }
    }

    pub fn with_environment(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Load and check a generation config; format follows the file extension
    pub fn load(&self, path: &Path) -> Result<GenerationConfig> {
        if !path.is_file() {
            return Err(ProcessingError::Config(format!(
                "Config file {} not found",
                path.display()
            )));
        }

        let mut builder = Config::builder().add_source(File::from(path));
        if self.use_environment {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let mut config: GenerationConfig = builder.build()?.try_deserialize()?;
        if let Some(base) = path.parent() {
            config.resolve_data_paths(base);
        }
        config.check()?;

        debug!(
            "Loaded {} observation entries from {}",
            config.observations.len(),
            path.display()
        );
        Ok(config)
    }

    /// Read the tables behind every entry of `config`
    pub fn load_observation_groups(
        &self,
        config: &GenerationConfig,
    ) -> Result<Vec<ObservationGroup>> {
        let tables = ObservationTableReader::new();
        let mut groups = Vec::with_capacity(config.observations.len());

        for entry in &config.observations {
            let group = self.load_group(&tables, entry)?;
            group.validate()?;
            groups.push(group);
        }

        info!("Loaded {} observation groups", groups.len());
        Ok(groups)
    }

    fn load_group(
        &self,
        tables: &ObservationTableReader,
        entry: &ObservationConfig,
    ) -> Result<ObservationGroup> {
        let data = match entry.obs_type {
            ObservationType::Summary => ObservationData::Summary(tables.read_summary(&entry.data)?),
            ObservationType::Rft => {
                let zonemap = entry.zonemap.clone().ok_or_else(|| {
                    ProcessingError::Config(format!(
                        "RFT observation '{}' requires a zonemap",
                        entry.name
                    ))
                })?;
                let wells = tables.read_rft(&entry.data)?;
                ObservationData::Rft(RftObservations::new(entry.subtype, zonemap, wells))
            }
            ObservationType::Unsupported => {
                ObservationData::Unsupported(entry.data.display().to_string())
            }
        };

        Ok(ObservationGroup::new(entry.name.clone(), data))
    }
}

impl Default for ConfigReader {
    fn default() -> Self {
        Self::new()
    }
}
