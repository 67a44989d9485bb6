use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use validator::Validate;

use crate::error::{ProcessingError, Result};

/// Where along a well trajectory an RFT point was measured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellPosition {
    pub x: f64,
    pub y: f64,
    pub md: f64,
    pub tvd: f64,
    pub zone: String,
}

impl WellPosition {
    pub fn new(x: f64, y: f64, md: f64, tvd: f64, zone: String) -> Self {
        Self { x, y, md, tvd, zone }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummaryObservation {
    #[validate(length(min = 1))]
    pub label: String,

    pub date: NaiveDate,

    pub value: f64,

    #[validate(range(min = 0.0))]
    pub error: f64,

    pub active: bool,
}

impl SummaryObservation {
    pub fn new(label: String, date: NaiveDate, value: f64, error: f64) -> Self {
        Self {
            label,
            date,
            value,
            error,
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// All observations of one summary vector, e.g. `FOPR` or `WBHP:OP_1`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummaryVector {
    #[validate(length(min = 1))]
    pub vector: String,

    #[validate(nested)]
    pub observations: Vec<SummaryObservation>,
}

impl SummaryVector {
    pub fn new(vector: String, observations: Vec<SummaryObservation>) -> Self {
        Self {
            vector,
            observations,
        }
    }

    pub fn active_observations(&self) -> impl Iterator<Item = &SummaryObservation> {
        self.observations.iter().filter(|o| o.active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RftPoint {
    pub value: f64,

    #[validate(range(min = 0.0))]
    pub error: f64,

    pub position: WellPosition,

    pub active: bool,
}

impl RftPoint {
    pub fn new(value: f64, error: f64, position: WellPosition) -> Self {
        Self {
            value,
            error,
            position,
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// RFT measurements of one well at one date
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RftWellObservation {
    #[validate(length(min = 1))]
    pub well_name: String,

    pub date: NaiveDate,

    pub restart: u32,

    #[validate(nested)]
    pub points: Vec<RftPoint>,
}

impl RftWellObservation {
    pub fn new(well_name: String, date: NaiveDate, restart: u32, points: Vec<RftPoint>) -> Self {
        Self {
            well_name,
            date,
            restart,
            points,
        }
    }

    pub fn active_points(&self) -> Vec<&RftPoint> {
        self.points.iter().filter(|p| p.active).collect()
    }

    pub fn has_active_points(&self) -> bool {
        self.points.iter().any(|p| p.active)
    }
}

/// Kind of RFT measurement; decides keys and file names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RftSubtype {
    #[default]
    Pressure,
    Swat,
    Sgas,
    Soil,
}

impl RftSubtype {
    /// Prefix used in ERT keys, e.g. `R_A2_PRESSURE_OBS`
    pub fn key_prefix(&self) -> &'static str {
        match self {
            RftSubtype::Pressure => "PRESSURE",
            RftSubtype::Swat => "SWAT",
            RftSubtype::Sgas => "SGAS",
            RftSubtype::Soil => "SOIL",
        }
    }

    /// Prefix of the per-well `.obs` file, e.g. `pressure_R_A2.obs`
    pub fn file_prefix(&self) -> &'static str {
        match self {
            RftSubtype::Pressure => "pressure",
            RftSubtype::Swat => "swat",
            RftSubtype::Sgas => "sgas",
            RftSubtype::Soil => "soil",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "pressure" => Ok(RftSubtype::Pressure),
            "swat" => Ok(RftSubtype::Swat),
            "sgas" => Ok(RftSubtype::Sgas),
            "soil" => Ok(RftSubtype::Soil),
            other => Err(ProcessingError::Config(format!(
                "Unsupported RFT subtype: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for RftSubtype {
    type Error = ProcessingError;

    fn try_from(name: String) -> Result<Self> {
        Self::from_name(&name)
    }
}

impl fmt::Display for RftSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_prefix())
    }
}

/// RFT observations of one group, all sharing subtype and zone map
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RftObservations {
    pub subtype: RftSubtype,

    /// Zone/layer table passed to GENDATA_RFT, relative to the ERT runpath
    pub zonemap: PathBuf,

    #[validate(nested)]
    pub wells: Vec<RftWellObservation>,
}

impl RftObservations {
    pub fn new(subtype: RftSubtype, zonemap: PathBuf, wells: Vec<RftWellObservation>) -> Self {
        Self {
            subtype,
            zonemap,
            wells,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ObservationType {
    Summary,
    Rft,
    Unsupported,
}

impl From<String> for ObservationType {
    fn from(name: String) -> Self {
        match name.trim().to_lowercase().as_str() {
            "summary" | "timeseries" => ObservationType::Summary,
            "rft" => ObservationType::Rft,
            _ => ObservationType::Unsupported,
        }
    }
}

impl fmt::Display for ObservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObservationType::Summary => "summary",
            ObservationType::Rft => "rft",
            ObservationType::Unsupported => "unsupported",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub enum ObservationData {
    Summary(Vec<SummaryVector>),
    Rft(RftObservations),
    /// Observation kinds that cannot be expressed as ERT files yet
    Unsupported(String),
}

impl ObservationData {
    pub fn observation_type(&self) -> ObservationType {
        match self {
            ObservationData::Summary(_) => ObservationType::Summary,
            ObservationData::Rft(_) => ObservationType::Rft,
            ObservationData::Unsupported(_) => ObservationType::Unsupported,
        }
    }
}

/// One named block of observations in the generated observation file
#[derive(Debug, Clone)]
pub struct ObservationGroup {
    pub name: String,
    pub data: ObservationData,
}

impl ObservationGroup {
    pub fn new(name: String, data: ObservationData) -> Self {
        Self { name, data }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ProcessingError::Config(
                "Observation group name must not be empty".to_string(),
            ));
        }

        match &self.data {
            ObservationData::Summary(vectors) => {
                for vector in vectors {
                    vector.validate()?;
                }
            }
            ObservationData::Rft(rft) => rft.validate()?,
            ObservationData::Unsupported(_) => {}
        }

        Ok(())
    }
}
