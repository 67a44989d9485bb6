use serde::{Deserialize, Serialize};

use crate::models::WellPosition;

/// Join key between simulated and observed RFT rows
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RftKey {
    pub well: String,
    pub order: usize,
    pub report_step: Option<u32>,
}

/// One observation line read back from an `.obs` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedRftPoint {
    pub well: String,
    pub report_step: u32,
    pub order: usize,
    pub observed: f64,
    pub error: f64,
    pub position: Option<WellPosition>,
}

impl ObservedRftPoint {
    pub fn key(&self, with_report_step: bool) -> RftKey {
        RftKey {
            well: self.well.clone(),
            order: self.order,
            report_step: with_report_step.then_some(self.report_step),
        }
    }
}

/// A row of the GENDATA_RFT csv
///
/// `fields` holds every column verbatim, aligned with the table headers.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRftRecord {
    pub well: String,
    pub time: Option<String>,
    pub report_step: Option<u32>,
    pub order: usize,
    pub pressure: Option<f64>,
    pub fields: Vec<String>,
}

impl SimulatedRftRecord {
    pub fn key(&self, with_report_step: bool) -> RftKey {
        RftKey {
            well: self.well.clone(),
            order: self.order,
            report_step: if with_report_step {
                self.report_step
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedRftTable {
    pub headers: Vec<String>,
    pub records: Vec<SimulatedRftRecord>,
}

impl SimulatedRftTable {
    pub fn new(headers: Vec<String>, records: Vec<SimulatedRftRecord>) -> Self {
        Self { headers, records }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A simulated row with the observation it was joined to, if any
#[derive(Debug, Clone)]
pub struct MergedRftRecord {
    pub simulated: SimulatedRftRecord,
    pub observation: Option<ObservedRftPoint>,
}

impl MergedRftRecord {
    pub fn well(&self) -> &str {
        &self.simulated.well
    }

    pub fn pressure(&self) -> Option<f64> {
        self.simulated.pressure
    }

    pub fn observed(&self) -> Option<f64> {
        self.observation.as_ref().map(|o| o.observed)
    }

    pub fn error(&self) -> Option<f64> {
        self.observation.as_ref().map(|o| o.error)
    }

    /// `observed - pressure`, when both exist
    pub fn misfit(&self) -> Option<f64> {
        match (self.observed(), self.pressure()) {
            (Some(observed), Some(pressure)) => Some(observed - pressure),
            _ => None,
        }
    }
}

/// Flat view of a merged row for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct MergedRftRow<'a> {
    pub well: &'a str,
    pub time: Option<&'a str>,
    pub report_step: Option<u32>,
    pub order: usize,
    pub pressure: Option<f64>,
    pub observed: Option<f64>,
    pub error: Option<f64>,
    pub zone: Option<&'a str>,
}

impl<'a> From<&'a MergedRftRecord> for MergedRftRow<'a> {
    fn from(record: &'a MergedRftRecord) -> Self {
        Self {
            well: &record.simulated.well,
            time: record.simulated.time.as_deref(),
            report_step: record.simulated.report_step,
            order: record.simulated.order,
            pressure: record.pressure(),
            observed: record.observed(),
            error: record.error(),
            zone: record
                .observation
                .as_ref()
                .and_then(|o| o.position.as_ref())
                .map(|p| p.zone.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergedRftTable {
    pub sim_headers: Vec<String>,
    pub records: Vec<MergedRftRecord>,
}

impl MergedRftTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> Vec<MergedRftRow<'_>> {
        self.records.iter().map(MergedRftRow::from).collect()
    }
}
