use crate::error::{ProcessingError, Result};
use crate::models::{
    RftPoint, RftWellObservation, SummaryObservation, SummaryVector, WellPosition,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SummaryRow {
    vector: String,
    label: String,
    date: NaiveDate,
    value: f64,
    error: f64,
    #[serde(default)]
    active: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RftRow {
    well_name: String,
    date: NaiveDate,
    restart: u32,
    value: f64,
    error: f64,
    x: f64,
    y: f64,
    md: f64,
    tvd: f64,
    zone: String,
    #[serde(default)]
    active: Option<String>,
}

/// Interpret an `active` cell; blank or missing means active
pub fn parse_active_flag(raw: Option<&str>) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(true);
    };

    match raw.trim().to_lowercase().as_str() {
        "" | "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        other => Err(ProcessingError::InvalidFormat(format!(
            "Invalid active flag: '{}'",
            other
        ))),
    }
}

/// Reads the csv tables referenced from a generation config
pub struct ObservationTableReader;

impl ObservationTableReader {
    pub fn new() -> Self {
        Self
    }

    fn csv_reader<R: Read>(&self, input: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(input)
    }

    /// Read a summary table, grouping rows per vector in first-seen order
    pub fn read_summary(&self, path: &Path) -> Result<Vec<SummaryVector>> {
        let file = File::open(path)?;
        self.read_summary_from(file)
    }

    pub fn read_summary_from<R: Read>(&self, input: R) -> Result<Vec<SummaryVector>> {
        let mut reader = self.csv_reader(input);
        let mut vectors: Vec<SummaryVector> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in reader.deserialize::<SummaryRow>() {
            let row = row?;
            let mut observation =
                SummaryObservation::new(row.label, row.date, row.value, row.error);
            observation.active = parse_active_flag(row.active.as_deref())?;

            let slot = *index.entry(row.vector.clone()).or_insert_with(|| {
                vectors.push(SummaryVector::new(row.vector.clone(), Vec::new()));
                vectors.len() - 1
            });
            vectors[slot].observations.push(observation);
        }

        debug!("Read {} summary vectors", vectors.len());
        Ok(vectors)
    }

    /// Read an RFT table, grouping rows per (well, date, restart) in first-seen order
    pub fn read_rft(&self, path: &Path) -> Result<Vec<RftWellObservation>> {
        let file = File::open(path)?;
        self.read_rft_from(file)
    }

    pub fn read_rft_from<R: Read>(&self, input: R) -> Result<Vec<RftWellObservation>> {
        let mut reader = self.csv_reader(input);
        let mut wells: Vec<RftWellObservation> = Vec::new();
        let mut index: HashMap<(String, NaiveDate, u32), usize> = HashMap::new();

        for row in reader.deserialize::<RftRow>() {
            let row = row?;
            let position = WellPosition::new(row.x, row.y, row.md, row.tvd, row.zone);
            let mut point = RftPoint::new(row.value, row.error, position);
            point.active = parse_active_flag(row.active.as_deref())?;

            let key = (row.well_name.clone(), row.date, row.restart);
            let slot = *index.entry(key).or_insert_with(|| {
                wells.push(RftWellObservation::new(
                    row.well_name.clone(),
                    row.date,
                    row.restart,
                    Vec::new(),
                ));
                wells.len() - 1
            });
            wells[slot].points.push(point);
        }

        debug!("Read RFT observations for {} well/dates", wells.len());
        Ok(wells)
    }
}

impl Default for ObservationTableReader {
    fn default() -> Self {
        Self::new()
    }
}
