use crate::error::{ProcessingError, Result};
use crate::models::{SimulatedRftRecord, SimulatedRftTable};
use crate::utils::constants::{COL_ORDER, COL_PRESSURE, COL_REPORT_STEP, COL_TIME, COL_WELL};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads the csv that the GENDATA_RFT forward model aggregates per realization
pub struct GendataReader;

struct ColumnLayout {
    well: usize,
    order: usize,
    pressure: usize,
    time: Option<usize>,
    report_step: Option<usize>,
}

impl GendataReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<SimulatedRftTable> {
        let file = File::open(path)?;
        self.read_from(file, &path.display().to_string())
    }

    pub fn read_from<R: Read>(&self, input: R, source_name: &str) -> Result<SimulatedRftTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let layout = Self::layout(&headers, source_name)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let well = field(layout.well).to_string();
            if well.is_empty() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Empty well name on row {} of {}",
                    row + 1,
                    source_name
                )));
            }

            let order = parse_index(field(layout.order)).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Invalid order '{}' on row {} of {}",
                    field(layout.order),
                    row + 1,
                    source_name
                ))
            })?;

            let report_step = match layout.report_step {
                Some(idx) => {
                    let step = parse_index(field(idx))
                        .and_then(|value| u32::try_from(value).ok())
                        .ok_or_else(|| {
                            ProcessingError::InvalidFormat(format!(
                                "Invalid report step '{}' on row {} of {}",
                                field(idx),
                                row + 1,
                                source_name
                            ))
                        })?;
                    Some(step)
                }
                None => None,
            };

            let pressure = parse_optional_float(field(layout.pressure)).map_err(|_| {
                ProcessingError::InvalidFormat(format!(
                    "Invalid pressure '{}' on row {} of {}",
                    field(layout.pressure),
                    row + 1,
                    source_name
                ))
            })?;

            let time = layout
                .time
                .map(|idx| field(idx).to_string())
                .filter(|t| !t.is_empty());

            records.push(SimulatedRftRecord {
                well,
                time,
                report_step,
                order,
                pressure,
                fields: record.iter().map(|f| f.to_string()).collect(),
            });
        }

        debug!("Read {} simulated RFT rows from {}", records.len(), source_name);
        Ok(SimulatedRftTable::new(headers, records))
    }

    fn layout(headers: &[String], source_name: &str) -> Result<ColumnLayout> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| ProcessingError::MissingColumn {
                column: name.to_string(),
                source_name: source_name.to_string(),
            })
        };

        Ok(ColumnLayout {
            well: require(COL_WELL)?,
            order: require(COL_ORDER)?,
            pressure: require(COL_PRESSURE)?,
            time: find(COL_TIME),
            report_step: find(COL_REPORT_STEP),
        })
    }
}

impl Default for GendataReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a non-negative index written either as `3` or as `3.0`
fn parse_index(raw: &str) -> Option<usize> {
    if let Ok(value) = raw.parse::<usize>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as usize)
    } else {
        None
    }
}

fn parse_optional_float(raw: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw.parse::<f64>()?;
    Ok((!value.is_nan()).then_some(value))
}
