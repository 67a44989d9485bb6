use crate::error::{ProcessingError, Result};
use crate::models::{
    MergedRftRecord, MergedRftTable, ObservedRftPoint, RftKey, SimulatedRftTable,
};
use crate::readers::{GendataReader, ObsReader};
use crate::utils::constants::{COL_REPORT_STEP, INACTIVE_SENTINEL};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct RftMerger {
    inactive_sentinel: f64,
}

impl RftMerger {
    pub fn new() -> Self {
        Self {
            inactive_sentinel: INACTIVE_SENTINEL,
        }
    }

    pub fn with_inactive_sentinel(inactive_sentinel: f64) -> Self {
        Self { inactive_sentinel }
    }

    /// Left join simulated RFT rows onto observations
    ///
    /// The join key is `(well, order, report_step)` when the simulated table
    /// has a `report_step` column, otherwise `(well, order)`. Every simulated
    /// row is kept, in input order.
    pub fn merge(
        &self,
        simulated: SimulatedRftTable,
        observations: &[ObservedRftPoint],
    ) -> Result<MergedRftTable> {
        if observations.is_empty() {
            return Err(ProcessingError::MissingData(
                "No RFT observations to merge with".to_string(),
            ));
        }

        let with_report_step = simulated.has_column(COL_REPORT_STEP);
        if !with_report_step {
            debug!("No report_step column in simulated data, joining on well and order only");
        }

        let lookup = self.index_observations(observations, with_report_step);

        let records: Vec<MergedRftRecord> = simulated
            .records
            .into_iter()
            .map(|mut sim| {
                if sim.pressure == Some(self.inactive_sentinel) {
                    sim.pressure = None;
                }
                let observation = lookup
                    .get(&sim.key(with_report_step))
                    .map(|obs| (*obs).clone());
                MergedRftRecord {
                    simulated: sim,
                    observation,
                }
            })
            .collect();

        Ok(MergedRftTable {
            sim_headers: simulated.headers,
            records,
        })
    }

    /// Index observations by join key, keeping the first of any duplicates
    fn index_observations<'a>(
        &self,
        observations: &'a [ObservedRftPoint],
        with_report_step: bool,
    ) -> HashMap<RftKey, &'a ObservedRftPoint> {
        let mut lookup = HashMap::with_capacity(observations.len());

        for obs in observations {
            let key = obs.key(with_report_step);
            if lookup.contains_key(&key) {
                warn!(
                    "Duplicate observation for well {} order {} (report step {}), keeping first",
                    obs.well, obs.order, obs.report_step
                );
                continue;
            }
            lookup.insert(key, obs);
        }

        lookup
    }

    /// Read both sides from disk and merge them
    pub fn merge_files(&self, gendata_csv: &Path, obs_dir: &Path) -> Result<MergedRftTable> {
        let simulated = GendataReader::new().read(gendata_csv)?;
        let observations = ObsReader::new().get_observations(obs_dir)?;

        if observations.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "No RFT observations found in {}",
                obs_dir.display()
            )));
        }

        let merged = self.merge(simulated, &observations)?;
        info!(
            "Merged {} simulated rows with {} observations",
            merged.len(),
            observations.len()
        );
        Ok(merged)
    }
}

impl Default for RftMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge a GENDATA_RFT csv with the observations in `obs_dir`
pub fn merge_rft_ertobs(gendata_csv: &Path, obs_dir: &Path) -> Result<MergedRftTable> {
    RftMerger::new().merge_files(gendata_csv, obs_dir)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub inactive_rows: usize,
    pub compared_rows: usize,
    pub mean_abs_misfit: Option<f64>,
}

impl MergeSummary {
    pub fn from_table(table: &MergedRftTable) -> Self {
        let matched_rows = table
            .records
            .iter()
            .filter(|r| r.observation.is_some())
            .count();
        let inactive_rows = table
            .records
            .iter()
            .filter(|r| r.pressure().is_none())
            .count();

        let misfits: Vec<f64> = table
            .records
            .iter()
            .filter_map(|r| r.misfit())
            .map(f64::abs)
            .collect();
        let mean_abs_misfit = if misfits.is_empty() {
            None
        } else {
            Some(misfits.iter().sum::<f64>() / misfits.len() as f64)
        };

        Self {
            total_rows: table.len(),
            matched_rows,
            inactive_rows,
            compared_rows: misfits.len(),
            mean_abs_misfit,
        }
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RFT Merge Summary:")?;
        writeln!(f, "  Simulated rows:    {}", self.total_rows)?;
        writeln!(f, "  Matched rows:      {}", self.matched_rows)?;
        writeln!(f, "  Inactive/no value: {}", self.inactive_rows)?;
        writeln!(f, "  Compared rows:     {}", self.compared_rows)?;
        match self.mean_abs_misfit {
            Some(misfit) => write!(f, "  Mean |obs - sim|:  {:.4}", misfit),
            None => write!(f, "  Mean |obs - sim|:  n/a"),
        }
    }
}
