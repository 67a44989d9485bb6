use crate::error::{ProcessingError, Result};
use crate::models::{ObservedRftPoint, WellPosition};
use crate::utils::filename::parse_obs_filename;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads RFT observations back from a directory of `.obs` files
///
/// Each `.obs` file holds `observed error` pairs, one per line, for one well
/// and report step. A `.txt` file with the same stem (or named after the well)
/// may hold `x y md tvd zone` for the same lines.
pub struct ObsReader {
    extension: String,
}

impl ObsReader {
    pub fn new() -> Self {
        Self {
            extension: "obs".to_string(),
        }
    }

    /// Gather all observations in `obs_dir`, files visited in name order
    pub fn get_observations(&self, obs_dir: &Path) -> Result<Vec<ObservedRftPoint>> {
        if !obs_dir.is_dir() {
            return Err(ProcessingError::MissingData(format!(
                "Observation directory {} does not exist",
                obs_dir.display()
            )));
        }

        let mut obs_files: Vec<PathBuf> = fs::read_dir(obs_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
            })
            .collect();
        obs_files.sort();

        let mut observations = Vec::new();
        for obs_file in &obs_files {
            let points = self.read_obs_file(obs_file)?;
            if points.is_empty() {
                warn!("No valid observations in {}, skipping", obs_file.display());
                continue;
            }
            observations.extend(points);
        }

        debug!(
            "Read {} observations from {} files in {}",
            observations.len(),
            obs_files.len(),
            obs_dir.display()
        );
        Ok(observations)
    }

    /// Read one `.obs` file plus its position file, if present
    pub fn read_obs_file(&self, path: &Path) -> Result<Vec<ObservedRftPoint>> {
        let Some((well, report_step)) = parse_obs_filename(path) else {
            warn!("Cannot derive well name from {}", path.display());
            return Ok(Vec::new());
        };

        // stray files may hold anything, invalid UTF-8 just fails to parse as numbers
        let content = String::from_utf8_lossy(&fs::read(path)?).into_owned();
        let positions = match self.position_file(path, &well) {
            Some(txt) => Self::parse_positions(&fs::read(&txt)?),
            None => Vec::new(),
        };

        let mut points = Vec::new();
        for (order, line) in content.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            match Self::parse_obs_line(line) {
                Some((observed, error)) => points.push(ObservedRftPoint {
                    well: well.clone(),
                    report_step,
                    order,
                    observed,
                    error,
                    position: positions.get(order).cloned().flatten(),
                }),
                None => debug!(
                    "Skipping line {} in {}: '{}'",
                    order + 1,
                    path.display(),
                    line.trim()
                ),
            }
        }

        Ok(points)
    }

    /// First two whitespace separated fields as numbers; extra fields are ignored
    fn parse_obs_line(line: &str) -> Option<(f64, f64)> {
        let mut fields = line.split_whitespace();
        let observed = fields.next()?.parse::<f64>().ok()?;
        let error = fields.next()?.parse::<f64>().ok()?;
        if observed.is_nan() || error.is_nan() {
            return None;
        }
        Some((observed, error))
    }

    fn position_file(&self, obs_file: &Path, well: &str) -> Option<PathBuf> {
        let same_stem = obs_file.with_extension("txt");
        if same_stem.is_file() {
            return Some(same_stem);
        }
        let by_well = obs_file.with_file_name(format!("{}.txt", well));
        by_well.is_file().then_some(by_well)
    }

    /// One entry per non-blank line, `None` where the line does not parse
    ///
    /// Position files are space separated with csv quoting, as written by
    /// `SpaceSeparatedWriter`, so a quoted zone may contain spaces.
    fn parse_positions(content: &[u8]) -> Vec<Option<WellPosition>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_reader(content);

        let mut positions = Vec::new();
        for result in reader.byte_records() {
            let Ok(record) = result else {
                positions.push(None);
                continue;
            };
            let fields: Vec<String> = record
                .iter()
                .filter(|f| !f.is_empty())
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();
            if fields.is_empty() {
                continue;
            }
            positions.push(Self::parse_position(&fields));
        }
        positions
    }

    fn parse_position(fields: &[String]) -> Option<WellPosition> {
        if fields.len() < 5 {
            return None;
        }
        let x = fields[0].parse::<f64>().ok()?;
        let y = fields[1].parse::<f64>().ok()?;
        let md = fields[2].parse::<f64>().ok()?;
        let tvd = fields[3].parse::<f64>().ok()?;
        Some(WellPosition::new(x, y, md, tvd, fields[4..].join(" ")))
    }
}

impl Default for ObsReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Gather observations from `obs_dir` with the default reader
pub fn get_observations(obs_dir: &Path) -> Result<Vec<ObservedRftPoint>> {
    ObsReader::new().get_observations(obs_dir)
}
