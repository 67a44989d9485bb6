use crate::error::Result;
use crate::models::{MergedRftTable, RftPoint};
use crate::utils::constants::{COL_PRESSURE, MERGED_OBS_COLUMNS};
use crate::writers::keywords::format_float;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes whitespace separated, header-less tables as read by ERT and GENDATA_RFT
pub struct SpaceSeparatedWriter;

impl SpaceSeparatedWriter {
    fn writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
        let file = BufWriter::new(File::create(path)?);
        Ok(csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(file))
    }

    /// Write rows of already formatted fields
    pub fn write_rows<I, R>(path: &Path, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let mut writer = Self::writer(path)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        debug!("Written {}", path.display());
        Ok(())
    }

    /// `value error` per point
    pub fn write_values(path: &Path, points: &[&RftPoint]) -> Result<()> {
        Self::write_rows(
            path,
            points
                .iter()
                .map(|p| [format_float(p.value), format_float(p.error)]),
        )
    }

    /// `x y md tvd zone` per point
    pub fn write_positions(path: &Path, points: &[&RftPoint]) -> Result<()> {
        Self::write_rows(
            path,
            points.iter().map(|p| {
                [
                    format_float(p.position.x),
                    format_float(p.position.y),
                    format_float(p.position.md),
                    format_float(p.position.tvd),
                    p.position.zone.clone(),
                ]
            }),
        )
    }
}

fn optional_float(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}

/// Writes a merged RFT table as csv or JSON
pub struct MergedTableWriter;

impl MergedTableWriter {
    /// Simulated columns first, in their original order, then the observation columns
    pub fn write_csv(table: &MergedRftTable, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        Self::write_csv_to(table, BufWriter::new(file))?;
        debug!("Written {} merged rows to {}", table.len(), path.display());
        Ok(())
    }

    pub fn write_csv_to<W: Write>(table: &MergedRftTable, output: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(output);
        let pressure_idx = table.sim_headers.iter().position(|h| h == COL_PRESSURE);

        let mut header: Vec<&str> = table.sim_headers.iter().map(String::as_str).collect();
        header.extend(MERGED_OBS_COLUMNS);
        writer.write_record(&header)?;

        for record in &table.records {
            let mut row: Vec<String> = record.simulated.fields.clone();
            row.resize(table.sim_headers.len(), String::new());
            if let Some(idx) = pressure_idx {
                row[idx] = optional_float(record.pressure());
            }

            let position = record
                .observation
                .as_ref()
                .and_then(|o| o.position.as_ref());
            row.push(optional_float(record.observed()));
            row.push(optional_float(record.error()));
            row.push(optional_float(position.map(|p| p.x)));
            row.push(optional_float(position.map(|p| p.y)));
            row.push(optional_float(position.map(|p| p.md)));
            row.push(optional_float(position.map(|p| p.tvd)));
            row.push(position.map(|p| p.zone.clone()).unwrap_or_default());

            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_json(table: &MergedRftTable, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &table.rows())?;
        debug!("Written {} merged rows to {}", table.len(), path.display());
        Ok(())
    }
}
