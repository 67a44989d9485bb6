use crate::error::{ProcessingError, Result};
use crate::models::MergedRftTable;
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write the typed columns of a merged RFT table
    ///
    /// Extra simulated columns are only kept by the csv output.
    pub fn write_merged(&self, table: &MergedRftTable, path: &Path) -> Result<()> {
        let schema = Self::create_schema();
        let batch = Self::table_to_batch(table, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!("Written {} merged rows to {}", table.len(), path.display());
        Ok(())
    }

    fn create_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("well", DataType::Utf8, false),
            Field::new("time", DataType::Utf8, true),
            Field::new("report_step", DataType::UInt32, true),
            Field::new("order", DataType::UInt64, false),
            Field::new("pressure", DataType::Float64, true),
            Field::new("observed", DataType::Float64, true),
            Field::new("error", DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn table_to_batch(table: &MergedRftTable, schema: Arc<Schema>) -> Result<RecordBatch> {
        let records = &table.records;

        let wells: Vec<&str> = records.iter().map(|r| r.well()).collect();
        let times: Vec<Option<&str>> = records
            .iter()
            .map(|r| r.simulated.time.as_deref())
            .collect();
        let report_steps: Vec<Option<u32>> =
            records.iter().map(|r| r.simulated.report_step).collect();
        let orders: Vec<u64> = records.iter().map(|r| r.simulated.order as u64).collect();
        let pressures: Vec<Option<f64>> = records.iter().map(|r| r.pressure()).collect();
        let observed: Vec<Option<f64>> = records.iter().map(|r| r.observed()).collect();
        let errors: Vec<Option<f64>> = records.iter().map(|r| r.error()).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(wells)) as ArrayRef,
            Arc::new(StringArray::from(times)) as ArrayRef,
            Arc::new(UInt32Array::from(report_steps)) as ArrayRef,
            Arc::new(UInt64Array::from(orders)) as ArrayRef,
            Arc::new(Float64Array::from(pressures)) as ArrayRef,
            Arc::new(Float64Array::from(observed)) as ArrayRef,
            Arc::new(Float64Array::from(errors)) as ArrayRef,
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergedRftRecord, SimulatedRftRecord};
    use tempfile::NamedTempFile;

    fn table(rows: usize) -> MergedRftTable {
        let records = (0..rows)
            .map(|order| MergedRftRecord {
                simulated: SimulatedRftRecord {
                    well: "R_A2".to_string(),
                    time: Some("2018-03-01".to_string()),
                    report_step: Some(1),
                    order,
                    pressure: if order == 0 { None } else { Some(300.0) },
                    fields: vec![],
                },
                observation: None,
            })
            .collect();
        MergedRftTable {
            sim_headers: vec![],
            records,
        }
    }

    #[test]
    fn test_write_merged_table() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_merged(&table(3), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 3);
        assert!(info.summary().contains("Total rows: 3"));

        Ok(())
    }

    #[test]
    fn test_row_group_size() -> Result<()> {
        let writer = ParquetWriter::new().with_row_group_size(2);
        let temp_file = NamedTempFile::new()?;

        writer.write_merged(&table(5), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 5);
        assert_eq!(info.row_groups, 3);

        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_merged(&table(2), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli9").is_err());
        Ok(())
    }
}
