pub mod ertobs_writer;
pub mod keywords;
pub mod parquet_writer;
pub mod table_writer;

pub use ertobs_writer::{write_dict_to_ertobs, ErtObsWriter};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use table_writer::{MergedTableWriter, SpaceSeparatedWriter};
