//! CSV reading utilities.

mod header;
mod reader;

pub use header::{ColumnRole, CsvHeaders};
pub use reader::{
    detect_delimiter, read_evaluations, read_evaluations_from_reader, read_visits,
    read_visits_from_reader,
};
