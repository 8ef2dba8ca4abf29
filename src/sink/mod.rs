pub mod parquet;

pub use parquet::ParquetSink;

use anyhow::Result;
use std::fmt;

use crate::shape::Table;

/// Fully-qualified destination of a normalized table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

/// Storage abstraction accepting the finalized table. Overwrite semantics:
/// both data and schema of the destination are replaced.
pub trait TableSink {
    fn write(&self, table: &Table, destination: &Destination) -> Result<()>;
}
