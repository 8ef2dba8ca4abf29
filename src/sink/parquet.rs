use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::arrow::ArrowWriter;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
    sync::Arc,
};
use tracing::info;

use super::{Destination, TableSink};
use crate::shape::Table;

/// Writes the normalized table as a single Parquet file at
/// `<root>/<catalog>/<schema>/<table>.parquet`. The file is written to a
/// temporary sibling and renamed over the destination, so a partial write
/// never replaces a previous table.
pub struct ParquetSink {
    root: PathBuf,
}

impl ParquetSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ParquetSink { root: root.into() }
    }

    fn final_path(&self, destination: &Destination) -> PathBuf {
        self.root
            .join(&destination.catalog)
            .join(&destination.schema)
            .join(format!("{}.parquet", destination.table))
    }
}

fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let fields: Vec<Field> = table
        .headers
        .iter()
        .map(|h| Field::new(h, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays: Vec<ArrayRef> = (0..table.headers.len())
        .map(|i| {
            let values = table.rows.iter().map(|r| r[i].as_str());
            Arc::new(StringArray::from_iter_values(values)) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(schema, arrays).context("building record batch")
}

impl TableSink for ParquetSink {
    fn write(&self, table: &Table, destination: &Destination) -> Result<()> {
        let final_path = self.final_path(destination);
        let dir = final_path
            .parent()
            .context("destination path has no parent")?
            .to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

        let tmp_path = dir.join(format!(".{}.parquet.tmp", destination.table));
        let batch = to_record_batch(table)?;

        let file = File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), None)
            .context("creating parquet writer")?;
        writer.write(&batch).context("writing record batch")?;
        writer.close().context("closing parquet writer")?;

        fs::rename(&tmp_path, &final_path).with_context(|| {
            format!(
                "renaming {} -> {}",
                tmp_path.display(),
                final_path.display()
            )
        })?;

        info!(
            table = %destination,
            path = %final_path.display(),
            rows = table.rows.len(),
            "table overwritten"
        );
        Ok(())
    }
}
