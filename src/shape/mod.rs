pub mod columns;
pub mod derive;
pub mod workbook;

use chrono::{DateTime, Utc};

use crate::error::PipelineError;

/// In-memory tabular value flowing through the shaper. All cells are text;
/// every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Replace the named column's values, or append it as a new column.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
    }

    /// Reorder columns to the given header sequence, which must be a
    /// permutation of the current headers.
    pub fn reorder(&mut self, order: &[String]) {
        let indices: Vec<usize> = order
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        debug_assert_eq!(indices.len(), self.headers.len());
        for row in &mut self.rows {
            *row = indices.iter().map(|&i| row[i].clone()).collect();
        }
        self.headers = order.to_vec();
    }
}

/// Which sheet the shaper actually read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSelection {
    pub used: String,
    /// True when the preferred sheet was absent and the first sheet was
    /// substituted.
    pub substituted: bool,
}

/// Full shaping pass: parse the workbook, normalize headers, append derived
/// columns, fix the output ordering. `now` stamps the ingestion column.
pub fn shape_table(
    bytes: &[u8],
    preferred_sheet: &str,
    now: DateTime<Utc>,
) -> Result<(Table, SheetSelection), PipelineError> {
    let raw = workbook::read_workbook(bytes, preferred_sheet)?;
    let selection = SheetSelection {
        used: raw.sheet,
        substituted: raw.substituted,
    };

    let headers = columns::normalize_headers(&raw.headers)?;
    let mut table = Table {
        headers,
        rows: raw.rows,
    };

    derive::append_derived(&mut table, now)?;
    derive::order_columns(&mut table);
    Ok((table, selection))
}
