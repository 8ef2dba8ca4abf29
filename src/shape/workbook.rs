use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tracing::{info, warn};

use crate::error::PipelineError;

/// Rows exactly as read from the spreadsheet, already coerced to text.
/// Exists only transiently between fetch and shape.
#[derive(Debug)]
pub struct RawTable {
    /// Headers as originally authored (may carry accents, symbols, case).
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Sheet actually read.
    pub sheet: String,
    /// True when the preferred sheet was absent and the first was used.
    pub substituted: bool,
}

/// Pick the preferred sheet when present, else the first sheet. The boolean
/// flags the substitution.
pub fn choose_sheet<'a>(names: &'a [String], preferred: &str) -> Option<(&'a str, bool)> {
    match names.iter().find(|n| n.as_str() == preferred) {
        Some(n) => Some((n.as_str(), false)),
        None => names.first().map(|n| (n.as_str(), true)),
    }
}

/// Coerce a cell to text. Missing cells become the empty string; whole-number
/// floats render without a fractional suffix so codes keep their authored
/// width.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => render_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| render_float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

fn render_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Parse the workbook bytes into a `RawTable`, reading the preferred sheet
/// or falling back to the first one.
pub fn read_workbook(bytes: &[u8], preferred: &str) -> Result<RawTable, PipelineError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| PipelineError::Schema(format!("failed to open workbook: {e}")))?;

    let names = workbook.sheet_names().to_vec();
    let (sheet, substituted) = choose_sheet(&names, preferred)
        .ok_or_else(|| PipelineError::Schema("workbook has no sheets".to_string()))?;
    let sheet = sheet.to_string();
    if substituted {
        warn!(requested = preferred, used = %sheet, "sheet not found, using first sheet");
    } else {
        info!(sheet = %sheet, "reading sheet");
    }

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| PipelineError::Schema(format!("failed to read sheet {sheet:?}: {e}")))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| PipelineError::Schema(format!("sheet {sheet:?} is empty")))?
        .iter()
        .map(cell_to_string)
        .collect();
    let rows: Vec<Vec<String>> = rows_iter
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable {
        headers,
        rows,
        sheet,
        substituted,
    })
}
