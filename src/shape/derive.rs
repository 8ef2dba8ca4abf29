use chrono::{DateTime, Utc};

use super::Table;
use crate::error::PipelineError;

/// Account identifier column; must exist after normalization.
pub const ACCOUNT_COLUMN: &str = "conta";
/// Account code that bypasses zero-padding.
pub const ACCOUNT_SENTINEL: &str = "BPRC04";
/// Padded width of the final account value.
pub const ACCOUNT_WIDTH: usize = 10;
/// Character-count column derived from the account.
pub const COUNT_COLUMN: &str = "contagem";
/// Padded/pass-through variant of the account.
pub const FINAL_COLUMN: &str = "conta_final";
/// Ingestion timestamp column, appended only when absent.
pub const INGESTION_COLUMN: &str = "daingestao";

/// Preferred output ordering; names not present are skipped, remaining
/// columns keep their existing relative order after these.
pub const EXPECTED_COLUMNS: &[&str] = &[
    "sap",
    "conta",
    "tipo",
    "cnpj",
    "razaosocial",
    "informacaopdd",
    COUNT_COLUMN,
    FINAL_COLUMN,
    INGESTION_COLUMN,
];

/// Sentinel passes through untouched; shorter-than-width values are
/// left-padded with zeros; everything else passes through. The sentinel check
/// must run first: the sentinel is shorter than the pad width and would
/// otherwise be padded.
pub fn final_account(account: &str) -> String {
    if account == ACCOUNT_SENTINEL {
        return account.to_string();
    }
    let len = account.chars().count();
    if len < ACCOUNT_WIDTH {
        let mut padded = "0".repeat(ACCOUNT_WIDTH - len);
        padded.push_str(account);
        padded
    } else {
        account.to_string()
    }
}

/// Append the derived columns. The account column is required; `contagem`
/// and `conta_final` replace same-named columns if present, `daingestao` is
/// only added when no case-variant of it exists.
pub fn append_derived(table: &mut Table, now: DateTime<Utc>) -> Result<(), PipelineError> {
    let idx = table.column_index(ACCOUNT_COLUMN).ok_or_else(|| {
        PipelineError::Schema(format!(
            "column {ACCOUNT_COLUMN:?} not found after normalization"
        ))
    })?;

    let counts: Vec<String> = table
        .rows
        .iter()
        .map(|r| r[idx].chars().count().to_string())
        .collect();
    let finals: Vec<String> = table.rows.iter().map(|r| final_account(&r[idx])).collect();
    table.set_column(COUNT_COLUMN, counts);
    table.set_column(FINAL_COLUMN, finals);

    if !table
        .headers
        .iter()
        .any(|h| h.eq_ignore_ascii_case(INGESTION_COLUMN))
    {
        let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let stamps = vec![stamp; table.rows.len()];
        table.set_column(INGESTION_COLUMN, stamps);
    }
    Ok(())
}

/// Reorder to the expected sequence (present names only), then everything
/// else in its existing relative order.
pub fn order_columns(table: &mut Table) {
    let mut order: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_some())
        .map(|c| (*c).to_string())
        .collect();
    for h in &table.headers {
        if !EXPECTED_COLUMNS.contains(&h.as_str()) {
            order.push(h.clone());
        }
    }
    table.reorder(&order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| (*s).to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| (*s).to_string()).collect())
                .collect(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, 12, 0, 0).unwrap()
    }

    #[test]
    fn sentinel_short_circuits_before_padding() {
        assert_eq!(final_account("BPRC04"), "BPRC04");
    }

    #[test]
    fn short_accounts_pad_to_width_ten() {
        assert_eq!(final_account("12345"), "0000012345");
        assert_eq!(final_account(""), "0000000000");
    }

    #[test]
    fn long_accounts_pass_through() {
        assert_eq!(final_account("123456789012"), "123456789012");
        assert_eq!(final_account("1234567890"), "1234567890");
    }

    #[test]
    fn missing_account_column_is_schema_error() {
        let mut t = table(&["sap", "tipo"], &[&["1", "a"]]);
        let err = append_derived(&mut t, fixed_now()).unwrap_err();
        assert!(err.to_string().contains("conta"));
    }

    #[test]
    fn derived_columns_and_timestamp_are_appended() {
        let mut t = table(&["conta"], &[&["12345"], &["BPRC04"]]);
        append_derived(&mut t, fixed_now()).unwrap();
        assert_eq!(t.headers, vec!["conta", "contagem", "conta_final", "daingestao"]);
        assert_eq!(t.rows[0], vec!["12345", "5", "0000012345", "2026-02-03 12:00:00"]);
        assert_eq!(t.rows[1], vec!["BPRC04", "6", "BPRC04", "2026-02-03 12:00:00"]);
    }

    #[test]
    fn existing_ingestion_column_is_kept_case_insensitively() {
        let mut t = Table {
            headers: vec!["conta".into(), "DaIngestao".into()],
            rows: vec![vec!["1".into(), "old".into()]],
        };
        append_derived(&mut t, fixed_now()).unwrap();
        assert!(!t.headers.iter().any(|h| h == INGESTION_COLUMN));
        assert_eq!(t.rows[0][1], "old");
    }

    #[test]
    fn expected_columns_lead_and_the_rest_keep_relative_order() {
        let mut t = table(
            &["extra2", "conta", "extra1", "sap"],
            &[&["x2", "1", "x1", "s"]],
        );
        order_columns(&mut t);
        assert_eq!(t.headers, vec!["sap", "conta", "extra2", "extra1"]);
        assert_eq!(t.rows[0], vec!["s", "1", "x2", "x1"]);
    }
}
