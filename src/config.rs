use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::auth::ClientCredentials;
use crate::sink::Destination;

/// Run configuration, read once from the environment in `main` and passed
/// into the stages. Nothing here is process-wide state.
#[derive(Debug, Clone)]
pub struct Config {
    /// SharePoint host, e.g. `contoso.sharepoint.com`.
    pub host: String,
    /// Search term used to locate the site.
    pub search_site: String,
    /// Folder path of the workbook inside the drive.
    pub base_folder: String,
    /// File name of the workbook.
    pub file_name: String,
    /// Preferred sheet; the first sheet is used when absent.
    pub sheet_name: String,
    /// Destination qualifiers.
    pub catalog: String,
    pub schema: String,
    pub table: String,
    /// Root directory of the parquet sink.
    pub out_dir: PathBuf,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            host: required("SHEETLOADER_HOST")?,
            search_site: required("SHEETLOADER_SEARCH_SITE")?,
            base_folder: required("SHEETLOADER_BASE_FOLDER")?,
            file_name: required("SHEETLOADER_FILE_NAME")?,
            sheet_name: or_default("SHEETLOADER_SHEET_NAME", "Planilha1"),
            catalog: or_default("SHEETLOADER_CATALOG", "develop"),
            schema: or_default("SHEETLOADER_SCHEMA", "planejamento"),
            table: or_default("SHEETLOADER_TABLE", "dim_de_para_categoria"),
            out_dir: PathBuf::from(or_default("SHEETLOADER_OUT_DIR", "tables")),
        })
    }

    pub fn destination(&self) -> Destination {
        Destination {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            table: self.table.clone(),
        }
    }
}

/// App-registration secrets, kept apart from the plain run parameters.
pub fn credentials_from_env() -> Result<ClientCredentials> {
    Ok(ClientCredentials {
        tenant_id: required("AZURE_TENANT_ID")?,
        client_id: required("AZURE_CLIENT_ID")?,
        client_secret: required("AZURE_CLIENT_SECRET")?,
    })
}
