use anyhow::Result;
use chrono::Utc;
use reqwest::Client;
use sheetloader::{
    auth,
    config::{self, Config},
    fetch,
    graph::GraphClient,
    resolve, shape,
    sink::{ParquetSink, TableSink},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging + config ────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    dotenv::dotenv().ok();
    let cfg = Config::from_env()?;
    let creds = config::credentials_from_env()?;
    info!(host = %cfg.host, file = %cfg.file_name, "startup");

    // ─── 2) authenticate ─────────────────────────────────────────────
    let http = Client::new();
    let token = auth::acquire_token(&http, &creds).await?;
    let graph = GraphClient::new(http, token);

    // ─── 3) resolve site → drive → content ───────────────────────────
    let site_id = resolve::resolve_site_id(&graph, &cfg.host, &cfg.search_site).await?;
    let drive_id = resolve::resolve_drive_id(&graph, &site_id).await?;
    let bytes =
        fetch::download_by_path(&graph, &site_id, &drive_id, &cfg.base_folder, &cfg.file_name)
            .await?;

    // ─── 4) shape the table ──────────────────────────────────────────
    let (table, sheet) = shape::shape_table(&bytes, &cfg.sheet_name, Utc::now())?;
    info!(
        sheet = %sheet.used,
        substituted = sheet.substituted,
        rows = table.rows.len(),
        cols = table.headers.len(),
        "table shaped"
    );

    // ─── 5) hand off to the sink ─────────────────────────────────────
    let destination = cfg.destination();
    let sink = ParquetSink::new(&cfg.out_dir);
    sink.write(&table, &destination)?;
    info!(table = %destination, "run complete");

    Ok(())
}
