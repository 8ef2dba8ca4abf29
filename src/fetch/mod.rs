use tracing::info;

use crate::error::PipelineError;
use crate::graph::{GraphClient, DOWNLOAD_TIMEOUT};

/// Join folder path and file name into the drive-relative path, trimming
/// leading/trailing separators.
pub fn relative_path(folder: &str, file: &str) -> String {
    format!("{}/{}", folder.trim_matches('/'), file)
        .trim_matches('/')
        .to_string()
}

/// Download the workbook bytes at `folder/file` inside the resolved drive.
/// Single shot: any non-success status is fatal and carries the status code,
/// response body and the attempted relative path.
pub async fn download_by_path(
    graph: &GraphClient,
    site_id: &str,
    drive_id: &str,
    folder: &str,
    file: &str,
) -> Result<Vec<u8>, PipelineError> {
    let rel = relative_path(folder, file);
    let url = format!(
        "{}/sites/{}/drives/{}/root:/{}:/content",
        graph.base(),
        site_id,
        drive_id,
        rel
    );

    let resp = graph
        .get(&url, DOWNLOAD_TIMEOUT)
        .send()
        .await
        .map_err(|e| PipelineError::http(&url, e))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PipelineError::Fetch {
            status: status.as_u16(),
            body,
            path: rel,
        });
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| PipelineError::http(&url, e))?;
    info!(path = %rel, bytes = bytes.len(), "downloaded workbook");
    Ok(bytes.to_vec())
}
