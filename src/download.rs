use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::submission::SubmissionResult;

pub const DOCX_FILE_NAME: &str = "contrato_formatado.docx";
pub const PDF_FILE_NAME: &str = "contrato_visualizacao.pdf";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Where the two generated documents were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFiles {
    pub docx: PathBuf,
    pub pdf: PathBuf,
}

/// Fetch both documents of `result` into `dir`, creating it if needed.
/// Locators must already be absolute (see [`SubmissionResult::resolve`]).
pub async fn download_results(
    client: &Client,
    result: &SubmissionResult,
    dir: &Path,
) -> Result<DownloadedFiles, DownloadError> {
    tokio::fs::create_dir_all(dir).await?;

    let docx = dir.join(DOCX_FILE_NAME);
    let pdf = dir.join(PDF_FILE_NAME);
    fetch_to(client, &result.docx_url, &docx).await?;
    fetch_to(client, &result.pdf_url, &pdf).await?;

    Ok(DownloadedFiles { docx, pdf })
}

async fn fetch_to(client: &Client, url: &str, path: &Path) -> Result<(), DownloadError> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    let bytes = resp.bytes().await?;
    tokio::fs::write(path, &bytes).await?;
    info!("Saved {} ({} bytes) to {:?}", url, bytes.len(), path);
    Ok(())
}
