use thiserror::Error;

use crate::download::DownloadError;
use crate::settings::ConfigError;
use crate::submission::SubmissionError;
use crate::wizard::WizardError;

#[derive(Error, Debug)]
pub enum DesignerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, DesignerError>;
