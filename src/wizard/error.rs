use thiserror::Error;

use super::step::WizardStep;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: WizardStep, to: WizardStep },

    #[error("Unsupported {expected} file: {name}")]
    UnsupportedFile { name: String, expected: &'static str },

    #[error("Paste the contract text or choose a .docx file")]
    MissingContent,

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WizardError>;
