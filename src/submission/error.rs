use thiserror::Error;

const VALIDATION_MESSAGE: &str =
    "No contract content found. Go back and paste the text or choose a .docx file.";
const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the formatting server. Check that the backend is up and try again.";

/// A single candidate's request never produced a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {path} failed: {message}")]
    Request { path: String, message: String },

    #[error("request to {path} timed out after {millis}ms")]
    Timeout { path: String, millis: u128 },
}

/// Why one candidate endpoint was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{path} answered HTTP {status}")]
    Status { path: String, status: u16 },
}

/// Terminal outcome of a failed submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// No candidate produced a response, or the accepted body could not be read
    #[error("no response from server: {0}")]
    Transport(TransportError),

    /// At least one candidate responded, none with success. Carries the last status seen.
    #[error("server error: HTTP {status}")]
    Server { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl SubmissionError {
    /// True when revising the input can fix it; otherwise only a retry helps
    pub fn is_user_fixable(&self) -> bool {
        matches!(self, SubmissionError::Validation(_))
    }

    /// The one message the UI shows for this failure
    pub fn user_message(&self) -> &'static str {
        if self.is_user_fixable() {
            VALIDATION_MESSAGE
        } else {
            CONNECTIVITY_MESSAGE
        }
    }
}
