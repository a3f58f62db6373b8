mod backend;
mod error;
pub mod fallback;
mod payload;
pub mod stage;

pub use backend::{BackendResponse, DryrunBackend, FormattingBackend, HttpBackend, create_backend};
pub use error::{AttemptFailure, SubmissionError, TransportError};
pub use payload::{FormValue, SubmissionPayload};
pub use stage::{Stage, StageBoard, StageStatus};

use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::settings::ApiConfig;
use crate::status::StatusBoard;
use crate::wizard::{Activation, ContractConfig};
use fallback::{Exhausted, first_success};
use stage::{FORMATTING, OUTPUT_GENERATION, SERVER_PROCESSING, TRANSMIT};

/// Locators of the generated documents
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub docx_url: String,
    pub pdf_url: String,
}

impl SubmissionResult {
    /// Turn service-relative locators into absolute URLs against `base`
    pub fn resolve(&self, base: &str) -> SubmissionResult {
        SubmissionResult {
            docx_url: resolve_locator(base, &self.docx_url),
            pdf_url: resolve_locator(base, &self.pdf_url),
        }
    }
}

fn resolve_locator(base: &str, locator: &str) -> String {
    if Url::parse(locator).is_ok() {
        return locator.to_string();
    }
    Url::parse(base)
        .and_then(|base| base.join(locator))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| locator.to_string())
}

/// Sends one configuration to the formatting service and reports progress.
///
/// At most one submission runs per [`Activation`]; repeated triggers for an
/// activation that already started are ignored.
pub struct SubmissionOrchestrator {
    backend: Arc<dyn FormattingBackend>,
    candidates: Vec<String>,
    timeout: Duration,
    status: StatusBoard,
    last_started: AtomicU64,
}

impl SubmissionOrchestrator {
    pub fn new(
        backend: Arc<dyn FormattingBackend>,
        candidates: Vec<String>,
        timeout: Duration,
        status: StatusBoard,
    ) -> Self {
        Self {
            backend,
            candidates,
            timeout,
            status,
            last_started: AtomicU64::new(0),
        }
    }

    pub fn from_settings(api: &ApiConfig, backend: Arc<dyn FormattingBackend>, status: StatusBoard) -> Self {
        Self::new(backend, api.candidates.clone(), api.timeout(), status)
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn backend(&self) -> &Arc<dyn FormattingBackend> {
        &self.backend
    }

    /// Submit `config` for `activation`.
    ///
    /// Returns `None` when this activation was already started (duplicate
    /// trigger); nothing is sent and the status board is left alone.
    pub async fn submit(
        &self,
        activation: Activation,
        config: &ContractConfig,
    ) -> Option<Result<SubmissionResult, SubmissionError>> {
        let id = activation.id();
        if self.last_started.fetch_max(id, Ordering::SeqCst) >= id {
            debug!("Ignoring duplicate submission trigger for activation {}", id);
            return None;
        }

        info!("Starting submission for activation {}", id);
        let mut board = StageBoard::new();
        self.status.clear_error();
        self.status.set_stages(board.stages());

        let outcome = self.run(config, &mut board).await;
        match &outcome {
            Ok(result) => {
                info!("Submission succeeded: {} / {}", result.docx_url, result.pdf_url);
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                board.reset();
                self.status.set_stages(board.stages());
                self.status.set_error(e.user_message());
            }
        }
        Some(outcome)
    }

    async fn run(
        &self,
        config: &ContractConfig,
        board: &mut StageBoard,
    ) -> Result<SubmissionResult, SubmissionError> {
        let payload = SubmissionPayload::from_config(config).ok_or_else(|| {
            SubmissionError::Validation("contract content is missing".to_string())
        })?;

        self.advance(board, |b| b.start(TRANSMIT));

        let backend = &self.backend;
        let payload = &payload;
        let timeout = self.timeout;
        let winner = first_success(&self.candidates, |path| {
            let path = path.clone();
            async move {
                let response = tokio::time::timeout(timeout, backend.post_form(&path, payload))
                    .await
                    .map_err(|_| TransportError::Timeout {
                        path: path.clone(),
                        millis: timeout.as_millis(),
                    })??;

                if response.is_success() {
                    Ok::<_, AttemptFailure>(response)
                } else {
                    Err(AttemptFailure::Status {
                        path,
                        status: response.status,
                    })
                }
            }
        })
        .await
        .map_err(terminal_error)?;

        info!(
            "Candidate {} accepted the submission",
            self.candidates[winner.index]
        );

        self.advance(board, |b| {
            b.succeed(TRANSMIT);
            b.start(SERVER_PROCESSING);
        });
        // The service is one opaque call, so these two finish together
        self.advance(board, |b| {
            b.succeed(SERVER_PROCESSING);
            b.succeed(FORMATTING);
            b.start(OUTPUT_GENERATION);
        });

        let path = &self.candidates[winner.index];
        let body = tokio::time::timeout(self.timeout, winner.value.body())
            .await
            .map_err(|_| {
                SubmissionError::Transport(TransportError::Timeout {
                    path: path.clone(),
                    millis: self.timeout.as_millis(),
                })
            })?
            .map_err(SubmissionError::Transport)?;

        let result = parse_result(&body)?;
        self.advance(board, |b| b.succeed(OUTPUT_GENERATION));
        Ok(result)
    }

    fn advance<F: FnOnce(&mut StageBoard)>(&self, board: &mut StageBoard, change: F) {
        change(board);
        debug!(
            "Stages: {:?} (running: {:?})",
            board.stages().iter().map(|s| s.status).collect::<Vec<_>>(),
            board.running().map(|idx| board.stages()[idx].id)
        );
        self.status.set_stages(board.stages());
    }
}

/// Pick the error for a fully failed submission: a server error with the last
/// status seen if anything answered, a transport error otherwise.
fn terminal_error(exhausted: Exhausted<AttemptFailure>) -> SubmissionError {
    if let Some(last) = exhausted.last() {
        warn!("All {} candidate(s) failed, last: {}", exhausted.failures.len(), last);
    }

    let last_status = exhausted.failures.iter().rev().find_map(|f| match f {
        AttemptFailure::Status { status, .. } => Some(*status),
        AttemptFailure::Transport(_) => None,
    });
    if let Some(status) = last_status {
        return SubmissionError::Server { status };
    }

    let transport = exhausted
        .failures
        .into_iter()
        .rev()
        .find_map(|f| match f {
            AttemptFailure::Transport(e) => Some(e),
            AttemptFailure::Status { .. } => None,
        })
        .unwrap_or_else(|| TransportError::Request {
            path: String::new(),
            message: "no candidate endpoints configured".to_string(),
        });
    SubmissionError::Transport(transport)
}

fn parse_result(body: &[u8]) -> Result<SubmissionResult, SubmissionError> {
    let result: SubmissionResult = serde_json::from_slice(body)
        .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

    if result.docx_url.trim().is_empty() || result.pdf_url.trim().is_empty() {
        return Err(SubmissionError::MalformedResponse(
            "docxUrl and pdfUrl must both be present".to_string(),
        ));
    }
    Ok(result)
}
