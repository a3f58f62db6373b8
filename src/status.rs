use std::sync::Arc;
use tokio::sync::watch;

use crate::submission::Stage;
use crate::submission::stage::StageBoard;
use crate::wizard::WizardStep;

/// What the UI needs to render the current state of a wizard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub stages: Vec<Stage>,
    pub error: Option<String>,
}

impl Default for WizardSnapshot {
    fn default() -> Self {
        Self {
            step: WizardStep::Upload,
            stages: StageBoard::new().stages().to_vec(),
            error: None,
        }
    }
}

/// Shared publisher for [`WizardSnapshot`].
///
/// The controller owns the `step` field and the orchestrator owns `stages`
/// and `error`; every write notifies all subscribers.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<WizardSnapshot>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WizardSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> WizardSnapshot {
        self.tx.borrow().clone()
    }

    pub fn set_step(&self, step: WizardStep) {
        self.tx.send_modify(|snapshot| snapshot.step = step);
    }

    pub fn set_stages(&self, stages: &[Stage]) {
        self.tx.send_modify(|snapshot| snapshot.stages = stages.to_vec());
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|snapshot| snapshot.error = Some(message));
    }

    pub fn clear_error(&self) {
        self.tx.send_modify(|snapshot| snapshot.error = None);
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
