mod config;
mod error;
mod step;

pub use config::{
    ConfigPatch, ContractConfig, ContractContent, DEFAULT_PRIMARY_COLOR, FileHandle, FileKind,
    PrimaryColor,
};
pub use error::{Result, WizardError};
pub use step::WizardStep;

use tracing::{debug, info};

use crate::status::StatusBoard;
use crate::submission::SubmissionResult;
use crate::submission::stage::StageBoard;

/// Identifies one entry into the Processing step.
///
/// Ids grow monotonically over the lifetime of a controller, so a submission
/// guard can tell a fresh entry apart from a repeated trigger of the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Activation(u64);

impl Activation {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Sequences the wizard steps and is the only writer of [`ContractConfig`]
#[derive(Debug)]
pub struct WizardController {
    step: WizardStep,
    config: ContractConfig,
    default_config: ContractConfig,
    result: Option<SubmissionResult>,
    activations: u64,
    status: StatusBoard,
}

impl WizardController {
    pub fn new(status: StatusBoard) -> Self {
        Self::with_defaults(ContractConfig::default(), status)
    }

    /// Start from a custom default (e.g. a configured brand color).
    /// `reset` returns to this value.
    pub fn with_defaults(default_config: ContractConfig, status: StatusBoard) -> Self {
        status.set_step(WizardStep::Upload);
        Self {
            step: WizardStep::Upload,
            config: default_config.clone(),
            default_config,
            result: None,
            activations: 0,
            status,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Immutable copy of the configuration for one submission
    pub fn snapshot(&self) -> ContractConfig {
        self.config.clone()
    }

    /// The activation of the current Processing entry, if we are in Processing
    pub fn activation(&self) -> Option<Activation> {
        (self.step == WizardStep::Processing).then_some(Activation(self.activations))
    }

    /// Merge the patch a completed step emitted and move forward to `step`.
    ///
    /// Only the next step in sequence is accepted, and Result is reserved for
    /// [`complete_submission`](Self::complete_submission).
    pub fn advance(&mut self, step: WizardStep, patch: ConfigPatch) -> Result<()> {
        if self.step.next() != Some(step) || step == WizardStep::Result {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                to: step,
            });
        }

        self.config.merge(patch);
        if step == WizardStep::Processing {
            self.activations += 1;
            info!("Entering processing (activation {})", self.activations);
        }
        self.transition(step);
        Ok(())
    }

    /// Revisit an earlier step without touching the configuration
    pub fn go_back(&mut self, step: WizardStep) -> Result<()> {
        if self.step.previous() != Some(step) {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                to: step,
            });
        }
        self.transition(step);
        Ok(())
    }

    /// Store the submission outcome and show the Result step
    pub fn complete_submission(&mut self, result: SubmissionResult) -> Result<()> {
        if self.step != WizardStep::Processing {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                to: WizardStep::Result,
            });
        }
        self.result = Some(result);
        self.transition(WizardStep::Result);
        Ok(())
    }

    /// Start over: default configuration, no result, first step, clean progress
    pub fn reset(&mut self) {
        info!("Resetting wizard");
        self.config = self.default_config.clone();
        self.result = None;
        self.status.set_stages(StageBoard::new().stages());
        self.status.clear_error();
        self.transition(WizardStep::Upload);
    }

    fn transition(&mut self, step: WizardStep) {
        debug!("Wizard step {} -> {}", self.step, step);
        self.step = step;
        self.status.set_step(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> WizardController {
        WizardController::new(StatusBoard::new())
    }

    fn result() -> SubmissionResult {
        SubmissionResult {
            docx_url: "https://x/a.docx".into(),
            pdf_url: "https://x/a.pdf".into(),
        }
    }

    fn walk_to_processing(wizard: &mut WizardController) {
        wizard
            .advance(WizardStep::Branding, ConfigPatch::new().text("CLÁUSULA 1"))
            .unwrap();
        wizard.advance(WizardStep::Preview, ConfigPatch::new()).unwrap();
        wizard.advance(WizardStep::Processing, ConfigPatch::new()).unwrap();
    }

    #[test]
    fn happy_path_reaches_result() {
        let mut wizard = controller();
        walk_to_processing(&mut wizard);
        assert_eq!(wizard.step(), WizardStep::Processing);

        wizard.complete_submission(result()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Result);
        assert_eq!(wizard.result(), Some(&result()));
        assert_eq!(wizard.status().current().step, WizardStep::Result);
    }

    #[test]
    fn skipping_steps_is_rejected_without_side_effects() {
        let mut wizard = controller();
        let err = wizard
            .advance(WizardStep::Preview, ConfigPatch::new().text("x"))
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert!(wizard.config().content.is_none());
    }

    #[test]
    fn result_is_only_reachable_through_completion() {
        let mut wizard = controller();
        walk_to_processing(&mut wizard);
        assert!(wizard.advance(WizardStep::Result, ConfigPatch::new()).is_err());
        assert_eq!(wizard.step(), WizardStep::Processing);
    }

    #[test]
    fn complete_submission_requires_processing() {
        let mut wizard = controller();
        assert!(wizard.complete_submission(result()).is_err());
        assert!(wizard.result().is_none());
    }

    #[test]
    fn go_back_keeps_configuration() {
        let mut wizard = controller();
        wizard
            .advance(WizardStep::Branding, ConfigPatch::new().text("CLÁUSULA 1"))
            .unwrap();
        wizard
            .advance(
                WizardStep::Preview,
                ConfigPatch::new().primary_color("#000000".parse().unwrap()),
            )
            .unwrap();

        wizard.go_back(WizardStep::Branding).unwrap();
        wizard.go_back(WizardStep::Upload).unwrap();
        assert_eq!(wizard.config().primary_color.as_str(), "#000000");
        assert!(wizard.config().has_content());
    }

    #[test]
    fn no_back_transition_out_of_processing() {
        let mut wizard = controller();
        walk_to_processing(&mut wizard);
        assert!(wizard.go_back(WizardStep::Preview).is_err());
        assert_eq!(wizard.step(), WizardStep::Processing);
    }

    #[test]
    fn revisiting_a_step_re_merges_its_patch() {
        let mut wizard = controller();
        wizard
            .advance(WizardStep::Branding, ConfigPatch::new().text("first"))
            .unwrap();
        wizard.go_back(WizardStep::Upload).unwrap();
        wizard
            .advance(WizardStep::Branding, ConfigPatch::new().text("second"))
            .unwrap();
        assert_eq!(
            wizard.config().content,
            Some(ContractContent::Text("second".into()))
        );
    }

    #[test]
    fn each_processing_entry_gets_a_new_activation() {
        let mut wizard = controller();
        assert!(wizard.activation().is_none());

        walk_to_processing(&mut wizard);
        let first = wizard.activation().unwrap();
        assert_eq!(wizard.activation(), Some(first));

        wizard.reset();
        walk_to_processing(&mut wizard);
        let second = wizard.activation().unwrap();
        assert!(second > first);
    }

    #[test]
    fn reset_restores_defaults_from_any_state() {
        let mut wizard = controller();
        walk_to_processing(&mut wizard);
        wizard.status().set_error("server down");
        wizard.reset();

        assert_eq!(wizard.step(), WizardStep::Upload);
        assert_eq!(wizard.config(), &ContractConfig::default());
        assert!(wizard.result().is_none());

        let snapshot = wizard.status().current();
        assert_eq!(snapshot.step, WizardStep::Upload);
        assert!(snapshot.error.is_none());

        wizard.complete_submission(result()).unwrap_err();
        walk_to_processing(&mut wizard);
        wizard.complete_submission(result()).unwrap();
        wizard.reset();
        assert_eq!(wizard.config(), &ContractConfig::default());
        assert!(wizard.result().is_none());
    }

    #[test]
    fn reset_uses_custom_defaults() {
        let defaults = ContractConfig {
            primary_color: "#FF0000".parse().unwrap(),
            ..ContractConfig::default()
        };
        let mut wizard = WizardController::with_defaults(defaults.clone(), StatusBoard::new());
        wizard
            .advance(
                WizardStep::Branding,
                ConfigPatch::new().primary_color("#00FF00".parse().unwrap()),
            )
            .unwrap();
        wizard.reset();
        assert_eq!(wizard.config(), &defaults);
    }
}
