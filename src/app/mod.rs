mod status_bar;
pub mod ui;

pub use status_bar::StatusBarState;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::download::{DownloadError, DownloadedFiles, download_results};
use crate::settings::DesignerConfig;
use crate::status::{StatusBoard, WizardSnapshot};
use crate::submission::{
    FormattingBackend, SubmissionError, SubmissionOrchestrator, SubmissionResult,
};
use crate::ui::Theme;
use crate::vim::{Command, InputBuffer, ModeAction, VimMode, parse_command};
use crate::wizard::{
    Activation, ConfigPatch, ContractContent, FileHandle, FileKind, PrimaryColor,
    WizardController, WizardError, WizardStep,
};

/// Work the event loop has to run on behalf of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Validate the Upload step and move to Branding
    CompleteUpload,
    /// Validate the Branding step and move to Preview
    CompleteBranding,
    /// Enter Processing and send the contract
    StartSubmission,
    /// Save both documents into the output directory
    Download,
    Quit,
}

/// Results of background tasks, delivered back to the event loop
#[derive(Debug)]
pub enum TaskMessage {
    SubmissionFinished {
        activation: Activation,
        outcome: Result<SubmissionResult, SubmissionError>,
    },
    DownloadFinished(Result<DownloadedFiles, DownloadError>),
}

/// Where the contract body comes from on the Upload step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadSource {
    #[default]
    Text,
    Docx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrandingField {
    #[default]
    Color,
    Logo,
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Terminal front-end state for one wizard session
pub struct DesignerApp {
    pub settings: DesignerConfig,
    pub theme: Theme,
    pub wizard: WizardController,
    orchestrator: Arc<SubmissionOrchestrator>,
    http: Client,
    status_rx: watch::Receiver<WizardSnapshot>,
    pub snapshot: WizardSnapshot,
    task_tx: mpsc::UnboundedSender<TaskMessage>,

    // Vim mode state
    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    // Upload step drafts
    pub upload_source: UploadSource,
    pub contract_text: InputBuffer,
    pub docx_path: InputBuffer,

    // Branding step drafts
    pub branding_field: BrandingField,
    pub color_input: InputBuffer,
    pub logo_path: InputBuffer,

    pub downloaded: Option<DownloadedFiles>,
    pub is_downloading: bool,

    // UI state
    pub message: Option<Message>,
    pub show_help: bool,
    pub should_exit: bool,
    pub status_bar: StatusBarState,
    spinner_frame: usize,
}

impl DesignerApp {
    pub fn new(
        settings: DesignerConfig,
        backend: Arc<dyn FormattingBackend>,
        task_tx: mpsc::UnboundedSender<TaskMessage>,
    ) -> Self {
        let status = StatusBoard::new();
        let status_rx = status.subscribe();
        let orchestrator = Arc::new(SubmissionOrchestrator::from_settings(
            &settings.api,
            backend,
            status.clone(),
        ));
        let wizard = WizardController::with_defaults(settings.initial_contract(), status);
        let theme = Theme::default().branded(&settings.branding.default_color);
        let color_input = InputBuffer::with_content(settings.branding.default_color.as_str());
        let snapshot = status_rx.borrow().clone();

        let mut app = Self {
            settings,
            theme,
            wizard,
            orchestrator,
            http: Client::new(),
            snapshot,
            status_rx,
            task_tx,
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            upload_source: UploadSource::Text,
            contract_text: InputBuffer::new(),
            docx_path: InputBuffer::new(),
            branding_field: BrandingField::Color,
            color_input,
            logo_path: InputBuffer::new(),
            downloaded: None,
            is_downloading: false,
            message: None,
            show_help: false,
            should_exit: false,
            status_bar: StatusBarState::default(),
            spinner_frame: 0,
        };
        app.update_status_bar();
        app
    }

    pub fn is_dryrun(&self) -> bool {
        self.settings.general.dryrun
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    /// Processing ended with an error and is waiting for a restart
    pub fn submission_failed(&self) -> bool {
        self.step() == WizardStep::Processing && self.snapshot.error.is_some()
    }

    /// A submission or download is in flight
    pub fn is_busy(&self) -> bool {
        (self.step() == WizardStep::Processing && !self.submission_failed()) || self.is_downloading
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppAction::Quit);
        }

        // Clear message on any key (unless working)
        if self.message.is_some() && !self.is_busy() {
            self.message = None;
        }

        if self.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('q') {
                self.show_help = false;
            }
            self.update_status_bar();
            return None;
        }

        let result = match self.vim_mode {
            VimMode::Normal => self.handle_normal_mode(key),
            VimMode::Insert => self.handle_insert_mode(key),
            VimMode::Command => self.handle_command_mode(key),
        };

        self.update_status_bar();
        result
    }

    /// Bracketed paste goes to the focused field, or to the command line
    pub fn handle_paste(&mut self, text: &str) {
        if self.vim_mode == VimMode::Command {
            self.command_buffer.insert_str(text.lines().next().unwrap_or_default());
            return;
        }

        let multiline = self.editing_multiline();
        let Some(buffer) = self.focused_buffer() else {
            return;
        };
        if multiline {
            buffer.insert_str(text);
        } else {
            buffer.insert_str(text.trim());
        }
        self.vim_mode = VimMode::Insert;
        self.update_status_bar();
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
                return None;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
                return None;
            }
            _ => {}
        }

        match self.step() {
            WizardStep::Upload => match key.code {
                KeyCode::Tab | KeyCode::BackTab => self.toggle_upload_source(),
                KeyCode::Char('i') | KeyCode::Char('a') => self.enter_insert(),
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    return Some(AppAction::CompleteUpload);
                }
                _ => {}
            },
            WizardStep::Branding => match key.code {
                KeyCode::Char('j')
                | KeyCode::Char('k')
                | KeyCode::Down
                | KeyCode::Up
                | KeyCode::Tab
                | KeyCode::BackTab => self.toggle_branding_field(),
                KeyCode::Char('i') | KeyCode::Char('a') => self.enter_insert(),
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    return Some(AppAction::CompleteBranding);
                }
                KeyCode::Char('h') | KeyCode::Left => self.go_back(),
                _ => {}
            },
            WizardStep::Preview => match key.code {
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    return Some(AppAction::StartSubmission);
                }
                KeyCode::Char('h') | KeyCode::Left => self.go_back(),
                _ => {}
            },
            WizardStep::Processing => {
                if self.submission_failed() && key.code == KeyCode::Char('r') {
                    self.restart();
                }
            }
            WizardStep::Result => match key.code {
                KeyCode::Char('d') => return Some(AppAction::Download),
                KeyCode::Char('n') => self.restart(),
                _ => {}
            },
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                if self.editing_multiline() {
                    self.edit(|b| b.insert('\n'));
                } else {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                    return self.continue_action();
                }
            }
            KeyCode::Tab | KeyCode::BackTab if self.step() == WizardStep::Branding => {
                self.toggle_branding_field();
            }
            KeyCode::Backspace => self.edit(|b| {
                b.delete_back();
            }),
            KeyCode::Delete => self.edit(|b| {
                b.delete_forward();
            }),
            KeyCode::Left => self.edit(InputBuffer::move_left),
            KeyCode::Right => self.edit(InputBuffer::move_right),
            KeyCode::Up => self.edit(InputBuffer::move_up),
            KeyCode::Down => self.edit(InputBuffer::move_down),
            KeyCode::Home => self.edit(InputBuffer::move_start),
            KeyCode::End => self.edit(InputBuffer::move_end),
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match c {
                        'u' => self.edit(InputBuffer::clear),
                        'a' => self.edit(InputBuffer::move_start),
                        'e' => self.edit(InputBuffer::move_end),
                        _ => {}
                    }
                } else {
                    self.edit(|b| b.insert(c));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.insert(c);
            }
            _ => {}
        }
        None
    }

    fn execute_command(&mut self, cmd: &str) -> Option<AppAction> {
        let command = match parse_command(cmd) {
            Ok(command) => command,
            Err(e) => {
                self.set_error(e.to_string());
                return None;
            }
        };

        match command {
            Command::Quit => return Some(AppAction::Quit),
            Command::Back => self.go_back(),
            Command::Reset => {
                if self.is_busy() {
                    self.set_error("Wait for the current operation to finish".to_string());
                } else {
                    self.restart();
                }
            }
            Command::Help => self.show_help = true,
            Command::Download => {
                if self.step() == WizardStep::Result {
                    return Some(AppAction::Download);
                }
                self.set_error("Nothing to download yet".to_string());
            }
        }
        None
    }

    /// Run an action the key handlers asked for
    pub async fn perform(&mut self, action: AppAction) {
        match action {
            AppAction::CompleteUpload => self.complete_upload().await,
            AppAction::CompleteBranding => self.complete_branding().await,
            AppAction::StartSubmission => self.start_submission(),
            AppAction::Download => self.start_download(),
            AppAction::Quit => self.should_exit = true,
        }
        self.update_status_bar();
    }

    pub async fn complete_upload(&mut self) {
        let outcome = match self.upload_patch().await {
            Ok(patch) => self.wizard.advance(WizardStep::Branding, patch),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!("Upload step rejected: {}", e);
            self.set_error(e.to_string());
        }
    }

    async fn upload_patch(&self) -> Result<ConfigPatch, WizardError> {
        match self.upload_source {
            UploadSource::Text => {
                let text = self.contract_text.content();
                if text.trim().is_empty() {
                    return Err(WizardError::MissingContent);
                }
                Ok(ConfigPatch::new().text(text))
            }
            UploadSource::Docx => {
                let path = self.docx_path.content().trim();
                if path.is_empty() {
                    return Err(WizardError::MissingContent);
                }
                let file = FileHandle::load(path, FileKind::Contract).await?;
                Ok(ConfigPatch::new().content(ContractContent::File(file)))
            }
        }
    }

    pub async fn complete_branding(&mut self) {
        let outcome = match self.branding_patch().await {
            Ok((color, patch)) => self
                .wizard
                .advance(WizardStep::Preview, patch)
                .map(|_| color),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(color) => self.theme = self.theme.branded(&color),
            Err(e) => {
                warn!("Branding step rejected: {}", e);
                self.set_error(e.to_string());
            }
        }
    }

    async fn branding_patch(&self) -> Result<(PrimaryColor, ConfigPatch), WizardError> {
        let color: PrimaryColor = self.color_input.content().parse()?;
        let logo = match self.logo_path.content().trim() {
            "" => None,
            path => Some(FileHandle::load(path, FileKind::Logo).await?),
        };
        let patch = ConfigPatch::new().primary_color(color.clone()).logo(logo);
        Ok((color, patch))
    }

    /// Leave Preview for Processing and spawn the submission
    pub fn start_submission(&mut self) {
        if let Err(e) = self.wizard.advance(WizardStep::Processing, ConfigPatch::new()) {
            self.set_error(e.to_string());
            return;
        }
        self.submit_current();
    }

    /// Spawn a submission for the current activation. Repeated calls for the
    /// same activation send nothing; the orchestrator drops them.
    pub fn submit_current(&self) {
        let Some(activation) = self.wizard.activation() else {
            return;
        };
        let config = self.wizard.snapshot();
        let orchestrator = Arc::clone(&self.orchestrator);
        let reveal_delay = self.settings.output.reveal_delay();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let Some(outcome) = orchestrator.submit(activation, &config).await else {
                return;
            };
            if outcome.is_ok() {
                tokio::time::sleep(reveal_delay).await;
            }
            let _ = tx.send(TaskMessage::SubmissionFinished {
                activation,
                outcome,
            });
        });
    }

    pub fn start_download(&mut self) {
        let Some(result) = self.wizard.result().cloned() else {
            self.set_error("Nothing to download yet".to_string());
            return;
        };
        if self.is_downloading {
            return;
        }
        if self.is_dryrun() {
            self.set_info(format!("[dryrun] Would download {}", result.docx_url));
            return;
        }

        self.is_downloading = true;
        let client = self.http.clone();
        let dir = self.settings.output.download_dir.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let outcome = download_results(&client, &result, &dir).await;
            let _ = tx.send(TaskMessage::DownloadFinished(outcome));
        });
    }

    pub fn handle_task_message(&mut self, msg: TaskMessage) {
        match msg {
            TaskMessage::SubmissionFinished {
                activation,
                outcome,
            } => {
                if self.wizard.activation() != Some(activation) {
                    debug!("Dropping result of stale activation {}", activation.id());
                } else {
                    self.finish_submission(outcome);
                }
            }
            TaskMessage::DownloadFinished(outcome) => {
                self.is_downloading = false;
                match outcome {
                    Ok(files) => {
                        self.set_info(format!(
                            "Saved {} and {}",
                            files.docx.display(),
                            files.pdf.display()
                        ));
                        self.downloaded = Some(files);
                    }
                    Err(e) => self.set_error(format!("Download failed: {e}")),
                }
            }
        }
        self.sync_status();
        self.update_status_bar();
    }

    fn finish_submission(&mut self, outcome: Result<SubmissionResult, SubmissionError>) {
        match outcome {
            Ok(result) => {
                let result = result.resolve(self.orchestrator.backend().base_url());
                match self.wizard.complete_submission(result) {
                    Ok(()) => self.set_info("Contract formatted".to_string()),
                    Err(e) => self.set_error(e.to_string()),
                }
            }
            // The status board already carries the user-facing message
            Err(e) => info!("Submission ended with {}", e),
        }
    }

    /// Back to an empty Upload step with the configured defaults
    pub fn restart(&mut self) {
        self.wizard.reset();
        self.vim_mode = VimMode::Normal;
        self.upload_source = UploadSource::Text;
        self.contract_text.clear();
        self.docx_path.clear();
        self.branding_field = BrandingField::Color;
        self.color_input
            .set(self.settings.branding.default_color.as_str());
        self.logo_path.clear();
        self.downloaded = None;
        self.theme = self.theme.branded(&self.settings.branding.default_color);
        self.sync_status();
    }

    fn go_back(&mut self) {
        let Some(previous) = self.step().previous() else {
            self.set_error(format!("Cannot go back from {}", self.step()));
            return;
        };
        if let Err(e) = self.wizard.go_back(previous) {
            self.set_error(e.to_string());
        }
    }

    fn continue_action(&self) -> Option<AppAction> {
        match self.step() {
            WizardStep::Upload => Some(AppAction::CompleteUpload),
            WizardStep::Branding => Some(AppAction::CompleteBranding),
            _ => None,
        }
    }

    fn enter_insert(&mut self) {
        if self.focused_buffer().is_some() {
            self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
        }
    }

    fn toggle_upload_source(&mut self) {
        self.upload_source = match self.upload_source {
            UploadSource::Text => UploadSource::Docx,
            UploadSource::Docx => UploadSource::Text,
        };
    }

    fn toggle_branding_field(&mut self) {
        self.branding_field = match self.branding_field {
            BrandingField::Color => BrandingField::Logo,
            BrandingField::Logo => BrandingField::Color,
        };
    }

    /// Only the contract text area takes newlines
    pub fn editing_multiline(&self) -> bool {
        self.step() == WizardStep::Upload && self.upload_source == UploadSource::Text
    }

    fn focused_buffer(&mut self) -> Option<&mut InputBuffer> {
        match (self.wizard.step(), self.upload_source, self.branding_field) {
            (WizardStep::Upload, UploadSource::Text, _) => Some(&mut self.contract_text),
            (WizardStep::Upload, UploadSource::Docx, _) => Some(&mut self.docx_path),
            (WizardStep::Branding, _, BrandingField::Color) => Some(&mut self.color_input),
            (WizardStep::Branding, _, BrandingField::Logo) => Some(&mut self.logo_path),
            _ => None,
        }
    }

    fn edit<F: FnOnce(&mut InputBuffer)>(&mut self, change: F) {
        if let Some(buffer) = self.focused_buffer() {
            change(buffer);
        }
    }

    fn sync_status(&mut self) {
        self.snapshot = self.status_rx.borrow_and_update().clone();
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;
        self.sync_status();
        self.update_status_bar();
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    pub fn update_status_bar(&mut self) {
        if self.vim_mode == VimMode::Command {
            self.status_bar = StatusBarState::command_mode();
            return;
        }
        if self.is_downloading {
            self.status_bar = StatusBarState::downloading();
            return;
        }

        let insert = self.vim_mode.is_editing();
        self.status_bar = match self.step() {
            WizardStep::Upload if insert && self.editing_multiline() => {
                StatusBarState::upload_text_insert()
            }
            WizardStep::Upload if insert => StatusBarState::path_insert(),
            WizardStep::Upload => StatusBarState::upload_normal(),
            WizardStep::Branding if insert => StatusBarState::branding_insert(),
            WizardStep::Branding => StatusBarState::branding_normal(),
            WizardStep::Preview => StatusBarState::preview(),
            WizardStep::Processing if self.submission_failed() => {
                StatusBarState::processing_failed()
            }
            WizardStep::Processing => StatusBarState::processing(),
            WizardStep::Result => StatusBarState::result(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{DryrunBackend, StageStatus};
    use std::time::Duration;

    fn press(app: &mut DesignerApp, code: KeyCode) -> Option<AppAction> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut DesignerApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> (DesignerApp, mpsc::UnboundedReceiver<TaskMessage>) {
        let mut settings = DesignerConfig::default();
        settings.general.dryrun = true;
        settings.output.reveal_delay_ms = 0;
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::new(DryrunBackend::new(Duration::ZERO));
        (DesignerApp::new(settings, backend, tx), rx)
    }

    async fn walk_to_preview(app: &mut DesignerApp) {
        press(app, KeyCode::Char('i'));
        type_str(app, "CLÁUSULA 1");
        press(app, KeyCode::Esc);
        let action = press(app, KeyCode::Enter).unwrap();
        app.perform(action).await;
        let action = press(app, KeyCode::Enter).unwrap();
        app.perform(action).await;
        assert_eq!(app.step(), WizardStep::Preview);
    }

    #[tokio::test]
    async fn starts_from_the_published_snapshot() {
        let (app, _rx) = app();
        assert_eq!(app.snapshot, *app.status_rx.borrow());
        assert_eq!(app.snapshot.step, WizardStep::Upload);
        assert!(app.snapshot.stages.iter().all(|s| s.status == StageStatus::Pending));
        assert!(app.snapshot.error.is_none());
    }

    #[tokio::test]
    async fn blank_text_stays_on_upload() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Esc);

        let action = press(&mut app, KeyCode::Enter);
        assert_eq!(action, Some(AppAction::CompleteUpload));
        app.perform(AppAction::CompleteUpload).await;

        assert_eq!(app.step(), WizardStep::Upload);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));
    }

    #[tokio::test]
    async fn enter_in_text_area_inserts_newline() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "a");
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        type_str(&mut app, "b");
        assert_eq!(app.contract_text.content(), "a\nb");
        assert_eq!(app.vim_mode, VimMode::Insert);
    }

    #[tokio::test]
    async fn invalid_color_blocks_branding() {
        let (mut app, _rx) = app();
        app.contract_text.set("CLÁUSULA 1");
        app.perform(AppAction::CompleteUpload).await;
        assert_eq!(app.step(), WizardStep::Branding);

        app.color_input.set("blue");
        app.perform(AppAction::CompleteBranding).await;
        assert_eq!(app.step(), WizardStep::Branding);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));

        app.color_input.set("#0f0");
        app.perform(AppAction::CompleteBranding).await;
        assert_eq!(app.step(), WizardStep::Preview);
        assert_eq!(app.wizard.config().primary_color.as_str(), "#00FF00");
        assert_eq!(app.theme.brand, ratatui::style::Color::Rgb(0, 255, 0));
    }

    #[tokio::test]
    async fn back_keeps_drafts() {
        let (mut app, _rx) = app();
        app.contract_text.set("CLÁUSULA 1");
        app.perform(AppAction::CompleteUpload).await;

        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "back");
        assert_eq!(press(&mut app, KeyCode::Enter), None);

        assert_eq!(app.step(), WizardStep::Upload);
        assert_eq!(app.contract_text.content(), "CLÁUSULA 1");
    }

    #[tokio::test]
    async fn paste_goes_to_focused_field() {
        let (mut app, _rx) = app();
        app.handle_paste("line one\r\nline two");
        assert_eq!(app.contract_text.content(), "line one\nline two");
        assert_eq!(app.vim_mode, VimMode::Insert);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        app.handle_paste("  /tmp/contract.docx\n");
        assert_eq!(app.docx_path.content(), "/tmp/contract.docx");
    }

    #[tokio::test]
    async fn submission_reaches_result() {
        let (mut app, mut rx) = app();
        walk_to_preview(&mut app).await;

        let action = press(&mut app, KeyCode::Enter).unwrap();
        assert_eq!(action, AppAction::StartSubmission);
        app.perform(action).await;
        assert_eq!(app.step(), WizardStep::Processing);

        let msg = rx.recv().await.unwrap();
        app.handle_task_message(msg);

        assert_eq!(app.step(), WizardStep::Result);
        let result = app.wizard.result().unwrap();
        assert!(result.docx_url.ends_with(".docx"));
        assert!(app.snapshot.stages.iter().all(|s| s.status == StageStatus::Success));
    }

    #[tokio::test]
    async fn repeated_trigger_sends_once() {
        let (mut app, mut rx) = app();
        walk_to_preview(&mut app).await;
        app.perform(AppAction::StartSubmission).await;
        app.submit_current();
        app.submit_current();

        let first = rx.recv().await.unwrap();
        app.handle_task_message(first);
        assert_eq!(app.step(), WizardStep::Result);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_result_is_ignored_after_restart() {
        let (mut app, mut rx) = app();
        walk_to_preview(&mut app).await;
        app.perform(AppAction::StartSubmission).await;
        let msg = rx.recv().await.unwrap();

        app.restart();
        app.handle_task_message(msg);

        assert_eq!(app.step(), WizardStep::Upload);
        assert!(app.wizard.result().is_none());
        assert!(app.contract_text.is_empty());
    }

    #[tokio::test]
    async fn dryrun_download_is_skipped() {
        let (mut app, mut rx) = app();
        walk_to_preview(&mut app).await;
        app.perform(AppAction::StartSubmission).await;
        let msg = rx.recv().await.unwrap();
        app.handle_task_message(msg);

        assert_eq!(press(&mut app, KeyCode::Char('d')), Some(AppAction::Download));
        app.perform(AppAction::Download).await;
        assert!(!app.is_downloading);
        assert!(app.message.as_ref().is_some_and(|m| m.text.contains("dryrun")));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.step(), WizardStep::Upload);
    }

    #[tokio::test]
    async fn unknown_command_reports_error() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "frobnicate");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.vim_mode, VimMode::Normal);
        assert!(app.message.as_ref().is_some_and(|m| m.text.contains("frobnicate")));
    }
}
