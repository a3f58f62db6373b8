use clap::Parser;
use contract_designer::app::{DesignerApp, ui};
use contract_designer::download::download_results;
use contract_designer::error::{DesignerError, Result};
use contract_designer::event::{Event, EventHandler};
use contract_designer::settings::DesignerConfig;
use contract_designer::status::StatusBoard;
use contract_designer::submission::{SubmissionOrchestrator, create_backend};
use contract_designer::wizard::{
    ConfigPatch, ContractContent, FileHandle, FileKind, PrimaryColor, WizardController,
    WizardError, WizardStep,
};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contract-designer")]
#[command(author, version, about = "Brand and format contracts from the terminal")]
struct Args {
    /// Path to config file (default: <config dir>/contract-designer/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the formatting service
    #[arg(long)]
    api_url: Option<String>,

    /// Simulate the formatting service without network calls
    #[arg(long)]
    dryrun: bool,

    /// Log file path (the terminal UI does not log otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Format the text in this file without the terminal UI
    #[arg(long, conflicts_with = "docx")]
    text_file: Option<PathBuf>,

    /// Format this .docx without the terminal UI
    #[arg(long)]
    docx: Option<PathBuf>,

    /// Primary color as #RRGGBB or #RGB (headless only)
    #[arg(long)]
    color: Option<String>,

    /// Logo image, PNG or JPEG (headless only)
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Directory the generated documents are saved to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Save both documents after a headless run
    #[arg(long)]
    download: bool,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.text_file.is_some() || self.docx.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let config = load_config(&args)?;

    if args.is_headless() {
        let result = run_headless(config, &args).await;
        if let Err(ref e) = result {
            error!("Headless run failed: {}", e);
        }
        return result;
    }

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_designer(&mut terminal, config).await;
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Designer error: {}", e);
    }

    result
}

/// The TUI only logs to `--log-file`; headless runs log to stderr when no file is given
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = args.log_file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match file {
        Some(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();
        }
        None if args.is_headless() => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => return,
    }

    info!("Starting contract-designer");
}

/// File, then environment, then flags
fn load_config(args: &Args) -> Result<DesignerConfig> {
    let mut config = match &args.config {
        Some(path) => DesignerConfig::load_from(path)?,
        None => DesignerConfig::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable config: {}", e);
            DesignerConfig::default()
        }),
    };
    config.apply_env();

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if args.dryrun {
        config.general.dryrun = true;
    }
    if let Some(dir) = &args.output_dir {
        config.output.download_dir = dir.clone();
    }
    Ok(config)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| DesignerError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .map_err(|e| DesignerError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| DesignerError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| DesignerError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste)
        .map_err(|e| DesignerError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_designer(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: DesignerConfig,
) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    let (task_tx, mut task_rx) = mpsc::unbounded_channel();

    let backend = create_backend(&config.api, config.general.dryrun)?;
    let mut app = DesignerApp::new(config, backend, task_tx);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &app))
            .map_err(|e| DesignerError::Terminal(e.to_string()))?;

        tokio::select! {
            Some(event) = events.next() => match event {
                Event::Key(key) => {
                    if let Some(action) = app.handle_key(key) {
                        app.perform(action).await;
                    }
                }
                Event::Paste(text) => app.handle_paste(&text),
                Event::Resize => {}
                Event::Tick => app.tick(),
            },
            Some(msg) = task_rx.recv() => app.handle_task_message(msg),
            else => break,
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}

/// Drive the same controller and orchestrator without a terminal UI
async fn run_headless(config: DesignerConfig, args: &Args) -> Result<()> {
    let status = StatusBoard::new();
    let backend = create_backend(&config.api, config.general.dryrun)?;
    let orchestrator = SubmissionOrchestrator::from_settings(&config.api, backend, status.clone());
    let mut wizard = WizardController::with_defaults(config.initial_contract(), status);

    let content = match (&args.text_file, &args.docx) {
        (Some(path), _) => ContractContent::Text(tokio::fs::read_to_string(path).await?),
        (None, Some(path)) => ContractContent::File(FileHandle::load(path, FileKind::Contract).await?),
        (None, None) => return Err(WizardError::MissingContent.into()),
    };
    wizard.advance(WizardStep::Branding, ConfigPatch::new().content(content))?;

    let mut branding = ConfigPatch::new();
    if let Some(color) = &args.color {
        branding = branding.primary_color(color.parse::<PrimaryColor>()?);
    }
    if let Some(path) = &args.logo {
        branding = branding.logo(Some(FileHandle::load(path, FileKind::Logo).await?));
    }
    wizard.advance(WizardStep::Preview, branding)?;
    wizard.advance(WizardStep::Processing, ConfigPatch::new())?;

    let activation = wizard.activation().ok_or(WizardError::InvalidTransition {
        from: wizard.step(),
        to: WizardStep::Processing,
    })?;
    let config_snapshot = wizard.snapshot();
    let result = match orchestrator.submit(activation, &config_snapshot).await {
        Some(Ok(result)) => result.resolve(orchestrator.backend().base_url()),
        Some(Err(e)) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
        None => {
            warn!("Submission for activation {} was already started", activation.id());
            return Ok(());
        }
    };
    wizard.complete_submission(result.clone())?;

    println!("docx: {}", result.docx_url);
    println!("pdf:  {}", result.pdf_url);

    if args.download {
        if config.general.dryrun {
            info!("[dryrun] Skipping download");
        } else {
            let client = reqwest::Client::new();
            let files = download_results(&client, &result, &config.output.download_dir).await?;
            println!("saved {} and {}", files.docx.display(), files.pdf.display());
        }
    }

    Ok(())
}
