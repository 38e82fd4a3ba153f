//! Wallboard command-line host.
//!
//! # Responsibility
//! - Open a SQLite document store and regenerate one wallboard note.
//! - Surface the single user alert on stderr and map run results to exit codes.

use clap::Parser;
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;
use wallboard_core::{
    default_log_level, init_logging, Notifier, RunOutcome, SqliteDocumentStore, WallboardDefaults,
    WallboardService,
};

#[derive(Debug, Parser)]
#[command(
    name = "wallboard",
    about = "Regenerate a wallboard note from its settings table",
    version
)]
struct Cli {
    /// SQLite document store file.
    #[arg(long)]
    db: PathBuf,
    /// Id of the wallboard note to regenerate.
    #[arg(long)]
    note: Uuid,
    /// TOML file overriding process-wide defaults.
    #[arg(long)]
    defaults: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long)]
    log_dir: Option<String>,
    /// Print the regenerated note instead of writing it back.
    #[arg(long)]
    dry_run: bool,
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify_user(&self, message: &str) {
        eprintln!("wallboard: {message}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("wallboard: {err}");
            return ExitCode::from(2);
        }
    }

    match run(&cli).await {
        Ok(RunOutcome::Replaced { .. }) => ExitCode::SUCCESS,
        Ok(RunOutcome::Rendered { content }) => {
            println!("{content}");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Aborted { .. }) => ExitCode::from(3),
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("wallboard: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<RunOutcome, Box<dyn Error>> {
    let defaults = match cli.defaults.as_ref() {
        Some(path) => WallboardDefaults::load_from_path(path)?,
        None => WallboardDefaults::default(),
    };
    let store = SqliteDocumentStore::open(&cli.db)?;
    let service = WallboardService::new(store, StderrNotifier, defaults);

    let outcome = if cli.dry_run {
        service.preview(cli.note).await?
    } else {
        service.run(cli.note).await?
    };
    Ok(outcome)
}
