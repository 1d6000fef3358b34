//! NoteMap terminal entry point.
//!
//! # Responsibility
//! - Load settings (fatal on failure), start logging, open storage.
//! - Hand stdin/stdout to the core shell.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, warn};
use notemap_core::db::{open_db, open_db_in_memory};
use notemap_core::{
    default_log_level, init_logging, load_config, AppContext, BufLineReader, MapCatalog,
    SettingsResolver, Shell, ShellExit, SqliteCatalogStore, WriterDisplay,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

#[derive(Parser)]
#[command(name = "notemap", version, about = "Terminal note maps")]
struct Cli {
    /// Settings file (JSON).
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Initialization error - {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, SettingsResolver::new(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err:#}");
            eprintln!("notemap: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: SettingsResolver) -> Result<()> {
    let save_path = match settings.save_path() {
        Ok(path) => Some(absolute(&path)?),
        Err(err) => {
            eprintln!("Storage disabled - {err}");
            None
        }
    };

    if let Some(save_dir) = save_path.as_deref().and_then(Path::parent) {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, save_dir.join("logs")) {
            eprintln!("Logging disabled - {err}");
        }
    }

    let (mut conn, durable) = match save_path.as_deref().map(|path| open_db(path)) {
        Some(Ok(conn)) => (conn, true),
        Some(Err(err)) => {
            eprintln!("Failed to open saved maps ({err}); changes will not be saved.");
            let conn = open_db_in_memory().context("failed to open in-memory storage")?;
            (conn, false)
        }
        None => {
            let conn = open_db_in_memory().context("failed to open in-memory storage")?;
            (conn, false)
        }
    };
    let mut store = SqliteCatalogStore::try_new(&mut conn).context("storage is not ready")?;
    if !durable {
        warn!("event=storage_open module=cli status=degraded mode=memory");
        store = store.memory_only();
    }

    let mut ctx = match AppContext::load(settings.clone(), &store) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!("event=catalog_load module=cli status=error error={err}");
            eprintln!("Failed to load saved maps - {err}");
            AppContext::new(settings, MapCatalog::new())
        }
    };

    let stdin = io::stdin();
    let reader = BufLineReader::new(stdin.lock());
    let display = WriterDisplay::with_clear_hook(io::stdout(), clear_terminal);
    let mut shell = Shell::new(reader, display);

    match shell.run(&mut ctx, &mut store)? {
        ShellExit::Saved(_) => {}
        ShellExit::Unsaved { pending } if pending > 0 => {
            warn!("event=app_exit module=cli status=unsaved pending={pending}");
        }
        ShellExit::Unsaved { .. } => {}
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Runs the platform clear command. `false` when none is known or it fails.
fn clear_terminal() -> bool {
    let mut command = match std::env::consts::OS {
        "linux" | "macos" | "freebsd" => Command::new("clear"),
        "windows" => {
            let mut command = Command::new("cmd");
            command.args(["/c", "cls"]);
            command
        }
        _ => return false,
    };
    command
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
