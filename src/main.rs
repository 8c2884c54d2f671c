use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::sync::Arc;

use logmanager::{Emitter, LevelChange, Settings, global, hexstr, install_global};

mod cli;

use cli::Cli;

/// Install the global manager, then configure it; returns the demo emitter and the level report
fn setup_logging(cli: &Cli) -> Result<(Arc<Emitter>, LevelChange)> {
    install_global()?;
    let manager = global();
    let emitter = manager.emitter(&cli.name);

    let loaded = Settings::load(cli.config.as_ref()).context("Failed to load settings")?;
    for skipped in &loaded.skipped {
        emitter.warning(format!(
            "Failed to load settings from {}: {}",
            skipped.path.display(),
            skipped.error
        ));
    }

    let mut settings = loaded.settings;

    // Command line wins over the settings file
    if let Some(level) = &cli.level {
        settings.level = level.clone();
    }
    if let Some(path) = &cli.log_file {
        settings.file_path = Some(path.clone());
    }
    if cli.no_file {
        settings.file_logging.enabled = false;
    } else if loaded.source.is_none() {
        // Without a settings file the demo always writes its log file
        settings.file_logging.enabled = true;
    }
    if cli.no_rotate {
        settings.file_logging.rotate = false;
    }

    let change = settings.apply(manager)?;
    Ok((emitter, change))
}

fn run(emitter: &Emitter, change: &LevelChange) -> Result<()> {
    let manager = global();

    if change.is_changed() {
        println!("{}", change.to_string().green());
    } else {
        println!("{}", change.to_string().dimmed());
    }

    emitter.debug("This is a debug message");
    emitter.info("This is an info message");
    emitter.warning("This is a warning message");
    emitter.error("This is an error message");
    emitter.critical("This is a critical message");
    emitter.info(format!("Payload: {}", hexstr(b"\x00\x0a\xff")));

    log::info!("Routed through the log facade");

    println!("{} {}", "Current log level:".bold(), manager.level_name());
    if manager.is_file_logging_enabled() {
        println!("{} {}", "Log file:".bold(), manager.log_file_path().display());
    } else {
        println!("{} {}", "Log file (disabled):".bold(), manager.log_file_path().display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (emitter, change) = setup_logging(&cli).context("Failed to setup logging")?;

    run(&emitter, &change).context("Command failed")?;

    Ok(())
}
