use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logmanager",
    about = "Emit a sample line at every level through a configured log manager",
    version,
    after_help = "Without --log-file the log file sits next to this executable, named <program>.log"
)]
pub struct Cli {
    /// Path to settings file
    #[arg(short, long, help = "Path to logmanager.yaml settings file")]
    pub config: Option<PathBuf>,

    /// Level name (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Write the log file here instead of next to the program
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Keep output on the console only
    #[arg(long)]
    pub no_file: bool,

    /// Let the log file grow without rotating
    #[arg(long)]
    pub no_rotate: bool,

    /// Emitter name used for the sample lines
    #[arg(long, default_value = "demo")]
    pub name: String,
}
