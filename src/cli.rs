// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

/// Exit code when the config path is missing or the arguments are wrong.
pub const EXIT_USAGE: i32 = 255;

pub const USAGE: &str = "Usage: anticron <config file>";

/// Command-line arguments for `anticron`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "anticron",
    version,
    about = "Run named shell commands daily and export their health as metrics.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

/// Parse the process arguments.
///
/// `--help` and `--version` print and exit 0; any other parse error, or a
/// missing config path, prints usage and exits with [`EXIT_USAGE`].
pub fn parse() -> PathBuf {
    match CliArgs::try_parse() {
        Ok(CliArgs {
            config: Some(config),
        }) => config,
        Ok(CliArgs { config: None }) => {
            eprintln!("{USAGE}");
            std::process::exit(EXIT_USAGE);
        }
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
    }
}
