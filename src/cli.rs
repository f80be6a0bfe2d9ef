//! CLI module containing the main entry point logic.

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::invocation::Invocation;
use crate::launcher;
use crate::report::ErrorReport;
use clap::Parser as ClapParser;
use clap::error::ErrorKind;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "PSX64_LOG";

/// CLI arguments for the launcher.
#[derive(ClapParser, Debug)]
#[command(name = "psx64")]
#[command(version = PKG_VERSION)]
#[command(
    about = "Run a PowerShell script for a PRTG EXE/XML sensor and relay its output",
    long_about = None
)]
struct Cli {
    /// Directory the script runs in (defaults to PRTG's Custom Sensors\EXEXML folder)
    #[arg(long, env = "PSX64_WORKING_DIR", value_name = "PATH")]
    working_dir: Option<PathBuf>,

    /// Interpreter executable (defaults to powershell, or pwsh if only that is installed)
    #[arg(long, env = "PSX64_INTERPRETER", value_name = "EXE")]
    interpreter: Option<String>,

    /// Kill the script and report an error after this many seconds (0 waits forever)
    #[arg(long, env = "PSX64_TIMEOUT", value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Script to run, followed by the arguments passed to it unchanged
    #[arg(
        value_name = "SCRIPT",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    invocation: Vec<String>,
}

impl Cli {
    fn config(&self) -> LauncherConfig {
        LauncherConfig::from_overrides(
            self.working_dir.clone(),
            self.interpreter.clone(),
            self.timeout,
        )
    }

    fn execute(self) -> Result<Vec<u8>, LaunchError> {
        let config = self.config();
        let invocation = Invocation::from_args(self.invocation)?;
        launcher::launch(&invocation, &config)
    }
}

/// Send tracing output to stderr; stdout belongs to PRTG.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init()
    {
        eprintln!("psx64: logging disabled: {e}");
    }
}

/// Bytes to write for a finished run: the script output, or the `<Prtg>` error document.
#[must_use]
pub fn render_outcome(outcome: Result<Vec<u8>, LaunchError>) -> Vec<u8> {
    match outcome {
        Ok(stdout) => stdout,
        Err(error) => ErrorReport::from(&error).to_xml().into_bytes(),
    }
}

fn write_stdout(payload: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(payload)?;
    stdout.flush()
}

/// Main CLI logic: parse arguments, run the script, write exactly one result to stdout.
pub fn run_cli() {
    init_logging();

    let outcome = match Cli::try_parse() {
        Ok(cli) => cli.execute(),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => Err(LaunchError::Usage {
            message: e.render().to_string().trim_end().to_string(),
        }),
    };

    if let Err(e) = write_stdout(&render_outcome(outcome)) {
        tracing::error!(error = %e, "failed to write to stdout");
    }
}
