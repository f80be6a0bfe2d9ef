//! Launcher settings: where scripts run, which interpreter runs them, how long they may take.

use std::path::PathBuf;
use std::time::Duration;

/// PRTG's directory for EXE/XML custom sensors. Sensor scripts are resolved relative to it.
pub const DEFAULT_WORKING_DIR: &str =
    r"C:\Program Files (x86)\PRTG Network Monitor\Custom Sensors\EXEXML";

/// Windows PowerShell, the interpreter PRTG sensor scripts are written for.
pub const DEFAULT_INTERPRETER: &str = "powershell";

/// PowerShell 7+, used when Windows PowerShell is not installed.
pub const FALLBACK_INTERPRETER: &str = "pwsh";

/// Resolved settings for one launcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub working_dir: PathBuf,
    pub interpreter: String,
    /// `None` waits for the script indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            interpreter: default_interpreter(),
            timeout: None,
        }
    }
}

impl LauncherConfig {
    /// Build from optional overrides, filling the rest with defaults.
    ///
    /// A timeout of zero seconds is treated as "no timeout".
    #[must_use]
    pub fn from_overrides(
        working_dir: Option<PathBuf>,
        interpreter: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            working_dir: working_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKING_DIR)),
            interpreter: interpreter
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(default_interpreter),
            timeout: timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

/// Pick the PowerShell executable: `powershell` unless only `pwsh` is on `PATH`.
#[must_use]
pub fn default_interpreter() -> String {
    if which::which(DEFAULT_INTERPRETER).is_err() && which::which(FALLBACK_INTERPRETER).is_ok() {
        FALLBACK_INTERPRETER.to_string()
    } else {
        DEFAULT_INTERPRETER.to_string()
    }
}
