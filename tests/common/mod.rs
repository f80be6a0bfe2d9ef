//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stands in for PowerShell: accepts `-file <script> [args...]` and runs the script with sh.
const FAKE_INTERPRETER: &str = r#"#!/bin/sh
if [ "$1" != "-file" ]; then
    printf 'expected -file, got %s' "$1" >&2
    exit 64
fi
shift
script="$1"
shift
exec sh "$script" "$@"
"#;

static FAKE_INTERPRETER_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_psx64"))
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Helper to write a sensor script into a directory
pub fn create_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Path to the fake interpreter, written once per test binary
#[cfg(unix)]
pub fn fake_interpreter() -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let dir = FAKE_INTERPRETER_DIR.get_or_init(|| {
        let dir = create_temp_dir();
        let path = dir.path().join("fake-powershell");
        fs::write(&path, FAKE_INTERPRETER).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        dir
    });
    dir.path().join("fake-powershell")
}

/// Helper to create a Command with test environment
/// Clears the launcher's environment overrides so the host can't leak into tests
pub fn test_command(binary: &Path) -> Command {
    let mut cmd = Command::new(binary);
    cmd.env_remove("PSX64_WORKING_DIR")
        .env_remove("PSX64_INTERPRETER")
        .env_remove("PSX64_TIMEOUT")
        .env("PSX64_LOG", "off");
    cmd
}

/// Command that runs scripts from `working_dir` through the fake interpreter
#[cfg(unix)]
pub fn sensor_command(working_dir: &Path) -> Command {
    let mut cmd = test_command(&get_binary_path());
    cmd.arg("--working-dir")
        .arg(working_dir)
        .arg("--interpreter")
        .arg(fake_interpreter());
    cmd
}

/// The `<Prtg>` document for a message that needs no escaping
pub fn prtg_error(message: &str) -> String {
    format!("<Prtg><Error>1</Error><Text>{message}</Text></Prtg>")
}
