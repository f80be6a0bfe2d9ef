//! # psx64
//!
//! Run a PowerShell script for a PRTG EXE/XML custom sensor.
//!
//! ## Usage
//!
//! - Run a sensor script: `psx64 check.ps1`
//! - Pass arguments: `psx64 check.ps1 -Host srv01 "Disk C"`
//! - Override the script directory: `psx64 --working-dir D:\Sensors check.ps1`

/// Entry point for the CLI tool.
fn main() {
    psx64::cli::run_cli();
}
