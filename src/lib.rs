//! # psx64
//!
//! Launch a PowerShell script on behalf of a PRTG EXE/XML sensor and hand its output back.
//! Whatever the script prints is relayed as-is; anything on its error stream, or a failure
//! to run it at all, becomes a `<Prtg><Error>1</Error><Text>...</Text></Prtg>` document.

pub mod cli;
pub mod config;
pub mod error;
pub mod invocation;
pub mod launcher;
pub mod report;
