//! Interpreter process execution and output routing.

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::invocation::Invocation;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is checked against its deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the child produced before it exited.
#[derive(Debug)]
pub struct ChildResult {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub status: ExitStatus,
}

/// Run the script and decide what goes to standard output.
///
/// Returns the child's raw stdout on success.
///
/// # Errors
/// Any [`LaunchError`] from starting or draining the child, or
/// [`LaunchError::Script`] when the child wrote to stderr.
pub fn launch(invocation: &Invocation, config: &LauncherConfig) -> Result<Vec<u8>, LaunchError> {
    let result = run_script(invocation, config)?;
    route(result)
}

/// Start the interpreter on the script and wait for it to finish, capturing both streams.
///
/// # Errors
/// [`LaunchError::Spawn`] if the process cannot be created (including a missing working
/// directory), [`LaunchError::Drain`] if a pipe cannot be read, and
/// [`LaunchError::TimedOut`] if the configured timeout expires first.
pub fn run_script(
    invocation: &Invocation,
    config: &LauncherConfig,
) -> Result<ChildResult, LaunchError> {
    let arguments = invocation.command_line();
    tracing::debug!(
        interpreter = %config.interpreter,
        working_dir = %config.working_dir.display(),
        arguments = %arguments,
        "starting script"
    );

    let mut child = Command::new(&config.interpreter)
        .args(invocation.interpreter_args())
        .current_dir(&config.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| {
            tracing::error!(interpreter = %config.interpreter, error = %source, "failed to start interpreter");
            LaunchError::Spawn {
                interpreter: config.interpreter.clone(),
                arguments: arguments.clone(),
                source,
            }
        })?;

    let (sender, receiver) = mpsc::channel();
    spawn_reader(Pipe::Stdout, child.stdout.take(), sender.clone());
    spawn_reader(Pipe::Stderr, child.stderr.take(), sender);

    let drain_error = |source: io::Error| LaunchError::Drain {
        interpreter: config.interpreter.clone(),
        source,
    };
    let timed_out = |seconds: u64| {
        tracing::warn!(timeout_secs = seconds, arguments = %arguments, "script timed out");
        LaunchError::TimedOut {
            interpreter: config.interpreter.clone(),
            arguments: arguments.clone(),
            seconds,
        }
    };

    // A timeout too large to represent as an instant means no deadline at all.
    let deadline = config
        .timeout
        .and_then(|limit| Some((Instant::now().checked_add(limit)?, limit.as_secs())));

    let status = match deadline {
        Some((deadline, seconds)) => {
            match wait_until(&mut child, deadline).map_err(drain_error)? {
                Some(status) => status,
                None => {
                    kill_and_reap(&mut child);
                    return Err(timed_out(seconds));
                }
            }
        }
        None => child.wait().map_err(drain_error)?,
    };

    // The interpreter has exited, but a background grandchild can still hold the pipes
    // open. Readers that miss the deadline are left behind.
    let Some((stdout, stderr)) =
        collect_output(&receiver, deadline.map(|(at, _)| at)).map_err(drain_error)?
    else {
        let seconds = deadline.map_or(0, |(_, seconds)| seconds);
        return Err(timed_out(seconds));
    };

    tracing::debug!(
        %status,
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "script finished"
    );

    Ok(ChildResult {
        stdout,
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        status,
    })
}

/// Any stderr content fails the run; otherwise stdout passes through. The exit code is ignored.
///
/// # Errors
/// [`LaunchError::Script`] carrying the full stderr text when it is non-empty.
pub fn route(result: ChildResult) -> Result<Vec<u8>, LaunchError> {
    if result.stderr.is_empty() {
        Ok(result.stdout)
    } else {
        tracing::warn!(status = %result.status, "script wrote to stderr");
        Err(LaunchError::Script {
            stderr: result.stderr,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pipe {
    Stdout,
    Stderr,
}

type PipeOutput = (Pipe, io::Result<Vec<u8>>);

fn spawn_reader<R: Read + Send + 'static>(
    which: Pipe,
    pipe: Option<R>,
    sender: mpsc::Sender<PipeOutput>,
) {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let result = match pipe {
            Some(mut pipe) => pipe.read_to_end(&mut buffer).map(|_| buffer),
            None => Ok(buffer),
        };
        // The receiver is gone once the launcher has given up on this run.
        if sender.send((which, result)).is_err() {
            tracing::debug!(pipe = ?which, "output arrived after the launcher stopped waiting");
        }
    });
}

/// Gather both pipes' contents. `Ok(None)` means the deadline passed before both closed.
fn collect_output(
    receiver: &mpsc::Receiver<PipeOutput>,
    deadline: Option<Instant>,
) -> io::Result<Option<(Vec<u8>, Vec<u8>)>> {
    let mut stdout = None;
    let mut stderr = None;
    while stdout.is_none() || stderr.is_none() {
        let received = match deadline {
            Some(deadline) => {
                match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(received) => received,
                    Err(mpsc::RecvTimeoutError::Timeout) => return Ok(None),
                    Err(mpsc::RecvTimeoutError::Disconnected) => return Err(reader_lost()),
                }
            }
            None => receiver.recv().map_err(|_| reader_lost())?,
        };
        match received {
            (Pipe::Stdout, result) => stdout = Some(result?),
            (Pipe::Stderr, result) => stderr = Some(result?),
        }
    }
    Ok(stdout.zip(stderr))
}

fn reader_lost() -> io::Error {
    io::Error::other("output reader thread stopped before reporting")
}

/// Wait until the child exits or `deadline` passes. `Ok(None)` means it is still running.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::warn!(error = %e, "failed to kill timed out script");
    }
    if let Err(e) = child.wait() {
        tracing::warn!(error = %e, "failed to reap timed out script");
    }
}
