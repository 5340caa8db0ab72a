//! Bounded execution of external tools (`git`, `tar`).
//!
//! Every invocation gets a deadline. Pipes are drained on helper threads so a
//! child producing a large archive never blocks on a full pipe while we poll.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{Result, SyncError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured result of a finished process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Run `command`, optionally feeding `stdin`, and kill it once `timeout` elapses.
///
/// A timeout is reported as [`SyncError::Timeout`]; failing to spawn as
/// [`SyncError::Process`]. A non-zero exit is *not* an error here; callers
/// inspect [`ProcessOutput::status`].
pub fn run_with_timeout(
    mut command: Command,
    stdin: Option<Vec<u8>>,
    timeout: Duration,
) -> Result<ProcessOutput> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!("running {:?} (timeout {:?})", command, timeout);

    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|e| SyncError::process(&program, e.to_string()))?;

    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => Some(thread::spawn(move || {
            // A child that exits early closes the pipe; that shows up in its status.
            let _ = pipe.write_all(&input);
        })),
        _ => None,
    };
    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match wait_with_deadline(&mut child, timeout)? {
        Some(status) => status,
        None => {
            warn!("{} exceeded {:?}, killing it", program, timeout);
            let _ = child.kill();
            let _ = child.wait();
            return Err(SyncError::Timeout { program, timeout });
        }
    };

    if let Some(handle) = writer {
        let _ = handle.join();
    }
    let stdout = join_reader(stdout_reader);
    let stderr = join_reader(stderr_reader);

    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    // A timeout too large to represent as an Instant never expires.
    let deadline = Instant::now().checked_add(timeout);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> Option<thread::JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
