// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Real process launcher backed by `std::process`.
//!
//! Production code uses [`SystemLauncher`]; tests swap in a
//! [`Simulator`](crate::Simulator) through the same [`Launcher`] trait.

use crate::error::{LaunchError, ProcessError};
use crate::handle::{Launcher, Output, ProcessHandle};
use crate::signature::CommandSignature;
use procsim_capture::{LaunchOptions, StdioMode};
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Interval between exit checks while waiting with a timeout
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Launches real processes
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for SystemLauncher {
    type Process = SystemProcess;

    fn launch<C>(&self, command: C, options: LaunchOptions) -> Result<SystemProcess, LaunchError>
    where
        C: Into<CommandSignature>,
    {
        let command = command.into();
        let (program, args) = command
            .args()
            .split_first()
            .ok_or(LaunchError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(options.env.iter().map(|(k, v)| (k, v)))
            .stdin(to_stdio(options.stdin))
            .stdout(to_stdio(options.stdout))
            .stderr(to_stdio(options.stderr));
        if let Some(ref cwd) = options.cwd {
            cmd.current_dir(cwd);
        }

        let child = cmd.spawn()?;
        debug!(pid = child.id(), command = %command, "spawned process");
        Ok(SystemProcess {
            child,
            returncode: None,
        })
    }
}

/// Handle to a real child process
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
    returncode: Option<i32>,
}

impl SystemProcess {
    fn settle(&mut self, status: ExitStatus) -> i32 {
        let code = exit_code(status);
        self.returncode = Some(code);
        code
    }
}

impl ProcessHandle for SystemProcess {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn returncode(&self) -> Option<i32> {
        self.returncode
    }

    fn poll(&mut self) -> Result<Option<i32>, ProcessError> {
        if self.returncode.is_some() {
            return Ok(self.returncode);
        }
        Ok(self.child.try_wait()?.map(|status| self.settle(status)))
    }

    fn wait(&mut self, timeout: Option<Duration>) -> Result<i32, ProcessError> {
        if let Some(code) = self.returncode {
            return Ok(code);
        }
        let Some(timeout) = timeout else {
            let status = self.child.wait()?;
            return Ok(self.settle(status));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(self.settle(status));
            }
            if Instant::now() >= deadline {
                return Err(ProcessError::Timeout { timeout });
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Output of streams that were not piped comes back empty.
    fn communicate(
        &mut self,
        input: Option<&[u8]>,
        timeout: Option<Duration>,
    ) -> Result<Output, ProcessError> {
        let stdout = self.child.stdout.take().map(drain);
        let stderr = self.child.stderr.take().map(drain);

        if let Some(mut stdin) = self.child.stdin.take() {
            if let Some(input) = input {
                stdin.write_all(input)?;
            }
            // Dropping stdin closes it so the child sees EOF
        }

        self.wait(timeout)?;
        Ok((join(stdout)?, join(stderr)?))
    }

    #[cfg(unix)]
    fn send_signal(&mut self, signal: i32) -> Result<(), ProcessError> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let signal = Signal::try_from(signal)?;
        kill(Pid::from_raw(self.child.id() as i32), signal)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn send_signal(&mut self, _signal: i32) -> Result<(), ProcessError> {
        Err(ProcessError::Unsupported {
            operation: "send_signal",
        })
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> Result<(), ProcessError> {
        self.send_signal(crate::handle::signals::SIGTERM)
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> Result<(), ProcessError> {
        self.kill()
    }

    fn kill(&mut self) -> Result<(), ProcessError> {
        self.child.kill()?;
        Ok(())
    }

    fn stdout(&mut self) -> Option<&mut dyn Read> {
        self.child.stdout.as_mut().map(|s| s as &mut dyn Read)
    }

    fn stderr(&mut self) -> Option<&mut dyn Read> {
        self.child.stderr.as_mut().map(|s| s as &mut dyn Read)
    }

    fn stdin(&mut self) -> Result<&mut dyn Write, ProcessError> {
        self.child
            .stdin
            .as_mut()
            .map(|s| s as &mut dyn Write)
            .ok_or(ProcessError::NotPiped { stream: "stdin" })
    }
}

fn to_stdio(mode: StdioMode) -> Stdio {
    match mode {
        StdioMode::Piped => Stdio::piped(),
        StdioMode::Inherit => Stdio::inherit(),
        StdioMode::Null => Stdio::null(),
    }
}

/// Exit code, or the negated signal number when killed by a signal
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    status.code().unwrap_or(-1)
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<Vec<u8>, ProcessError> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(ProcessError::Io(std::io::Error::other(
                "stream reader thread panicked",
            ))),
        },
        None => Ok(Vec::new()),
    }
}

#[cfg(all(test, unix))]
#[path = "system_tests.rs"]
mod tests;
