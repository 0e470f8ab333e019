// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The process-launching interface code under test depends on.
//!
//! Both [`Simulator`](crate::Simulator) and
//! [`SystemLauncher`](crate::SystemLauncher) implement [`Launcher`], so code
//! written against these traits runs unmodified under either.

use crate::error::{LaunchError, ProcessError};
use crate::signature::CommandSignature;
use procsim_capture::LaunchOptions;
use std::io::{Read, Write};
use std::time::Duration;

/// Signal numbers used by `terminate()` and `kill()`
pub mod signals {
    pub const SIGINT: i32 = 2;
    pub const SIGKILL: i32 = 9;
    pub const SIGTERM: i32 = 15;
}

/// Output of `communicate()`: `(stdout, stderr)`
pub type Output = (Vec<u8>, Vec<u8>);

/// Handle to a launched process
pub trait ProcessHandle {
    fn pid(&self) -> u32;

    /// Exit code, or `None` while the process is still running
    fn returncode(&self) -> Option<i32>;

    /// Check for completion without blocking
    fn poll(&mut self) -> Result<Option<i32>, ProcessError>;

    /// Wait for completion and return the exit code
    fn wait(&mut self, timeout: Option<Duration>) -> Result<i32, ProcessError>;

    /// Send `input` to the process, then collect all output and wait for it
    fn communicate(
        &mut self,
        input: Option<&[u8]>,
        timeout: Option<Duration>,
    ) -> Result<Output, ProcessError>;

    fn send_signal(&mut self, signal: i32) -> Result<(), ProcessError>;

    fn terminate(&mut self) -> Result<(), ProcessError>;

    fn kill(&mut self) -> Result<(), ProcessError>;

    /// Readable stdout, if it was piped
    fn stdout(&mut self) -> Option<&mut dyn Read>;

    /// Readable stderr, if it was piped
    fn stderr(&mut self) -> Option<&mut dyn Read>;

    /// Writable stdin
    fn stdin(&mut self) -> Result<&mut dyn Write, ProcessError>;
}

/// Something that launches processes
pub trait Launcher {
    type Process: ProcessHandle;

    fn launch<C>(&self, command: C, options: LaunchOptions) -> Result<Self::Process, LaunchError>
    where
        C: Into<CommandSignature>;
}

impl<L: Launcher> Launcher for &L {
    type Process = L::Process;

    fn launch<C>(&self, command: C, options: LaunchOptions) -> Result<Self::Process, LaunchError>
    where
        C: Into<CommandSignature>,
    {
        (**self).launch(command, options)
    }
}
