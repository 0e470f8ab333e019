// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declared outcomes for simulated invocations.

use crate::signature::CommandSignature;
use procsim_capture::LaunchOptions;
use std::fmt;
use std::sync::Arc;

/// Process id reported when a behavior does not set one
pub const DEFAULT_PID: u32 = 1234;

/// How one simulated run of a command behaves
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Behavior {
    /// Exit code revealed once the process finishes
    pub returncode: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Number of `poll()` calls that report "still running" first
    pub poll_count: u32,
    pub pid: u32,
}

impl Behavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returncode(mut self, returncode: i32) -> Self {
        self.returncode = returncode;
        self
    }

    pub fn stdout(mut self, stdout: impl Into<Vec<u8>>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn stderr(mut self, stderr: impl Into<Vec<u8>>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn poll_count(mut self, poll_count: u32) -> Self {
        self.poll_count = poll_count;
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            returncode: 0,
            stdout: Vec::new(),
            stderr: Vec::new(),
            poll_count: 0,
            pid: DEFAULT_PID,
        }
    }
}

/// Callback computing a behavior from the actual invocation
pub type BehaviorFn = dyn Fn(&CommandSignature, &LaunchOptions) -> Behavior + Send + Sync;

/// One queued registry slot: a fixed behavior or one computed at launch time
#[derive(Clone)]
pub enum BehaviorSource {
    Fixed(Behavior),
    Dynamic(Arc<BehaviorFn>),
}

impl BehaviorSource {
    /// Resolve to a concrete behavior for this invocation
    pub fn resolve(&self, command: &CommandSignature, options: &LaunchOptions) -> Behavior {
        match self {
            BehaviorSource::Fixed(behavior) => behavior.clone(),
            BehaviorSource::Dynamic(f) => f(command, options),
        }
    }
}

impl From<Behavior> for BehaviorSource {
    fn from(behavior: Behavior) -> Self {
        BehaviorSource::Fixed(behavior)
    }
}

impl fmt::Debug for BehaviorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorSource::Fixed(behavior) => f.debug_tuple("Fixed").field(behavior).finish(),
            BehaviorSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
