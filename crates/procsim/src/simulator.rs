// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The simulator: registration, dispatch, and the recorded call history.

use crate::assertion::{self, CallMismatch, ExpectedCall, RecordedInvocation};
use crate::behavior::Behavior;
use crate::env;
use crate::error::{LaunchError, UnconsumedBehavior};
use crate::handle::{Launcher, ProcessHandle};
use crate::process::{SharedState, SimulatedProcess};
use crate::registry::BehaviorRegistry;
use crate::scenario::Scenario;
use crate::signature::CommandSignature;
use parking_lot::Mutex;
use procsim_capture::{CaptureLog, CapturedEvent, LaunchOptions, MethodCall};
use tracing::debug;

/// Read-only view of a launched process's state, kept in the call log
#[derive(Clone, Debug)]
pub struct ProcessRecord {
    pid: u32,
    state: SharedState,
}

impl ProcessRecord {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Exit code, or `None` if the process never finished
    pub fn returncode(&self) -> Option<i32> {
        self.state.lock().returncode
    }

    /// Lifecycle calls made on the process, in call order
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state.lock().calls.clone()
    }
}

/// One successfully dispatched launch
#[derive(Clone, Debug)]
pub struct CallLogEntry {
    /// Dispatch index within this simulator
    pub index: u64,
    /// Process index in the capture log, unique across simulators sharing it
    pub process_id: u64,
    pub command: CommandSignature,
    pub options: LaunchOptions,
    pub process: ProcessRecord,
}

/// Process launcher simulator.
///
/// Owns its behavior registry and call log; construct one per test.
#[derive(Debug)]
pub struct Simulator {
    registry: Mutex<BehaviorRegistry>,
    entries: Mutex<Vec<CallLogEntry>>,
    capture: CaptureLog,
}

impl Simulator {
    /// Create a simulator with an in-memory capture log
    pub fn new() -> Self {
        Self::with_capture(CaptureLog::new())
    }

    /// Create a simulator recording into the given capture log
    pub fn with_capture(capture: CaptureLog) -> Self {
        Self {
            registry: Mutex::new(BehaviorRegistry::new()),
            entries: Mutex::new(Vec::new()),
            capture,
        }
    }

    /// Create a simulator, streaming its capture to `PROCSIM_CAPTURE` if set
    pub fn from_env() -> std::io::Result<Self> {
        match env::capture_path() {
            Some(path) => {
                debug!(path = %path.display(), "streaming capture to file");
                Ok(Self::with_capture(CaptureLog::with_file(&path)?))
            }
            None => Ok(Self::new()),
        }
    }

    /// Create a simulator with every command of a scenario registered
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let sim = Self::new();
        scenario.register_into(&sim);
        sim
    }

    /// Queue a behavior for a command
    pub fn register(&self, command: impl Into<CommandSignature>, behavior: Behavior) {
        self.registry.lock().register(command.into(), behavior);
    }

    /// Queue a behavior computed from the actual invocation at launch time
    pub fn register_dynamic<F>(&self, command: impl Into<CommandSignature>, f: F)
    where
        F: Fn(&CommandSignature, &LaunchOptions) -> Behavior + Send + Sync + 'static,
    {
        self.registry.lock().register_dynamic(command.into(), f);
    }

    /// Number of behaviors still queued for a command
    pub fn remaining(&self, command: impl Into<CommandSignature>) -> usize {
        self.registry.lock().remaining(&command.into())
    }

    /// Fail if any registered behavior was never launched
    pub fn assert_all_consumed(&self) -> Result<(), UnconsumedBehavior> {
        let remaining = self.registry.lock().unconsumed();
        if remaining.is_empty() {
            Ok(())
        } else {
            Err(UnconsumedBehavior { remaining })
        }
    }

    /// All dispatched launches, in order
    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.entries.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// The interleaved timeline of spawns and lifecycle calls
    pub fn capture(&self) -> &CaptureLog {
        &self.capture
    }

    /// Recorded launches with their lifecycle calls, for comparison
    pub fn recorded(&self) -> Vec<RecordedInvocation> {
        self.entries
            .lock()
            .iter()
            .map(|entry| RecordedInvocation {
                command: entry.command.clone(),
                options: entry.options.clone(),
                methods: entry.process.calls(),
            })
            .collect()
    }

    /// Render the recorded history, grouped by launch
    pub fn replay(&self) -> String {
        assertion::render_recorded(&self.recorded())
    }

    /// Compare the recorded history against the expected calls
    pub fn assert_calls(&self, expected: &[ExpectedCall]) -> Result<(), CallMismatch> {
        assertion::compare(expected, &self.recorded())
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher for Simulator {
    type Process = SimulatedProcess;

    /// Match the command against the registry and hand back a simulated process.
    ///
    /// Fails without touching the call log when nothing matches.
    fn launch<C>(&self, command: C, options: LaunchOptions) -> Result<SimulatedProcess, LaunchError>
    where
        C: Into<CommandSignature>,
    {
        let command = command.into();
        let source = self.registry.lock().consume(&command)?;
        let behavior = source.resolve(&command, &options);

        let mut entries = self.entries.lock();
        let index = entries.len() as u64;
        let process_id = self.capture.next_process();
        let process = SimulatedProcess::new(
            process_id,
            command.clone(),
            &options,
            behavior,
            self.capture.clone(),
        );
        self.capture.record(
            process_id,
            CapturedEvent::Spawn {
                args: command.args().to_vec(),
                options: options.clone(),
            },
        );
        debug!(index, process = process_id, command = %command, "dispatched");
        entries.push(CallLogEntry {
            index,
            process_id,
            command,
            options,
            process: ProcessRecord {
                pid: process.pid(),
                state: process.shared_state(),
            },
        });
        Ok(process)
    }
}

#[cfg(test)]
#[path = "simulator_tests.rs"]
mod tests;
