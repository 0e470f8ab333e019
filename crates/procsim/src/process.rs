// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated process handles.
//!
//! Each launch produces one [`SimulatedProcess`] with its own run state. The
//! simulation is synchronous: nothing blocks, and no real process, pipe, or
//! signal is ever involved.

use crate::behavior::Behavior;
use crate::error::ProcessError;
use crate::handle::{Output, ProcessHandle};
use crate::signature::CommandSignature;
use parking_lot::Mutex;
use procsim_capture::{CaptureLog, CapturedEvent, LaunchOptions, MethodCall, StdioMode};
use std::io::{BufRead, Cursor, Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Mutable run state shared between a process handle and its call log entry
#[derive(Debug)]
pub(crate) struct ProcessState {
    pub(crate) returncode: Option<i32>,
    pub(crate) polls_remaining: u32,
    pub(crate) final_returncode: i32,
    pub(crate) calls: Vec<MethodCall>,
}

pub(crate) type SharedState = Arc<Mutex<ProcessState>>;

impl ProcessState {
    fn new(behavior: &Behavior) -> Self {
        Self {
            returncode: None,
            polls_remaining: behavior.poll_count,
            final_returncode: behavior.returncode,
            calls: Vec::new(),
        }
    }

    /// Move to the finished state; the exit code never changes afterwards.
    fn finish(&mut self) -> i32 {
        self.polls_remaining = 0;
        *self.returncode.get_or_insert(self.final_returncode)
    }
}

/// In-memory readable stream with its own cursor
#[derive(Debug)]
pub struct SimStream {
    cursor: Cursor<Vec<u8>>,
}

impl SimStream {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(payload),
        }
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> &[u8] {
        let data = self.cursor.get_ref();
        let pos = (self.cursor.position() as usize).min(data.len());
        &data[pos..]
    }

    fn exhaust(&mut self) {
        let len = self.cursor.get_ref().len() as u64;
        self.cursor.set_position(len);
    }
}

impl Read for SimStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl BufRead for SimStream {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.cursor.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.cursor.consume(amt)
    }
}

/// Process handle returned by the simulator for one launch
#[derive(Debug)]
pub struct SimulatedProcess {
    id: u64,
    command: CommandSignature,
    pid: u32,
    stdout_payload: Vec<u8>,
    stderr_payload: Vec<u8>,
    stdout: Option<SimStream>,
    stderr: Option<SimStream>,
    state: SharedState,
    capture: CaptureLog,
}

impl SimulatedProcess {
    pub(crate) fn new(
        id: u64,
        command: CommandSignature,
        options: &LaunchOptions,
        behavior: Behavior,
        capture: CaptureLog,
    ) -> Self {
        let state = Arc::new(Mutex::new(ProcessState::new(&behavior)));
        let piped = |mode: StdioMode, payload: &[u8]| {
            (mode == StdioMode::Piped).then(|| SimStream::new(payload.to_vec()))
        };
        Self {
            id,
            pid: behavior.pid,
            stdout: piped(options.stdout, &behavior.stdout),
            stderr: piped(options.stderr, &behavior.stderr),
            stdout_payload: behavior.stdout,
            stderr_payload: behavior.stderr,
            command,
            state,
            capture,
        }
    }

    pub(crate) fn shared_state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Process index in the capture log
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn command(&self) -> &CommandSignature {
        &self.command
    }

    /// Lifecycle calls made on this process so far
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state.lock().calls.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().returncode.is_some()
    }

    /// Polls left before `poll()` reveals the exit code
    pub fn polls_remaining(&self) -> u32 {
        self.state.lock().polls_remaining
    }

    /// Direct access to the simulated stdout stream
    pub fn stdout_stream(&mut self) -> Option<&mut SimStream> {
        self.stdout.as_mut()
    }

    /// Direct access to the simulated stderr stream
    pub fn stderr_stream(&mut self) -> Option<&mut SimStream> {
        self.stderr.as_mut()
    }

    fn record(&self, state: &mut ProcessState, call: MethodCall) {
        trace!(process = self.id, call = %call, "lifecycle call");
        state.calls.push(call.clone());
        self.capture.record(self.id, CapturedEvent::Method { call });
    }
}

impl ProcessHandle for SimulatedProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn returncode(&self) -> Option<i32> {
        self.state.lock().returncode
    }

    fn poll(&mut self) -> Result<Option<i32>, ProcessError> {
        let mut state = self.state.lock();
        self.record(&mut state, MethodCall::Poll);
        if state.returncode.is_none() {
            if state.polls_remaining > 0 {
                state.polls_remaining -= 1;
                return Ok(None);
            }
            let returncode = state.finish();
            debug!(process = self.id, returncode, "finished on poll");
        }
        Ok(state.returncode)
    }

    /// Finishes immediately; the timeout is only recorded.
    fn wait(&mut self, timeout: Option<Duration>) -> Result<i32, ProcessError> {
        let mut state = self.state.lock();
        self.record(&mut state, MethodCall::Wait { timeout });
        Ok(state.finish())
    }

    /// Records `input` verbatim and returns the full declared payloads.
    fn communicate(
        &mut self,
        input: Option<&[u8]>,
        timeout: Option<Duration>,
    ) -> Result<Output, ProcessError> {
        {
            let mut state = self.state.lock();
            self.record(
                &mut state,
                MethodCall::Communicate {
                    input: input.map(<[u8]>::to_vec),
                    timeout,
                },
            );
            state.finish();
        }
        for stream in [self.stdout.as_mut(), self.stderr.as_mut()]
            .into_iter()
            .flatten()
        {
            stream.exhaust();
        }
        Ok((self.stdout_payload.clone(), self.stderr_payload.clone()))
    }

    fn send_signal(&mut self, signal: i32) -> Result<(), ProcessError> {
        let mut state = self.state.lock();
        self.record(&mut state, MethodCall::SendSignal { signal });
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), ProcessError> {
        let mut state = self.state.lock();
        self.record(&mut state, MethodCall::Terminate);
        Ok(())
    }

    fn kill(&mut self) -> Result<(), ProcessError> {
        let mut state = self.state.lock();
        self.record(&mut state, MethodCall::Kill);
        Ok(())
    }

    fn stdout(&mut self) -> Option<&mut dyn Read> {
        self.stdout.as_mut().map(|s| s as &mut dyn Read)
    }

    fn stderr(&mut self) -> Option<&mut dyn Read> {
        self.stderr.as_mut().map(|s| s as &mut dyn Read)
    }

    /// Input goes through `communicate()`; writing to stdin is not simulated.
    fn stdin(&mut self) -> Result<&mut dyn Write, ProcessError> {
        Err(ProcessError::Unsupported { operation: "stdin" })
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
