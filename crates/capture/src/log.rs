// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture log implementation.

use crate::interaction::{CapturedCall, CapturedEvent, MethodCall};
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use thiserror::Error;

/// Errors that can occur when loading a JSONL capture
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read capture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid capture record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Capture log recording every spawn and lifecycle call in order
pub struct CaptureLog {
    start: Instant,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
    /// Next unused process index, shared by every clone
    next_process: Arc<AtomicU64>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl CaptureLog {
    /// Create a new in-memory capture log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_process: Arc::new(AtomicU64::new(0)),
            file_writer: None,
        }
    }

    /// Create a capture log that also writes to a file (JSONL format)
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_process: Arc::new(AtomicU64::new(0)),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Load a previously written JSONL capture
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse JSONL capture content; blank lines are skipped
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let mut calls = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let call = serde_json::from_str(line).map_err(|source| LoadError::Parse {
                line: idx + 1,
                source,
            })?;
            calls.push(call);
        }
        Ok(Self::from_calls(calls))
    }

    /// Build a log from already captured calls
    pub fn from_calls(calls: Vec<CapturedCall>) -> Self {
        let next_process = calls.iter().map(|c| c.process.saturating_add(1)).max().unwrap_or(0);
        Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(calls)),
            next_process: Arc::new(AtomicU64::new(next_process)),
            file_writer: None,
        }
    }

    /// Reserve a process index no other spawn in this log has used
    pub fn next_process(&self) -> u64 {
        self.next_process.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a call, returning its sequence number
    pub fn record(&self, process: u64, event: CapturedEvent) -> u64 {
        let mut calls = self.calls.lock();
        let seq = calls.len() as u64;
        let call = CapturedCall {
            seq,
            timestamp: SystemTime::now(),
            elapsed: self.start.elapsed(),
            process,
            event,
        };

        calls.push(call.clone());

        // Write to file if configured
        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&call) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }

        seq
    }

    /// Get all captured calls
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().clone()
    }

    /// Get the last N calls
    pub fn last(&self, n: usize) -> Vec<CapturedCall> {
        let all = self.calls.lock();
        all.iter().rev().take(n).rev().cloned().collect()
    }

    /// Count calls matching a predicate
    pub fn count<F: Fn(&CapturedCall) -> bool>(&self, pred: F) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    /// Get all spawn records, in dispatch order
    pub fn spawns(&self) -> Vec<CapturedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c.event, CapturedEvent::Spawn { .. }))
            .cloned()
            .collect()
    }

    /// Find spawns whose program (first argument) equals `program`
    pub fn find_by_program(&self, program: &str) -> Vec<CapturedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| match c.event {
                CapturedEvent::Spawn { ref args, .. } => {
                    args.first().is_some_and(|p| p == program)
                }
                CapturedEvent::Method { .. } => false,
            })
            .cloned()
            .collect()
    }

    /// Lifecycle calls made on one process, in call order
    pub fn methods_for(&self, process: u64) -> Vec<MethodCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.process == process)
            .filter_map(|c| match c.event {
                CapturedEvent::Method { ref call } => Some(call.clone()),
                CapturedEvent::Spawn { .. } => None,
            })
            .collect()
    }

    /// Render the timeline, one line per call
    pub fn replay(&self) -> String {
        let mut out = String::new();
        for call in self.calls.lock().iter() {
            out.push_str(&call.to_string());
            out.push('\n');
        }
        out
    }

    /// Get the total number of calls
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Clear all recorded calls
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Default for CaptureLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CaptureLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            calls: Arc::clone(&self.calls),
            next_process: Arc::clone(&self.next_process),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

impl std::fmt::Debug for CaptureLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureLog")
            .field("len", &self.len())
            .field("to_file", &self.file_writer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
