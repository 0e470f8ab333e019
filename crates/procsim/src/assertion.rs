// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Comparing recorded call history against expected calls.

use crate::signature::CommandSignature;
use procsim_capture::{CaptureLog, CapturedEvent, LaunchOptions, MethodCall};
use serde::{Deserialize, Serialize};
use similar::TextDiff;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const NO_CALL: &str = "<no call>";

/// One launch as it actually happened
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedInvocation {
    pub command: CommandSignature,
    pub options: LaunchOptions,
    pub methods: Vec<MethodCall>,
}

impl RecordedInvocation {
    /// Rebuild per-launch history from a capture timeline.
    ///
    /// Lifecycle calls for a process that was never spawned in the capture
    /// are dropped.
    pub fn from_capture(capture: &CaptureLog) -> Vec<Self> {
        let mut by_process: HashMap<u64, usize> = HashMap::new();
        let mut recorded: Vec<Self> = Vec::new();
        for call in capture.calls() {
            match call.event {
                CapturedEvent::Spawn { args, options } => {
                    by_process.insert(call.process, recorded.len());
                    recorded.push(Self {
                        command: CommandSignature::from(args),
                        options,
                        methods: Vec::new(),
                    });
                }
                CapturedEvent::Method { call: method } => {
                    if let Some(&idx) = by_process.get(&call.process) {
                        recorded[idx].methods.push(method);
                    }
                }
            }
        }
        recorded
    }
}

/// One launch the test expects, with the lifecycle calls expected on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedCall {
    pub command: CommandSignature,
    /// Launch options to match; `None` accepts any
    #[serde(default)]
    pub options: Option<LaunchOptions>,
    #[serde(default)]
    pub methods: Vec<MethodCall>,
}

impl ExpectedCall {
    pub fn new(command: impl Into<CommandSignature>) -> Self {
        Self {
            command: command.into(),
            options: None,
            methods: Vec::new(),
        }
    }

    /// Also require these exact launch options
    pub fn options(mut self, options: LaunchOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn method(mut self, call: MethodCall) -> Self {
        self.methods.push(call);
        self
    }

    pub fn poll(self) -> Self {
        self.method(MethodCall::Poll)
    }

    pub fn wait(self, timeout: Option<Duration>) -> Self {
        self.method(MethodCall::Wait { timeout })
    }

    pub fn communicate(self, input: Option<&[u8]>, timeout: Option<Duration>) -> Self {
        self.method(MethodCall::Communicate {
            input: input.map(<[u8]>::to_vec),
            timeout,
        })
    }

    pub fn send_signal(self, signal: i32) -> Self {
        self.method(MethodCall::SendSignal { signal })
    }

    pub fn terminate(self) -> Self {
        self.method(MethodCall::Terminate)
    }

    pub fn kill(self) -> Self {
        self.method(MethodCall::Kill)
    }
}

/// Where recorded history first diverged from the expectation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MismatchKind {
    /// An expected launch never happened
    MissingCall,
    /// A launch happened that was not expected
    UnexpectedCall,
    ArgumentMismatch,
    OptionsMismatch,
    /// Lifecycle calls differ at this position
    MethodMismatch { position: usize },
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::MissingCall => f.write_str("missing call"),
            MismatchKind::UnexpectedCall => f.write_str("unexpected call"),
            MismatchKind::ArgumentMismatch => f.write_str("argument mismatch"),
            MismatchKind::OptionsMismatch => f.write_str("launch option mismatch"),
            MismatchKind::MethodMismatch { position } => {
                write!(f, "method mismatch at lifecycle call {}", position)
            }
        }
    }
}

/// Recorded history diverged from the expected calls
#[derive(Clone, Debug, Error)]
#[error("call #{index}: {kind}\n  expected: {expected}\n  recorded: {recorded}\n\n{diff}")]
pub struct CallMismatch {
    /// Launch index where the divergence was found
    pub index: usize,
    pub kind: MismatchKind,
    pub expected: String,
    pub recorded: String,
    /// Unified diff of the full expected and recorded histories
    pub diff: String,
}

/// Compare expected calls against recorded history, reporting the first divergence
pub fn compare(expected: &[ExpectedCall], recorded: &[RecordedInvocation]) -> Result<(), CallMismatch> {
    let mismatch = |index: usize, kind: MismatchKind, want: String, got: String| CallMismatch {
        index,
        kind,
        expected: want,
        recorded: got,
        diff: render_diff(expected, recorded),
    };

    for index in 0..expected.len().max(recorded.len()) {
        let (want, got) = match (expected.get(index), recorded.get(index)) {
            (Some(want), Some(got)) => (want, got),
            (Some(want), None) => {
                let options = want.options.clone().unwrap_or_default();
                return Err(mismatch(
                    index,
                    MismatchKind::MissingCall,
                    spawn_line(&want.command, &options),
                    NO_CALL.to_string(),
                ));
            }
            (None, Some(got)) => {
                return Err(mismatch(
                    index,
                    MismatchKind::UnexpectedCall,
                    NO_CALL.to_string(),
                    spawn_line(&got.command, &got.options),
                ));
            }
            (None, None) => break,
        };

        if want.command != got.command {
            return Err(mismatch(
                index,
                MismatchKind::ArgumentMismatch,
                want.command.to_string(),
                got.command.to_string(),
            ));
        }

        if let Some(ref options) = want.options {
            if *options != got.options {
                return Err(mismatch(
                    index,
                    MismatchKind::OptionsMismatch,
                    describe_options(options),
                    describe_options(&got.options),
                ));
            }
        }

        let calls = want.methods.len().max(got.methods.len());
        if let Some(position) = (0..calls).find(|&p| want.methods.get(p) != got.methods.get(p)) {
            return Err(mismatch(
                index,
                MismatchKind::MethodMismatch { position },
                describe_method(want.methods.get(position)),
                describe_method(got.methods.get(position)),
            ));
        }
    }

    Ok(())
}

/// Render recorded history: one line per launch, one indented line per lifecycle call
pub fn render_recorded(recorded: &[RecordedInvocation]) -> String {
    let mut out = String::new();
    for invocation in recorded {
        push_invocation(
            &mut out,
            &invocation.command,
            &invocation.options,
            &invocation.methods,
        );
    }
    out
}

/// Render expectations in the same layout as [`render_recorded`].
///
/// Expectations that accept any options borrow the recorded counterpart's
/// options so the diff only shows real differences.
pub fn render_expected(expected: &[ExpectedCall], recorded: &[RecordedInvocation]) -> String {
    let mut out = String::new();
    for (index, call) in expected.iter().enumerate() {
        let options = match call.options {
            Some(ref options) => options.clone(),
            None => recorded
                .get(index)
                .map(|r| r.options.clone())
                .unwrap_or_default(),
        };
        push_invocation(&mut out, &call.command, &options, &call.methods);
    }
    out
}

fn render_diff(expected: &[ExpectedCall], recorded: &[RecordedInvocation]) -> String {
    let want = render_expected(expected, recorded);
    let got = render_recorded(recorded);
    TextDiff::from_lines(&want, &got)
        .unified_diff()
        .header("expected", "recorded")
        .to_string()
}

fn push_invocation(
    out: &mut String,
    command: &CommandSignature,
    options: &LaunchOptions,
    methods: &[MethodCall],
) {
    out.push_str(&spawn_line(command, options));
    out.push('\n');
    for method in methods {
        out.push_str("    ");
        out.push_str(&method.to_string());
        out.push('\n');
    }
}

fn spawn_line(command: &CommandSignature, options: &LaunchOptions) -> String {
    CapturedEvent::Spawn {
        args: command.args().to_vec(),
        options: options.clone(),
    }
    .to_string()
}

fn describe_options(options: &LaunchOptions) -> String {
    if options.is_default() {
        "(defaults)".to_string()
    } else {
        options.to_string()
    }
}

fn describe_method(call: Option<&MethodCall>) -> String {
    call.map_or_else(|| NO_CALL.to_string(), ToString::to_string)
}

#[cfg(test)]
#[path = "assertion_tests.rs"]
mod tests;
