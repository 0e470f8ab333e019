// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured call data types.

use super::duration_serde;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Captured call record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturedCall {
    /// Sequence number across the whole capture
    pub seq: u64,

    /// Wall-clock timestamp
    pub timestamp: SystemTime,

    /// Elapsed time since capture started
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,

    /// Index of the simulated process this call belongs to
    pub process: u64,

    /// What happened
    pub event: CapturedEvent,
}

/// A spawn or a lifecycle call on a spawned process
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CapturedEvent {
    Spawn {
        args: Vec<String>,
        #[serde(default)]
        options: LaunchOptions,
    },
    Method {
        call: MethodCall,
    },
}

/// Lifecycle method invoked on a process handle, with its arguments
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case", deny_unknown_fields)]
pub enum MethodCall {
    Poll,
    Wait {
        #[serde(default, with = "duration_serde::option")]
        timeout: Option<Duration>,
    },
    Communicate {
        #[serde(default, deserialize_with = "deserialize_input")]
        input: Option<Vec<u8>>,
        #[serde(default, with = "duration_serde::option")]
        timeout: Option<Duration>,
    },
    SendSignal {
        signal: i32,
    },
    Terminate,
    Kill,
}

/// How a standard stream of the launched process is connected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdioMode {
    #[default]
    Piped,
    Inherit,
    Null,
}

/// Keyword launch options passed alongside the command
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchOptions {
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub stdin: StdioMode,
    pub stdout: StdioMode,
    pub stderr: StdioMode,
}

impl LaunchOptions {
    /// Set the working directory
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn stdin(mut self, mode: StdioMode) -> Self {
        self.stdin = mode;
        self
    }

    pub fn stdout(mut self, mode: StdioMode) -> Self {
        self.stdout = mode;
        self
    }

    pub fn stderr(mut self, mode: StdioMode) -> Self {
        self.stderr = mode;
        self
    }

    /// True when no option differs from its default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for StdioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdioMode::Piped => f.write_str("piped"),
            StdioMode::Inherit => f.write_str("inherit"),
            StdioMode::Null => f.write_str("null"),
        }
    }
}

/// Renders only the options that differ from their defaults.
impl fmt::Display for LaunchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref cwd) = self.cwd {
            parts.push(format!("cwd={:?}", cwd.display().to_string()));
        }
        if !self.env.is_empty() {
            parts.push(format!("env={:?}", self.env));
        }
        for (name, mode) in [
            ("stdin", self.stdin),
            ("stdout", self.stdout),
            ("stderr", self.stderr),
        ] {
            if mode != StdioMode::default() {
                parts.push(format!("{}={}", name, mode));
            }
        }
        f.write_str(&parts.join(", "))
    }
}

impl fmt::Display for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodCall::Poll => f.write_str("poll()"),
            MethodCall::Wait { timeout: None } => f.write_str("wait()"),
            MethodCall::Wait {
                timeout: Some(timeout),
            } => write!(f, "wait(timeout={:?})", timeout),
            MethodCall::Communicate { input, timeout } => {
                let mut parts = Vec::new();
                if let Some(input) = input {
                    parts.push(format!("input=b\"{}\"", input.escape_ascii()));
                }
                if let Some(timeout) = timeout {
                    parts.push(format!("timeout={:?}", timeout));
                }
                write!(f, "communicate({})", parts.join(", "))
            }
            MethodCall::SendSignal { signal } => write!(f, "send_signal({})", signal),
            MethodCall::Terminate => f.write_str("terminate()"),
            MethodCall::Kill => f.write_str("kill()"),
        }
    }
}

impl fmt::Display for CapturedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapturedEvent::Spawn { args, options } if options.is_default() => {
                write!(f, "spawn {:?}", args)
            }
            CapturedEvent::Spawn { args, options } => {
                write!(f, "spawn {:?} ({})", args, options)
            }
            CapturedEvent::Method { call } => write!(f, "{}", call),
        }
    }
}

impl fmt::Display for CapturedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.process, self.event)
    }
}

/// Communicate input may be written as text or as a byte array.
fn deserialize_input<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum InputDef {
        Text(String),
        Bytes(Vec<u8>),
    }

    Ok(Option::<InputDef>::deserialize(deserializer)?.map(|input| match input {
        InputDef::Text(text) => text.into_bytes(),
        InputDef::Bytes(bytes) => bytes,
    }))
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;
