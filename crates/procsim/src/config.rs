// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario configuration types for TOML/JSON scenario files.

use crate::assertion::ExpectedCall;
use crate::behavior::{Behavior, DEFAULT_PID};
use crate::signature::CommandSignature;
use serde::{Deserialize, Deserializer, Serialize};

fn default_times() -> u32 {
    1
}

/// Top-level scenario configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Name for logging/debugging
    #[serde(default)]
    pub name: String,

    /// Commands to register, in order
    #[serde(default)]
    pub commands: Vec<CommandRule>,

    /// Launches the scenario expects, in order
    #[serde(default)]
    pub expect: Vec<ExpectedCall>,
}

/// One registered command and how it behaves
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandRule {
    /// Argument array or whitespace-separated command line
    pub command: CommandSignature,

    #[serde(default)]
    pub returncode: i32,

    /// Text or byte array
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub stdout: Vec<u8>,

    #[serde(default, deserialize_with = "deserialize_payload")]
    pub stderr: Vec<u8>,

    #[serde(default)]
    pub poll_count: u32,

    /// Process id to report (default: 1234)
    #[serde(default)]
    pub pid: Option<u32>,

    /// How many consecutive launches this rule covers (default: 1)
    #[serde(default = "default_times")]
    pub times: u32,
}

impl CommandRule {
    /// The behavior each covered launch gets
    pub fn behavior(&self) -> Behavior {
        Behavior::new()
            .returncode(self.returncode)
            .stdout(self.stdout.clone())
            .stderr(self.stderr.clone())
            .poll_count(self.poll_count)
            .pid(self.pid.unwrap_or(DEFAULT_PID))
    }
}

fn deserialize_payload<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PayloadDef {
        Text(String),
        Bytes(Vec<u8>),
    }

    Ok(match PayloadDef::deserialize(deserializer)? {
        PayloadDef::Text(text) => text.into_bytes(),
        PayloadDef::Bytes(bytes) => bytes,
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
