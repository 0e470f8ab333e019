// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario loading: declared commands and expectations from a file.

use crate::assertion::ExpectedCall;
use crate::config::ScenarioConfig;
use crate::simulator::Simulator;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Largest `times` a single command rule may request
pub const MAX_TIMES: u32 = 10_000;

/// Errors that can occur when working with scenarios
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Validated scenario ready to register into a simulator
#[derive(Clone, Debug)]
pub struct Scenario {
    config: ScenarioConfig,
}

impl Scenario {
    /// Load a scenario from a TOML or JSON file (by `.json` extension)
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Parse a TOML scenario from a string
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        Self::from_config(toml::from_str(content)?)
    }

    /// Parse a JSON scenario from a string
    pub fn from_json(content: &str) -> Result<Self, ScenarioError> {
        Self::from_config(serde_json::from_str(content)?)
    }

    /// Create a scenario from a config object
    pub fn from_config(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        for (idx, rule) in config.commands.iter().enumerate() {
            if rule.command.is_empty() {
                return Err(ScenarioError::Validation(format!(
                    "commands[{}]: command must not be empty",
                    idx
                )));
            }
            if rule.times == 0 {
                return Err(ScenarioError::Validation(format!(
                    "commands[{}] {}: times must be at least 1",
                    idx, rule.command
                )));
            }
            if rule.times > MAX_TIMES {
                return Err(ScenarioError::Validation(format!(
                    "commands[{}] {}: times must be at most {}, got {}",
                    idx, rule.command, MAX_TIMES, rule.times
                )));
            }
        }

        for (idx, call) in config.expect.iter().enumerate() {
            if call.command.is_empty() {
                return Err(ScenarioError::Validation(format!(
                    "expect[{}]: command must not be empty",
                    idx
                )));
            }
        }

        Ok(Self { config })
    }

    /// Register every command rule, in file order
    pub fn register_into(&self, sim: &Simulator) {
        for rule in &self.config.commands {
            let behavior = rule.behavior();
            for _ in 0..rule.times {
                sim.register(&rule.command, behavior.clone());
            }
        }
        debug!(
            scenario = %self.config.name,
            commands = self.config.commands.len(),
            "registered scenario"
        );
    }

    /// Launches the scenario expects, in order
    pub fn expected_calls(&self) -> &[ExpectedCall] {
        &self.config.expect
    }

    /// Get the scenario name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the scenario configuration
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }
}

/// Whether a scenario path names a JSON file
pub fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
