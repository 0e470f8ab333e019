// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay and check procsim capture files.
//!
//! A capture is the JSONL file a `Simulator` streams to when
//! `PROCSIM_CAPTURE` is set. This crate reads one back, renders it, and
//! compares it against the `[[expect]]` entries of a scenario file.

use procsim::assertion::{self, RecordedInvocation};
use procsim::scenario::{self, Scenario, ScenarioError};
use procsim::CallMismatch;
use procsim_capture::{CaptureLog, LoadError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors reading verify inputs
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("{}: {source}", path.display())]
    Scenario {
        path: PathBuf,
        #[source]
        source: ScenarioError,
    },
}

/// How `replay` lays out the capture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplayLayout {
    /// One line per event in capture order, tagged with the process index
    #[default]
    Timeline,
    /// Each spawn followed by its own lifecycle calls
    Grouped,
}

async fn read(path: &Path) -> Result<String, VerifyError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| VerifyError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a JSONL capture file
pub async fn load_capture(path: &Path) -> Result<CaptureLog, VerifyError> {
    let content = read(path).await?;
    let capture = CaptureLog::parse(&content).map_err(|source| VerifyError::Capture {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), records = capture.len(), "loaded capture");
    Ok(capture)
}

/// Read a TOML or JSON scenario file
pub async fn load_scenario(path: &Path) -> Result<Scenario, VerifyError> {
    let content = read(path).await?;
    let parsed = if scenario::is_json(path) {
        Scenario::from_json(&content)
    } else {
        Scenario::from_toml(&content)
    };
    let scenario = parsed.map_err(|source| VerifyError::Scenario {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        expected = scenario.expected_calls().len(),
        "loaded scenario"
    );
    Ok(scenario)
}

/// Render a capture for reading
pub fn replay(capture: &CaptureLog, layout: ReplayLayout) -> String {
    match layout {
        ReplayLayout::Timeline => capture.replay(),
        ReplayLayout::Grouped => {
            assertion::render_recorded(&RecordedInvocation::from_capture(capture))
        }
    }
}

/// Compare a capture against the scenario's expected calls
pub fn check(capture: &CaptureLog, scenario: &Scenario) -> Result<(), CallMismatch> {
    let recorded = RecordedInvocation::from_capture(capture);
    debug!(
        recorded = recorded.len(),
        expected = scenario.expected_calls().len(),
        "checking capture"
    );
    assertion::compare(scenario.expected_calls(), &recorded)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
