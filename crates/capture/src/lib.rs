// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Call capture and recording for process simulation assertions.
//!
//! This crate holds the serializable records of simulated process
//! invocations and lifecycle calls, plus a shared, append-only capture log
//! that can be streamed to and loaded back from JSONL files.

mod duration_serde;
mod interaction;
mod log;

pub use interaction::{CapturedCall, CapturedEvent, LaunchOptions, MethodCall, StdioMode};
pub use log::{CaptureLog, LoadError};
