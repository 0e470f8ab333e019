// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All environment variables read by procsim are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

use std::path::PathBuf;

/// JSONL file that `Simulator::from_env()` streams its capture to
pub const PROCSIM_CAPTURE: &str = "PROCSIM_CAPTURE";

/// `PROCSIM_CAPTURE`: capture output path. Empty values are ignored.
pub fn capture_path() -> Option<PathBuf> {
    std::env::var_os(PROCSIM_CAPTURE)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
