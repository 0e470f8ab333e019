// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process Launcher Simulator
//!
//! A test double for code that launches subprocesses. Tests register the
//! commands they expect along with how each run should behave (exit code,
//! output, how many polls before it finishes), hand a [`Simulator`] to the
//! code under test in place of a real [`SystemLauncher`], and afterwards
//! assert on exactly which commands were launched and which lifecycle calls
//! were made on each one.
//!
//! ```
//! use procsim::{Behavior, ExpectedCall, LaunchOptions, Launcher, ProcessHandle, Simulator};
//!
//! let sim = Simulator::new();
//! sim.register(["myapp", "--help"], Behavior::new().stdout("usage: myapp"));
//!
//! let mut process = sim.launch(["myapp", "--help"], LaunchOptions::default()).unwrap();
//! let (stdout, stderr) = process.communicate(None, None).unwrap();
//! assert_eq!(stdout, b"usage: myapp");
//! assert!(stderr.is_empty());
//! assert_eq!(process.returncode(), Some(0));
//!
//! sim.assert_calls(&[ExpectedCall::new(["myapp", "--help"]).communicate(None, None)])
//!     .unwrap();
//! ```

pub mod assertion;
pub mod behavior;
pub mod config;
pub mod env;
pub mod error;
pub mod handle;
pub mod process;
pub mod registry;
pub mod scenario;
pub mod signature;
pub mod simulator;
pub mod system;

/// Re-exported capture types from the procsim-capture crate.
pub mod capture {
    pub use procsim_capture::{
        CaptureLog, CapturedCall, CapturedEvent, LaunchOptions, LoadError, MethodCall, StdioMode,
    };
}

pub use assertion::{CallMismatch, ExpectedCall, MismatchKind, RecordedInvocation};
pub use behavior::Behavior;
pub use error::{LaunchError, ProcessError, UnconsumedBehavior};
pub use handle::{Launcher, ProcessHandle};
pub use process::SimulatedProcess;
pub use procsim_capture::{LaunchOptions, MethodCall, StdioMode};
pub use scenario::{Scenario, ScenarioError};
pub use signature::CommandSignature;
pub use simulator::{CallLogEntry, ProcessRecord, Simulator};
pub use system::{SystemLauncher, SystemProcess};
