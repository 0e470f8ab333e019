// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for launching and driving processes.

use crate::signature::CommandSignature;
use std::time::Duration;
use thiserror::Error;

/// Errors raised when a command is launched
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No behavior was ever registered for this command
    #[error("Unexpected invocation: {command} ({})", describe_pending(.registered))]
    UnexpectedInvocation {
        command: CommandSignature,
        /// Commands that still have behaviors queued
        registered: Vec<CommandSignature>,
    },

    /// Behaviors were registered for this command but all have been used
    #[error("Exhausted behavior: {command} was registered for {consumed} invocation(s), all already consumed")]
    ExhaustedBehavior {
        command: CommandSignature,
        consumed: usize,
    },

    #[error("Cannot launch an empty command")]
    EmptyCommand,

    #[error("Failed to launch process: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    /// The command that failed to launch, if known
    pub fn command(&self) -> Option<&CommandSignature> {
        match self {
            LaunchError::UnexpectedInvocation { command, .. }
            | LaunchError::ExhaustedBehavior { command, .. } => Some(command),
            LaunchError::EmptyCommand | LaunchError::Io(_) => None,
        }
    }
}

/// Errors raised by lifecycle calls on a process handle
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Feature deliberately not simulated
    #[error("Unsupported operation on simulated process: {operation}")]
    Unsupported { operation: &'static str },

    #[error("The {stream} stream was not piped")]
    NotPiped { stream: &'static str },

    #[error("Process did not exit within {timeout:?}")]
    Timeout { timeout: Duration },

    #[cfg(unix)]
    #[error("Failed to deliver signal: {0}")]
    Signal(#[from] nix::Error),

    #[error("Process I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Registered behaviors that were never consumed by a launch
#[derive(Debug, Error)]
#[error("Unconsumed behaviors: {}", describe_unconsumed(.remaining))]
pub struct UnconsumedBehavior {
    pub remaining: Vec<(CommandSignature, usize)>,
}

fn describe_pending(registered: &[CommandSignature]) -> String {
    if registered.is_empty() {
        return "no commands registered".to_string();
    }
    let list: Vec<String> = registered.iter().map(|c| c.to_string()).collect();
    format!("registered: {}", list.join(", "))
}

fn describe_unconsumed(remaining: &[(CommandSignature, usize)]) -> String {
    let list: Vec<String> = remaining
        .iter()
        .map(|(command, count)| format!("{} x{}", command, count))
        .collect();
    list.join(", ")
}
