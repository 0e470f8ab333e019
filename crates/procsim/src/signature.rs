// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command signatures: the argument sequence identifying an invocation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered argument list used as the registry lookup key.
///
/// Two signatures are equal exactly when their argument sequences are equal.
/// There is no prefix, pattern, or whitespace-insensitive matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandSignature {
    args: Vec<String>,
}

impl CommandSignature {
    /// Create a signature from an argument list
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace.
    ///
    /// No shell quoting is interpreted: `"echo 'a b'"` yields three arguments.
    pub fn parse(command_line: &str) -> Self {
        Self::new(command_line.split_whitespace())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The program name (first argument)
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}

impl fmt::Display for CommandSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.args)
    }
}

impl From<&str> for CommandSignature {
    fn from(command_line: &str) -> Self {
        Self::parse(command_line)
    }
}

impl From<Vec<String>> for CommandSignature {
    fn from(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl From<Vec<&str>> for CommandSignature {
    fn from(args: Vec<&str>) -> Self {
        Self::new(args)
    }
}

impl From<&[&str]> for CommandSignature {
    fn from(args: &[&str]) -> Self {
        Self::new(args.iter().copied())
    }
}

impl From<&[String]> for CommandSignature {
    fn from(args: &[String]) -> Self {
        Self::new(args.iter().cloned())
    }
}

impl<const N: usize> From<[&str; N]> for CommandSignature {
    fn from(args: [&str; N]) -> Self {
        Self::new(args)
    }
}

impl From<&CommandSignature> for CommandSignature {
    fn from(signature: &CommandSignature) -> Self {
        signature.clone()
    }
}

impl Serialize for CommandSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.args.serialize(serializer)
    }
}

/// Accepts either an argument array or a whitespace-separated command line.
impl<'de> Deserialize<'de> for CommandSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum SignatureDef {
            Line(String),
            Args(Vec<String>),
        }

        Ok(match SignatureDef::deserialize(deserializer)? {
            SignatureDef::Line(line) => Self::parse(&line),
            SignatureDef::Args(args) => Self::from(args),
        })
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
