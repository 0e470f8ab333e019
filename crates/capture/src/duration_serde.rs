// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Serde helpers for Duration serialization.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

const NANOS_PER_SEC: u32 = 1_000_000_000;

#[derive(Serialize, Deserialize)]
struct DurationDef {
    secs: u64,
    #[serde(default)]
    nanos: u32,
}

impl DurationDef {
    /// Rejects `nanos` of a second or more instead of carrying into `secs`
    fn into_duration<E: Error>(self) -> Result<Duration, E> {
        if self.nanos >= NANOS_PER_SEC {
            return Err(E::custom(format!(
                "nanos must be below {}, got {}",
                NANOS_PER_SEC, self.nanos
            )));
        }
        Ok(Duration::new(self.secs, self.nanos))
    }
}

impl From<&Duration> for DurationDef {
    fn from(duration: &Duration) -> Self {
        Self {
            secs: duration.as_secs(),
            nanos: duration.subsec_nanos(),
        }
    }
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    DurationDef::from(duration).serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    DurationDef::deserialize(deserializer)?.into_duration()
}

/// Same encoding for optional durations (lifecycle call timeouts).
pub mod option {
    use super::DurationDef;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_ref().map(DurationDef::from).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DurationDef>::deserialize(deserializer)?
            .map(DurationDef::into_duration)
            .transpose()
    }
}
