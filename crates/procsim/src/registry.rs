// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Behavior registry: per-command FIFO queues of declared behaviors.

use crate::behavior::{Behavior, BehaviorFn, BehaviorSource};
use crate::error::LaunchError;
use crate::signature::CommandSignature;
use procsim_capture::LaunchOptions;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct Slot {
    command: CommandSignature,
    queue: VecDeque<BehaviorSource>,
    consumed: usize,
}

/// Registry of expected commands and their queued behaviors
#[derive(Debug, Default)]
pub struct BehaviorRegistry {
    index: HashMap<CommandSignature, usize>,
    /// Slots in first-registration order
    slots: Vec<Slot>,
}

impl BehaviorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a behavior for a command
    pub fn register(&mut self, command: CommandSignature, behavior: impl Into<BehaviorSource>) {
        let slot = self.slot_mut(command);
        slot.queue.push_back(behavior.into());
        debug!(command = %slot.command, queued = slot.queue.len(), "registered behavior");
    }

    /// Queue a behavior computed from the actual invocation at launch time
    pub fn register_dynamic<F>(&mut self, command: CommandSignature, f: F)
    where
        F: Fn(&CommandSignature, &LaunchOptions) -> Behavior + Send + Sync + 'static,
    {
        let f: Arc<BehaviorFn> = Arc::new(f);
        self.register(command, BehaviorSource::Dynamic(f));
    }

    /// Pop the next queued behavior for an exactly matching command
    pub fn consume(&mut self, command: &CommandSignature) -> Result<BehaviorSource, LaunchError> {
        let Some(&idx) = self.index.get(command) else {
            debug!(command = %command, "no behavior registered");
            return Err(LaunchError::UnexpectedInvocation {
                command: command.clone(),
                registered: self.pending(),
            });
        };

        let slot = &mut self.slots[idx];
        match slot.queue.pop_front() {
            Some(source) => {
                slot.consumed += 1;
                debug!(
                    command = %slot.command,
                    remaining = slot.queue.len(),
                    "consumed behavior"
                );
                Ok(source)
            }
            None => {
                debug!(command = %command, consumed = slot.consumed, "behaviors exhausted");
                Err(LaunchError::ExhaustedBehavior {
                    command: command.clone(),
                    consumed: slot.consumed,
                })
            }
        }
    }

    /// Number of behaviors still queued for a command
    pub fn remaining(&self, command: &CommandSignature) -> usize {
        self.index
            .get(command)
            .map_or(0, |&idx| self.slots[idx].queue.len())
    }

    /// Commands with queued behaviors, in registration order
    pub fn pending(&self) -> Vec<CommandSignature> {
        self.slots
            .iter()
            .filter(|s| !s.queue.is_empty())
            .map(|s| s.command.clone())
            .collect()
    }

    /// Commands with queued behaviors and how many remain
    pub fn unconsumed(&self) -> Vec<(CommandSignature, usize)> {
        self.slots
            .iter()
            .filter(|s| !s.queue.is_empty())
            .map(|s| (s.command.clone(), s.queue.len()))
            .collect()
    }

    /// True when no behavior is queued
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.queue.is_empty())
    }

    fn slot_mut(&mut self, command: CommandSignature) -> &mut Slot {
        let idx = match self.index.get(&command) {
            Some(&idx) => idx,
            None => {
                let idx = self.slots.len();
                self.index.insert(command.clone(), idx);
                self.slots.push(Slot {
                    command,
                    queue: VecDeque::new(),
                    consumed: 0,
                });
                idx
            }
        };
        &mut self.slots[idx]
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
