// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded log of recently received envelopes.
//!
//! Entries are kept in arrival order. When the buffer is full the oldest
//! entry is evicted to admit the newest.

use std::collections::VecDeque;

use crate::envelope::Envelope;

/// Default number of envelopes retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Fixed-capacity FIFO of envelopes.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Envelope>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer holding at most `capacity` envelopes.
    ///
    /// A capacity of zero retains nothing.
    pub fn new(capacity: usize) -> Self {
        HistoryBuffer {
            // Reserve lazily for large capacities.
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Appends an envelope, evicting the oldest when full.
    pub fn push(&mut self, envelope: Envelope) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(envelope);
    }

    /// Copies the retained envelopes, oldest first.
    pub fn snapshot(&self) -> Vec<Envelope> {
        self.entries.iter().cloned().collect()
    }

    /// Iterates the retained envelopes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.entries.iter()
    }

    /// The most recently pushed envelope.
    pub fn latest(&self) -> Option<&Envelope> {
        self.entries.back()
    }

    /// Drops all retained envelopes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        HistoryBuffer::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
