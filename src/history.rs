use std::collections::VecDeque;

/// Capacity used when none is configured.
pub const DEFAULT_HISTORY_SIZE: usize = 1024;

/// Append-only log of invoked command names with a bounded capacity.
///
/// When the log is full the oldest entry is evicted. Entry numbers are 1-based and
/// stable: an entry keeps its number after older entries have been dropped.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    evicted: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_SIZE)),
            capacity,
            evicted: 0,
        }
    }

    /// Append a command name, evicting the oldest entry when at capacity.
    pub fn record(&mut self, name: impl Into<String>) {
        self.entries.push_back(name.into());
        while self.entries.len() > self.capacity {
            if let Some(dropped) = self.entries.pop_front() {
                log::debug!("history full, evicting {:?}", dropped);
                self.evicted += 1;
            }
        }
    }

    /// Iterate `(number, name)` pairs in insertion order.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        let first = self.evicted + 1;
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, name)| (first + i, name.as_str()))
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

    /// Total number of names ever recorded, evicted ones included.
    pub fn total_recorded(&self) -> usize {
        self.evicted + self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }
}
