use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::Mode;

/// Per-mode monotone submission counters. Intake takes the next sequence
/// for its mode; a pipeline result is only rendered while its sequence is
/// still the current one, which closes the stale-result race between an
/// abandoned in-flight job and a newer submission.
#[derive(Default)]
pub struct ModeSequences {
    counters: Mutex<HashMap<Mode, u64>>,
}

impl ModeSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next sequence for a mode, superseding the previous one.
    pub fn next(&self, mode: Mode) -> u64 {
        let mut counters = self.counters.lock().unwrap();
        let counter = counters.entry(mode).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn current(&self, mode: Mode) -> u64 {
        let counters = self.counters.lock().unwrap();
        counters.get(&mode).copied().unwrap_or(0)
    }

    pub fn is_current(&self, mode: Mode, sequence: u64) -> bool {
        self.current(mode) == sequence
    }
}
