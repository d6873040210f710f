use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Bounded, timestamped message log. Oldest lines are discarded first.
#[derive(Debug, Clone)]
pub struct RollingLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RollingLog {
    pub fn new(capacity: usize) -> Self {
        Self { lines: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append `[HH:MM:SS] message`.
    pub fn push(&mut self, at: DateTime<Utc>, message: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(format!("[{}] {}", at.format("%H:%M:%S"), message));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}
