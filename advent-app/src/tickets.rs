//! Numbered hand-offs for values that wait on the host.
//!
//! Browser hosts cannot hold Rust values across calls, so pending upload and
//! clear requests are parked here and referred to by number.

use std::collections::HashMap;

/// Pending values keyed by ticket number.
#[derive(Debug)]
pub struct TicketBook<T> {
    pending: HashMap<u32, T>,
    last: u32,
}

impl<T> Default for TicketBook<T> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            last: 0,
        }
    }
}

impl<T> TicketBook<T> {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `value` and return its ticket. Tickets start at 1.
    pub fn issue(&mut self, value: T) -> u32 {
        loop {
            self.last = self.last.wrapping_add(1);
            if self.last != 0 && !self.pending.contains_key(&self.last) {
                break;
            }
        }
        self.pending.insert(self.last, value);
        self.last
    }

    /// Remove and return the value for `ticket`. Each ticket redeems once.
    pub fn take(&mut self, ticket: u32) -> Option<T> {
        self.pending.remove(&ticket)
    }

    /// Number of outstanding tickets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
