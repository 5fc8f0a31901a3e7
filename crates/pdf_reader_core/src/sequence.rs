//! crates/pdf_reader_core/src/sequence.rs
//!
//! Latest-wins request sequencing. Store calls resolve in no particular order,
//! so a view that can be refreshed by racing requests tags each one with a
//! ticket and only accepts the response carrying the newest ticket.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing request id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket newer than every ticket issued before it.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_ticket_wins() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(second > first);
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }
}
