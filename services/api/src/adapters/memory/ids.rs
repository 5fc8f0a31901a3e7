//! services/api/src/adapters/memory/ids.rs
//!
//! Id allocation for the in-memory stores. An id handed out once is
//! remembered for the life of the store, so it can never come back after
//! its record is deleted.

use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: HashSet<Uuid>,
}

impl IdAllocator {
    pub fn next(&mut self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.issued.insert(id) {
                return id;
            }
        }
    }
}
