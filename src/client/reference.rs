// ABOUTME: Cyclic transaction reference allocator shared by every writer of a connection
// ABOUTME: Hands out two digit references 00 through 99 and wraps back to 00

use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Number of distinct transaction references
pub const MAX_REFERENCE: u8 = 100;

/// Two digit transaction reference
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransRef(u8);

impl TransRef {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for TransRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Ring counter over the transaction references of one connection
#[derive(Debug, Default)]
pub struct ReferenceAllocator {
    next: Mutex<u8>,
}

impl ReferenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next reference, wrapping after 99
    pub fn next(&self) -> TransRef {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let reference = TransRef(*next);
        *next = (*next + 1) % MAX_REFERENCE;
        trace!("transaction reference number: {}", reference);
        reference
    }
}
