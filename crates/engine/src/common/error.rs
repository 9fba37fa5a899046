//! Fault definitions.
//!
//! This module defines the fatal error taxonomy of the machine. There is
//! exactly one fatal condition: a loop bracket whose matching partner does
//! not exist anywhere in the program. Everything else the machine encounters
//! is either a total operation (tape arithmetic wraps, input bytes are
//! reduced into range) or a redundant control call that is ignored.
//!
//! A fault is raised at the moment a jump scan exhausts the program. The
//! machine stops itself, pins the instruction pointer to the program length,
//! and returns the fault from the call that detected it. The fault names the
//! offending bracket's position within the sanitized program.

use thiserror::Error;

/// Fatal execution fault.
///
/// Raising a fault aborts the current run: the machine transitions to
/// `Stopped` and only `reset()` makes it runnable again. The fault stays
/// available through introspection until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// A `[` had no matching `]` between it and the end of the program.
    ///
    /// The payload is the position of the opening bracket within the
    /// sanitized program.
    #[error("unmatched '[' at instruction {0}")]
    UnmatchedOpen(usize),

    /// A `]` had no matching `[` between it and the start of the program.
    ///
    /// The payload is the position of the closing bracket within the
    /// sanitized program.
    #[error("unmatched ']' at instruction {0}")]
    UnmatchedClose(usize),
}

impl Fault {
    /// Returns the position of the offending bracket in the sanitized program.
    #[inline]
    pub const fn position(&self) -> usize {
        match self {
            Self::UnmatchedOpen(pos) | Self::UnmatchedClose(pos) => *pos,
        }
    }
}
