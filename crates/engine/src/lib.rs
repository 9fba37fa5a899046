//! Virtual machine for the eight-instruction tape language.
//!
//! This crate implements a cooperative, steppable interpreter with the following:
//! 1. **ISA:** The eight-symbol instruction alphabet, immutable programs, and the source loader.
//! 2. **Tape:** Fixed-size byte memory with a wrapping data pointer and modular cell arithmetic.
//! 3. **Machine:** The execution state machine (run, single-step, slow-step, pause, stop, reset).
//! 4. **Scheduler:** Throttled, caller-pumped continuation handling so tight loops never block the host.
//! 5. **IO boundary:** Narrow output-sink and input-source traits implemented by the embedding host.
//!
//! The machine never spins on its own thread: the host pumps it through
//! [`Machine::poll`] and can sleep until [`Machine::next_wake`]. Input is an
//! explicit suspension point; when a program reads a byte the machine parks
//! until the host calls [`Machine::deliver_input`].
//!
//! ```
//! use bfvm_core::{Config, Machine, Status};
//! use bfvm_core::io::{NullInput, OutputSink};
//! use bfvm_core::isa::loader;
//!
//! struct Last(u8);
//! impl OutputSink for Last {
//!     fn write_byte(&mut self, byte: u8) {
//!         self.0 = byte;
//!     }
//! }
//!
//! let program = loader::sanitize("+++ emit . done");
//! let mut vm = Machine::new(program, &Config::default(), Box::new(Last(0)), Box::new(NullInput));
//! vm.run().unwrap();
//! assert_eq!(vm.status(), Status::Stopped);
//! ```

/// Common types shared across the crate (faults).
pub mod common;
/// Machine configuration (defaults, hierarchical config structures).
pub mod config;
/// Execution core (tape, machine state machine, scheduler).
pub mod core;
/// IO boundary traits implemented by the embedding host.
pub mod io;
/// Instruction set (alphabet, immutable programs, source loader).
pub mod isa;
/// Execution statistics collection and reporting.
pub mod stats;
/// Read-only formatting of tape and program state for display surfaces.
pub mod view;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Fatal execution fault (unmatched loop brackets).
pub use crate::common::error::Fault;
/// The execution engine; construct with `Machine::new`.
pub use crate::core::machine::Machine;
/// Execution-control status of a machine.
pub use crate::core::machine::Status;
/// An immutable, sanitized instruction sequence.
pub use crate::isa::program::Program;
