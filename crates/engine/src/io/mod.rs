//! IO boundary traits.
//!
//! This module defines the two seams between the machine and its host. It
//! provides:
//! 1. **Output:** [`OutputSink`], fed one byte per `.` instruction.
//! 2. **Input:** [`InputSource`], notified when a `,` instruction needs a byte.
//! 3. **Null implementations:** For hosts that ignore one side of the boundary.
//!
//! Both traits are deliberately narrow: the machine never inspects the host,
//! and the host never reaches into the tape. Input is asynchronous by
//! contract; `request_byte` only announces the need, and the host answers
//! later through [`Machine::deliver_input`](crate::Machine::deliver_input).

/// Receives output bytes from the machine.
///
/// `write_byte` is called exactly once per `.` instruction and must not
/// fail; a host that cannot display a byte should swallow it.
pub trait OutputSink {
    /// Accepts one output byte.
    fn write_byte(&mut self, byte: u8);

    /// Discards everything written so far.
    ///
    /// Called when the machine resets. Hosts with immutable output (a
    /// terminal that already printed) may ignore it.
    fn clear(&mut self) {}
}

/// Supplies input bytes to the machine, one at a time.
///
/// At most one request is outstanding: after `request_byte` the host must
/// eventually call [`Machine::deliver_input`](crate::Machine::deliver_input)
/// exactly once before the machine can ask again.
pub trait InputSource {
    /// Announces that the machine is suspended waiting for one byte.
    fn request_byte(&mut self);

    /// Withdraws an outstanding request.
    ///
    /// Called when the machine stops or resets while suspended on input.
    fn cancel(&mut self) {}
}

/// An output sink that discards every byte.
///
/// # Examples
///
/// ```
/// use bfvm_core::io::{NullInput, NullSink};
/// use bfvm_core::isa::loader;
/// use bfvm_core::{Config, Machine, Status};
///
/// let mut vm = Machine::new(
///     loader::sanitize("+[-]"),
///     &Config::default(),
///     Box::new(NullSink),
///     Box::new(NullInput),
/// );
/// vm.run().unwrap();
/// assert_eq!(vm.status(), Status::Stopped);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_byte(&mut self, _byte: u8) {}
}

/// An input source that never supplies a byte.
///
/// A machine wired to this source parks forever on `,`; suitable for
/// programs known not to read input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn request_byte(&mut self) {}
}
