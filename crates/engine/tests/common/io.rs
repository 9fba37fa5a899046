//! IO doubles for machine tests.
//!
//! The machine owns its sinks and sources as boxed trait objects, so the
//! doubles here share their observable state through `Rc<RefCell<..>>`
//! handles kept by the test.

use std::cell::RefCell;
use std::rc::Rc;

use bfvm_core::io::{InputSource, OutputSink};

/// An output sink that captures every byte for later assertions.
pub struct CaptureSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl CaptureSink {
    pub fn new() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let buf = Rc::new(RefCell::new(Vec::new()));
        (Self { buf: Rc::clone(&buf) }, buf)
    }
}

impl OutputSink for CaptureSink {
    fn write_byte(&mut self, byte: u8) {
        self.buf.borrow_mut().push(byte);
    }

    fn clear(&mut self) {
        self.buf.borrow_mut().clear();
    }
}

/// Counters recorded by a [`RecordingInput`].
#[derive(Debug, Default)]
pub struct InputLog {
    /// Times the machine asked for a byte.
    pub requests: usize,
    /// Times an outstanding request was withdrawn.
    pub cancels: usize,
}

/// An input source that records requests and cancellations.
///
/// It never supplies a byte on its own; tests answer requests through
/// `Machine::deliver_input`.
pub struct RecordingInput {
    log: Rc<RefCell<InputLog>>,
}

impl RecordingInput {
    pub fn new() -> (Self, Rc<RefCell<InputLog>>) {
        let log = Rc::new(RefCell::new(InputLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl InputSource for RecordingInput {
    fn request_byte(&mut self) {
        self.log.borrow_mut().requests += 1;
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().cancels += 1;
    }
}
