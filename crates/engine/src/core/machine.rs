//! Interpreter state machine and instruction dispatch.
//!
//! This module implements the execution engine. It coordinates:
//! 1. **State machine:** `Ready`, `Running`, `SteppingSlow`, `Paused`,
//!    `Stopped`, with the control operations that move between them.
//! 2. **Dispatch:** One instruction per cycle, driving the tape and the IO
//!    boundary.
//! 3. **Loops:** Bracket matching by linear scan with nesting depth; an
//!    exhausted scan is a fatal fault.
//! 4. **Input suspension:** `,` parks the machine until the host delivers a
//!    byte; it is the only suspension point besides scheduler yields.
//!
//! The machine is one owned aggregate: program, instruction pointer, status,
//! tape, and scheduler live here, and nothing else mutates them. The IO
//! boundary is held as boxed trait objects supplied at construction.

use std::fmt;
use std::time::{Duration, Instant};

use crate::common::error::Fault;
use crate::config::Config;
use crate::core::sched::Scheduler;
use crate::core::tape::Tape;
use crate::io::{InputSource, OutputSink};
use crate::isa::{Instruction, Program};
use crate::stats::VmStats;

/// Execution-control status of a machine.
///
/// Exactly one status holds at any instant. `Stopped` is terminal for a
/// run: only [`Machine::reset`] leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Freshly constructed or reset; nothing executed yet.
    Ready,
    /// Executing continuously, one throttled batch per pump.
    Running,
    /// Executing one instruction per scheduled step, with a delay between.
    SteppingSlow,
    /// Holding position; resumes on `run`, `auto_step`, or a single `step`.
    Paused,
    /// Terminal: the program finished, was stopped, or faulted.
    Stopped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::SteppingSlow => "stepping",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        };
        write!(f, "{name}")
    }
}

/// The execution engine.
///
/// Owns the program, instruction pointer, status, tape, and scheduler;
/// holds the IO boundary as trait objects supplied at construction. All
/// control operations are synchronous; continuous execution is driven by
/// the host pumping [`poll`](Self::poll).
pub struct Machine {
    program: Program,
    ip: usize,
    status: Status,
    tape: Tape,
    sched: Scheduler,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
    /// Set while a `,` instruction waits for the host to deliver a byte.
    awaiting_input: bool,
    /// The fault that ended the run, retained until reset.
    fault: Option<Fault>,
    stats: VmStats,
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("status", &self.status)
            .field("ip", &self.ip)
            .field("program_len", &self.program.len())
            .field("tape_pointer", &self.tape.pointer())
            .field("awaiting_input", &self.awaiting_input)
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

impl Machine {
    /// Creates a machine for `program` with a fresh zero-filled tape.
    ///
    /// The output sink is cleared so a reused display surface starts empty.
    pub fn new(
        program: Program,
        config: &Config,
        mut output: Box<dyn OutputSink>,
        input: Box<dyn InputSource>,
    ) -> Self {
        output.clear();
        Self {
            program,
            ip: 0,
            status: Status::Ready,
            tape: Tape::new(config.tape.size),
            sched: Scheduler::new(&config.exec),
            output,
            input,
            awaiting_input: false,
            fault: None,
            stats: VmStats::default(),
        }
    }

    // ── Control operations ──────────────────────────────────────────

    /// Starts or resumes continuous execution.
    ///
    /// Executes one throttled batch synchronously, then schedules a short
    /// continuation for the host to pump. No-op while already running or
    /// after `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns the fault if a jump scan finds an unmatched bracket; the
    /// machine is already stopped when this returns.
    pub fn run(&mut self) -> Result<(), Fault> {
        if matches!(self.status, Status::Stopped | Status::Running) {
            return Ok(());
        }
        self.sched.cancel();
        self.status = Status::Running;
        tracing::debug!(ip = self.ip, "run");
        self.run_batch(Instant::now())
    }

    /// Executes exactly one instruction and holds.
    ///
    /// The machine is `Paused` afterwards unless the program ended, in
    /// which case it is `Stopped`. No-op after `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns the fault if a jump scan finds an unmatched bracket.
    pub fn step(&mut self) -> Result<(), Fault> {
        if self.status == Status::Stopped {
            return Ok(());
        }
        self.sched.cancel();
        self.status = Status::Paused;
        self.cycle()
    }

    /// Starts slow stepping: one instruction now, then one per `delay`.
    ///
    /// Each successive instruction is scheduled `delay` after the previous
    /// one and executed when the host pumps [`poll`](Self::poll). No-op
    /// after `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns the fault if a jump scan finds an unmatched bracket.
    pub fn auto_step(&mut self, delay: Duration) -> Result<(), Fault> {
        if self.status == Status::Stopped {
            return Ok(());
        }
        self.sched.cancel();
        self.sched.set_step_delay(delay);
        self.status = Status::SteppingSlow;
        tracing::debug!(ip = self.ip, ?delay, "auto-step");
        self.cycle()?;
        if self.status == Status::SteppingSlow && !self.awaiting_input {
            self.sched.schedule_step(Instant::now());
        }
        Ok(())
    }

    /// Suspends execution, cancelling any pending continuation.
    ///
    /// No instruction executes until `run`, `auto_step`, or `step`. No-op
    /// while already paused or after `Stopped`.
    pub fn pause(&mut self) {
        if self.status == Status::Stopped {
            return;
        }
        self.sched.cancel();
        self.status = Status::Paused;
    }

    /// Ends the run, pinning the instruction pointer at the program length.
    ///
    /// Idempotent; cancels any pending continuation and withdraws an
    /// outstanding input request. Only [`reset`](Self::reset) makes the
    /// machine runnable again.
    pub fn stop(&mut self) {
        self.sched.cancel();
        if self.awaiting_input {
            self.input.cancel();
            self.awaiting_input = false;
        }
        self.status = Status::Stopped;
        self.ip = self.program.len();
    }

    /// Returns the machine to `Ready` from any state.
    ///
    /// Cancels pending continuations and input requests, zero-fills the
    /// tape, clears the output sink, rewinds the instruction pointer, and
    /// forgets any retained fault.
    pub fn reset(&mut self) {
        self.sched.cancel();
        if self.awaiting_input {
            self.input.cancel();
            self.awaiting_input = false;
        }
        self.output.clear();
        self.tape.reset();
        self.ip = 0;
        self.fault = None;
        self.status = Status::Ready;
        tracing::debug!("reset");
    }

    // ── Host pump surface ───────────────────────────────────────────

    /// Resumes a due continuation, if any.
    ///
    /// In `Running` this executes the next throttled batch; in
    /// `SteppingSlow` it executes one instruction and schedules the next.
    /// Polling early, late, or in any other state is harmless.
    ///
    /// # Errors
    ///
    /// Returns the fault if a jump scan finds an unmatched bracket.
    pub fn poll(&mut self, now: Instant) -> Result<(), Fault> {
        if !self.sched.take_due(now) {
            return Ok(());
        }
        match self.status {
            Status::Running => self.run_batch(now),
            Status::SteppingSlow => {
                self.cycle()?;
                if self.status == Status::SteppingSlow && !self.awaiting_input {
                    self.sched.schedule_step(now);
                }
                Ok(())
            }
            // A continuation that survived into another state is stale.
            _ => Ok(()),
        }
    }

    /// Returns the deadline of the pending continuation, if any.
    ///
    /// Hosts may sleep until this instant before the next
    /// [`poll`](Self::poll).
    pub fn next_wake(&self) -> Option<Instant> {
        self.sched.next_wake()
    }

    /// Answers an outstanding input request with one byte.
    ///
    /// The value is reduced into `[0, 255]` (never rejected), written to
    /// the current cell, and the instruction pointer advances past the `,`.
    /// If the machine was in a running mode it resumes immediately; when
    /// slow stepping, the next instruction is scheduled after the step
    /// delay. A delivery with no outstanding request is ignored.
    ///
    /// # Errors
    ///
    /// Returns the fault if resumed execution finds an unmatched bracket.
    pub fn deliver_input(&mut self, value: i64) -> Result<(), Fault> {
        if self.status == Status::Stopped || !self.awaiting_input {
            return Ok(());
        }
        self.awaiting_input = false;
        self.tape.write(value);
        self.stats.bytes_in += 1;
        self.advance();
        match self.status {
            Status::Running => self.run_batch(Instant::now()),
            Status::SteppingSlow => {
                self.sched.schedule_step(Instant::now());
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // ── Introspection ───────────────────────────────────────────────

    /// Returns the current execution status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the instruction pointer.
    ///
    /// Always in `[0, len]`; equals the program length exactly when the
    /// machine is in its terminal position.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Returns the sanitized program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns a read view of the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the fault that ended the run, if any, until the next reset.
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Returns `true` while a `,` instruction waits for
    /// [`deliver_input`](Self::deliver_input).
    pub fn is_awaiting_input(&self) -> bool {
        self.awaiting_input
    }

    /// Returns the execution statistics collected so far.
    pub fn stats(&self) -> &VmStats {
        &self.stats
    }

    // ── Execution ───────────────────────────────────────────────────

    /// Executes up to one throttle batch, then yields.
    ///
    /// Leaves a scheduled continuation behind only when the machine is
    /// still `Running` and not suspended on input.
    fn run_batch(&mut self, now: Instant) -> Result<(), Fault> {
        let mut executed = 0;
        while self.status == Status::Running
            && !self.awaiting_input
            && executed < self.sched.throttle()
        {
            self.cycle()?;
            executed += 1;
        }
        if self.status == Status::Running && !self.awaiting_input {
            self.sched.schedule_yield(now);
        }
        Ok(())
    }

    /// Executes the instruction under the instruction pointer.
    ///
    /// Suspended machines (awaiting input) execute nothing; a pointer at
    /// the program length finishes the run.
    fn cycle(&mut self) -> Result<(), Fault> {
        if self.awaiting_input {
            return Ok(());
        }
        let Some(op) = self.program.get(self.ip) else {
            self.finish();
            return Ok(());
        };
        self.stats.retire(op);
        match op {
            Instruction::MoveRight => {
                self.tape.move_right();
                self.advance();
            }
            Instruction::MoveLeft => {
                self.tape.move_left();
                self.advance();
            }
            Instruction::Increment => {
                self.tape.increment();
                self.advance();
            }
            Instruction::Decrement => {
                self.tape.decrement();
                self.advance();
            }
            Instruction::Output => {
                self.output.write_byte(self.tape.read());
                self.stats.bytes_out += 1;
                self.advance();
            }
            Instruction::Input => {
                self.awaiting_input = true;
                self.input.request_byte();
            }
            Instruction::LoopOpen => {
                if self.tape.read() == 0 {
                    self.jump_forward()?;
                } else {
                    self.advance();
                }
            }
            Instruction::LoopClose => {
                if self.tape.read() != 0 {
                    self.jump_backward()?;
                } else {
                    self.advance();
                }
            }
        }
        Ok(())
    }

    /// Moves the instruction pointer to the next instruction, finishing the
    /// run when it reaches the program length.
    fn advance(&mut self) {
        self.ip += 1;
        if self.ip >= self.program.len() {
            self.finish();
        }
    }

    /// Ends the run normally with the pointer at the program length.
    fn finish(&mut self) {
        self.ip = self.program.len();
        self.status = Status::Stopped;
        tracing::debug!("program finished");
    }

    /// Aborts the run with `fault`, stopping the machine in place.
    fn die(&mut self, fault: Fault) -> Fault {
        tracing::error!(%fault, "fatal fault");
        self.stop();
        self.fault = Some(fault);
        fault
    }

    /// Relocates the pointer just past the `]` matching the `[` under it.
    ///
    /// Scans forward tracking nesting depth. Exhausting the program is an
    /// unmatched-bracket fault naming the opening bracket's position.
    fn jump_forward(&mut self) -> Result<(), Fault> {
        let open = self.ip;
        let mut depth = 1usize;
        let mut pos = self.ip + 1;
        while pos < self.program.len() {
            match self.program.get(pos) {
                Some(Instruction::LoopOpen) => depth += 1,
                Some(Instruction::LoopClose) => {
                    depth -= 1;
                    if depth == 0 {
                        self.ip = pos;
                        self.advance();
                        self.stats.jumps_taken += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            pos += 1;
        }
        Err(self.die(Fault::UnmatchedOpen(open)))
    }

    /// Relocates the pointer just past the `[` matching the `]` under it.
    ///
    /// Mirror image of [`jump_forward`](Self::jump_forward), scanning
    /// backward toward the start of the program.
    fn jump_backward(&mut self) -> Result<(), Fault> {
        let close = self.ip;
        let mut depth = 1usize;
        let mut pos = self.ip;
        while pos > 0 {
            pos -= 1;
            match self.program.get(pos) {
                Some(Instruction::LoopClose) => depth += 1,
                Some(Instruction::LoopOpen) => {
                    depth -= 1;
                    if depth == 0 {
                        self.ip = pos;
                        self.advance();
                        self.stats.jumps_taken += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(self.die(Fault::UnmatchedClose(close)))
    }
}
