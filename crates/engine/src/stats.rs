//! Execution statistics collection and reporting.
//!
//! This module tracks what a machine has executed. It provides:
//! 1. **Instruction mix:** Counts by category (pointer moves, cell
//!    arithmetic, IO, loop brackets).
//! 2. **IO volume:** Bytes written to the output sink and delivered by the
//!    input source.
//! 3. **Loop behavior:** How many bracket jumps were actually taken.
//!
//! Counters accumulate for the lifetime of a machine, across resets, so a
//! host can report totals for a whole session.

use serde::Serialize;

use crate::isa::Instruction;

/// Execution statistics for one machine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VmStats {
    /// Total instructions executed.
    pub instructions_retired: u64,
    /// Pointer-move instructions (`>` and `<`) executed.
    pub inst_move: u64,
    /// Cell-arithmetic instructions (`+` and `-`) executed.
    pub inst_arith: u64,
    /// Output instructions (`.`) executed.
    pub inst_output: u64,
    /// Input instructions (`,`) executed.
    pub inst_input: u64,
    /// Loop brackets (`[` and `]`) executed.
    pub inst_loop: u64,

    /// Bytes written to the output sink.
    pub bytes_out: u64,
    /// Bytes delivered by the input source.
    pub bytes_in: u64,
    /// Bracket jumps actually taken (as opposed to fallthroughs).
    pub jumps_taken: u64,
}

impl VmStats {
    /// Records one executed instruction in the category counters.
    pub fn retire(&mut self, op: Instruction) {
        self.instructions_retired += 1;
        match op {
            Instruction::MoveRight | Instruction::MoveLeft => self.inst_move += 1,
            Instruction::Increment | Instruction::Decrement => self.inst_arith += 1,
            Instruction::Output => self.inst_output += 1,
            Instruction::Input => self.inst_input += 1,
            Instruction::LoopOpen | Instruction::LoopClose => self.inst_loop += 1,
        }
    }

    /// Prints a human-readable report to stdout.
    pub fn print(&self) {
        println!("── Execution Statistics ──────────────");
        println!("  Instructions retired : {}", self.instructions_retired);
        println!("    pointer moves      : {}", self.inst_move);
        println!("    cell arithmetic    : {}", self.inst_arith);
        println!("    output             : {}", self.inst_output);
        println!("    input              : {}", self.inst_input);
        println!("    loop brackets      : {}", self.inst_loop);
        println!("  Bytes out            : {}", self.bytes_out);
        println!("  Bytes in             : {}", self.bytes_in);
        println!("  Jumps taken          : {}", self.jumps_taken);
    }
}
