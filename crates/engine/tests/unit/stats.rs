//! # Statistics Tests
//!
//! Category counters and IO volumes collected during execution.

use crate::common::harness::TestContext;

#[test]
fn test_instruction_mix_is_counted() {
    let mut ctx = TestContext::new(">+<-.");
    ctx.run_to_end().unwrap();

    let stats = ctx.vm.stats();
    assert_eq!(stats.instructions_retired, 5);
    assert_eq!(stats.inst_move, 2);
    assert_eq!(stats.inst_arith, 2);
    assert_eq!(stats.inst_output, 1);
    assert_eq!(stats.inst_input, 0);
    assert_eq!(stats.inst_loop, 0);
}

#[test]
fn test_loop_brackets_and_jumps_are_counted() {
    let mut ctx = TestContext::new("+[-]");
    ctx.run_to_end().unwrap();

    let stats = ctx.vm.stats();
    // "+", "[", "-", "]" all execute once; neither bracket jumps.
    assert_eq!(stats.instructions_retired, 4);
    assert_eq!(stats.inst_loop, 2);
    assert_eq!(stats.jumps_taken, 0);

    let mut ctx = TestContext::new("++[-]");
    ctx.run_to_end().unwrap();
    // The "]" jumps back once before the cell reaches zero.
    assert_eq!(ctx.vm.stats().jumps_taken, 1);
}

#[test]
fn test_io_byte_volumes_are_counted() {
    let mut ctx = TestContext::new(",..");
    ctx.vm.run().unwrap();
    ctx.vm.deliver_input(9).unwrap();
    ctx.pump().unwrap();

    let stats = ctx.vm.stats();
    assert_eq!(stats.bytes_in, 1);
    assert_eq!(stats.bytes_out, 2);
    assert_eq!(stats.inst_input, 1);
    assert_eq!(stats.inst_output, 2);
}

#[test]
fn test_counters_accumulate_across_resets() {
    let mut ctx = TestContext::new("+.");
    ctx.run_to_end().unwrap();
    ctx.vm.reset();
    ctx.run_to_end().unwrap();

    let stats = ctx.vm.stats();
    assert_eq!(stats.instructions_retired, 4);
    assert_eq!(stats.bytes_out, 2);
}

#[test]
fn test_stats_serialize_to_json() {
    let mut ctx = TestContext::new("+.");
    ctx.run_to_end().unwrap();

    let json = serde_json::to_value(ctx.vm.stats()).unwrap();
    assert_eq!(json["instructions_retired"], 2);
    assert_eq!(json["bytes_out"], 1);
}
