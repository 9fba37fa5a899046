//! # Tape Properties
//!
//! Property tests for the tape invariants: the pointer never leaves
//! `[0, size)` under any move sequence, and increment/decrement are
//! inverses across the 0/255 boundary.

use bfvm_core::core::tape::Tape;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_pointer_stays_in_range(size in 1usize..64, moves in proptest::collection::vec(any::<bool>(), 0..256)) {
        let mut tape = Tape::new(size);
        for right in moves {
            if right {
                tape.move_right();
            } else {
                tape.move_left();
            }
            prop_assert!(tape.pointer() < size);
        }
    }

    #[test]
    fn prop_moves_wrap_circularly(size in 1usize..64) {
        let mut tape = Tape::new(size);
        for _ in 0..size {
            tape.move_right();
        }
        prop_assert_eq!(tape.pointer(), 0);
        tape.move_left();
        prop_assert_eq!(tape.pointer(), size - 1);
    }

    #[test]
    fn prop_increment_then_decrement_is_identity(value in 0i64..256) {
        let mut tape = Tape::new(1);
        tape.write(value);
        let before = tape.read();
        tape.increment();
        tape.decrement();
        prop_assert_eq!(tape.read(), before);
        tape.decrement();
        tape.increment();
        prop_assert_eq!(tape.read(), before);
    }

    #[test]
    fn prop_write_lands_in_range(value in any::<i64>()) {
        let mut tape = Tape::new(1);
        tape.write(value);
        let cell = i64::from(tape.read());
        prop_assert_eq!(cell, value.rem_euclid(256));
    }
}
