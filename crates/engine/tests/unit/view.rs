//! # View Tests
//!
//! Multi-base cell rendering and the program-position cursor.

use bfvm_core::isa::loader;
use bfvm_core::view::{cell_view, cell_views, render_position};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(0, "0x00", "0b00000000", '\0')]
#[case(3, "0x03", "0b00000011", '\u{3}')]
#[case(10, "0x0A", "0b00001010", '\n')]
#[case(65, "0x41", "0b01000001", 'A')]
#[case(255, "0xFF", "0b11111111", 'ÿ')]
fn test_cell_view_formats(
    #[case] byte: u8,
    #[case] hex: &str,
    #[case] bin: &str,
    #[case] ascii: char,
) {
    let view = cell_view(byte);
    assert_eq!(view.dec, byte);
    assert_eq!(view.hex, hex);
    assert_eq!(view.bin, bin);
    assert_eq!(view.ascii, ascii);
}

#[test]
fn test_cell_views_cover_whole_tape() {
    let views = cell_views(&[0, 65, 255]);
    assert_eq!(views.len(), 3);
    assert_eq!(views[1].hex, "0x41");
    assert_eq!(views[2].bin, "0b11111111");
}

#[test]
fn test_render_position_marks_current_instruction() {
    let program = loader::sanitize("+[-]");
    assert_eq!(render_position(&program, 0), "+[-]\n^");
    assert_eq!(render_position(&program, 2), "+[-]\n  ^");
}

#[test]
fn test_render_position_at_terminal_pointer() {
    let program = loader::sanitize("+.");
    assert_eq!(render_position(&program, 2), "+.\n  ^");
}

#[test]
fn test_render_position_of_empty_program() {
    let program = loader::sanitize("");
    assert_eq!(render_position(&program, 0), "\n^");
}
