//! CB-prefixed operations: rotates, shifts, SWAP and the bit operations.
//!
//! As in [`super::alu`], these take the operand value and return the new
//! one; `(HL)` targets are read and written back by the caller.

use super::types::ShiftOp;
use crate::cpu::registers::{Flags, Registers};

/// Rotate/shift/swap on any 8-bit target. Sets Z, clears N and H, and
/// puts the bit shifted out into C (SWAP clears C).
pub fn shift(regs: &mut Registers, op: ShiftOp, value: u8) -> u8 {
    let carry_in = regs.carry_bit();
    let (result, carry_out) = match op {
        ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        ShiftOp::Rl => ((value << 1) | carry_in, value & 0x80 != 0),
        ShiftOp::Rr => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
        ShiftOp::Sla => (value << 1, value & 0x80 != 0),
        ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        ShiftOp::Swap => (value.rotate_left(4), false),
        ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
    };
    regs.set_flags(Flags::from_bools(result == 0, false, false, carry_out));
    result
}

/// BIT b: Z set when the bit is clear. C untouched.
pub fn bit(regs: &mut Registers, bit: u8, value: u8) {
    regs.set_flag(Flags::ZERO, value & (1 << bit) == 0);
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, true);
}

#[inline]
pub const fn res(bit: u8, value: u8) -> u8 {
    value & !(1 << bit)
}

#[inline]
pub const fn set(bit: u8, value: u8) -> u8 {
    value | (1 << bit)
}
