//! Arithmetic and logic unit.
//!
//! Accumulator operations, 8-bit INC/DEC, the 16-bit adds, DAA, the
//! flag-only instructions and the A-register rotates. Everything here works
//! on plain values and the register file; the caller resolves `(HL)` through
//! the bus before and after.

use super::types::{AluOp, RotateA};
use crate::cpu::registers::{Flags, Registers};

/// ADD/ADC core: 8-bit sum with carry-in, returning result and flags.
fn add(a: u8, r: u8, carry_in: u8) -> (u8, Flags) {
    let result = u16::from(a) + u16::from(r) + u16::from(carry_in);
    let half = (a & 0x0F) + (r & 0x0F) + carry_in > 0x0F;
    let value = result as u8;
    (
        value,
        Flags::from_bools(value == 0, false, half, result > 0xFF),
    )
}

/// SUB/SBC/CP core: borrow-aware difference, returning result and flags.
fn sub(a: u8, r: u8, carry_in: u8) -> (u8, Flags) {
    let value = a.wrapping_sub(r).wrapping_sub(carry_in);
    let half = (a & 0x0F) < (r & 0x0F) + carry_in;
    let borrow = u16::from(a) < u16::from(r) + u16::from(carry_in);
    (value, Flags::from_bools(value == 0, true, half, borrow))
}

/// Applies an accumulator operation with operand `value`.
///
/// Overwrites all of F. CP computes the SUB flags and leaves A alone.
pub fn accumulate(regs: &mut Registers, op: AluOp, value: u8) {
    let a = regs.a();
    let carry_in = regs.carry_bit();
    let (result, flags) = match op {
        AluOp::Add => add(a, value, 0),
        AluOp::Adc => add(a, value, carry_in),
        AluOp::Sub | AluOp::Cp => sub(a, value, 0),
        AluOp::Sbc => sub(a, value, carry_in),
        AluOp::And => {
            let r = a & value;
            (r, Flags::from_bools(r == 0, false, true, false))
        }
        AluOp::Xor => {
            let r = a ^ value;
            (r, Flags::from_bools(r == 0, false, false, false))
        }
        AluOp::Or => {
            let r = a | value;
            (r, Flags::from_bools(r == 0, false, false, false))
        }
    };
    if op != AluOp::Cp {
        regs.set_a(result);
    }
    regs.set_flags(flags);
}

/// INC r: C is never touched.
pub fn increment(regs: &mut Registers, old: u8) -> u8 {
    let result = old.wrapping_add(1);
    regs.set_flag(Flags::ZERO, result == 0);
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, (old & 0x0F) + 1 > 0x0F);
    result
}

/// DEC r: C is never touched.
pub fn decrement(regs: &mut Registers, old: u8) -> u8 {
    let result = old.wrapping_sub(1);
    regs.set_flag(Flags::ZERO, result == 0);
    regs.set_flag(Flags::SUBTRACT, true);
    regs.set_flag(Flags::HALF_CARRY, old & 0x0F == 0);
    result
}

/// ADD HL,rr: Z preserved, H from bit 11, C from bit 15.
pub fn add_hl(regs: &mut Registers, value: u16) {
    let hl = regs.hl();
    let sum = u32::from(hl) + u32::from(value);
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(
        Flags::HALF_CARRY,
        (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF,
    );
    regs.set_flag(Flags::CARRY, sum > 0xFFFF);
    regs.set_hl(sum as u16);
}

/// SP plus a signed 8-bit offset, as used by ADD SP,e8 and LD HL,SP+e8.
///
/// H and C come from the unsigned low-byte add; Z and N are cleared.
pub fn sp_offset(regs: &mut Registers, offset: u8) -> u16 {
    let sp = regs.sp;
    let half = (sp & 0x000F) + u16::from(offset & 0x0F) > 0x000F;
    let carry = (sp & 0x00FF) + u16::from(offset) > 0x00FF;
    regs.set_flags(Flags::from_bools(false, false, half, carry));
    sp.wrapping_add(i16::from(offset as i8) as u16)
}

/// Decimal adjust of A after a BCD add or subtract.
pub fn daa(regs: &mut Registers) {
    let flags = regs.flags();
    let mut a = regs.a();
    let mut carry = flags.contains(Flags::CARRY);
    if flags.contains(Flags::SUBTRACT) {
        if carry {
            a = a.wrapping_sub(0x60);
        }
        if flags.contains(Flags::HALF_CARRY) {
            a = a.wrapping_sub(0x06);
        }
    } else {
        if carry || a > 0x99 {
            a = a.wrapping_add(0x60);
            carry = true;
        }
        if flags.contains(Flags::HALF_CARRY) || a & 0x0F > 0x09 {
            a = a.wrapping_add(0x06);
        }
    }
    regs.set_a(a);
    regs.set_flag(Flags::ZERO, a == 0);
    regs.set_flag(Flags::HALF_CARRY, false);
    regs.set_flag(Flags::CARRY, carry);
}

pub fn cpl(regs: &mut Registers) {
    regs.set_a(!regs.a());
    regs.set_flag(Flags::SUBTRACT, true);
    regs.set_flag(Flags::HALF_CARRY, true);
}

pub fn scf(regs: &mut Registers) {
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, false);
    regs.set_flag(Flags::CARRY, true);
}

pub fn ccf(regs: &mut Registers) {
    let carry = regs.flag(Flags::CARRY);
    regs.set_flag(Flags::SUBTRACT, false);
    regs.set_flag(Flags::HALF_CARRY, false);
    regs.set_flag(Flags::CARRY, !carry);
}

/// RLCA/RRCA/RLA/RRA. Unlike the CB rotates, Z is always cleared.
pub fn rotate_a(regs: &mut Registers, rotate: RotateA) {
    let a = regs.a();
    let carry_in = regs.carry_bit();
    let (result, carry_out) = match rotate {
        RotateA::Rlca => (a.rotate_left(1), a & 0x80 != 0),
        RotateA::Rrca => (a.rotate_right(1), a & 0x01 != 0),
        RotateA::Rla => ((a << 1) | carry_in, a & 0x80 != 0),
        RotateA::Rra => ((a >> 1) | (carry_in << 7), a & 0x01 != 0),
    };
    regs.set_a(result);
    regs.set_flags(Flags::from_bools(false, false, false, carry_out));
}
