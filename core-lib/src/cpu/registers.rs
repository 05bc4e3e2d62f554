//! SM83 register file.
//!
//! The eight 8-bit registers live in one array indexed by [`Reg8`]; the
//! 16-bit pairs are projections over two slots (high byte first). Flags are
//! never stored separately from F, so the two cannot drift apart.

use bitflags::bitflags;

bitflags! {
    /// Flag bits packed into the high nibble of F.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const ZERO       = 0x80;
        const SUBTRACT   = 0x40;
        const HALF_CARRY = 0x20;
        const CARRY      = 0x10;
    }
}

impl Flags {
    /// Packs the four flags in Z, N, H, C order.
    #[allow(clippy::fn_params_excessive_bools)]
    #[inline]
    pub fn from_bools(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::ZERO, zero);
        flags.set(Self::SUBTRACT, subtract);
        flags.set(Self::HALF_CARRY, half_carry);
        flags.set(Self::CARRY, carry);
        flags
    }
}

/// An 8-bit register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    const fn index(self) -> usize {
        self as usize
    }
}

/// A 16-bit register: the four paired views plus SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
}

impl Reg16 {
    /// The (high, low) halves backing a paired view. `None` for SP.
    const fn halves(self) -> Option<(Reg8, Reg8)> {
        match self {
            Self::AF => Some((Reg8::A, Reg8::F)),
            Self::BC => Some((Reg8::B, Reg8::C)),
            Self::DE => Some((Reg8::D, Reg8::E)),
            Self::HL => Some((Reg8::H, Reg8::L)),
            Self::SP => None,
        }
    }
}

/// Post-boot program counter.
pub const RESET_PC: u16 = 0x0100;
/// Post-boot stack pointer.
pub const RESET_SP: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    slots: [u8; 8],
    pub pc: u16,
    pub sp: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub const fn new() -> Self {
        Self {
            slots: [0; 8],
            pc: RESET_PC,
            sp: RESET_SP,
        }
    }

    #[inline]
    pub const fn get(&self, reg: Reg8) -> u8 {
        self.slots[reg.index()]
    }

    /// Writes an 8-bit slot. Writes to F drop the low nibble.
    #[inline]
    pub fn set(&mut self, reg: Reg8, value: u8) {
        self.slots[reg.index()] = match reg {
            Reg8::F => value & 0xF0,
            _ => value,
        };
    }

    #[inline]
    pub const fn get16(&self, reg: Reg16) -> u16 {
        match reg.halves() {
            Some((hi, lo)) => u16::from_be_bytes([self.get(hi), self.get(lo)]),
            None => self.sp,
        }
    }

    #[inline]
    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg.halves() {
            Some((hi, lo)) => {
                let [high, low] = value.to_be_bytes();
                self.set(hi, high);
                self.set(lo, low);
            }
            None => self.sp = value,
        }
    }

    pub const fn a(&self) -> u8 {
        self.get(Reg8::A)
    }

    pub fn set_a(&mut self, value: u8) {
        self.set(Reg8::A, value);
    }

    pub const fn f(&self) -> u8 {
        self.get(Reg8::F)
    }

    pub const fn af(&self) -> u16 {
        self.get16(Reg16::AF)
    }

    pub fn set_af(&mut self, value: u16) {
        self.set16(Reg16::AF, value);
    }

    pub const fn bc(&self) -> u16 {
        self.get16(Reg16::BC)
    }

    pub fn set_bc(&mut self, value: u16) {
        self.set16(Reg16::BC, value);
    }

    pub const fn de(&self) -> u16 {
        self.get16(Reg16::DE)
    }

    pub fn set_de(&mut self, value: u16) {
        self.set16(Reg16::DE, value);
    }

    pub const fn hl(&self) -> u16 {
        self.get16(Reg16::HL)
    }

    pub fn set_hl(&mut self, value: u16) {
        self.set16(Reg16::HL, value);
    }

    /// Decoded view of F.
    #[inline]
    pub const fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.f())
    }

    /// Replaces all four flags at once.
    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.set(Reg8::F, flags.bits());
    }

    #[inline]
    pub const fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    /// Sets or clears the given flag bits, leaving the others untouched.
    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let mut flags = self.flags();
        flags.set(flag, value);
        self.set_flags(flags);
    }

    /// Current carry as 0 or 1, as consumed by ADC/SBC/RL/RR.
    #[inline]
    pub const fn carry_bit(&self) -> u8 {
        (self.f() >> 4) & 1
    }

    /// Advances PC by `n`, wrapping at 0x10000.
    #[inline]
    pub fn advance_pc(&mut self, n: u16) {
        self.pc = self.pc.wrapping_add(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PAIRS: [Reg16; 4] = [Reg16::AF, Reg16::BC, Reg16::DE, Reg16::HL];

    #[test]
    fn test_reset_values() {
        let regs = Registers::new();
        assert_eq!(regs.pc, 0x0100);
        assert_eq!(regs.sp, 0xFFFE);
        assert_eq!(regs.af(), 0);
    }

    #[test]
    fn test_pair_high_byte_first() {
        let mut regs = Registers::new();
        regs.set_bc(0x1234);
        assert_eq!(regs.get(Reg8::B), 0x12);
        assert_eq!(regs.get(Reg8::C), 0x34);
        regs.set(Reg8::L, 0xCD);
        regs.set(Reg8::H, 0xAB);
        assert_eq!(regs.hl(), 0xABCD);
    }

    #[test]
    fn test_set_flag_leaves_other_bits() {
        let mut regs = Registers::new();
        regs.set_flags(Flags::ZERO | Flags::CARRY);
        regs.set_flag(Flags::HALF_CARRY, true);
        regs.set_flag(Flags::ZERO, false);
        assert_eq!(regs.flags(), Flags::HALF_CARRY | Flags::CARRY);
        assert_eq!(regs.carry_bit(), 1);
    }

    #[test]
    fn test_pc_wraps() {
        let mut regs = Registers::new();
        regs.pc = 0xFFFF;
        regs.advance_pc(1);
        assert_eq!(regs.pc, 0x0000);
    }

    proptest! {
        #[test]
        fn prop_pair_round_trip(value in any::<u16>(), idx in 1usize..4) {
            let mut regs = Registers::new();
            regs.set16(PAIRS[idx], value);
            prop_assert_eq!(regs.get16(PAIRS[idx]), value);
        }

        #[test]
        fn prop_af_masks_low_nibble(value in any::<u16>()) {
            let mut regs = Registers::new();
            regs.set_af(value);
            prop_assert_eq!(regs.f() & 0x0F, 0);
            prop_assert_eq!(regs.af(), value & 0xFFF0);
            prop_assert_eq!(regs.a(), (value >> 8) as u8);
        }

        #[test]
        fn prop_f_write_masks_low_nibble(value in any::<u8>()) {
            let mut regs = Registers::new();
            regs.set(Reg8::F, value);
            prop_assert_eq!(regs.f(), value & 0xF0);
        }
    }
}
