//! Control flow and the stack: JP, JR, CALL, RET, RST, PUSH, POP.
//!
//! The branch helpers report whether the branch was taken so the engine
//! can charge the matching catalog cost.

use super::types::Condition;
use crate::bus::MemoryBus;
use crate::cpu::registers::Flags;
use crate::cpu::Cpu;

impl Condition {
    /// Evaluates the condition against the current flags.
    #[inline]
    pub const fn holds(self, flags: Flags) -> bool {
        match self {
            Self::Always => true,
            Self::NotZero => !flags.contains(Flags::ZERO),
            Self::Zero => flags.contains(Flags::ZERO),
            Self::NotCarry => !flags.contains(Flags::CARRY),
            Self::Carry => flags.contains(Flags::CARRY),
        }
    }
}

impl Cpu {
    /// Pushes a word, high byte at the higher address.
    pub(crate) fn push_word(&mut self, bus: &mut dyn MemoryBus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, lo);
    }

    pub(crate) fn pop_word(&mut self, bus: &dyn MemoryBus) -> u16 {
        let lo = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    /// JP cc,a16. The target is consumed either way.
    pub(crate) fn jump(&mut self, bus: &dyn MemoryBus, condition: Condition) -> bool {
        let target = self.fetch_word(bus);
        let taken = condition.holds(self.regs.flags());
        if taken {
            self.regs.pc = target;
        }
        taken
    }

    /// JR cc,e8: offset relative to the byte after the instruction.
    pub(crate) fn jump_relative(&mut self, bus: &dyn MemoryBus, condition: Condition) -> bool {
        let offset = self.fetch_byte(bus) as i8;
        let taken = condition.holds(self.regs.flags());
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add_signed(i16::from(offset));
        }
        taken
    }

    pub(crate) fn call(&mut self, bus: &mut dyn MemoryBus, condition: Condition) -> bool {
        let target = self.fetch_word(bus);
        let taken = condition.holds(self.regs.flags());
        if taken {
            let ret = self.regs.pc;
            self.push_word(bus, ret);
            self.regs.pc = target;
        }
        taken
    }

    pub(crate) fn ret(&mut self, bus: &dyn MemoryBus, condition: Condition) -> bool {
        let taken = condition.holds(self.regs.flags());
        if taken {
            self.regs.pc = self.pop_word(bus);
        }
        taken
    }

    pub(crate) fn restart(&mut self, bus: &mut dyn MemoryBus, vector: u8) {
        let ret = self.regs.pc;
        self.push_word(bus, ret);
        self.regs.pc = u16::from(vector);
    }
}
