//! Operand fetch and the load/store family.
//!
//! Immediate operands are read from the already advanced PC, which then
//! moves past them. `(HL)` operands go through the bus.

use super::types::{Indirect, Operand8};
use crate::bus::MemoryBus;
use crate::cpu::registers::Reg16;
use crate::cpu::Cpu;

/// Base of the LDH page.
const HIGH_PAGE: u16 = 0xFF00;

impl Cpu {
    /// Reads the byte at PC and steps past it.
    #[inline]
    pub(crate) fn fetch_byte(&mut self, bus: &dyn MemoryBus) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.advance_pc(1);
        value
    }

    /// Reads a little-endian word at PC and steps past it.
    #[inline]
    pub(crate) fn fetch_word(&mut self, bus: &dyn MemoryBus) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(crate) fn read_operand(&self, bus: &dyn MemoryBus, operand: Operand8) -> u8 {
        match operand {
            Operand8::Reg(reg) => self.regs.get(reg),
            Operand8::IndirectHl => bus.read(self.regs.hl()),
        }
    }

    #[inline]
    pub(crate) fn write_operand(&mut self, bus: &mut dyn MemoryBus, operand: Operand8, value: u8) {
        match operand {
            Operand8::Reg(reg) => self.regs.set(reg, value),
            Operand8::IndirectHl => bus.write(self.regs.hl(), value),
        }
    }

    /// Address named by a pair, applying the HL+/HL- adjustment.
    fn indirect_address(&mut self, indirect: Indirect) -> u16 {
        match indirect {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlIncrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDecrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(crate) fn load(&mut self, bus: &mut dyn MemoryBus, dst: Operand8, src: Operand8) {
        let value = self.read_operand(bus, src);
        self.write_operand(bus, dst, value);
    }

    pub(crate) fn load_immediate(&mut self, bus: &mut dyn MemoryBus, dst: Operand8) {
        let value = self.fetch_byte(bus);
        self.write_operand(bus, dst, value);
    }

    pub(crate) fn load_wide_immediate(&mut self, bus: &dyn MemoryBus, dst: Reg16) {
        let value = self.fetch_word(bus);
        self.regs.set16(dst, value);
    }

    pub(crate) fn store_a(&mut self, bus: &mut dyn MemoryBus, indirect: Indirect) {
        let addr = self.indirect_address(indirect);
        bus.write(addr, self.regs.a());
    }

    pub(crate) fn load_a(&mut self, bus: &dyn MemoryBus, indirect: Indirect) {
        let addr = self.indirect_address(indirect);
        self.regs.set_a(bus.read(addr));
    }

    /// LD (a16),SP
    pub(crate) fn store_sp(&mut self, bus: &mut dyn MemoryBus) {
        let addr = self.fetch_word(bus);
        bus.write_word(addr, self.regs.sp);
    }

    pub(crate) fn store_a_absolute(&mut self, bus: &mut dyn MemoryBus) {
        let addr = self.fetch_word(bus);
        bus.write(addr, self.regs.a());
    }

    pub(crate) fn load_a_absolute(&mut self, bus: &dyn MemoryBus) {
        let addr = self.fetch_word(bus);
        self.regs.set_a(bus.read(addr));
    }

    /// LDH (a8),A / LDH (C),A
    pub(crate) fn store_a_high(&mut self, bus: &mut dyn MemoryBus, offset: u8) {
        bus.write(HIGH_PAGE | u16::from(offset), self.regs.a());
    }

    /// LDH A,(a8) / LDH A,(C)
    pub(crate) fn load_a_high(&mut self, bus: &dyn MemoryBus, offset: u8) {
        self.regs.set_a(bus.read(HIGH_PAGE | u16::from(offset)));
    }
}
