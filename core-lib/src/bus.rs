/// core-lib/src/bus.rs
use crate::interrupts::{InterruptFlag, IE_ADDR, IF_ADDR};

/// Byte-level access to the 16-bit address space the CPU runs over.
pub trait MemoryBus {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, value: u8);

    /// Read a 16-bit value from memory in little-endian format
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Write a 16-bit value to memory in little-endian format
    fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    /// Highest-priority interrupt that is both enabled (IE) and requested (IF).
    fn pending_interrupt(&self) -> Option<InterruptFlag> {
        InterruptFlag::highest(self.read(IE_ADDR) & self.read(IF_ADDR))
    }

    /// Clear the request bit of an interrupt that is being serviced.
    fn acknowledge_interrupt(&mut self, flag: InterruptFlag) {
        let requested = self.read(IF_ADDR);
        self.write(IF_ADDR, requested & !flag.mask());
    }
}
