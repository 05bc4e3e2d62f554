/// core-lib/src/mmu/mapper.rs
use tracing::debug;

/// First address of the bank-select register window.
pub const BANK_SELECT_START: u16 = 0x2000;
/// Last address of the bank-select register window.
pub const BANK_SELECT_END: u16 = 0x3FFF;

/// Receives writes that land on cartridge mapper registers.
///
/// The bus routes writes in 0x2000-0x3FFF here instead of touching ROM, so
/// the cartridge image stays intact whatever the program writes.
pub trait MapperControl: Send {
    /// Handle a write to a mapper register
    fn write_register(&mut self, addr: u16, value: u8);
}

/// Mapper hook for cartridges without a bank controller.
///
/// Records the last bank-select value so hosts and tests can observe it,
/// but never remaps the 0x4000-0x7FFF window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoMapper {
    bank_select: u8,
}

impl NoMapper {
    pub const fn new() -> Self {
        Self { bank_select: 0 }
    }

    /// Last value written to the bank-select register
    pub const fn bank_select(&self) -> u8 {
        self.bank_select
    }
}

impl MapperControl for NoMapper {
    fn write_register(&mut self, addr: u16, value: u8) {
        debug!("bank-select write {value:#04X} at {addr:#06X} ignored (no mapper)");
        self.bank_select = value;
    }
}
