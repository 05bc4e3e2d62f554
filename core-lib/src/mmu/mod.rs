use crate::bus::MemoryBus;
use tracing::{debug, trace};

pub mod mapper;
pub use mapper::{MapperControl, NoMapper, BANK_SELECT_END, BANK_SELECT_START};

/// Size of one ROM bank window
pub const ROM_BANK_SIZE: usize = 0x4000;
/// ROM bytes the two fixed windows can hold
pub const ROM_CAPACITY: usize = 2 * ROM_BANK_SIZE;

/// Memory region an address routes to.
///
/// Every address in 0x0000-0xFFFF belongs to exactly one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// 0x0000-0x3FFF: fixed ROM bank 0
    RomBank0,
    /// 0x4000-0x7FFF: switchable ROM bank
    RomBankN,
    /// 0x8000-0x9FFF: video RAM
    Vram,
    /// 0xA000-0xBFFF: cartridge RAM
    ExternalRam,
    /// 0xC000-0xDFFF: work RAM
    WorkRam,
    /// 0xE000-0xFDFF: mirror of 0xC000-0xDDFF
    Echo,
    /// 0xFE00-0xFE9F: sprite attribute table
    Oam,
    /// 0xFEA0-0xFEFF: reads 0, ignores writes
    Unusable,
    /// 0xFF00-0xFF7F: I/O registers
    Io,
    /// 0xFF80-0xFFFE: high RAM
    HighRam,
    /// 0xFFFF: interrupt enable
    InterruptEnable,
}

impl Region {
    pub const fn of(addr: u16) -> Self {
        match addr {
            0x0000..=0x3FFF => Self::RomBank0,
            0x4000..=0x7FFF => Self::RomBankN,
            0x8000..=0x9FFF => Self::Vram,
            0xA000..=0xBFFF => Self::ExternalRam,
            0xC000..=0xDFFF => Self::WorkRam,
            0xE000..=0xFDFF => Self::Echo,
            0xFE00..=0xFE9F => Self::Oam,
            0xFEA0..=0xFEFF => Self::Unusable,
            0xFF00..=0xFF7F => Self::Io,
            0xFF80..=0xFFFE => Self::HighRam,
            0xFFFF => Self::InterruptEnable,
        }
    }

    /// Inclusive address range covered by the region
    pub const fn range(self) -> (u16, u16) {
        match self {
            Self::RomBank0 => (0x0000, 0x3FFF),
            Self::RomBankN => (0x4000, 0x7FFF),
            Self::Vram => (0x8000, 0x9FFF),
            Self::ExternalRam => (0xA000, 0xBFFF),
            Self::WorkRam => (0xC000, 0xDFFF),
            Self::Echo => (0xE000, 0xFDFF),
            Self::Oam => (0xFE00, 0xFE9F),
            Self::Unusable => (0xFEA0, 0xFEFF),
            Self::Io => (0xFF00, 0xFF7F),
            Self::HighRam => (0xFF80, 0xFFFE),
            Self::InterruptEnable => (0xFFFF, 0xFFFF),
        }
    }

    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::RomBank0 | Self::RomBankN | Self::Unusable)
    }
}

/// Memory Management Unit: owns every region of the address space
pub struct Mmu {
    rom: Vec<u8>,         // Bank 0 followed by bank N, 32KB
    vram: [u8; 0x2000],   // 8KB Video RAM
    eram: [u8; 0x2000],   // 8KB cartridge RAM
    wram: [u8; 0x2000],   // 8KB Work RAM
    oam: [u8; 0xA0],      // Object Attribute Memory
    io_registers: [u8; 0x80],
    hram: [u8; 0x7F],     // High RAM
    interrupt_enable: u8, // IE, 0xFFFF
    mapper: Box<dyn MapperControl>,
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mmu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mmu")
            .field("rom_len", &self.rom.len())
            .field("interrupt_enable", &self.interrupt_enable)
            .finish_non_exhaustive()
    }
}

impl Mmu {
    /// Creates an MMU with zeroed memory and no mapper.
    pub fn new() -> Self {
        Self::with_mapper(Box::new(NoMapper::new()))
    }

    /// Creates an MMU whose bank-select writes go to `mapper`.
    pub fn with_mapper(mapper: Box<dyn MapperControl>) -> Self {
        Self {
            rom: vec![0; ROM_CAPACITY],
            vram: [0; 0x2000],
            eram: [0; 0x2000],
            wram: [0; 0x2000],
            oam: [0; 0xA0],
            io_registers: [0; 0x80],
            hram: [0; 0x7F],
            interrupt_enable: 0,
            mapper,
        }
    }

    /// Copies a ROM image into banks 0 and N starting at address 0.
    ///
    /// Bytes beyond the two mapped banks are dropped; a shorter image leaves
    /// the rest of ROM zeroed.
    pub fn load_rom(&mut self, image: &[u8]) {
        let len = image.len().min(ROM_CAPACITY);
        if image.len() > ROM_CAPACITY {
            debug!(
                image_len = image.len(),
                mapped = ROM_CAPACITY,
                "ROM image larger than mapped banks, excess dropped"
            );
        }
        self.rom.fill(0);
        self.rom[..len].copy_from_slice(&image[..len]);
        debug!(bytes = len, "ROM loaded");
    }

    /// Read a byte from memory
    pub fn read(&self, addr: u16) -> u8 {
        let offset = usize::from(addr - Region::of(addr).range().0);
        match Region::of(addr) {
            Region::RomBank0 => self.rom[offset],
            Region::RomBankN => self.rom[ROM_BANK_SIZE + offset],
            Region::Vram => self.vram[offset],
            Region::ExternalRam => self.eram[offset],
            Region::WorkRam | Region::Echo => self.wram[offset],
            Region::Oam => self.oam[offset],
            Region::Unusable => 0,
            Region::Io => self.io_registers[offset],
            Region::HighRam => self.hram[offset],
            Region::InterruptEnable => self.interrupt_enable,
        }
    }

    /// Write a byte to memory
    ///
    /// ROM is never mutated: 0x2000-0x3FFF goes to the mapper hook and the
    /// rest of the ROM range is ignored.
    pub fn write(&mut self, addr: u16, value: u8) {
        let offset = usize::from(addr - Region::of(addr).range().0);
        match Region::of(addr) {
            Region::RomBank0 | Region::RomBankN => {
                if (BANK_SELECT_START..=BANK_SELECT_END).contains(&addr) {
                    self.mapper.write_register(addr, value);
                } else {
                    trace!("write {value:#04X} to ROM at {addr:#06X} ignored");
                }
            }
            Region::Vram => self.vram[offset] = value,
            Region::ExternalRam => self.eram[offset] = value,
            Region::WorkRam | Region::Echo => self.wram[offset] = value,
            Region::Oam => self.oam[offset] = value,
            Region::Unusable => {}
            Region::Io => self.io_registers[offset] = value,
            Region::HighRam => self.hram[offset] = value,
            Region::InterruptEnable => self.interrupt_enable = value,
        }
    }
}

impl MemoryBus for Mmu {
    #[inline]
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}
