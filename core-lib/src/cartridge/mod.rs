/// core-lib/src/cartridge/mod.rs
// Read-only view of the cartridge header. Execution never consults it;
// hosts use it to display and validate what was loaded.
use crate::bus::MemoryBus;

mod error;
mod types;

pub use error::CartridgeError;
pub use types::{CartridgeType, RamSize, RomSize};

const TITLE_START: u16 = 0x0134;
const TITLE_END: u16 = 0x0142;
const CGB_FLAG: u16 = 0x0143;
const NEW_LICENSEE_CODE: u16 = 0x0144;
const SGB_FLAG: u16 = 0x0146;
const CARTRIDGE_TYPE: u16 = 0x0147;
const ROM_SIZE: u16 = 0x0148;
const RAM_SIZE: u16 = 0x0149;
const DESTINATION_CODE: u16 = 0x014A;
const OLD_LICENSEE_CODE: u16 = 0x014B;
const MASK_ROM_VERSION: u16 = 0x014C;
const HEADER_CHECKSUM: u16 = 0x014D;
const GLOBAL_CHECKSUM: u16 = 0x014E;

/// Raw header fields, extracted byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    /// Title with trailing NULs removed
    pub title: String,
    pub cgb_flag: u8,
    /// Two ASCII characters; only meaningful when the old code is 0x33
    pub new_licensee_code: [u8; 2],
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    /// 0x00 for Japan, 0x01 elsewhere
    pub destination_code: u8,
    pub old_licensee_code: u8,
    pub mask_rom_version: u8,
    pub header_checksum: u8,
    /// Big-endian in the image
    pub global_checksum: u16,
    computed_checksum: u8,
}

impl CartridgeHeader {
    /// Extracts the header through the bus.
    pub fn read(bus: &dyn MemoryBus) -> Self {
        let title_bytes: Vec<u8> = (TITLE_START..=TITLE_END).map(|a| bus.read(a)).collect();
        let end = title_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(title_bytes.len());
        let title = String::from_utf8_lossy(&title_bytes[..end]).into_owned();

        // x = x - byte - 1 over 0x134..=0x14C
        let computed_checksum = (TITLE_START..HEADER_CHECKSUM).fold(0u8, |x, addr| {
            x.wrapping_sub(bus.read(addr)).wrapping_sub(1)
        });

        Self {
            title,
            cgb_flag: bus.read(CGB_FLAG),
            new_licensee_code: [
                bus.read(NEW_LICENSEE_CODE),
                bus.read(NEW_LICENSEE_CODE + 1),
            ],
            sgb_flag: bus.read(SGB_FLAG),
            cartridge_type: bus.read(CARTRIDGE_TYPE),
            rom_size_code: bus.read(ROM_SIZE),
            ram_size_code: bus.read(RAM_SIZE),
            destination_code: bus.read(DESTINATION_CODE),
            old_licensee_code: bus.read(OLD_LICENSEE_CODE),
            mask_rom_version: bus.read(MASK_ROM_VERSION),
            header_checksum: bus.read(HEADER_CHECKSUM),
            global_checksum: u16::from_be_bytes([
                bus.read(GLOBAL_CHECKSUM),
                bus.read(GLOBAL_CHECKSUM + 1),
            ]),
            computed_checksum,
        }
    }

    pub const fn header_checksum_matches(&self) -> bool {
        self.computed_checksum == self.header_checksum
    }

    /// Bit 7 of 0x143 marks colour support.
    pub const fn supports_cgb(&self) -> bool {
        self.cgb_flag & 0x80 != 0
    }

    /// SGB functions need 0x03 at 0x146 and the new licensee scheme.
    pub const fn supports_sgb(&self) -> bool {
        self.sgb_flag == 0x03 && self.uses_new_licensee()
    }

    /// An old licensee code of 0x33 defers to the two-character code.
    pub const fn uses_new_licensee(&self) -> bool {
        self.old_licensee_code == 0x33
    }

    pub fn licensee(&self) -> String {
        if self.uses_new_licensee() {
            String::from_utf8_lossy(&self.new_licensee_code).into()
        } else {
            format!("{:02X}", self.old_licensee_code)
        }
    }

    pub const fn is_japanese(&self) -> bool {
        self.destination_code == 0x00
    }

    pub fn kind(&self) -> Result<CartridgeType, CartridgeError> {
        CartridgeType::try_from(self.cartridge_type)
    }

    pub fn rom_size(&self) -> Result<RomSize, CartridgeError> {
        RomSize::from_code(self.rom_size_code)
            .ok_or(CartridgeError::InvalidRomSize(self.rom_size_code))
    }

    pub fn ram_size(&self) -> Result<RamSize, CartridgeError> {
        RamSize::from_code(self.ram_size_code)
            .ok_or(CartridgeError::InvalidRamSize(self.ram_size_code))
    }
}

#[cfg(test)]
mod tests;
