use super::CartridgeError;

/// Controller family named by header byte 0x147.
///
/// Only the type is decoded; this crate maps two fixed ROM banks whatever
/// controller the header announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeType {
    RomOnly { ram: bool, battery: bool },
    Mbc1 { ram: bool, battery: bool },
    Mbc2 { battery: bool },
    Mmm01 { ram: bool, battery: bool },
    Mbc3 { ram: bool, battery: bool, rtc: bool },
    Mbc5 {
        ram: bool,
        battery: bool,
        rumble: bool,
    },
    Mbc6,
    Mbc7,
    PocketCamera,
    Tama5,
    HuC3,
    HuC1,
}

impl TryFrom<u8> for CartridgeType {
    type Error = CartridgeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let kind = match value {
            0x00 => Self::RomOnly {
                ram: false,
                battery: false,
            },
            0x08 => Self::RomOnly {
                ram: true,
                battery: false,
            },
            0x09 => Self::RomOnly {
                ram: true,
                battery: true,
            },
            0x01 => Self::Mbc1 {
                ram: false,
                battery: false,
            },
            0x02 => Self::Mbc1 {
                ram: true,
                battery: false,
            },
            0x03 => Self::Mbc1 {
                ram: true,
                battery: true,
            },
            0x05 => Self::Mbc2 { battery: false },
            0x06 => Self::Mbc2 { battery: true },
            0x0B => Self::Mmm01 {
                ram: false,
                battery: false,
            },
            0x0C => Self::Mmm01 {
                ram: true,
                battery: false,
            },
            0x0D => Self::Mmm01 {
                ram: true,
                battery: true,
            },
            0x0F => Self::Mbc3 {
                ram: false,
                battery: true,
                rtc: true,
            },
            0x10 => Self::Mbc3 {
                ram: true,
                battery: true,
                rtc: true,
            },
            0x11 => Self::Mbc3 {
                ram: false,
                battery: false,
                rtc: false,
            },
            0x12 => Self::Mbc3 {
                ram: true,
                battery: false,
                rtc: false,
            },
            0x13 => Self::Mbc3 {
                ram: true,
                battery: true,
                rtc: false,
            },
            0x19 => Self::Mbc5 {
                ram: false,
                battery: false,
                rumble: false,
            },
            0x1A => Self::Mbc5 {
                ram: true,
                battery: false,
                rumble: false,
            },
            0x1B => Self::Mbc5 {
                ram: true,
                battery: true,
                rumble: false,
            },
            0x1C => Self::Mbc5 {
                ram: false,
                battery: false,
                rumble: true,
            },
            0x1D => Self::Mbc5 {
                ram: true,
                battery: false,
                rumble: true,
            },
            0x1E => Self::Mbc5 {
                ram: true,
                battery: true,
                rumble: true,
            },
            0x20 => Self::Mbc6,
            0x22 => Self::Mbc7,
            0xFC => Self::PocketCamera,
            0xFD => Self::Tama5,
            0xFE => Self::HuC3,
            0xFF => Self::HuC1,
            _ => return Err(CartridgeError::UnsupportedCartridgeType(value)),
        };
        Ok(kind)
    }
}

impl CartridgeType {
    /// True when the cartridge has any bank controller at all.
    pub const fn has_mapper(self) -> bool {
        !matches!(self, Self::RomOnly { .. })
    }

    pub const fn has_battery(self) -> bool {
        match self {
            Self::RomOnly { battery, .. }
            | Self::Mbc1 { battery, .. }
            | Self::Mbc2 { battery }
            | Self::Mmm01 { battery, .. }
            | Self::Mbc3 { battery, .. }
            | Self::Mbc5 { battery, .. } => battery,
            Self::Mbc7 | Self::HuC1 | Self::HuC3 => true,
            Self::Mbc6 | Self::PocketCamera | Self::Tama5 => false,
        }
    }
}

/// ROM size from header byte 0x148: 32KB shifted left by the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomSize(u8);

impl RomSize {
    pub const fn from_code(code: u8) -> Option<Self> {
        if code <= 0x08 {
            Some(Self(code))
        } else {
            None
        }
    }

    /// Number of 16KB banks.
    pub const fn banks(self) -> usize {
        2 << self.0
    }

    pub const fn as_bytes(self) -> usize {
        self.banks() * 0x4000
    }
}

/// External RAM size from header byte 0x149
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamSize {
    None,
    /// Code 0x01, unused by licensed cartridges
    Size2KB,
    Size8KB,
    Size32KB,
    Size128KB,
    Size64KB,
}

impl RamSize {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::None),
            0x01 => Some(Self::Size2KB),
            0x02 => Some(Self::Size8KB),
            0x03 => Some(Self::Size32KB),
            0x04 => Some(Self::Size128KB),
            0x05 => Some(Self::Size64KB),
            _ => None,
        }
    }

    pub const fn as_bytes(self) -> usize {
        match self {
            Self::None => 0,
            Self::Size2KB => 2 * 1024,
            Self::Size8KB => 8 * 1024,
            Self::Size32KB => 32 * 1024,
            Self::Size128KB => 128 * 1024,
            Self::Size64KB => 64 * 1024,
        }
    }
}
