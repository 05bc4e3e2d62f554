use thiserror::Error;

/// Errors raised while decoding the typed cartridge header fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("Unsupported cartridge type: {0:#04X}")]
    UnsupportedCartridgeType(u8),
    #[error("Invalid ROM size code: {0:#04X}")]
    InvalidRomSize(u8),
    #[error("Invalid RAM size code: {0:#04X}")]
    InvalidRamSize(u8),
}
