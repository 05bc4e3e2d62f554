// core-lib/src/interrupts/mod.rs
//
// CPU-side view of the interrupt registers. IE and IF are plain bus
// locations; no peripheral in this crate raises requests, a host writes IF.

/// Interrupt Enable register
pub const IE_ADDR: u16 = 0xFFFF;
/// Interrupt Flag (request) register
pub const IF_ADDR: u16 = 0xFF0F;

/// Interrupt bit positions, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptFlag {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl InterruptFlag {
    const PRIORITY: [Self; 5] = [
        Self::VBlank,
        Self::LcdStat,
        Self::Timer,
        Self::Serial,
        Self::Joypad,
    ];

    /// Bit of this interrupt in IE/IF
    #[must_use]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }

    /// Get the interrupt vector address for this interrupt
    #[must_use]
    pub const fn vector(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::LcdStat => 0x0048,
            Self::Timer => 0x0050,
            Self::Serial => 0x0058,
            Self::Joypad => 0x0060,
        }
    }

    /// Highest-priority interrupt present in `active` (IE & IF)
    #[must_use]
    pub fn highest(active: u8) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|flag| active & flag.mask() != 0)
    }
}
