//! Tagged operation descriptors produced by the decoder.
//!
//! Every opcode byte decodes to one [`Op`]: an operation kind plus the
//! resolved operand slots it works on. Execution matches on the tag, so
//! the table holds plain `Copy` data and never closures.

use crate::cpu::registers::{Reg16, Reg8};

/// An 8-bit operand position in the encoding.
///
/// Index 6 of the register ordering is not a register at all: it means the
/// byte at the address held in HL, read and written through the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand8 {
    Reg(Reg8),
    IndirectHl,
}

/// Register ordering selected by the 3-bit fields of an opcode.
pub const OPERAND_ORDER: [Operand8; 8] = [
    Operand8::Reg(Reg8::B),
    Operand8::Reg(Reg8::C),
    Operand8::Reg(Reg8::D),
    Operand8::Reg(Reg8::E),
    Operand8::Reg(Reg8::H),
    Operand8::Reg(Reg8::L),
    Operand8::IndirectHl,
    Operand8::Reg(Reg8::A),
];

impl Operand8 {
    /// Decodes a 3-bit register field.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        OPERAND_ORDER[(bits & 0x07) as usize]
    }
}

/// 16-bit operand selected by bits 5-4 for the LD/INC/DEC/ADD HL group.
pub const WIDE_ORDER: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP];
/// 16-bit operand selected by bits 5-4 for PUSH/POP.
pub const STACK_ORDER: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::AF];

/// Branch condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

impl Condition {
    /// Decodes the 2-bit condition field (bits 4-3).
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::NotZero,
            1 => Self::Zero,
            2 => Self::NotCarry,
            _ => Self::Carry,
        }
    }
}

/// Accumulator operations in encoding order (bits 5-3 of 0x80-0xBF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub const ORDER: [Self; 8] = [
        Self::Add,
        Self::Adc,
        Self::Sub,
        Self::Sbc,
        Self::And,
        Self::Xor,
        Self::Or,
        Self::Cp,
    ];
}

/// Rotate/shift/swap operations of the CB space (bits 5-3 of 0x00-0x3F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub const ORDER: [Self; 8] = [
        Self::Rlc,
        Self::Rrc,
        Self::Rl,
        Self::Rr,
        Self::Sla,
        Self::Sra,
        Self::Swap,
        Self::Srl,
    ];
}

/// Accumulator-only rotates (RLCA, RRCA, RLA, RRA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateA {
    Rlca,
    Rrca,
    Rla,
    Rra,
}

/// Memory operand addressed through a register pair for `LD A,(rr)` and
/// `LD (rr),A`. The HL forms adjust HL after the access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indirect {
    Bc,
    De,
    HlIncrement,
    HlDecrement,
}

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    Daa,
    Cpl,
    Scf,
    Ccf,
    /// `LD dst,src` over the 8-entry ordering (never `(HL),(HL)`).
    Ld { dst: Operand8, src: Operand8 },
    /// `LD dst,n8`
    LdImm(Operand8),
    /// `LD rr,n16`
    LdWideImm(Reg16),
    /// `LD (rr),A`
    StoreA(Indirect),
    /// `LD A,(rr)`
    LoadA(Indirect),
    /// `LD (a16),SP`
    StoreSp,
    /// `LD (a16),A`
    StoreAAbs,
    /// `LD A,(a16)`
    LoadAAbs,
    /// `LDH (a8),A`
    StoreAHigh,
    /// `LDH A,(a8)`
    LoadAHigh,
    /// `LDH (C),A`
    StoreAHighC,
    /// `LDH A,(C)`
    LoadAHighC,
    /// `LD SP,HL`
    LdSpHl,
    /// `LD HL,SP+e8`
    LdHlSpOffset,
    Alu { op: AluOp, src: Operand8 },
    AluImm(AluOp),
    Inc(Operand8),
    Dec(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    AddSpOffset,
    Rotate(RotateA),
    Jp(Condition),
    JpHl,
    Jr(Condition),
    Call(Condition),
    Ret(Condition),
    Reti,
    Rst(u8),
    Push(Reg16),
    Pop(Reg16),
    /// The 0xCB lead-in byte. Never executed: the engine consumes it.
    Prefix,
    /// An unassigned opcode.
    Illegal,
    Shift { op: ShiftOp, target: Operand8 },
    Bit { bit: u8, target: Operand8 },
    Res { bit: u8, target: Operand8 },
    Set { bit: u8, target: Operand8 },
}

impl Op {
    /// Encoded length in bytes, counting the 0xCB prefix for CB operations.
    pub const fn length(self) -> u8 {
        match self {
            Self::Stop
            | Self::LdImm(_)
            | Self::StoreAHigh
            | Self::LoadAHigh
            | Self::LdHlSpOffset
            | Self::AluImm(_)
            | Self::AddSpOffset
            | Self::Jr(_)
            | Self::Shift { .. }
            | Self::Bit { .. }
            | Self::Res { .. }
            | Self::Set { .. } => 2,
            Self::LdWideImm(_)
            | Self::StoreSp
            | Self::StoreAAbs
            | Self::LoadAAbs
            | Self::Jp(_)
            | Self::Call(_) => 3,
            _ => 1,
        }
    }

    /// True for CB-space operations.
    pub const fn is_prefixed(self) -> bool {
        matches!(
            self,
            Self::Shift { .. } | Self::Bit { .. } | Self::Res { .. } | Self::Set { .. }
        )
    }
}
