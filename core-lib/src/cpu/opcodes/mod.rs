//! Decoder and dispatch table.
//!
//! Both 256-entry opcode spaces decode to tagged [`Op`] descriptors, built
//! by walking the register ordering B, C, D, E, H, L, (HL), A across each
//! family's base offset. [`DispatchTable`] pairs every descriptor with the
//! cost and flag masks taken from the instruction catalog. It is built once
//! and never mutated, so one table can be shared by any number of machines.

use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod alu;
pub mod cb;
pub mod jump;
pub mod load_store;
pub mod types;

pub use types::*;

use crate::bus::MemoryBus;
use crate::catalog::{Catalog, FlagMasks, Instruction};
use crate::cpu::registers::Reg8;
use crate::cpu::{Cpu, CpuState};

/// Lead-in byte of the CB opcode space.
pub const PREFIX_OPCODE: u8 = 0xCB;

/// Unprefixed opcode space, decoded once.
pub static REGULAR_OPS: Lazy<[Op; 256]> = Lazy::new(regular_ops);

/// CB opcode space, decoded once.
pub static PREFIXED_OPS: Lazy<[Op; 256]> = Lazy::new(prefixed_ops);

/// Decodes an opcode byte from either space.
#[inline]
pub fn decode(opcode: u8, prefixed: bool) -> Op {
    if prefixed {
        PREFIXED_OPS[usize::from(opcode)]
    } else {
        REGULAR_OPS[usize::from(opcode)]
    }
}

/// Builds the unprefixed space. Slots no family claims stay `Illegal`.
fn regular_ops() -> [Op; 256] {
    let mut ops = [Op::Illegal; 256];

    for (n, &operand) in OPERAND_ORDER.iter().enumerate() {
        ops[0x04 + 8 * n] = Op::Inc(operand);
        ops[0x05 + 8 * n] = Op::Dec(operand);
        ops[0x06 + 8 * n] = Op::LdImm(operand);
        for (s, &src) in OPERAND_ORDER.iter().enumerate() {
            ops[0x40 + 8 * n + s] = Op::Ld { dst: operand, src };
            ops[0x80 + 8 * n + s] = Op::Alu {
                op: AluOp::ORDER[n],
                src,
            };
        }
        ops[0xC6 + 8 * n] = Op::AluImm(AluOp::ORDER[n]);
        ops[0xC7 + 8 * n] = Op::Rst(8 * n as u8);
    }
    // LD (HL),(HL) is not a load
    ops[0x76] = Op::Halt;

    for (p, &wide) in WIDE_ORDER.iter().enumerate() {
        ops[0x01 + 16 * p] = Op::LdWideImm(wide);
        ops[0x03 + 16 * p] = Op::Inc16(wide);
        ops[0x09 + 16 * p] = Op::AddHl(wide);
        ops[0x0B + 16 * p] = Op::Dec16(wide);
    }
    for (p, &pair) in STACK_ORDER.iter().enumerate() {
        ops[0xC1 + 16 * p] = Op::Pop(pair);
        ops[0xC5 + 16 * p] = Op::Push(pair);
    }
    for (p, &indirect) in [
        Indirect::Bc,
        Indirect::De,
        Indirect::HlIncrement,
        Indirect::HlDecrement,
    ]
    .iter()
    .enumerate()
    {
        ops[0x02 + 16 * p] = Op::StoreA(indirect);
        ops[0x0A + 16 * p] = Op::LoadA(indirect);
    }
    for bits in 0..4u8 {
        let condition = Condition::from_bits(bits);
        let base = usize::from(bits) * 8;
        ops[0x20 + base] = Op::Jr(condition);
        ops[0xC0 + base] = Op::Ret(condition);
        ops[0xC2 + base] = Op::Jp(condition);
        ops[0xC4 + base] = Op::Call(condition);
    }
    for (i, rotate) in [RotateA::Rlca, RotateA::Rrca, RotateA::Rla, RotateA::Rra]
        .into_iter()
        .enumerate()
    {
        ops[0x07 + 8 * i] = Op::Rotate(rotate);
    }

    ops[0x00] = Op::Nop;
    ops[0x08] = Op::StoreSp;
    ops[0x10] = Op::Stop;
    ops[0x18] = Op::Jr(Condition::Always);
    ops[0x27] = Op::Daa;
    ops[0x2F] = Op::Cpl;
    ops[0x37] = Op::Scf;
    ops[0x3F] = Op::Ccf;
    ops[0xC3] = Op::Jp(Condition::Always);
    ops[0xC9] = Op::Ret(Condition::Always);
    ops[0xCB] = Op::Prefix;
    ops[0xCD] = Op::Call(Condition::Always);
    ops[0xD9] = Op::Reti;
    ops[0xE0] = Op::StoreAHigh;
    ops[0xE2] = Op::StoreAHighC;
    ops[0xE8] = Op::AddSpOffset;
    ops[0xE9] = Op::JpHl;
    ops[0xEA] = Op::StoreAAbs;
    ops[0xF0] = Op::LoadAHigh;
    ops[0xF2] = Op::LoadAHighC;
    ops[0xF3] = Op::Di;
    ops[0xF8] = Op::LdHlSpOffset;
    ops[0xF9] = Op::LdSpHl;
    ops[0xFA] = Op::LoadAAbs;
    ops[0xFB] = Op::Ei;
    ops
}

/// Builds the CB space: bits 7-6 pick the group, bits 5-3 the operation or
/// bit index, bits 2-0 the target.
fn prefixed_ops() -> [Op; 256] {
    std::array::from_fn(|i| {
        let opcode = i as u8;
        let target = Operand8::from_bits(opcode);
        let y = (opcode >> 3) & 0x07;
        match opcode >> 6 {
            0 => Op::Shift {
                op: ShiftOp::ORDER[usize::from(y)],
                target,
            },
            1 => Op::Bit { bit: y, target },
            2 => Op::Res { bit: y, target },
            _ => Op::Set { bit: y, target },
        }
    })
}

/// Cycle cost and flag masks of one opcode, compiled from its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    pub taken: u32,
    pub not_taken: u32,
    pub masks: FlagMasks,
}

impl Cost {
    fn from_instruction(instruction: &Instruction) -> Self {
        Self {
            taken: instruction.cycles_for(true),
            not_taken: instruction.cycles_for(false),
            masks: instruction.flag_masks(),
        }
    }

    #[inline]
    pub const fn cycles(self, branch_taken: bool) -> u32 {
        if branch_taken {
            self.taken
        } else {
            self.not_taken
        }
    }
}

/// One slot of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEntry {
    pub op: Op,
    /// `None` when the catalog has no descriptor for this opcode.
    pub cost: Option<Cost>,
}

/// Immutable opcode → (operation, cost) map for both opcode spaces.
#[derive(Debug)]
pub struct DispatchTable {
    catalog: Arc<Catalog>,
    regular: [DispatchEntry; 256],
    prefixed: [DispatchEntry; 256],
}

impl DispatchTable {
    /// Pairs the decoded opcode spaces with catalog costs.
    pub fn build(catalog: Arc<Catalog>) -> Self {
        let regular = Self::section(&catalog, false);
        let prefixed = Self::section(&catalog, true);
        let uncosted = regular
            .iter()
            .chain(prefixed.iter())
            .filter(|entry| entry.cost.is_none())
            .count();
        debug!(uncosted, "dispatch table built");
        Self {
            catalog,
            regular,
            prefixed,
        }
    }

    fn section(catalog: &Catalog, prefixed: bool) -> [DispatchEntry; 256] {
        std::array::from_fn(|i| {
            let opcode = i as u8;
            let op = decode(opcode, prefixed);
            let instruction = catalog.get(opcode, prefixed);
            if let Some(instruction) = instruction {
                if instruction.bytes != op.length() && op != Op::Illegal {
                    warn!(
                        opcode,
                        prefixed,
                        catalog_bytes = instruction.bytes,
                        decoded_bytes = op.length(),
                        "catalog length disagrees with decoder"
                    );
                }
            }
            DispatchEntry {
                op,
                cost: instruction.map(Cost::from_instruction),
            }
        })
    }

    #[inline]
    pub fn entry(&self, opcode: u8, prefixed: bool) -> &DispatchEntry {
        if prefixed {
            &self.prefixed[usize::from(opcode)]
        } else {
            &self.regular[usize::from(opcode)]
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog mnemonic, or `"???"` for opcodes the catalog lacks.
    pub fn mnemonic(&self, opcode: u8, prefixed: bool) -> &str {
        self.catalog
            .get(opcode, prefixed)
            .map_or("???", |instruction| instruction.mnemonic.as_str())
    }
}

impl Cpu {
    /// Runs one decoded operation. Returns whether a conditional branch was
    /// taken (always `true` for everything else).
    pub(crate) fn execute(&mut self, bus: &mut dyn MemoryBus, op: Op) -> bool {
        match op {
            Op::Nop | Op::Prefix | Op::Illegal => {}
            Op::Stop => {
                // Second byte is padding
                self.fetch_byte(bus);
                debug!(pc = self.regs.pc, "STOP executed as no-op");
            }
            Op::Halt => {
                self.state = CpuState::Halted;
                debug!(pc = self.regs.pc, "entering HALT");
            }
            Op::Di => {
                self.ime = false;
                self.ime_scheduled = false;
            }
            Op::Ei => self.ime_scheduled = true,
            Op::Daa => alu::daa(&mut self.regs),
            Op::Cpl => alu::cpl(&mut self.regs),
            Op::Scf => alu::scf(&mut self.regs),
            Op::Ccf => alu::ccf(&mut self.regs),

            Op::Ld { dst, src } => self.load(bus, dst, src),
            Op::LdImm(dst) => self.load_immediate(bus, dst),
            Op::LdWideImm(dst) => self.load_wide_immediate(bus, dst),
            Op::StoreA(indirect) => self.store_a(bus, indirect),
            Op::LoadA(indirect) => self.load_a(bus, indirect),
            Op::StoreSp => self.store_sp(bus),
            Op::StoreAAbs => self.store_a_absolute(bus),
            Op::LoadAAbs => self.load_a_absolute(bus),
            Op::StoreAHigh => {
                let offset = self.fetch_byte(bus);
                self.store_a_high(bus, offset);
            }
            Op::LoadAHigh => {
                let offset = self.fetch_byte(bus);
                self.load_a_high(bus, offset);
            }
            Op::StoreAHighC => self.store_a_high(bus, self.regs.get(Reg8::C)),
            Op::LoadAHighC => self.load_a_high(bus, self.regs.get(Reg8::C)),
            Op::LdSpHl => self.regs.sp = self.regs.hl(),
            Op::LdHlSpOffset => {
                let offset = self.fetch_byte(bus);
                let value = alu::sp_offset(&mut self.regs, offset);
                self.regs.set_hl(value);
            }

            Op::Alu { op, src } => {
                let value = self.read_operand(bus, src);
                alu::accumulate(&mut self.regs, op, value);
            }
            Op::AluImm(op) => {
                let value = self.fetch_byte(bus);
                alu::accumulate(&mut self.regs, op, value);
            }
            Op::Inc(target) => {
                let old = self.read_operand(bus, target);
                let value = alu::increment(&mut self.regs, old);
                self.write_operand(bus, target, value);
            }
            Op::Dec(target) => {
                let old = self.read_operand(bus, target);
                let value = alu::decrement(&mut self.regs, old);
                self.write_operand(bus, target, value);
            }
            Op::Inc16(reg) => self.regs.set16(reg, self.regs.get16(reg).wrapping_add(1)),
            Op::Dec16(reg) => self.regs.set16(reg, self.regs.get16(reg).wrapping_sub(1)),
            Op::AddHl(reg) => {
                let value = self.regs.get16(reg);
                alu::add_hl(&mut self.regs, value);
            }
            Op::AddSpOffset => {
                let offset = self.fetch_byte(bus);
                self.regs.sp = alu::sp_offset(&mut self.regs, offset);
            }
            Op::Rotate(rotate) => alu::rotate_a(&mut self.regs, rotate),

            Op::Jp(condition) => return self.jump(bus, condition),
            Op::JpHl => self.regs.pc = self.regs.hl(),
            Op::Jr(condition) => return self.jump_relative(bus, condition),
            Op::Call(condition) => return self.call(bus, condition),
            Op::Ret(condition) => return self.ret(bus, condition),
            Op::Reti => {
                self.ret(bus, Condition::Always);
                self.ime = true;
            }
            Op::Rst(vector) => self.restart(bus, vector),
            Op::Push(reg) => self.push_word(bus, self.regs.get16(reg)),
            Op::Pop(reg) => {
                let value = self.pop_word(bus);
                self.regs.set16(reg, value);
            }

            Op::Shift { op, target } => {
                let value = self.read_operand(bus, target);
                let result = cb::shift(&mut self.regs, op, value);
                self.write_operand(bus, target, result);
            }
            Op::Bit { bit, target } => {
                let value = self.read_operand(bus, target);
                cb::bit(&mut self.regs, bit, value);
            }
            Op::Res { bit, target } => {
                let value = self.read_operand(bus, target);
                self.write_operand(bus, target, cb::res(bit, value));
            }
            Op::Set { bit, target } => {
                let value = self.read_operand(bus, target);
                self.write_operand(bus, target, cb::set(bit, value));
            }
        }
        true
    }
}
