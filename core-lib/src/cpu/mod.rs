/// core-lib/src/cpu/mod.rs
use crate::bus::MemoryBus;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, trace};

pub mod opcodes;
pub mod registers;

pub use opcodes::{decode, DispatchEntry, DispatchTable, Op, PREFIX_OPCODE};
pub use registers::{Flags, Reg16, Reg8, Registers};

/// Cycles charged for dispatching an interrupt.
pub const INTERRUPT_CYCLES: u32 = 20;
/// Cycles charged per step while halted.
pub const HALT_CYCLES: u32 = 4;

/// Faults raised by [`Cpu::step`]. Both leave PC on the faulting
/// instruction's first byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("Unimplemented opcode {opcode:#04X} (prefixed: {prefixed}) at {pc:#06X}")]
    UnimplementedOpcode { opcode: u8, prefixed: bool, pc: u16 },
    #[error("No catalog descriptor for opcode {opcode:#04X} (prefixed: {prefixed}) at {pc:#06X}")]
    MissingDescriptor { opcode: u8, prefixed: bool, pc: u16 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CpuState {
    #[default]
    Running,
    /// Stopped fetching until an interrupt is pending.
    Halted,
    /// A decode fault occurred; only a reset clears it.
    Locked,
}

pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    /// EI was executed; IME turns on after the next instruction.
    ime_scheduled: bool,
    state: CpuState,
    fault: Option<CpuError>,
    cycles: u64, // Total cycles since reset
    dispatch: Arc<DispatchTable>,
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("ime", &self.ime)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl Cpu {
    pub fn new(dispatch: Arc<DispatchTable>) -> Self {
        Self {
            regs: Registers::new(),
            ime: false,
            ime_scheduled: false,
            state: CpuState::Running,
            fault: None,
            cycles: 0,
            dispatch,
        }
    }

    /// Returns to the post-boot state, clearing any latched fault.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.ime = false;
        self.ime_scheduled = false;
        self.state = CpuState::Running;
        self.fault = None;
        self.cycles = 0;
    }

    /// Executes one instruction (or services one interrupt, or idles one
    /// halted tick) and returns the T-cycles it took.
    pub fn step(&mut self, bus: &mut dyn MemoryBus) -> Result<u32, CpuError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if let Some(cycles) = self.service_interrupt(bus) {
            self.cycles += u64::from(cycles);
            return Ok(cycles);
        }
        if self.state == CpuState::Halted {
            self.cycles += u64::from(HALT_CYCLES);
            return Ok(HALT_CYCLES);
        }

        let start_pc = self.regs.pc;
        let mut opcode = self.fetch_byte(bus);
        let prefixed = opcode == PREFIX_OPCODE;
        if prefixed {
            opcode = self.fetch_byte(bus);
        }

        let entry = *self.dispatch.entry(opcode, prefixed);
        if entry.op == Op::Illegal {
            return Err(self.lock(
                start_pc,
                CpuError::UnimplementedOpcode {
                    opcode,
                    prefixed,
                    pc: start_pc,
                },
            ));
        }
        let Some(cost) = entry.cost else {
            return Err(self.lock(
                start_pc,
                CpuError::MissingDescriptor {
                    opcode,
                    prefixed,
                    pc: start_pc,
                },
            ));
        };

        let enable_ime = self.ime_scheduled;
        let flags_before = self.regs.f();
        let taken = self.execute(bus, entry.op);
        let flags_after = cost.masks.apply(flags_before, self.regs.f());
        self.regs.set(Reg8::F, flags_after);
        if enable_ime && self.ime_scheduled {
            self.ime = true;
            self.ime_scheduled = false;
        }

        let cycles = cost.cycles(taken);
        self.cycles += u64::from(cycles);
        trace!(
            pc = start_pc,
            opcode,
            prefixed,
            cycles,
            "{}",
            self.dispatch.mnemonic(opcode, prefixed)
        );
        Ok(cycles)
    }

    /// Wakes HALT on any pending interrupt and, with IME set, jumps to the
    /// highest-priority vector.
    fn service_interrupt(&mut self, bus: &mut dyn MemoryBus) -> Option<u32> {
        let interrupt = bus.pending_interrupt()?;
        if self.state == CpuState::Halted {
            debug!(?interrupt, "leaving HALT");
            self.state = CpuState::Running;
        }
        if !self.ime {
            return None;
        }
        self.ime = false;
        bus.acknowledge_interrupt(interrupt);
        let ret = self.regs.pc;
        self.push_word(bus, ret);
        self.regs.pc = interrupt.vector();
        debug!(?interrupt, from = ret, "interrupt dispatched");
        Some(INTERRUPT_CYCLES)
    }

    fn lock(&mut self, start_pc: u16, fault: CpuError) -> CpuError {
        self.regs.pc = start_pc;
        self.state = CpuState::Locked;
        error!(%fault, "decode fault, CPU locked");
        self.fault = Some(fault.clone());
        fault
    }

    pub const fn state(&self) -> CpuState {
        self.state
    }

    /// The fault that locked the CPU, if any.
    pub const fn fault(&self) -> Option<&CpuError> {
        self.fault.as_ref()
    }

    pub const fn get_cycles(&self) -> u64 {
        self.cycles
    }

    /// EI has run but IME is not on yet.
    pub const fn ime_pending(&self) -> bool {
        self.ime_scheduled
    }

    pub fn dispatch(&self) -> &Arc<DispatchTable> {
        &self.dispatch
    }
}
