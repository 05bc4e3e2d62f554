/// core-lib/src/machine.rs
use crate::cartridge::CartridgeHeader;
use crate::catalog::{Catalog, CatalogError};
use crate::cpu::{Cpu, CpuError, CpuState, DispatchTable, Flags, Registers};
use crate::mmu::{MapperControl, Mmu};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Failures while assembling a machine from files
#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to read ROM image {path:?}")]
    Rom {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One emulated machine: a CPU and the address space it owns.
///
/// Machines never share mutable state. The dispatch table behind the CPU
/// is read-only and may be shared between any number of machines.
#[derive(Debug)]
pub struct Machine {
    cpu: Cpu,
    mmu: Mmu,
}

impl Machine {
    /// Builds a dispatch table from `catalog` and loads `rom`.
    pub fn new(catalog: Arc<Catalog>, rom: &[u8]) -> Self {
        Self::with_dispatch(Arc::new(DispatchTable::build(catalog)), rom)
    }

    /// Creates a machine over an existing, possibly shared, dispatch table.
    pub fn with_dispatch(dispatch: Arc<DispatchTable>, rom: &[u8]) -> Self {
        Self::with_mmu(dispatch, Mmu::new(), rom)
    }

    /// Like [`Machine::with_dispatch`], routing bank-select writes to `mapper`.
    pub fn with_mapper(
        dispatch: Arc<DispatchTable>,
        rom: &[u8],
        mapper: Box<dyn MapperControl>,
    ) -> Self {
        Self::with_mmu(dispatch, Mmu::with_mapper(mapper), rom)
    }

    fn with_mmu(dispatch: Arc<DispatchTable>, mut mmu: Mmu, rom: &[u8]) -> Self {
        mmu.load_rom(rom);
        Self {
            cpu: Cpu::new(dispatch),
            mmu,
        }
    }

    /// Loads the catalog and ROM image from disk. Nothing is returned
    /// unless both load.
    #[instrument(skip_all, fields(catalog = %catalog_path.display(), rom = %rom_path.display()))]
    pub fn from_files(catalog_path: &Path, rom_path: &Path) -> Result<Self, MachineError> {
        let catalog = Catalog::load(catalog_path)?;
        let rom = std::fs::read(rom_path).map_err(|source| MachineError::Rom {
            path: rom_path.to_path_buf(),
            source,
        })?;
        let machine = Self::new(Arc::new(catalog), &rom);
        debug!(title = %machine.header().title, "machine ready");
        Ok(machine)
    }

    /// Executes one instruction and returns the T-cycles it took.
    #[inline]
    pub fn step(&mut self) -> Result<u32, CpuError> {
        self.cpu.step(&mut self.mmu)
    }

    /// Steps until at least `budget` cycles have run. Returns the cycles
    /// actually consumed, which may overshoot by one instruction.
    ///
    /// A step that reports no cycles ends the run early instead of looping.
    pub fn run_cycles(&mut self, budget: u64) -> Result<u64, CpuError> {
        let mut consumed = 0;
        while consumed < budget {
            let cycles = self.step()?;
            if cycles == 0 {
                warn!(
                    pc = self.cpu.regs.pc,
                    consumed,
                    "step consumed no cycles, stopping run"
                );
                break;
            }
            consumed += u64::from(cycles);
        }
        Ok(consumed)
    }

    /// Restarts the CPU. Memory is left as it is.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.mmu.read(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.mmu.write(addr, value);
    }

    /// Snapshot of the register file.
    pub const fn registers(&self) -> Registers {
        self.cpu.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.cpu.regs
    }

    pub const fn flags(&self) -> Flags {
        self.cpu.regs.flags()
    }

    pub const fn state(&self) -> CpuState {
        self.cpu.state()
    }

    pub const fn cycles(&self) -> u64 {
        self.cpu.get_cycles()
    }

    /// Header of the loaded ROM, read through the bus.
    pub fn header(&self) -> CartridgeHeader {
        CartridgeHeader::read(&self.mmu)
    }

    pub const fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub const fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }
}
