pub mod bus;
pub mod cartridge;
pub mod catalog;
pub mod cpu;
pub mod interrupts;
pub mod machine;
pub mod mmu;

// Re-export common types
pub use bus::MemoryBus;
pub use cartridge::{CartridgeError, CartridgeHeader};
pub use catalog::{Catalog, CatalogError, Instruction};
pub use cpu::{Cpu, CpuError, CpuState, DispatchTable, Flags, Registers};
pub use interrupts::InterruptFlag;
pub use machine::{Machine, MachineError};
pub use mmu::{MapperControl, Mmu, NoMapper, Region};
