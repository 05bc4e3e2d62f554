// Step-loop throughput. Setup panics on error, as is usual for criterion
// benches: a missing catalog means there is nothing to measure.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dmg_core::catalog::Catalog;
use dmg_core::cpu::{Cpu, DispatchTable};
use dmg_core::mmu::Mmu;
use dmg_core::Machine;
use std::sync::Arc;

fn dispatch() -> Arc<DispatchTable> {
    let json = include_str!("../data/opcodes.json");
    let catalog = Catalog::from_json_str(json).expect("catalog parses");
    Arc::new(DispatchTable::build(Arc::new(catalog)))
}

fn rom_with(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0; 0x8000];
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn single_step(cpu: &mut Cpu, mmu: &mut Mmu) -> u32 {
    cpu.regs.pc = 0x0100;
    cpu.step(mmu).expect("bench opcode is legal")
}

fn cpu_step_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("CPU Operations");
    group.sample_size(100);
    let dispatch = dispatch();

    for (name, program) in [
        ("NOP instruction", &[0x00][..]),
        ("LD r,r instructions", &[0x7F][..]),
        ("ADD A,r instructions", &[0x87][..]),
        ("INC (HL)", &[0x34][..]),
        ("CB BIT 7,H", &[0xCB, 0x7C][..]),
    ] {
        let mut cpu = Cpu::new(Arc::clone(&dispatch));
        let mut mmu = Mmu::new();
        mmu.load_rom(&rom_with(program));
        cpu.regs.set_hl(0xC000);
        group.bench_function(name, |b| {
            b.iter(|| black_box(single_step(&mut cpu, &mut mmu)));
        });
    }

    group.finish();
}

fn machine_run_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Machine");
    let dispatch = dispatch();
    // Tight DEC/JR loop that never ends
    let rom = rom_with(&[0x05, 0x20, 0xFD, 0x18, 0xFB]);

    group.bench_function("run 70224 cycles", |b| {
        b.iter(|| {
            let mut machine = Machine::with_dispatch(Arc::clone(&dispatch), &rom);
            black_box(machine.run_cycles(70_224).expect("loop is legal"))
        });
    });

    group.finish();
}

criterion_group!(benches, cpu_step_benchmark, machine_run_benchmark);
criterion_main!(benches);
