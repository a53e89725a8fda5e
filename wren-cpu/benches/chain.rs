use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wren_cpu::{EmptyDevice, Instruction, Memory, PrintWidth, Processor, Reg};

fn fibonacci(images: &mut [Memory]) -> u16 {
    let mut cpu = Processor::new();
    for mem in images.iter_mut() {
        cpu.process_with(mem, &mut EmptyDevice).unwrap();
    }
    cpu.registers().read(Reg::R1)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut init = wren_cpu::isa::assemble(
        &[
            Instruction::Load {
                reg: Reg::R1,
                addr: 0x10,
            },
            Instruction::Load {
                reg: Reg::R2,
                addr: 0x12,
            },
            Instruction::Halt,
        ],
        PrintWidth::Standard,
    )
    .unwrap();
    assert!(init.set_input(0, 1));
    assert!(init.set_input(1, 1));

    let mut prog = [
        Instruction::Add {
            a: Reg::R1,
            b: Reg::R2,
        },
        Instruction::Add {
            a: Reg::R2,
            b: Reg::R1,
        },
    ]
    .repeat(2);
    prog.push(Instruction::Halt);
    let step = wren_cpu::isa::assemble(&prog, PrintWidth::Standard).unwrap();

    let mut images = vec![init];
    images.extend(std::iter::repeat_n(step, 1000));
    c.bench_function("fib", |b| {
        b.iter_batched(
            || images.clone(),
            |mut images| fibonacci(black_box(&mut images)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
