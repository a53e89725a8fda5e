#![no_main]

use cpu::{
    Config, EmptyDevice, Memory, PrintWidth, Processor, memory::MEMORY_SIZE,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the configuration, the rest are memory images
    let Some((&mode, data)) = data.split_first() else {
        return;
    };
    let mut vm = Processor::with_config(Config {
        print_width: if mode & 1 == 0 {
            PrintWidth::Standard
        } else {
            PrintWidth::Legacy
        },
        strict: mode & 2 != 0,
    });

    for chunk in data.chunks(MEMORY_SIZE) {
        let mut mem = Memory::from_bytes(chunk).unwrap();
        let before = mem;
        let out = vm.process_with(&mut mem, &mut EmptyDevice);
        if vm.registers().pc() != 0 {
            panic!("program counter not reset after {out:?}");
        }
        // In strict mode, only the output word can be written
        if vm.config().strict {
            for (i, (a, b)) in
                mem.as_bytes().iter().zip(before.as_bytes()).enumerate()
            {
                assert!(a == b || (0x0e..=0x0f).contains(&i), "{i:#04x}");
            }
        }
    }
});
