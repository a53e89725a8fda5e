use std::path::{Path, PathBuf};

use cpu::{
    Config, Device, Instruction, Memory, PrintWidth, Processor, Reg, isa,
    memory::{INPUT_ADDRS, OUTPUT_ADDR},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

/// Wren runner
///
/// Runs each memory image in turn on a single processor, then prints the
/// output word of the last one.  With no images, runs a built-in program.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Memory images to run, in order (raw binary, at most 20 bytes each)
    images: Vec<PathBuf>,

    /// Bytes to advance past a PRINT instruction
    #[clap(long, value_enum, default_value_t = PrintWidth::Standard)]
    print_width: PrintWidth,

    /// Only allow loads from the input words and stores to the output word
    #[clap(long)]
    strict: bool,

    /// Log every executed instruction
    #[clap(long)]
    trace: bool,
}

/// Device which prints to `stdout`
struct Stdout;
impl Device for Stdout {
    fn print(&mut self, value: u16) {
        println!("Out: {value}");
    }
}

/// Builds the three-image demo program, which leaves 21 in the output word
fn demo(print: PrintWidth) -> Result<Vec<Memory>> {
    let add = |a, b| Instruction::Add { a, b };
    let mut init = isa::assemble(
        &[
            Instruction::Load {
                reg: Reg::R1,
                addr: INPUT_ADDRS[0],
            },
            Instruction::Load {
                reg: Reg::R2,
                addr: INPUT_ADDRS[1],
            },
            add(Reg::R1, Reg::R2),
            add(Reg::R2, Reg::R1),
            Instruction::Halt,
        ],
        print,
    )?;
    for (slot, v) in [1, 2].into_iter().enumerate() {
        anyhow::ensure!(init.set_input(slot, v), "bad input slot {slot}");
    }

    let step = isa::assemble(
        &[
            add(Reg::R1, Reg::R2),
            add(Reg::R2, Reg::R1),
            add(Reg::R1, Reg::R2),
            add(Reg::R2, Reg::R1),
            Instruction::Halt,
        ],
        print,
    )?;

    let flush = isa::assemble(
        &[
            Instruction::Store {
                reg: Reg::R1,
                addr: OUTPUT_ADDR,
            },
            Instruction::Halt,
        ],
        print,
    )?;

    Ok(vec![init, step, flush])
}

fn load(path: &Path) -> Result<Memory> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read {path:?}"))?;
    Memory::from_bytes(&data).with_context(|| format!("bad image {path:?}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env = env_logger::Env::default()
        .filter_or("WREN_LOG", if args.trace { "trace" } else { "info" })
        .write_style_or("WREN_LOG", "always");
    env_logger::init_from_env(env);

    let mut images = if args.images.is_empty() {
        info!("no images given, running the demo program");
        demo(args.print_width)?
    } else {
        args.images.iter().map(|p| load(p)).collect::<Result<Vec<_>>>()?
    };

    let mut vm = Processor::with_config(Config {
        print_width: args.print_width,
        strict: args.strict,
    });
    for (i, mem) in images.iter_mut().enumerate() {
        let exit = vm
            .process_with(mem, &mut Stdout)
            .with_context(|| format!("image {i} failed"))?;
        debug!("image {i}: {exit:?}");
    }

    let Some(last) = images.last() else {
        anyhow::bail!("no images to run");
    };
    println!("Out: {}", last.flush_output());

    Ok(())
}
