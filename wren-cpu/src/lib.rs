//! Twenty-byte instruction-set simulator
//!
//! A [`Memory`] image holds a short program followed by its output and input
//! words.  A [`Processor`] runs the fetch-decode-execute loop over one image
//! at a time; its general-purpose registers carry over from one image to the
//! next, so a longer program can be split across several images.
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use log::{debug, info, trace};

mod error;
pub mod isa;
pub mod memory;
pub mod registers;

pub use error::Error;
pub use isa::{Instruction, Opcode, PrintWidth};
pub use memory::Memory;
pub use registers::{Reg, Registers};

use memory::{INPUT_ADDRS, OUTPUT_ADDR, PROGRAM_END};

/// Trait for whatever observes `PRINT` instructions
pub trait Device {
    /// Called with the output word each time a `PRINT` executes
    fn print(&mut self, value: u16);
}

/// Device which does nothing
pub struct EmptyDevice;
impl Device for EmptyDevice {
    fn print(&mut self, _value: u16) {
        // nothing to do here
    }
}

/// Device which writes each printed value to the log
pub struct LogDevice;
impl Device for LogDevice {
    fn print(&mut self, value: u16) {
        info!("Out: {value}");
    }
}

/// Processor configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Bytes to advance past a `PRINT`
    pub print_width: PrintWidth,

    /// Restrict `LOAD` to the input words and `STORE` to the output word
    pub strict: bool,
}

/// Reason a pass ended successfully
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    /// A `HALT` instruction was executed
    Halted,
    /// The program counter ran past the instruction region
    EndOfProgram,
}

/// The processor itself
///
/// The register file lives here and outlives any single memory image.
#[derive(Debug, Default)]
pub struct Processor {
    regs: Registers,
    config: Config,
}

impl Processor {
    /// Builds a processor with default configuration and cleared registers
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a processor with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            regs: Registers::new(),
            config,
        }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared borrow of the register file
    #[inline]
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Mutable borrow of the register file
    #[inline]
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Runs a single pass over `mem`, logging anything printed
    pub fn process(&mut self, mem: &mut Memory) -> Result<Exit, Error> {
        self.process_with(mem, &mut LogDevice)
    }

    /// Runs a single pass over `mem`, sending printed values to `dev`
    ///
    /// The program counter is reset to 0 when the pass ends, whether it ends
    /// normally or with an error.
    pub fn process_with<D: Device>(
        &mut self,
        mem: &mut Memory,
        dev: &mut D,
    ) -> Result<Exit, Error> {
        debug!("starting pass at {:#04x}", self.regs.pc());
        let out = self.run(mem, dev);
        let pc = self.regs.pc();
        match &out {
            Ok(exit) => debug!("pass ended at {pc:#04x}: {exit:?}"),
            Err(e) => debug!("pass aborted at {pc:#04x}: {e}"),
        }
        self.regs.set_pc(0);
        out
    }

    /// Runs the fetch-decode-execute loop until it halts or falls off the end
    fn run<D: Device>(
        &mut self,
        mem: &mut Memory,
        dev: &mut D,
    ) -> Result<Exit, Error> {
        loop {
            let pc = self.regs.pc();
            if pc > u16::from(PROGRAM_END) {
                return Ok(Exit::EndOfProgram);
            }
            let pc = pc as u8;
            let i = Instruction::decode(mem, pc)?;
            trace!("{pc:#04x}: {i}");
            if !self.op(i, mem, dev)? {
                return Ok(Exit::Halted);
            }
            let next = pc.wrapping_add(i.width(self.config.print_width));
            self.regs.set_pc(u16::from(next));
        }
    }

    /// Executes a single instruction
    ///
    /// Returns `false` if the pass should stop
    #[inline]
    fn op<D: Device>(
        &mut self,
        i: Instruction,
        mem: &mut Memory,
        dev: &mut D,
    ) -> Result<bool, Error> {
        match i {
            Instruction::Load { reg, addr } => {
                self.check_addr(Opcode::Load, addr)?;
                op::load(&mut self.regs, mem, reg, addr)?;
            }
            Instruction::Store { reg, addr } => {
                self.check_addr(Opcode::Store, addr)?;
                op::store(&self.regs, mem, reg, addr)?;
            }
            Instruction::Add { a, b } => op::add(&mut self.regs, a, b),
            Instruction::Sub { a, b } => op::sub(&mut self.regs, a, b),
            Instruction::Print => op::print(mem, dev),
            Instruction::Halt => return Ok(false),
        }
        Ok(true)
    }

    /// In strict mode, checks that a load or store stays within its region
    fn check_addr(&self, op: Opcode, addr: u8) -> Result<(), Error> {
        if !self.config.strict {
            return Ok(());
        }
        let ok = match op {
            Opcode::Load => INPUT_ADDRS.contains(&addr),
            Opcode::Store => addr == OUTPUT_ADDR,
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidAddress { op, addr })
        }
    }
}

mod op {
    use super::*;

    /// Load
    ///
    /// ```text
    /// LOAD reg addr
    /// ```
    ///
    /// Reads the little-endian word at `addr` into `reg`.
    #[inline]
    pub fn load(
        regs: &mut Registers,
        mem: &Memory,
        reg: Reg,
        addr: u8,
    ) -> Result<(), Error> {
        let v = mem.load_word(addr)?;
        regs.write(reg, v);
        Ok(())
    }

    /// Store
    ///
    /// ```text
    /// STORE reg addr
    /// ```
    ///
    /// Writes `reg` to `addr` and `addr + 1`, low byte first.
    #[inline]
    pub fn store(
        regs: &Registers,
        mem: &mut Memory,
        reg: Reg,
        addr: u8,
    ) -> Result<(), Error> {
        mem.store_word(addr, regs.read(reg))
    }

    /// Add
    ///
    /// ```text
    /// ADD a b      ( a = a + b )
    /// ```
    #[inline]
    pub fn add(regs: &mut Registers, a: Reg, b: Reg) {
        let v = regs.read(a).wrapping_add(regs.read(b));
        regs.write(a, v);
    }

    /// Subtract
    ///
    /// ```text
    /// SUB a b      ( a = a - b )
    /// ```
    #[inline]
    pub fn sub(regs: &mut Registers, a: Reg, b: Reg) {
        let v = regs.read(a).wrapping_sub(regs.read(b));
        regs.write(a, v);
    }

    /// Print
    ///
    /// Hands the output word at `0x0e` to the device.
    #[inline]
    pub fn print<D: Device>(mem: &Memory, dev: &mut D) {
        dev.print(mem.flush_output());
    }
}
