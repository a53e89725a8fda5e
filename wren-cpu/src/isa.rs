//! Instruction set
//!
//! Every instruction is an opcode byte followed by two operand bytes.  The
//! operand bytes are a register id or a memory address, depending on the
//! opcode, or ignored entirely.
//!
//! | Opcode | Mnemonic | Operands       |
//! |--------|----------|----------------|
//! | `0x01` | `LOAD`   | `reg addr`     |
//! | `0x02` | `STORE`  | `reg addr`     |
//! | `0x03` | `ADD`    | `reg reg`      |
//! | `0x04` | `SUB`    | `reg reg`      |
//! | `0x05` | `PRINT`  |                |
//! | `0xff` | `HALT`   |                |
use crate::{
    Error,
    memory::{MEMORY_SIZE, Memory, PROGRAM_SIZE},
    registers::Reg,
};

/// Standard instruction width, in bytes
pub const INSTRUCTION_WIDTH: u8 = 3;

/// Number of bytes the program counter advances past a `PRINT`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PrintWidth {
    /// Three bytes, like every other instruction
    #[default]
    Standard,
    /// One byte, for instruction streams that pack `PRINT` as a lone opcode
    Legacy,
}

impl PrintWidth {
    /// Width in bytes
    pub fn bytes(self) -> u8 {
        match self {
            PrintWidth::Standard => INSTRUCTION_WIDTH,
            PrintWidth::Legacy => 1,
        }
    }
}

/// Operation selected by an opcode byte
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Load a word from memory into a register
    Load = 0x01,
    /// Store a register into memory
    Store = 0x02,
    /// Add the second register to the first
    Add = 0x03,
    /// Subtract the second register from the first
    Sub = 0x04,
    /// Emit the output word
    Print = 0x05,
    /// Stop the current pass
    Halt = 0xff,
}

impl Opcode {
    /// Every opcode, in table order
    pub const ALL: [Opcode; 6] = [
        Opcode::Load,
        Opcode::Store,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Print,
        Opcode::Halt,
    ];

    /// Looks up an opcode byte
    pub fn from_byte(b: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| *op as u8 == b)
    }

    /// Assembly mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Print => "PRINT",
            Opcode::Halt => "HALT",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;
    fn try_from(b: u8) -> Result<Self, u8> {
        Self::from_byte(b).ok_or(b)
    }
}

impl core::fmt::Display for Opcode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A decoded instruction, with operands checked against their kinds
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `reg = mem[addr]`
    Load {
        /// Destination register
        reg: Reg,
        /// Address of the low byte
        addr: u8,
    },
    /// `mem[addr] = reg`
    Store {
        /// Source register
        reg: Reg,
        /// Address of the low byte
        addr: u8,
    },
    /// `a = a + b`, wrapping
    Add {
        /// Destination and first operand
        a: Reg,
        /// Second operand
        b: Reg,
    },
    /// `a = a - b`, wrapping
    Sub {
        /// Destination and first operand
        a: Reg,
        /// Second operand
        b: Reg,
    },
    /// Emit the output word
    Print,
    /// Stop the pass
    Halt,
}

impl Instruction {
    /// Decodes the instruction at `addr`
    ///
    /// Operand bytes are only read if the opcode uses them.  Nothing is
    /// executed here, so a decode failure happens before any state changes.
    pub fn decode(mem: &Memory, addr: u8) -> Result<Self, Error> {
        let b = mem.read_byte(addr)?;
        let op = Opcode::try_from(b)
            .map_err(|opcode| Error::InvalidInstruction { opcode, addr })?;
        let arg = |i: u8| -> Result<u8, Error> {
            let a = usize::from(addr) + usize::from(i);
            match u8::try_from(a) {
                Ok(a) => mem.read_byte(a),
                Err(_) => Err(Error::OutOfBounds { addr: a }),
            }
        };
        let out = match op {
            Opcode::Load => Instruction::Load {
                reg: Reg::new(arg(1)?)?,
                addr: arg(2)?,
            },
            Opcode::Store => Instruction::Store {
                reg: Reg::new(arg(1)?)?,
                addr: arg(2)?,
            },
            Opcode::Add => Instruction::Add {
                a: Reg::new(arg(1)?)?,
                b: Reg::new(arg(2)?)?,
            },
            Opcode::Sub => Instruction::Sub {
                a: Reg::new(arg(1)?)?,
                b: Reg::new(arg(2)?)?,
            },
            Opcode::Print => Instruction::Print,
            Opcode::Halt => Instruction::Halt,
        };
        Ok(out)
    }

    /// Returns this instruction's opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Load { .. } => Opcode::Load,
            Instruction::Store { .. } => Opcode::Store,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Print => Opcode::Print,
            Instruction::Halt => Opcode::Halt,
        }
    }

    /// Encodes to three bytes, with unused operands set to zero
    pub fn encode(&self) -> [u8; 3] {
        let op = self.opcode() as u8;
        match *self {
            Instruction::Load { reg, addr }
            | Instruction::Store { reg, addr } => [op, reg.id(), addr],
            Instruction::Add { a, b } | Instruction::Sub { a, b } => {
                [op, a.id(), b.id()]
            }
            Instruction::Print | Instruction::Halt => [op, 0, 0],
        }
    }

    /// Number of bytes this instruction occupies in an instruction stream
    ///
    /// `HALT` ends the pass, so only its opcode byte is ever read.
    pub fn width(&self, print: PrintWidth) -> u8 {
        match self {
            Instruction::Print => print.bytes(),
            Instruction::Halt => 1,
            _ => INSTRUCTION_WIDTH,
        }
    }
}

impl core::fmt::Display for Instruction {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let op = self.opcode();
        match self {
            Instruction::Load { reg, addr }
            | Instruction::Store { reg, addr } => {
                write!(f, "{op} {reg} {addr:#04x}")
            }
            Instruction::Add { a, b } | Instruction::Sub { a, b } => {
                write!(f, "{op} {a} {b}")
            }
            Instruction::Print | Instruction::Halt => write!(f, "{op}"),
        }
    }
}

/// Lays out a program at the start of a fresh memory image
///
/// Each instruction is placed where the processor will fetch it, given the
/// `PRINT` width in use.  Input and output words are left at zero.
pub fn assemble(
    program: &[Instruction],
    print: PrintWidth,
) -> Result<Memory, Error> {
    let mut bytes = [0u8; MEMORY_SIZE];
    let mut pos = 0;
    for i in program {
        let n = usize::from(i.width(print));
        let end = pos + n;
        if end > PROGRAM_SIZE {
            let len = program.iter().map(|i| usize::from(i.width(print))).sum();
            return Err(Error::ProgramTooLong { len });
        }
        bytes[pos..end].copy_from_slice(&i.encode()[..n]);
        pos = end;
    }
    Memory::from_bytes(&bytes)
}
