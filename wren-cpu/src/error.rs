use thiserror::Error;

use crate::isa::Opcode;

/// Fatal conditions raised while building or running a memory image
///
/// Every variant ends the current pass; the processor's program counter is
/// reset before the error is handed back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The byte at the program counter is not a known opcode
    #[error("invalid instruction {opcode:#04x} at address {addr:#04x}")]
    InvalidInstruction {
        /// Offending opcode byte
        opcode: u8,
        /// Address it was fetched from
        addr: u8,
    },

    /// A memory access fell outside the 20-byte buffer
    #[error("address {addr:#04x} is out of bounds")]
    OutOfBounds {
        /// First address that could not be accessed
        addr: usize,
    },

    /// A register operand is not a general-purpose register
    #[error("invalid register {id:#04x}")]
    InvalidRegister {
        /// Offending register id
        id: u8,
    },

    /// Strict mode rejected a load or store outside its region
    #[error("{op} may not access address {addr:#04x} in strict mode")]
    InvalidAddress {
        /// Operation that made the access
        op: Opcode,
        /// Rejected address
        addr: u8,
    },

    /// A memory image was built from more bytes than fit in memory
    #[error("image is {len} bytes, but memory only holds 20")]
    ImageTooLarge {
        /// Length of the rejected image
        len: usize,
    },

    /// An assembled program runs past the instruction region
    #[error("program needs {len} bytes, but the instruction region holds 14")]
    ProgramTooLong {
        /// Bytes the program would occupy
        len: usize,
    },
}
