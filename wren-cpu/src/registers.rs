//! Register file
use crate::Error;

/// Register id reserved for the program counter
pub const PC: u8 = 0x00;

/// First general-purpose register
pub const R1: u8 = 0x01;

/// Second general-purpose register
pub const R2: u8 = 0x02;

/// Number of registers, including the program counter
pub const REGISTER_COUNT: usize = 3;

/// A general-purpose register id, checked when an instruction is decoded
///
/// The program counter can never be wrapped in a `Reg`, so instructions that
/// take register operands can't clobber it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reg(u8);

impl Reg {
    /// First general-purpose register
    pub const R1: Reg = Reg(R1);
    /// Second general-purpose register
    pub const R2: Reg = Reg(R2);

    /// Checks that `id` names a general-purpose register
    pub fn new(id: u8) -> Result<Self, Error> {
        match id {
            R1 | R2 => Ok(Reg(id)),
            _ => Err(Error::InvalidRegister { id }),
        }
    }

    /// Returns the raw register id
    pub fn id(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for Reg {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Fixed set of 16-bit registers
///
/// Id [`PC`] holds the program counter; the rest are general-purpose.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    data: [u16; REGISTER_COUNT],
}

impl Registers {
    /// Builds a register file with every register cleared
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register by raw id
    pub fn get(&self, id: u8) -> Result<u16, Error> {
        self.data
            .get(usize::from(id))
            .copied()
            .ok_or(Error::InvalidRegister { id })
    }

    /// Writes a register by raw id
    pub fn set(&mut self, id: u8, value: u16) -> Result<(), Error> {
        let r = self
            .data
            .get_mut(usize::from(id))
            .ok_or(Error::InvalidRegister { id })?;
        *r = value;
        Ok(())
    }

    /// Reads a general-purpose register
    #[inline]
    pub fn read(&self, r: Reg) -> u16 {
        self.data[usize::from(r.0)]
    }

    /// Writes a general-purpose register
    #[inline]
    pub fn write(&mut self, r: Reg, value: u16) {
        self.data[usize::from(r.0)] = value;
    }

    /// Returns the program counter
    #[inline]
    pub fn pc(&self) -> u16 {
        self.data[usize::from(PC)]
    }

    /// Sets the program counter
    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.data[usize::from(PC)] = value;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn raw_access() {
        let mut regs = Registers::new();
        regs.set(R1, 3).unwrap();
        regs.set(R2, 5).unwrap();
        regs.set(PC, 9).unwrap();
        assert_eq!(regs.get(R1), Ok(3));
        assert_eq!(regs.get(R2), Ok(5));
        assert_eq!(regs.get(PC), Ok(9));
        assert_eq!(regs.pc(), 9);

        assert_eq!(regs.get(3), Err(Error::InvalidRegister { id: 3 }));
        assert_eq!(regs.set(0xff, 1), Err(Error::InvalidRegister { id: 0xff }));
    }

    #[test]
    fn general_purpose_only() {
        assert_eq!(Reg::new(PC), Err(Error::InvalidRegister { id: PC }));
        assert_eq!(Reg::new(3), Err(Error::InvalidRegister { id: 3 }));
        assert_eq!(Reg::new(R2), Ok(Reg::R2));

        let mut regs = Registers::new();
        regs.write(Reg::R1, 0xabcd);
        assert_eq!(regs.read(Reg::R1), 0xabcd);
        assert_eq!(regs.pc(), 0);
        assert_eq!(Reg::R2.to_string(), "r2");
    }
}
