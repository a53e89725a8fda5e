//! Memory image and the little-endian word codec
use static_assertions::const_assert_eq;
use zerocopy::byteorder::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::Error;

/// Total size of a memory image, in bytes
pub const MEMORY_SIZE: usize = 20;

/// Size of the instruction region at the start of memory
pub const PROGRAM_SIZE: usize = 14;

/// Last address from which an instruction may be fetched
pub const PROGRAM_END: u8 = 0x0d;

/// Address of the output word
pub const OUTPUT_ADDR: u8 = 0x0e;

/// Addresses of the two input words
pub const INPUT_ADDRS: [u8; 2] = [0x10, 0x12];

/// Splits a word into its `(low, high)` bytes
#[inline]
pub fn encode_word(value: u16) -> (u8, u8) {
    let [lo, hi] = value.to_le_bytes();
    (lo, hi)
}

/// Reads a little-endian word from `addr` and `addr + 1`
#[inline]
pub fn decode_word(mem: &Memory, addr: u8) -> Result<u16, Error> {
    let lo = mem.read_byte(addr)?;
    let hi = mem.read_at(usize::from(addr) + 1)?;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// Typed view of the memory regions
///
/// The regions are a convention of the programs that run on the processor;
/// nothing stops an instruction from touching any byte.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct MemoryLayout {
    /// Instruction bytes, `0x00..=0x0d`
    pub program: [u8; PROGRAM_SIZE],
    /// Output word at `0x0e`
    pub output: U16,
    /// Input words at `0x10` and `0x12`
    pub input: [U16; 2],
}

const_assert_eq!(core::mem::size_of::<MemoryLayout>(), MEMORY_SIZE);

/// A complete memory image, holding both a program and its data
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory([u8; MEMORY_SIZE]);

impl Memory {
    /// Builds a zero-filled memory image
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a memory image from raw bytes
    ///
    /// Images shorter than [`MEMORY_SIZE`] are padded with zeros.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() > MEMORY_SIZE {
            return Err(Error::ImageTooLarge { len: data.len() });
        }
        let mut out = Self::new();
        out.0[..data.len()].copy_from_slice(data);
        Ok(out)
    }

    /// Borrows the raw bytes of the image
    pub fn as_bytes(&self) -> &[u8; MEMORY_SIZE] {
        &self.0
    }

    /// Borrows the image as its regions
    pub fn layout(&self) -> &MemoryLayout {
        zerocopy::transmute_ref!(&self.0)
    }

    /// Mutably borrows the image as its regions
    pub fn layout_mut(&mut self) -> &mut MemoryLayout {
        zerocopy::transmute_mut!(&mut self.0)
    }

    #[inline]
    fn read_at(&self, addr: usize) -> Result<u8, Error> {
        self.0.get(addr).copied().ok_or(Error::OutOfBounds { addr })
    }

    #[inline]
    fn check(&self, addr: usize) -> Result<(), Error> {
        if addr < MEMORY_SIZE {
            Ok(())
        } else {
            Err(Error::OutOfBounds { addr })
        }
    }

    /// Reads a single byte
    #[inline]
    pub fn read_byte(&self, addr: u8) -> Result<u8, Error> {
        self.read_at(usize::from(addr))
    }

    /// Writes a single byte
    #[inline]
    pub fn write_byte(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        let i = usize::from(addr);
        self.check(i)?;
        self.0[i] = value;
        Ok(())
    }

    /// Loads the little-endian word at `addr`
    #[inline]
    pub fn load_word(&self, addr: u8) -> Result<u16, Error> {
        decode_word(self, addr)
    }

    /// Stores a little-endian word at `addr`
    ///
    /// Both addresses are checked before anything is written, so a failed
    /// store leaves memory untouched.
    #[inline]
    pub fn store_word(&mut self, addr: u8, value: u16) -> Result<(), Error> {
        let i = usize::from(addr);
        self.check(i)?;
        self.check(i + 1)?;
        let (lo, hi) = encode_word(value);
        self.0[i] = lo;
        self.0[i + 1] = hi;
        Ok(())
    }

    /// Returns the output word
    pub fn flush_output(&self) -> u16 {
        self.layout().output.get()
    }

    /// Returns one of the two input words
    pub fn input(&self, slot: usize) -> Option<u16> {
        self.layout().input.get(slot).map(|v| v.get())
    }

    /// Sets one of the two input words, returning `false` if `slot` is invalid
    #[must_use]
    pub fn set_input(&mut self, slot: usize, value: u16) -> bool {
        match self.layout_mut().input.get_mut(slot) {
            Some(v) => {
                v.set(value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn word_round_trip() {
        for v in 0..=u16::MAX {
            let (lo, hi) = encode_word(v);
            let mem = Memory::from_bytes(&[lo, hi]).unwrap();
            assert_eq!(decode_word(&mem, 0).unwrap(), v);
        }
    }

    #[test]
    fn codec_is_little_endian() {
        assert_eq!(encode_word(0x1234), (0x34, 0x12));
        assert_eq!(encode_word(300), (44, 1));
        let mem = Memory::from_bytes(&[0, 0, 0x01, 0x02]).unwrap();
        assert_eq!(mem.load_word(2).unwrap(), 0x0201);
    }

    #[test]
    fn bounds() {
        let mut mem = Memory::new();
        assert_eq!(mem.read_byte(0x13), Ok(0));
        assert_eq!(mem.read_byte(0x14), Err(Error::OutOfBounds { addr: 0x14 }));
        assert_eq!(
            mem.write_byte(0xff, 1),
            Err(Error::OutOfBounds { addr: 0xff })
        );
        assert_eq!(mem.load_word(0x12), Ok(0));
        assert_eq!(mem.load_word(0x13), Err(Error::OutOfBounds { addr: 0x14 }));
    }

    #[test]
    fn failed_store_writes_nothing() {
        let mut mem = Memory::from_bytes(&[0xaa; MEMORY_SIZE]).unwrap();
        let before = mem;
        assert_eq!(
            mem.store_word(0x13, 0x1234),
            Err(Error::OutOfBounds { addr: 0x14 })
        );
        assert_eq!(mem, before);
    }

    #[test]
    fn regions() {
        let mut mem = Memory::from_bytes(&[
            0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // program
            0x0d, 0x00, // output
            0x01, 0x00, 0x02, 0x00, // input
        ])
        .unwrap();
        assert_eq!(mem.flush_output(), 13);
        assert_eq!(mem.input(0), Some(1));
        assert_eq!(mem.input(1), Some(2));
        assert_eq!(mem.input(2), None);
        assert_eq!(mem.layout().program[0], 0xff);

        assert!(mem.set_input(1, 0xbeef));
        assert!(!mem.set_input(2, 0));
        assert_eq!(mem.as_bytes()[0x12..], [0xef, 0xbe]);
        mem.store_word(OUTPUT_ADDR, 21).unwrap();
        assert_eq!(mem.flush_output(), 21);
    }

    #[test]
    fn short_images_are_padded() {
        let mem = Memory::from_bytes(&[0x02, 0x01, 0x0e, 0xff]).unwrap();
        assert_eq!(mem.as_bytes()[..4], [0x02, 0x01, 0x0e, 0xff]);
        assert!(mem.as_bytes()[4..].iter().all(|&b| b == 0));

        let err = Memory::from_bytes(&[0; 21]).unwrap_err();
        assert_eq!(err, Error::ImageTooLarge { len: 21 });
    }
}
