use std::fmt::Display;
use std::mem;

use num_traits::PrimInt;

use super::error::{QRError, QRResult};

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self { data: Vec::with_capacity((bit_capacity + 7) >> 3), len: 0 }
    }

    pub fn from(inp: &[u8]) -> Self {
        Self { data: inp.to_vec(), len: inp.len() << 3 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Number of bytes needed to hold every bit, including a partial last byte
    pub fn byte_len(&self) -> usize {
        (self.len + 7) >> 3
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.byte_len()]
    }

    pub fn get(&self, pos: usize) -> bool {
        debug_assert!(pos < self.len, "Out of bitstream bounds: Len {}, Pos {pos}", self.len);
        (self.data[pos >> 3] << (pos & 7)) & 0b10000000 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }
        self.len += 1;
    }

    // Appends the lowest `size` bits of `bits`, most significant first
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(size <= max_bits, "Bit count exceeds type width: Size {size}");
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );

        for i in (0..size).rev() {
            self.push((bits >> i) & T::one() == T::one());
        }
    }

    pub fn extend(&mut self, arr: &[u8]) {
        if self.len & 7 == 0 {
            self.data.truncate(self.len >> 3);
            self.data.extend_from_slice(arr);
            self.len += arr.len() << 3;
        } else {
            arr.iter().for_each(|b| self.push_bits(*b, 8));
        }
    }

    pub fn append(&mut self, other: &BitStream) {
        if other.len & 7 == 0 {
            self.extend(other.data());
        } else {
            other.iter().for_each(|b| self.push(b));
        }
    }
}


// Read bits from bit stream
//------------------------------------------------------------------------------

impl BitStream {
    // Copies `out.len()` bytes starting at `bit_offset`, which need not be aligned
    pub fn to_bytes(&self, bit_offset: usize, out: &mut [u8]) -> QRResult<()> {
        let end = bit_offset + (out.len() << 3);
        if end > self.len {
            return Err(QRError::InternalConsistency(format!(
                "Reading bits {bit_offset}..{end} past bitstream length {}",
                self.len
            )));
        }

        for (i, byte) in out.iter_mut().enumerate() {
            let start = bit_offset + (i << 3);
            *byte = (0..8).fold(0u8, |acc, j| (acc << 1) | self.get(start + j) as u8);
        }
        Ok(())
    }
}

#[cfg(test)]
mod bit_stream_read_tests {

    use super::BitStream;

    #[test]
    fn test_get_and_iter() {
        let bs = BitStream::from(&[0b10100000]);
        assert!(bs.get(0));
        assert!(!bs.get(1));
        assert!(bs.get(2));
        let bits: Vec<bool> = bs.iter().take(4).collect();
        assert_eq!(bits, vec![true, false, true, false]);
    }

    #[test]
    fn test_to_bytes() {
        let bs = BitStream::from(&[0x12, 0x34, 0x56]);
        let mut out = [0u8; 2];
        bs.to_bytes(8, &mut out).unwrap();
        assert_eq!(out, [0x34, 0x56]);
        bs.to_bytes(4, &mut out).unwrap();
        assert_eq!(out, [0x23, 0x45]);
    }

    #[test]
    fn test_to_bytes_past_end() {
        let bs = BitStream::from(&[0x12, 0x34]);
        let mut out = [0u8; 2];
        assert!(bs.to_bytes(4, &mut out).is_err());
    }
}
