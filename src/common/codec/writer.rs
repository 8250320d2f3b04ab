use super::Mode;
use crate::common::bitstream::BitStream;
use crate::common::charset::CharacterSet;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Version;

// Header
//------------------------------------------------------------------------------

pub fn push_eci(charset: CharacterSet, out: &mut BitStream) {
    out.push_bits(Mode::Eci.bits(), 4);
    out.push_bits(charset.eci_value(), 8);
}

pub fn push_mode_info(mode: Mode, out: &mut BitStream) {
    out.push_bits(mode.bits(), 4);
}

pub fn push_length_info(
    char_cnt: usize,
    mode: Mode,
    ver: Version,
    out: &mut BitStream,
) -> QRResult<()> {
    let len_bits = mode.char_cnt_bits(ver);
    let max = (1usize << len_bits) - 1;
    if char_cnt > max {
        return Err(QRError::LengthOverflow(format!(
            "{char_cnt} {mode} units exceed the {len_bits} bit count field of version {ver}"
        )));
    }
    out.push_bits(char_cnt as u16, len_bits);
    Ok(())
}


// Terminator & padding
//------------------------------------------------------------------------------

pub fn terminate_bits(data_bytes: usize, out: &mut BitStream) -> QRResult<()> {
    let capacity = data_bytes << 3;
    if out.len() > capacity {
        return Err(QRError::InternalConsistency(format!(
            "Data bits {} exceed capacity {capacity}",
            out.len()
        )));
    }

    push_terminator(capacity, out);
    push_padding_bits(out);
    push_padding_codewords(data_bytes, out);

    if out.len() != capacity {
        return Err(QRError::InternalConsistency(format!(
            "Padded bits {} do not match capacity {capacity}",
            out.len()
        )));
    }
    Ok(())
}

fn push_terminator(capacity: usize, out: &mut BitStream) {
    let term_len = std::cmp::min(4, capacity - out.len());
    out.push_bits(0u8, term_len);
}

fn push_padding_bits(out: &mut BitStream) {
    let offset = out.len() & 7;
    if offset > 0 {
        out.push_bits(0u8, 8 - offset);
    }
}

fn push_padding_codewords(data_bytes: usize, out: &mut BitStream) {
    debug_assert!(out.len() & 7 == 0, "Bit offset should be zero before padding codewords");

    let remain_bytes = data_bytes.saturating_sub(out.byte_len());
    PADDING_CODEWORDS.iter().copied().cycle().take(remain_bytes).for_each(|pc| {
        out.push_bits(pc, 8);
    });
}

#[cfg(test)]
mod writer_tests {
    use super::{push_padding_bits, push_padding_codewords, push_terminator, terminate_bits};
    use super::PADDING_CODEWORDS;
    use crate::common::bitstream::BitStream;
    use crate::common::error::ErrorKind;

    #[test]
    fn test_push_terminator() {
        let capacity = 19 << 3;
        let mut bs = BitStream::new();
        bs.push_bits(0b1u8, 1);
        push_terminator(capacity, &mut bs);
        assert_eq!(bs.data(), vec![0b10000000]);
        assert_eq!(bs.len() & 7, 5);
        let mut bs = BitStream::new();
        for _ in 0..18 {
            bs.push_bits(0b11111111u8, 8);
        }
        bs.push_bits(0b111111u8, 6);
        push_terminator(capacity, &mut bs);
        // Only two bits remain before capacity
        assert_eq!(bs.len(), capacity);
    }

    #[test]
    fn test_push_padding_bits() {
        let mut bs = BitStream::new();
        bs.push_bits(0b1u8, 1);
        push_padding_bits(&mut bs);
        assert_eq!(bs.data(), vec![0b10000000]);
        assert_eq!(bs.len() & 7, 0);
    }

    #[test]
    fn test_push_padding_codewords() {
        let mut bs = BitStream::new();
        bs.push_bits(0b1u8, 1);
        push_padding_bits(&mut bs);
        push_padding_codewords(19, &mut bs);
        let mut output = vec![0b10000000];
        output.extend(PADDING_CODEWORDS.iter().cycle().take(18));
        assert_eq!(bs.data(), output);
    }

    #[test]
    fn test_terminate_bits() {
        let mut bs = BitStream::new();
        bs.push_bits(0b0100_u8, 4);
        bs.push_bits(0b00000001_u8, 8);
        bs.push_bits(0b01100001_u8, 8);
        terminate_bits(6, &mut bs).unwrap();
        assert_eq!(bs.data(), [0b01000000, 0b00010110, 0b00010000, 0xEC, 0x11, 0xEC]);
    }

    #[test]
    fn test_terminate_full_capacity() {
        let mut bs = BitStream::from(&[0xAB; 4]);
        terminate_bits(4, &mut bs).unwrap();
        assert_eq!(bs.data(), [0xAB; 4]);
    }

    #[test]
    fn test_terminate_empty() {
        let mut bs = BitStream::new();
        terminate_bits(3, &mut bs).unwrap();
        assert_eq!(bs.data(), [0x00, 0xEC, 0x11]);
    }

    #[test]
    fn test_terminate_over_capacity() {
        let mut bs = BitStream::from(&[0xAB; 5]);
        let err = terminate_bits(4, &mut bs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalConsistency);
    }

    #[test]
    fn test_padding_grows_by_missing_bytes() {
        for missing in 1..8 {
            let mut bs = BitStream::from(&[0x12; 3]);
            terminate_bits(3 + missing, &mut bs).unwrap();
            assert_eq!(bs.byte_len(), 3 + missing);
            let pad = &bs.data()[4..];
            assert!(pad.iter().zip(PADDING_CODEWORDS.iter().cycle()).all(|(a, b)| a == b));
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
