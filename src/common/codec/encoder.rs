use tracing::debug;

use super::mode::alphanumeric_code;
use super::writer::{push_eci, push_length_info, push_mode_info};
use super::Mode;
use crate::common::bitstream::BitStream;
use crate::common::charset::CharacterSet;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::{ECLevel, Version};

// Segment
//------------------------------------------------------------------------------

// Payload bits of the content in a single mode, without the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub mode: Mode,
    // Present when byte data is written in a non default character set
    pub eci: Option<CharacterSet>,
    // Characters for numeric, alphanumeric & kanji, bytes for byte mode
    pub char_cnt: usize,
    pub data: BitStream,
}

impl Segment {
    pub fn header_bit_len(&self, ver: Version) -> usize {
        let eci_len = if self.eci.is_some() { 12 } else { 0 };
        eci_len + 4 + self.mode.char_cnt_bits(ver)
    }

    pub fn bit_len(&self, ver: Version) -> usize {
        self.header_bit_len(ver) + self.data.len()
    }

    pub fn push_header(&self, ver: Version, out: &mut BitStream) -> QRResult<()> {
        if let Some(charset) = self.eci {
            push_eci(charset, out);
        }
        push_mode_info(self.mode, out);
        push_length_info(self.char_cnt, self.mode, ver, out)
    }
}

// The character set name is only resolved strictly when byte data is transcoded
pub fn encode_segment(content: &str, charset_name: Option<&str>) -> QRResult<Segment> {
    let hint = charset_name.and_then(|name| CharacterSet::from_name(name).ok());
    let mode = choose_mode(content, hint);
    let charset = match charset_name {
        Some(name) if mode == Mode::Byte => CharacterSet::from_name(name)?,
        _ => hint.unwrap_or(CharacterSet::DEFAULT),
    };
    debug!(%mode, %charset, "Selected encoding mode");

    let mut data = BitStream::new();
    let char_cnt = push_data(content, mode, charset, &mut data)?;
    let eci = (mode == Mode::Byte && charset != CharacterSet::DEFAULT).then_some(charset);
    Ok(Segment { mode, eci, char_cnt, data })
}

// Mode selection
//------------------------------------------------------------------------------

pub fn choose_mode(content: &str, charset: Option<CharacterSet>) -> Mode {
    if charset == Some(CharacterSet::ShiftJis) {
        return if is_only_double_byte_kanji(content) { Mode::Kanji } else { Mode::Byte };
    }

    let mut has_numeric = false;
    let mut has_alphanumeric = false;
    for c in content.chars() {
        if c.is_ascii_digit() {
            has_numeric = true;
        } else if alphanumeric_code(c).is_some() {
            has_alphanumeric = true;
        } else {
            return Mode::Byte;
        }
    }
    if has_alphanumeric {
        Mode::Alphanumeric
    } else if has_numeric {
        Mode::Numeric
    } else {
        Mode::Byte
    }
}

// A failed transcode only means the content is not kanji
fn is_only_double_byte_kanji(content: &str) -> bool {
    let Ok(bytes) = CharacterSet::ShiftJis.encode(content) else {
        return false;
    };
    bytes.len() & 1 == 0
        && bytes.chunks(2).all(|pair| matches!(pair[0], 0x81..=0x9F | 0xE0..=0xEB))
}


// Payload
//------------------------------------------------------------------------------

// Returns the unit count written into the length field
pub fn push_data(
    content: &str,
    mode: Mode,
    charset: CharacterSet,
    out: &mut BitStream,
) -> QRResult<usize> {
    match mode {
        Mode::Numeric => push_numeric_data(content, out),
        Mode::Alphanumeric => push_alphanumeric_data(content, out),
        Mode::Byte => {
            let bytes = charset.encode(content)?;
            push_byte_data(&bytes, out);
            Ok(bytes.len())
        }
        Mode::Kanji => push_kanji_data(content, out),
        Mode::Eci => Err(QRError::InternalConsistency("ECI carries no payload".to_string())),
    }
}

fn push_numeric_data(content: &str, out: &mut BitStream) -> QRResult<usize> {
    let digits = content
        .chars()
        .map(|c| {
            c.to_digit(10).map(|d| d as u16).ok_or_else(|| {
                QRError::InvalidCharacter(format!("{c:?} is not a numeric digit"))
            })
        })
        .collect::<QRResult<Vec<u16>>>()?;

    for chunk in digits.chunks(3) {
        let len = (chunk.len() * 10).div_ceil(3);
        let value = chunk.iter().fold(0u16, |n, d| n * 10 + d);
        out.push_bits(value, len);
    }
    Ok(digits.len())
}

fn push_alphanumeric_data(content: &str, out: &mut BitStream) -> QRResult<usize> {
    let codes = content
        .chars()
        .map(|c| {
            alphanumeric_code(c).ok_or_else(|| {
                QRError::InvalidCharacter(format!("{c:?} is not in the alphanumeric table"))
            })
        })
        .collect::<QRResult<Vec<u16>>>()?;

    for chunk in codes.chunks(2) {
        let len = (chunk.len() * 11).div_ceil(2);
        let value = chunk.iter().fold(0u16, |n, c| n * 45 + c);
        out.push_bits(value, len);
    }
    Ok(codes.len())
}

fn push_byte_data(bytes: &[u8], out: &mut BitStream) {
    for b in bytes {
        out.push_bits(*b, 8);
    }
}

fn push_kanji_data(content: &str, out: &mut BitStream) -> QRResult<usize> {
    let bytes = CharacterSet::ShiftJis.encode(content)?;
    if bytes.len() & 1 != 0 {
        return Err(QRError::InvalidCharacter(format!(
            "Kanji data has odd byte length {}",
            bytes.len()
        )));
    }

    for pair in bytes.chunks(2) {
        let code = ((pair[0] as u16) << 8) | pair[1] as u16;
        let sub = match code {
            0x8140..=0x9FFC => code - 0x8140,
            0xE040..=0xEBBF => code - 0xC140,
            _ => {
                return Err(QRError::InvalidCharacter(format!(
                    "Shift JIS code {code:#06X} is outside the kanji ranges"
                )))
            }
        };
        out.push_bits((sub >> 8) * 0xC0 + (sub & 0xFF), 13);
    }
    Ok(bytes.len() >> 1)
}


// Version selection
//------------------------------------------------------------------------------

// First version, in ascending order, whose data codewords hold the whole segment
pub fn find_version(seg: &Segment, ecl: ECLevel) -> QRResult<Version> {
    for ver in Version::all() {
        let required = seg.bit_len(ver).div_ceil(8);
        if ver.data_codewords(ecl) >= required {
            debug!(version = *ver, ecl = %ecl, required_bytes = required, "Selected version");
            return Ok(ver);
        }
    }
    Err(QRError::CapacityExceeded(format!(
        "{} data bits exceed the capacity of version 40 at level {ecl}",
        seg.data.len()
    )))
}

pub fn check_fits(seg: &Segment, ver: Version, ecl: ECLevel) -> QRResult<()> {
    let required = seg.bit_len(ver).div_ceil(8);
    let available = ver.data_codewords(ecl);
    if required > available {
        return Err(QRError::CapacityExceeded(format!(
            "{required} bytes required, version {ver} at level {ecl} holds {available}"
        )));
    }
    Ok(())
}
