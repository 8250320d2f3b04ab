use std::fmt::{Display, Formatter};

use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
}

impl Mode {
    // 4 bit mode indicator
    pub fn bits(self) -> u8 {
        self as u8
    }

    // Width of the character count field. ECI has no count field.
    pub fn char_cnt_bits(self, ver: Version) -> usize {
        let tier = match *ver {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Self::Numeric => [10, 12, 14][tier],
            Self::Alphanumeric => [9, 11, 13][tier],
            Self::Byte => [8, 16, 16][tier],
            Self::Kanji => [8, 10, 12][tier],
            Self::Eci => 0,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Numeric => "Numeric",
            Self::Alphanumeric => "Alphanumeric",
            Self::Byte => "Byte",
            Self::Kanji => "Kanji",
            Self::Eci => "ECI",
        };
        f.write_str(s)
    }
}

// Value of a character in the 45 symbol alphanumeric table
pub fn alphanumeric_code(c: char) -> Option<u16> {
    let code = match c {
        '0'..='9' => c as u16 - '0' as u16,
        'A'..='Z' => c as u16 - 'A' as u16 + 10,
        ' ' => 36,
        '$' => 37,
        '%' => 38,
        '*' => 39,
        '+' => 40,
        '-' => 41,
        '.' => 42,
        '/' => 43,
        ':' => 44,
        _ => return None,
    };
    Some(code)
}
