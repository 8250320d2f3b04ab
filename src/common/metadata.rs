use std::fmt::{Display, Formatter};
use std::ops::Deref;

use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    // Two bit indicator written into the format information
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

// Error correction blocks
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ECBlocks {
    pub ecc_per_block: usize,
    pub num_blocks: usize,
}

impl ECBlocks {
    pub fn total_ec_codewords(&self) -> usize {
        self.ecc_per_block * self.num_blocks
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(version: usize) -> QRResult<Self> {
        if !(1..=40).contains(&version) {
            return Err(QRError::InvalidVersion(format!(
                "version must be within 1..=40, got {version}"
            )));
        }
        Ok(Self(version))
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    // Number of modules available for data & ecc after all function patterns
    // and format/version info are excluded
    fn raw_data_modules(self) -> usize {
        let v = self.0;
        let mut res = (16 * v + 128) * v + 64;
        if v >= 2 {
            let align_cnt = v / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if v >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ec_blocks(self, ecl: ECLevel) -> ECBlocks {
        let i = self.0 - 1;
        let l = ecl as usize;
        ECBlocks {
            ecc_per_block: ECC_CODEWORDS_PER_BLOCK[l][i] as usize,
            num_blocks: NUM_ERROR_CORRECTION_BLOCKS[l][i] as usize,
        }
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ec_blocks(ecl).total_ec_codewords()
    }

    // Centre coordinates shared by rows and columns of the alignment patterns
    pub fn alignment_pattern(self) -> Vec<usize> {
        let v = self.0;
        if v == 1 {
            return Vec::new();
        }
        let align_cnt = v / 7 + 2;
        let step = (v * 8 + align_cnt * 3 + 5) / (align_cnt * 4 - 4) * 2;
        let last = self.width() - 7;
        let mut res: Vec<usize> = (0..align_cnt - 1).map(|i| last - i * step).collect();
        res.push(6);
        res.reverse();
        res
    }

    // 18 bit version information, only present from version 7 onwards
    pub fn info(self) -> Option<u32> {
        if self.0 < 7 {
            return None;
        }
        let v = self.0 as u32;
        Some((v << 12) | bch_code(v, VERSION_INFO_POLY))
    }
}


// Format information
//------------------------------------------------------------------------------

pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let info = (ecl.format_bits() << 3) | *mask as u32;
    ((info << 10) | bch_code(info, FORMAT_INFO_POLY)) ^ FORMAT_MASK
}

// Remainder of value * x^(deg poly) divided by the generator polynomial
fn bch_code(value: u32, poly: u32) -> u32 {
    let poly_len = u32::BITS - poly.leading_zeros();
    let mut value = value << (poly_len - 1);
    loop {
        let value_len = u32::BITS - value.leading_zeros();
        if value_len < poly_len {
            return value;
        }
        value ^= poly << (value_len - poly_len);
    }
}


// Global constants
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

const FORMAT_INFO_POLY: u32 = 0x537;

const FORMAT_MASK: u32 = 0x5412;

const VERSION_INFO_POLY: u32 = 0x1F25;

// Index: [ec_level][version - 1]
static ECC_CODEWORDS_PER_BLOCK: [[u8; 40]; 4] = [
    [
        7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

// Index: [ec_level][version - 1]
static NUM_ERROR_CORRECTION_BLOCKS: [[u8; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
