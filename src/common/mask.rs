use std::fmt::{Display, Formatter};
use std::ops::Deref;

use tracing::trace;

use super::bitstream::BitStream;
use super::error::{QRError, QRResult};
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskPattern(format!(
                "mask pattern must be within 0..=7, got {pattern}"
            )));
        }
        Ok(Self(pattern))
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// x is the column & y is the row of the module
mod mask_functions {
    pub fn checkerboard(x: usize, y: usize) -> bool {
        (x + y) & 1 == 0
    }

    pub fn horizontal_lines(_: usize, y: usize) -> bool {
        y & 1 == 0
    }

    pub fn vertical_lines(x: usize, _: usize) -> bool {
        x % 3 == 0
    }

    pub fn diagonal_lines(x: usize, y: usize) -> bool {
        (x + y) % 3 == 0
    }

    pub fn large_checkerboard(x: usize, y: usize) -> bool {
        ((y >> 1) + (x / 3)) & 1 == 0
    }

    pub fn fields(x: usize, y: usize) -> bool {
        ((x * y) & 1) + ((x * y) % 3) == 0
    }

    pub fn diamonds(x: usize, y: usize) -> bool {
        (((x * y) & 1) + ((x * y) % 3)) & 1 == 0
    }

    pub fn meadow(x: usize, y: usize) -> bool {
        (((x + y) & 1) + ((x * y) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(usize, usize) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Mask pattern is validated on construction"),
        }
    }
}

#[cfg(test)]
mod mask_pattern_tests {
    use super::MaskPattern;

    #[test]
    fn test_new() {
        assert!(MaskPattern::new(7).is_ok());
        assert!(MaskPattern::new(8).is_err());
        assert_eq!(MaskPattern::all().count(), 8);
    }

    #[test]
    fn test_mask_functions() {
        let m = |p| MaskPattern::new(p).unwrap().mask_function();
        assert!(m(0)(0, 0));
        assert!(!m(0)(1, 0));
        assert!(m(1)(5, 2));
        assert!(!m(1)(5, 3));
        assert!(m(2)(3, 1));
        assert!(!m(2)(4, 1));
        assert!(m(3)(1, 2));
        assert!(m(4)(0, 0));
        assert!(!m(4)(3, 0));
        assert!(m(5)(6, 1));
        assert!(!m(5)(1, 1));
        assert!(m(6)(2, 1));
        assert!(m(7)(0, 0));
        assert!(!m(7)(1, 0));
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Every trial rebuilds `qr` from scratch, so after this returns the grid holds
// the last trial's placement. Callers must rebuild with the returned mask.
pub fn select_mask(payload: &BitStream, qr: &mut QR) -> QRResult<(MaskPattern, u32)> {
    let mut best: Option<(MaskPattern, u32)> = None;
    for mask in MaskPattern::all() {
        qr.build(payload, mask)?;
        let pen = compute_total_penalty(qr);
        trace!(mask = *mask, penalty = pen, "Evaluated mask pattern");
        if best.map_or(true, |(_, best_pen)| pen < best_pen) {
            best = Some((mask, pen));
        }
    }
    best.ok_or_else(|| QRError::InternalConsistency("No mask pattern was evaluated".to_string()))
}

// Penalty rules
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    compute_adjacent_penalty(qr)
        + compute_block_penalty(qr)
        + compute_finder_pattern_penalty(qr)
        + compute_balance_penalty(qr)
}

// Rule 1: runs of 5 or more same coloured modules in a row or column
pub fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let run_penalty = |get: &dyn Fn(i16) -> bool| {
        let mut pen = 0;
        let mut run = 1;
        for i in 1..w {
            if get(i) == get(i - 1) {
                run += 1;
                continue;
            }
            if run >= 5 {
                pen += PENALTY_N1 + (run - 5);
            }
            run = 1;
        }
        if run >= 5 {
            pen += PENALTY_N1 + (run - 5);
        }
        pen
    };

    let mut pen = 0;
    for i in 0..w {
        pen += run_penalty(&|c| qr.is_dark(i, c));
        pen += run_penalty(&|r| qr.is_dark(r, i));
    }
    pen
}

// Rule 2: 2x2 blocks of the same colour
pub fn compute_block_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = qr.is_dark(r, c);
            if clr == qr.is_dark(r + 1, c)
                && clr == qr.is_dark(r, c + 1)
                && clr == qr.is_dark(r + 1, c + 1)
            {
                pen += PENALTY_N2;
            }
        }
    }
    pen
}

// Rule 3: 1:1:3:1:1 finder-like patterns with 4 light modules on either side
pub fn compute_finder_pattern_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let count = |get: &dyn Fn(i16) -> bool| {
        // Modules beyond the edge count as light
        let is_light_span = |from: i16, to: i16| (from.max(0)..to.min(w)).all(|i| !get(i));
        let mut cnt = 0;
        for j in 0..w - 6 {
            if (0..7).all(|k| get(j + k) == FINDER_PATTERN[k as usize])
                && (is_light_span(j - 4, j) || is_light_span(j + 7, j + 11))
            {
                cnt += 1;
            }
        }
        cnt
    };

    let mut cnt = 0;
    for i in 0..w {
        cnt += count(&|c| qr.is_dark(i, c));
        cnt += count(&|r| qr.is_dark(r, i));
    }
    cnt * PENALTY_N3
}

// Rule 4: deviation of the dark module ratio from 50%, in 5% steps
pub fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules();
    let w = qr.width();
    let total = w * w;
    let deviation = (dark * 2).abs_diff(total) * 10 / total;
    deviation as u32 * PENALTY_N4
}


// Global constants
//------------------------------------------------------------------------------

const PENALTY_N1: u32 = 3;

const PENALTY_N2: u32 = 3;

const PENALTY_N3: u32 = 40;

const PENALTY_N4: u32 = 10;

static FINDER_PATTERN: [bool; 7] = [true, false, true, true, true, false, true];
