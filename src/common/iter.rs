use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs from the bottom right corner, alternating upwards and
// downwards, right module before left. The vertical timing column is skipped.
// Every module of the pair is yielded, including function patterns.
pub struct EncRegionIter {
    c: i16,
    step: i16,
    right: bool,
    upward: bool,
    width: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { c: w - 1, step: 0, right: true, upward: true, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c <= 0 {
            return None;
        }
        let r = if self.upward { self.width - 1 - self.step } else { self.step };
        let c = if self.right { self.c } else { self.c - 1 };

        self.right = !self.right;
        if self.right {
            self.step += 1;
            if self.step == self.width {
                self.step = 0;
                self.upward = !self.upward;
                self.c -= 2;
                if self.c == VERT_TIMING_COL {
                    self.c -= 1;
                }
            }
        }
        Some((r, c))
    }
}


// Global constants
//------------------------------------------------------------------------------

const VERT_TIMING_COL: i16 = 6;
