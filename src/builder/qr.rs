use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};

use crate::common::bitstream::BitStream;
use crate::common::codec::Mode;
use crate::common::error::{QRError, QRResult};
use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{format_info, ECLevel, Version, FORMAT_INFO_BIT_LEN};

// Module
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    Dark,
    Light,
}

impl Color {
    pub fn select<T>(&self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

// QR symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mode: Option<Mode>,
    mask: Option<MaskPattern>,
    total_codewords: usize,
    data_codewords: usize,
    ec_codewords: usize,
    num_blocks: usize,
}

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        let blocks = ver.ec_blocks(ecl);
        Self {
            grid: vec![Module::Empty; w * w],
            w,
            ver,
            ecl,
            mode: None,
            mask: None,
            total_codewords: ver.total_codewords(),
            data_codewords: ver.data_codewords(ecl),
            ec_codewords: blocks.total_ec_codewords(),
            num_blocks: blocks.num_blocks,
        }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn total_codewords(&self) -> usize {
        self.total_codewords
    }

    pub fn data_codewords(&self) -> usize {
        self.data_codewords
    }

    pub fn ec_codewords(&self) -> usize {
        self.ec_codewords
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity(self.w * (self.w + 1) + 1);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count back from the bottom or right edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }

    pub fn is_dark(&self, r: i16, c: i16) -> bool {
        matches!(*self.get(r, c), Color::Dark)
    }
}

impl Display for QR {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "<<")?;
        match self.mode {
            Some(mode) => writeln!(f, " mode: {mode}")?,
            None => writeln!(f, " mode: none")?,
        }
        writeln!(f, " ecLevel: {}", self.ecl)?;
        writeln!(f, " version: {}", self.ver)?;
        match self.mask {
            Some(mask) => writeln!(f, " maskPattern: {mask}")?,
            None => writeln!(f, " maskPattern: none")?,
        }
        writeln!(f, " matrix:")?;
        for row in self.grid.chunks(self.w) {
            for m in row {
                match m {
                    Module::Empty => f.write_str("  ")?,
                    _ => f.write_str(m.select(" 1", " 0"))?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, ">>")
    }
}

#[cfg(test)]
mod qr_util_tests {
    use crate::builder::{Color, Module, QR};
    use crate::common::codec::Mode;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_index_wrap() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
        assert!(qr.is_dark(0, 0));
        assert!(!qr.is_dark(0, 1));
        assert_eq!(qr.count_dark_modules(), 2);
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        let w = qr.w as i16;
        qr.get(0, -(w + 1));
    }

    #[test]
    fn test_codeword_counts() {
        let qr = QR::new(Version::new(5).unwrap(), ECLevel::Q);
        assert_eq!(qr.width(), 37);
        assert_eq!(qr.total_codewords(), 134);
        assert_eq!(qr.data_codewords(), 62);
        assert_eq!(qr.ec_codewords(), 72);
        assert_eq!(qr.num_blocks(), 4);
    }

    #[test]
    fn test_display() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::H);
        qr.set_mode(Mode::Byte);
        qr.set(0, 0, Module::Func(Color::Dark));
        qr.set(0, 1, Module::Func(Color::Light));
        let s = qr.to_string();
        let mut lines = s.lines();
        assert_eq!(lines.next(), Some("<<"));
        assert_eq!(lines.next(), Some(" mode: Byte"));
        assert_eq!(lines.next(), Some(" ecLevel: H"));
        assert_eq!(lines.next(), Some(" version: 1"));
        assert_eq!(lines.next(), Some(" maskPattern: none"));
        assert_eq!(lines.next(), Some(" matrix:"));
        assert!(lines.next().is_some_and(|row| row.starts_with(" 1 0  ")));
        assert_eq!(s.lines().last(), Some(">>"));
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Includes the light separator on the sides facing the symbol
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }

    fn draw_dark_module(&mut self) {
        self.set(-8, 8, Module::Func(Color::Dark));
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_dark_module();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFFf............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in &poses {
            for &c in &poses {
                self.draw_alignment_pattern_at(r as i16, c as i16)
            }
        }
    }

    // Skips the three positions that collide with finder patterns
    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }

    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_dark_module();
        self.draw_alignment_patterns();
        self.draw_timing_pattern();
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_alignment_pattern_1() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_alignment_patterns();
        assert!(!qr.to_debug_str().contains('f'));
    }

    #[test]
    fn test_alignment_pattern_7() {
        let mut qr = QR::new(Version::new(7).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.............................Ffffffff\n\
             fFFFFFfF.............................FfFFFFFf\n\
             fFfffFfF.............................FfFfffFf\n\
             fFfffFfF.............................FfFfffFf\n\
             fFfffFfF............fffff............FfFfffFf\n\
             fFFFFFfF............fFFFf............FfFFFFFf\n\
             fffffffF............fFfFf............Ffffffff\n\
             FFFFFFFF............fFFFf............FFFFFFFF\n\
             ....................fffff....................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             ....fffff...........fffff...........fffff....\n\
             ....fFFFf...........fFFFf...........fFFFf....\n\
             ....fFfFf...........fFfFf...........fFfFf....\n\
             ....fFFFf...........fFFFf...........fFFFf....\n\
             ....fffff...........fffff...........fffff....\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             ....................fffff...........fffff....\n\
             FFFFFFFF............fFFFf...........fFFFf....\n\
             fffffffF............fFfFf...........fFfFf....\n\
             fFFFFFfF............fFFFf...........fFFFf....\n\
             fFfffFfF............fffff...........fffff....\n\
             fFfffFfF.....................................\n\
             fFfffFfF.....................................\n\
             fFFFFFfF.....................................\n\
             fffffffF.....................................\n"
        );
    }

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new(Version::new(3).unwrap(), ECLevel::L);
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.............Ffffffff\n\
             fFFFFFfF.............FfFFFFFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFFFFFfF.............FfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFF.............FFFFFFFF\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f.............fffff....\n\
             FFFFFFFFf...........fFFFf....\n\
             fffffffF............fFfFf....\n\
             fFFFFFfF............fFFFf....\n\
             fFfffFfF............fffff....\n\
             fFfffFfF.....................\n\
             fFfffFfF.....................\n\
             fFFFFFfF.....................\n\
             fffffffF.....................\n"
        );
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn draw_format_info(&mut self, info: u32) {
        self.draw_number(
            info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_MAIN,
        );
        self.draw_number(
            info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_SIDE,
        );
    }

    // Bit k of the version info sits at row k / 3 of the top right block and
    // column k / 3 of the bottom left block
    fn draw_version_info(&mut self) {
        let Some(info) = self.ver.info() else {
            return;
        };
        let w = self.w as i16;
        for k in 0..18i16 {
            let module = Module::Version(Color::from((info >> k) & 1 == 1));
            let (major, minor) = (k / 3, k % 3);
            self.set(major, w - 11 + minor, module);
            self.set(w - 11 + minor, major, module);
        }
    }

    // Most significant bit goes to the first coordinate
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use crate::builder::QR;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{format_info, ECLevel, Version};

    #[test]
    fn test_version_info_1() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_version_info();
        assert!(qr.to_debug_str().chars().all(|c| c == '.' || c == '\n'));
    }

    #[test]
    fn test_version_info_7() {
        let mut qr = QR::new(Version::new(7).unwrap(), ECLevel::L);
        qr.draw_version_info();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ..................................VVv........\n\
             ..................................VvV........\n\
             ..................................VvV........\n\
             ..................................Vvv........\n\
             ..................................vvv........\n\
             ..................................VVV........\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             VVVVvV.......................................\n\
             VvvvvV.......................................\n\
             vVVvvV.......................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n\
             .............................................\n"
        );
    }

    #[test]
    fn test_format_info_l0() {
        // 0x77C4 = 111011111000100
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_format_info(format_info(ECLevel::L, MaskPattern::new(0).unwrap()));
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........M............\n\
             ........M............\n\
             ........m............\n\
             ........M............\n\
             ........M............\n\
             ........M............\n\
             .....................\n\
             ........m............\n\
             mmmMmm.mm....mmMMMmMM\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........M............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Lays out a complete symbol. Any previous content of the grid is discarded.
    pub fn build(&mut self, payload: &BitStream, mask: MaskPattern) -> QRResult<()> {
        self.grid.fill(Module::Empty);
        self.mask = None;
        self.draw_all_function_patterns();
        self.draw_format_info(format_info(self.ecl, mask));
        self.draw_version_info();
        self.draw_payload(payload, mask)?;
        self.mask = Some(mask);
        Ok(())
    }

    // Unfilled modules past the end of the payload are light before masking
    fn draw_payload(&mut self, payload: &BitStream, mask: MaskPattern) -> QRResult<()> {
        let mask_fn = mask.mask_function();
        let mut bits = payload.iter();
        let mut placed = 0;
        for (r, c) in EncRegionIter::new(self.ver) {
            if !matches!(self.get(r, c), Module::Empty) {
                continue;
            }
            let bit = match bits.next() {
                Some(bit) => {
                    placed += 1;
                    bit
                }
                None => false,
            };
            let dark = bit ^ mask_fn(c as usize, r as usize);
            self.set(r, c, Module::Data(Color::from(dark)));
        }

        if placed != payload.len() {
            return Err(QRError::InternalConsistency(format!(
                "Placed {placed} of {} payload bits in version {}",
                payload.len(),
                self.ver
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        let blocks = self.ver.ec_blocks(self.ecl);
        (Version::MIN..=Version::MAX).contains(&self.ver)
            && self.mask.is_some_and(|m| *m < 8)
            && self.w == self.ver.width()
            && self.grid.len() == self.w * self.w
            && self.total_codewords == self.ver.total_codewords()
            && self.total_codewords == self.data_codewords + self.ec_codewords
            && self.ec_codewords == blocks.total_ec_codewords()
            && self.num_blocks == blocks.num_blocks
            && !self.grid.contains(&Module::Empty)
    }
}


// Global constants
//------------------------------------------------------------------------------

static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];
