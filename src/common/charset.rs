use std::fmt::{Display, Formatter};

use encoding_rs::Encoding;

use super::error::{QRError, QRResult};

// Character set
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum CharacterSet {
    Cp437,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Iso8859_10,
    Iso8859_11,
    Iso8859_13,
    Iso8859_14,
    Iso8859_15,
    Iso8859_16,
    ShiftJis,
    Cp1250,
    Cp1251,
    Cp1252,
    Cp1256,
    Utf16Be,
    Utf8,
    Ascii,
    Big5,
    Gb18030,
    EucKr,
}

impl CharacterSet {
    // Byte mode data is interpreted as ISO-8859-1 when no ECI segment is present
    pub const DEFAULT: CharacterSet = CharacterSet::Iso8859_1;

    pub const ALL: [CharacterSet; 27] = [
        Self::Cp437,
        Self::Iso8859_1,
        Self::Iso8859_2,
        Self::Iso8859_3,
        Self::Iso8859_4,
        Self::Iso8859_5,
        Self::Iso8859_6,
        Self::Iso8859_7,
        Self::Iso8859_8,
        Self::Iso8859_9,
        Self::Iso8859_10,
        Self::Iso8859_11,
        Self::Iso8859_13,
        Self::Iso8859_14,
        Self::Iso8859_15,
        Self::Iso8859_16,
        Self::ShiftJis,
        Self::Cp1250,
        Self::Cp1251,
        Self::Cp1252,
        Self::Cp1256,
        Self::Utf16Be,
        Self::Utf8,
        Self::Ascii,
        Self::Big5,
        Self::Gb18030,
        Self::EucKr,
    ];

    // Assignment number written into the ECI header
    pub fn eci_value(self) -> u8 {
        match self {
            Self::Cp437 => 2,
            Self::Iso8859_1 => 3,
            Self::Iso8859_2 => 4,
            Self::Iso8859_3 => 5,
            Self::Iso8859_4 => 6,
            Self::Iso8859_5 => 7,
            Self::Iso8859_6 => 8,
            Self::Iso8859_7 => 9,
            Self::Iso8859_8 => 10,
            Self::Iso8859_9 => 11,
            Self::Iso8859_10 => 12,
            Self::Iso8859_11 => 13,
            Self::Iso8859_13 => 15,
            Self::Iso8859_14 => 16,
            Self::Iso8859_15 => 17,
            Self::Iso8859_16 => 18,
            Self::ShiftJis => 20,
            Self::Cp1250 => 21,
            Self::Cp1251 => 22,
            Self::Cp1252 => 23,
            Self::Cp1256 => 24,
            Self::Utf16Be => 25,
            Self::Utf8 => 26,
            Self::Ascii => 27,
            Self::Big5 => 28,
            Self::Gb18030 => 29,
            Self::EucKr => 30,
        }
    }

    // First name is canonical
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Cp437 => &["Cp437", "IBM437"],
            Self::Iso8859_1 => &[
                "ISO-8859-1",
                "ISO8859_1",
                "latin1",
                "ISO8859-1",
                "ISO88591",
                "ISO_8859-1",
                "ISO_8859-1:1987",
                "ISO-IR-100",
                "l1",
                "IBM819",
                "CP819",
                "csISOLatin1",
            ],
            Self::Iso8859_2 => &["ISO-8859-2", "ISO8859_2"],
            Self::Iso8859_3 => &["ISO-8859-3", "ISO8859_3"],
            Self::Iso8859_4 => &["ISO-8859-4", "ISO8859_4"],
            Self::Iso8859_5 => &["ISO-8859-5", "ISO8859_5"],
            Self::Iso8859_6 => &["ISO-8859-6", "ISO8859_6"],
            Self::Iso8859_7 => &["ISO-8859-7", "ISO8859_7"],
            Self::Iso8859_8 => &["ISO-8859-8", "ISO8859_8"],
            Self::Iso8859_9 => &["ISO-8859-9", "ISO8859_9"],
            Self::Iso8859_10 => &["ISO-8859-10", "ISO8859_10"],
            Self::Iso8859_11 => &["ISO-8859-11", "ISO8859_11"],
            Self::Iso8859_13 => &["ISO-8859-13", "ISO8859_13"],
            Self::Iso8859_14 => &["ISO-8859-14", "ISO8859_14"],
            Self::Iso8859_15 => &["ISO-8859-15", "ISO8859_15"],
            Self::Iso8859_16 => &["ISO-8859-16", "ISO8859_16"],
            Self::ShiftJis => &["Shift_JIS", "SJIS"],
            Self::Cp1250 => &["windows-1250", "Cp1250"],
            Self::Cp1251 => &["windows-1251", "Cp1251"],
            Self::Cp1252 => &["windows-1252", "Cp1252", "x-cp1252"],
            Self::Cp1256 => &["windows-1256", "Cp1256"],
            Self::Utf16Be => &["UTF-16BE", "UnicodeBig", "UnicodeBigUnmarked"],
            Self::Utf8 => &["UTF-8", "UTF8"],
            Self::Ascii => &["US-ASCII", "ASCII", "ANSI_X3.4-1968", "ISO646-US", "csASCII"],
            Self::Big5 => &["Big5"],
            Self::Gb18030 => &["GB18030", "GB2312", "EUC_CN", "GBK"],
            Self::EucKr => &["EUC-KR", "EUC_KR"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    pub fn from_name(name: &str) -> QRResult<Self> {
        let name = name.trim();
        if let Some(cs) =
            Self::ALL.into_iter().find(|cs| cs.names().iter().any(|n| n.eq_ignore_ascii_case(name)))
        {
            return Ok(cs);
        }

        // Latin-1 and ASCII labels alias windows-1252 in encoding_rs and are
        // only accepted through the names above
        Encoding::for_label(name.as_bytes())
            .filter(|enc| *enc != encoding_rs::WINDOWS_1252)
            .and_then(|enc| Self::ALL.into_iter().find(|cs| cs.encoding() == Some(enc)))
            .ok_or_else(|| QRError::EncodingUnsupported(format!("Unknown character set '{name}'")))
    }

    // Backing encoder for the sets that are transcoded through encoding_rs
    fn encoding(self) -> Option<&'static Encoding> {
        let enc = match self {
            Self::Iso8859_2 => encoding_rs::ISO_8859_2,
            Self::Iso8859_3 => encoding_rs::ISO_8859_3,
            Self::Iso8859_4 => encoding_rs::ISO_8859_4,
            Self::Iso8859_5 => encoding_rs::ISO_8859_5,
            Self::Iso8859_6 => encoding_rs::ISO_8859_6,
            Self::Iso8859_7 => encoding_rs::ISO_8859_7,
            Self::Iso8859_8 => encoding_rs::ISO_8859_8,
            Self::Iso8859_10 => encoding_rs::ISO_8859_10,
            Self::Iso8859_13 => encoding_rs::ISO_8859_13,
            Self::Iso8859_14 => encoding_rs::ISO_8859_14,
            Self::Iso8859_15 => encoding_rs::ISO_8859_15,
            Self::Iso8859_16 => encoding_rs::ISO_8859_16,
            Self::ShiftJis => encoding_rs::SHIFT_JIS,
            Self::Cp1250 => encoding_rs::WINDOWS_1250,
            Self::Cp1251 => encoding_rs::WINDOWS_1251,
            Self::Cp1252 => encoding_rs::WINDOWS_1252,
            Self::Cp1256 => encoding_rs::WINDOWS_1256,
            Self::Utf16Be => encoding_rs::UTF_16BE,
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Big5 => encoding_rs::BIG5,
            Self::Gb18030 => encoding_rs::GB18030,
            Self::EucKr => encoding_rs::EUC_KR,
            Self::Cp437 | Self::Iso8859_1 | Self::Iso8859_9 | Self::Iso8859_11 | Self::Ascii => {
                return None
            }
        };
        Some(enc)
    }
}

impl Display for CharacterSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}


// Transcoding
//------------------------------------------------------------------------------

impl CharacterSet {
    pub fn encode(self, text: &str) -> QRResult<Vec<u8>> {
        match self {
            Self::Iso8859_1 => {
                if let Some(c) = text.chars().find(|c| *c as u32 > 0xFF) {
                    return Err(self.unmappable(Some(c)));
                }
                Ok(encoding_rs::mem::encode_latin1_lossy(text).into_owned())
            }
            Self::Ascii => {
                if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(self.unmappable(Some(c)));
                }
                Ok(text.as_bytes().to_vec())
            }
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            // encoding_rs only decodes UTF-16, so code units are serialised directly
            Self::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            _ => {
                let enc = self.encoding().ok_or_else(|| {
                    QRError::EncodingUnsupported(format!("No transcoder available for {self}"))
                })?;
                let (bytes, _, had_unmappable) = enc.encode(text);
                if had_unmappable {
                    return Err(self.unmappable(None));
                }
                Ok(bytes.into_owned())
            }
        }
    }

    fn unmappable(self, c: Option<char>) -> QRError {
        match c {
            Some(c) => QRError::InvalidCharacter(format!("{c:?} cannot be represented in {self}")),
            None => QRError::InvalidCharacter(format!("Content cannot be represented in {self}")),
        }
    }
}
