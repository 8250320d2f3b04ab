mod qr;

pub use qr::{Color, Module, QR};

use tracing::debug;

use crate::common::{
    bitstream::BitStream,
    charset::CharacterSet,
    codec::{check_fits, encode_segment, find_version, terminate_bits},
    ec::interleave_with_ecc,
    error::{QRError, QRResult},
    mask::{select_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    content: &'a str,
    version: Option<Version>,
    ec_level: ECLevel,
    character_set: Option<&'a str>,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content, version: None, ec_level: ECLevel::M, character_set: None, mask: None }
    }

    pub fn content(&mut self, content: &'a str) -> &mut Self {
        self.content = content;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn character_set(&mut self, character_set: &'a str) -> &mut Self {
        self.character_set = Some(character_set);
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let version = self.version.map_or("None".to_string(), |v| v.to_string());
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        let charset = self.character_set.unwrap_or(CharacterSet::DEFAULT.name());
        format!(
            "{{ Version: {version}, Ec level: {}, Character set: {charset}, Mask: {mask} }}",
            self.ec_level
        )
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_metadata() {
        let mut qr_builder = QRBuilder::new("Hello, world!");
        assert_eq!(
            qr_builder.metadata(),
            "{ Version: None, Ec level: M, Character set: ISO-8859-1, Mask: None }"
        );
        qr_builder
            .version(Version::new(1).unwrap())
            .ec_level(ECLevel::L)
            .character_set("UTF-8")
            .mask(MaskPattern::new(3).unwrap());
        assert_eq!(
            qr_builder.metadata(),
            "{ Version: 1, Ec level: L, Character set: UTF-8, Mask: 3 }"
        );
        qr_builder.unset_version().unset_mask();
        assert_eq!(
            qr_builder.metadata(),
            "{ Version: None, Ec level: L, Character set: UTF-8, Mask: None }"
        );
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!(config = %self.metadata(), "Generating QR");

        let seg = encode_segment(self.content, self.character_set)?;

        let ver = match self.version {
            Some(v) => {
                check_fits(&seg, v, self.ec_level)?;
                v
            }
            None => find_version(&seg, self.ec_level)?,
        };

        let mut qr = QR::new(ver, self.ec_level);
        let data_bytes = qr.data_codewords();

        let mut data = BitStream::with_capacity(data_bytes << 3);
        if let Some(eci) = seg.eci {
            debug!(charset = %eci, eci = eci.eci_value(), "Writing ECI header");
        }
        seg.push_header(ver, &mut data)?;
        data.append(&seg.data);
        terminate_bits(data_bytes, &mut data)?;

        let payload = interleave_with_ecc(&data, qr.total_codewords(), data_bytes, qr.num_blocks())?;
        debug!(
            total_bytes = qr.total_codewords(),
            data_bytes,
            blocks = qr.num_blocks(),
            "Interleaved error correction"
        );

        let mask = match self.mask {
            Some(m) => m,
            None => {
                let (m, penalty) = select_mask(&payload, &mut qr)?;
                debug!(mask = *m, penalty, "Selected mask pattern");
                m
            }
        };

        // Mask trials leave the grid in an arbitrary state
        qr.build(&payload, mask)?;
        qr.set_mode(seg.mode);

        if !qr.is_valid() {
            return Err(QRError::InvalidSymbol(format!(
                "Version {ver} symbol with mask {mask} failed validation"
            )));
        }

        debug!(
            version = *ver,
            dark_modules = qr.count_dark_modules(),
            total_modules = qr.width() * qr.width(),
            "QR generated"
        );
        Ok(qr)
    }
}

pub fn encode(content: &str, ec_level: ECLevel, character_set: Option<&str>) -> QRResult<QR> {
    let mut builder = QRBuilder::new(content);
    builder.ec_level(ec_level);
    if let Some(cs) = character_set {
        builder.character_set(cs);
    }
    builder.build()
}
