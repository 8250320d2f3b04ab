//! # qrcraft
//!
//! A Rust library for encoding text into QR Code symbols with Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Mode Selection**: Picks numeric, alphanumeric, byte or kanji mode for the content
//! - **Character Sets**: Byte data in any supported character set, announced with an ECI header
//! - **Version Sizing**: Finds the smallest version (1-40) that holds the content
//! - **Reed-Solomon Error Correction**: Configurable levels (L, M, Q, H) with block interleaving
//! - **Mask Selection**: Evaluates all 8 mask patterns and keeps the lowest penalty
//!
//! ## Quick Start
//!
//! ### Simple Encoding
//!
//! ```rust
//! use qrcraft::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode("Hello, World!", ECLevel::M, None)?;
//! assert_eq!(qr.width(), 21);
//! println!("{qr}");
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrcraft::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Grüße aus Köln")
//!     .version(Version::new(3)?)       // Symbol version - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)            // Error correction level - if not provided, defaults to ECLevel::M
//!     .character_set("UTF-8")          // Byte mode character set - if not provided, ISO-8859-1 without ECI
//!     .mask(MaskPattern::new(3)?)      // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! assert_eq!(qr.width(), 29);
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ### Modes
//! - **Numeric**: Digits `0-9`, 3 digits per 10 bits
//! - **Alphanumeric**: `0-9`, `A-Z`, space and `$%*+-./:`, 2 characters per 11 bits
//! - **Byte**: Transcoded bytes, 8 bits each
//! - **Kanji**: Shift JIS double byte characters, 13 bits each. Selected only when the
//!   character set is `Shift_JIS`
//!
//! ## Logging
//!
//! Encoding stages are reported through [`tracing`] at `debug` and `trace` level. No
//! subscriber is installed by the library.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{encode, Color, Module, QRBuilder, QR};
pub use common::charset::CharacterSet;
pub use common::codec::Mode;
pub use common::error::{ErrorKind, QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
