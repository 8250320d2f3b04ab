use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum QRError {
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),
    #[error("Encoding unsupported: {0}")]
    EncodingUnsupported(String),
    #[error("Length overflow: {0}")]
    LengthOverflow(String),
    #[error("Internal consistency check failed: {0}")]
    InternalConsistency(String),
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
    #[error("Invalid mask pattern: {0}")]
    InvalidMaskPattern(String),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    CapacityExceeded,
    InvalidCharacter,
    EncodingUnsupported,
    LengthOverflow,
    InternalConsistency,
    InvalidSymbol,
    InvalidVersion,
    InvalidMaskPattern,
}

impl QRError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            Self::InvalidCharacter(_) => ErrorKind::InvalidCharacter,
            Self::EncodingUnsupported(_) => ErrorKind::EncodingUnsupported,
            Self::LengthOverflow(_) => ErrorKind::LengthOverflow,
            Self::InternalConsistency(_) => ErrorKind::InternalConsistency,
            Self::InvalidSymbol(_) => ErrorKind::InvalidSymbol,
            Self::InvalidVersion(_) => ErrorKind::InvalidVersion,
            Self::InvalidMaskPattern(_) => ErrorKind::InvalidMaskPattern,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::CapacityExceeded(d)
            | Self::InvalidCharacter(d)
            | Self::EncodingUnsupported(d)
            | Self::LengthOverflow(d)
            | Self::InternalConsistency(d)
            | Self::InvalidSymbol(d)
            | Self::InvalidVersion(d)
            | Self::InvalidMaskPattern(d) => d,
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;
