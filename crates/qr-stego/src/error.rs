//! Error taxonomy for the codec: input validation, integrity, structural,
//! and external-collaborator failures. One flat enum rather than nested
//! kind wrappers, since a Rust enum is already a closed sum type.

use thiserror::Error;

/// Everything that can go wrong encoding or decoding a secondary payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StegoError {
    /// The secondary payload doesn't fit in the available flippable modules.
    #[error("payload too large: need {need} bits, capacity is {max} bits")]
    PayloadTooLarge { need: usize, max: usize },

    /// A scanned bit stream is too short to contain even the length field.
    #[error("short frame: need at least 32 bits, got {got}")]
    ShortFrame { got: usize },

    /// The declared payload length doesn't fit the available frame, either
    /// because it overruns the flippable-module budget or exceeds the
    /// caller's configured message size limit.
    #[error("bad length: declared length implies {need}, only {available} available")]
    BadLength { need: usize, available: usize },

    /// The payload failed to convert to a string after the checksum verified.
    #[error("payload is not valid utf-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    /// Recomputed CRC-16 does not match the one stored in the frame.
    #[error("checksum mismatch: expected {expected:#06x}, got {got:#06x}")]
    ChecksumMismatch { expected: u16, got: u16 },

    /// The QR matrix has no modules eligible for flipping.
    #[error("matrix too small: no flippable modules")]
    MatrixTooSmall,

    /// A scanned matrix's side length doesn't match the regenerated reference.
    #[error("size mismatch: scanned {scanned}x{scanned}, reference {reference}x{reference}")]
    SizeMismatch { scanned: i32, reference: i32 },

    /// Usable capacity after framing overhead is not positive.
    #[error("insufficient capacity: only {max_bits} usable bits (need > 32)")]
    InsufficientCapacity { max_bits: usize },

    /// `distribution()` was asked for more indices than the universe has.
    #[error("capacity exceeded: need {need} positions, total is {total}")]
    CapacityExceeded { need: usize, total: usize },

    /// The external QR engine failed to encode the primary text.
    #[error("primary encode failed: {0}")]
    PrimaryEncodeError(#[source] qr_engine::QrError),

    /// The external QR engine failed to regenerate the clean reference matrix.
    #[error("reference regeneration failed: {0}")]
    ReferenceRegenFailed(#[source] qr_engine::QrError),
}
