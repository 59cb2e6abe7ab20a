//! Embeds a secret ("secondary") text payload inside a standard QR code that
//! already carries a public ("primary") text payload, exploiting the
//! error-correction slack of the QR specification. A conforming QR reader
//! sees only the primary string; a cooperating reader that knows the primary
//! can recover the secondary by comparing the scanned matrix against a
//! regenerated clean reference and interpreting the bit pattern of
//! differences.
//!
//! This crate does not attempt cryptographic confidentiality — knowledge of
//! the primary text is the only access control — nor does it re-implement
//! Reed–Solomon decoding, guarantee survival through lossy re-encoding, or
//! fragment payloads across multiple codes.
//!
//! # Example
//!
//! ```
//! use qr_stego::{encode, decode_matrix, EncodeOptions, DecodeOptions};
//! use qr_stego::engine::{DefaultQrEngine, Matrix};
//!
//! let engine = DefaultQrEngine;
//! let primary = "https://example.com/path/to/page";
//! let encoded = encode(&engine, primary, "SECRET", EncodeOptions::default()).unwrap();
//!
//! let rows: Vec<Vec<bool>> = (0..encoded.matrix.size())
//!     .map(|y| (0..encoded.matrix.size()).map(|x| encoded.matrix.get_module(x, y)).collect())
//!     .collect();
//! let scanned = Matrix::from_rows(&rows).unwrap();
//!
//! let decoded = decode_matrix(&engine, &scanned, primary, DecodeOptions::default()).unwrap();
//! assert_eq!(decoded.secondary, "SECRET");
//! ```

pub mod analyzer;
pub mod capacity;
pub mod crc16;
pub mod distribution;
pub mod encode;
pub mod engine;
pub mod error;
pub mod frame;
pub mod metadata;

mod decode;

pub use decode::{decode_from_matrix as decode_matrix, DecodeOptions, DecodeResult};
pub use encode::{encode, EncodeOptions, EncodeResult};
pub use engine::{DefaultQrEngine, Matrix, QrEngine};
pub use error::StegoError;
pub use metadata::StegoMetadata;

use qr_engine::CodeEcc;

/// Maximum secondary byte capacity for `primary` at the given `ec_level` and
/// `safety_margin`, using the default QR engine.
///
/// This mirrors the capacity computation [`encode`] performs internally, so
/// that a caller can check a payload's fit before attempting to encode it.
pub fn capacity_bytes(primary: &str, ec_level: CodeEcc, safety_margin: f64) -> Result<usize, StegoError> {
    let engine = DefaultQrEngine;
    let base = engine
        .encode_text(primary, ec_level)
        .map_err(StegoError::PrimaryEncodeError)?;
    let flippable = analyzer::enumerate_flippable(base.size(), base.version());
    Ok(capacity::max_bytes(flippable.len(), safety_margin))
}

/// `true` iff `secondary` fits within [`capacity_bytes`] for `primary`.
pub fn validate_capacity(
    primary: &str,
    secondary: &str,
    ec_level: CodeEcc,
    safety_margin: f64,
) -> Result<bool, StegoError> {
    Ok(secondary.len() <= capacity_bytes(primary, ec_level, safety_margin)?)
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn report_growing_capacity_as_safety_margin_grows() {
        let low = capacity_bytes("https://example.com/path/page", CodeEcc::High, 0.05).unwrap();
        let high = capacity_bytes("https://example.com/path/page", CodeEcc::High, 0.10).unwrap();
        assert!(low <= high);
    }

    #[test]
    fn validate_capacity_agree_with_encode_outcome() {
        let primary = "test";
        let secondary = "x".repeat(1000);
        let fits = validate_capacity(primary, &secondary, CodeEcc::High, 0.07).unwrap();
        assert!(!fits);

        let err = encode::encode(
            &DefaultQrEngine,
            primary,
            &secondary,
            EncodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StegoError::PayloadTooLarge { .. }));
    }
}
