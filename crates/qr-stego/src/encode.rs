//! Encoder (C6): orchestrates the analyzer, capacity model, bit framing, and
//! distribution to flip modules of a freshly-generated base matrix.

use qr_engine::CodeEcc;
use tracing::{debug, trace, warn};

use crate::analyzer::{enumerate_flippable, is_function};
use crate::capacity::{max_bits, DEFAULT_SAFETY_MARGIN};
use crate::distribution::distribution;
use crate::engine::{Matrix, QrEngine};
use crate::error::StegoError;
use crate::frame::encode_frame;
use crate::metadata::StegoMetadata;

/// Options controlling [`encode`].
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub ec_level: CodeEcc,
    pub safety_margin: f64,
    pub include_metadata: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ec_level: CodeEcc::High,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            include_metadata: true,
        }
    }
}

/// The result of a successful [`encode`] call.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    pub matrix: Matrix,
    pub metadata: Option<StegoMetadata>,
}

/// Encodes `secondary` into the error-correction slack of a QR code carrying
/// `primary`, using `engine` to generate the base matrix.
///
/// An empty `secondary` returns the base matrix unchanged, with
/// `flipped_count = 0` and no error possible past the initial encode step.
pub fn encode<E: QrEngine>(
    engine: &E,
    primary: &str,
    secondary: &str,
    opts: EncodeOptions,
) -> Result<EncodeResult, StegoError> {
    let base = engine
        .encode_text(primary, opts.ec_level)
        .map_err(StegoError::PrimaryEncodeError)?;
    debug!(version = base.version(), size = base.size(), "encoded primary");

    let flippable = enumerate_flippable(base.size(), base.version());
    if flippable.is_empty() {
        return Err(StegoError::MatrixTooSmall);
    }

    let max_frame_bits = max_bits(flippable.len(), opts.safety_margin);
    if max_frame_bits <= 32 {
        return Err(StegoError::InsufficientCapacity {
            max_bits: max_frame_bits,
        });
    }

    if secondary.is_empty() {
        trace!("empty secondary, returning base matrix unchanged");
        return Ok(EncodeResult {
            matrix: base.clone(),
            metadata: opts.include_metadata.then(|| {
                StegoMetadata::new(0, base.size() * base.size(), base.ec_level().unwrap_or(opts.ec_level))
            }),
        });
    }

    let bits = encode_frame(secondary, max_frame_bits)?;
    let positions = distribution(bits.len(), flippable.len())?;

    let mut out = base.clone();
    let mut flipped_count = 0usize;
    let mut attempted_function_flips = 0usize;
    for (i, &bit) in bits.iter().enumerate() {
        if !bit {
            continue;
        }
        let (x, y) = flippable[positions[i]];
        if is_function(x, y, out.size(), out.version()) {
            // Safety check: a positive hit here means the analyzer
            // mis-classified a coordinate. Observability, not control flow.
            attempted_function_flips += 1;
            warn!(x, y, "attempted to flip a function-pattern module, skipping");
            continue;
        }
        out.toggle(x, y);
        flipped_count += 1;
    }
    if attempted_function_flips > 0 {
        warn!(
            count = attempted_function_flips,
            "structural analyzer misclassified modules during encode"
        );
    }

    debug!(flipped_count, "applied flips");
    Ok(EncodeResult {
        matrix: out,
        metadata: opts.include_metadata.then(|| {
            StegoMetadata::new(
                flipped_count,
                base.size() * base.size(),
                base.ec_level().unwrap_or(opts.ec_level),
            )
        }),
    })
}
