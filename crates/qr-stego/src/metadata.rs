//! Emit-only metadata attached to encode/decode results. Never persisted —
//! only the bit frame itself is written into the matrix.

use qr_engine::CodeEcc;

/// The wire-format version tag of the current codec. Bump when the bit
/// framing or distribution algorithm changes in an incompatible way.
pub const CODEC_VERSION: &str = "1.0";

/// Descriptive information about an encode or decode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct StegoMetadata {
    pub version: &'static str,
    pub flipped_count: usize,
    pub ec_level_used: CodeEcc,
    pub capacity_used_pct: f64,
}

impl StegoMetadata {
    /// `module_count` is `S^2`, the total module count of the matrix.
    pub(crate) fn new(flipped_count: usize, module_count: i32, ec_level_used: CodeEcc) -> Self {
        let capacity_used_pct = if module_count > 0 {
            100.0 * flipped_count as f64 / (module_count as f64)
        } else {
            0.0
        };
        Self {
            version: CODEC_VERSION,
            flipped_count,
            ec_level_used,
            capacity_used_pct,
        }
    }
}
