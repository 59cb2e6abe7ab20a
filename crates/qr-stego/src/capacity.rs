//! Capacity model: turns a flippable-module count into a usable secondary
//! payload size.

/// Fraction of '1' bits expected in a framed payload; only '1' bits trigger
/// a flip, so this scales flippable-module count down to a usable bit budget.
/// An empirical modeling constant (see design notes), not a derived value.
pub const BIT_DENSITY: f64 = 0.42;

/// Default fraction of flippable modules considered safe to touch.
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.07;

/// Maximum secondary frame size, in bits, for `flippable_count` flippable
/// modules and the given `safety_margin` (`0.0` exclusive, `1.0` inclusive).
///
/// Every frame bit occupies a distribution position regardless of its value
/// (only the `1` bits are actually flipped), so the result is capped at
/// `flippable_count` even when a large `safety_margin` would otherwise scale
/// past it via the `1/BIT_DENSITY` expansion.
pub fn max_bits(flippable_count: usize, safety_margin: f64) -> usize {
    let target_flips = (flippable_count as f64 * safety_margin).floor();
    let scaled = (target_flips / BIT_DENSITY).floor() as usize;
    scaled.min(flippable_count)
}

/// User-visible byte capacity implied by `max_bits`, after the 32-bit framing
/// overhead.
pub fn max_bytes(flippable_count: usize, safety_margin: f64) -> usize {
    let bits = max_bits(flippable_count, safety_margin);
    bits.saturating_sub(32) / 8
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn grow_monotonically_with_safety_margin() {
        let low = max_bytes(10_000, 0.05);
        let high = max_bytes(10_000, 0.10);
        assert!(low <= high);
    }

    #[test]
    fn return_zero_bytes_when_capacity_is_tiny() {
        assert_eq!(max_bytes(1, DEFAULT_SAFETY_MARGIN), 0);
    }

    #[test]
    fn never_report_more_bits_than_there_are_flippable_modules() {
        // A large safety_margin pushes target_flips / BIT_DENSITY past
        // flippable_count; the result must still be a legal distribution() bound.
        assert!(max_bits(807, 1.0) <= 807);
    }
}
