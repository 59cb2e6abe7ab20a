//! Structural analyzer: classifies module coordinates as function-pattern or
//! flippable, and enumerates flippable modules in canonical (row-major)
//! order.
//!
//! The alignment-pattern test is the one place a naive implementation tends
//! to go wrong for larger QR versions. Rather than transcribing the ISO/IEC
//! 18004 Annex E coordinate table, this reuses the generalized step formula
//! `qr-engine` already derives its own alignment centers from (see
//! `qr_code.rs::get_alignment_pattern_positions`), which is correct for
//! every version from 2 to 40, not just a hand-copied subset.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// The kind of QR structural element a module coordinate belongs to.
///
/// The analyzer only needs the binary function/flippable distinction, so
/// `data_codeword` and `ec_codeword` are collapsed together here (both are
/// reported as `DataCodeword`); the finer-grained variants are kept for
/// callers that want to reason about module type, e.g. to prefer data over
/// EC positions in a future visual-artifact refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleClass {
    Finder,
    Separator,
    Timing,
    Alignment,
    FormatInfo,
    VersionInfo,
    DataCodeword,
    EcCodeword,
    Remainder,
}

/// Ascending alignment-pattern center coordinates for the given QR version.
///
/// Empty for version 1 (no alignment patterns). Mirrors the generalized
/// formula used to *draw* alignment patterns, reused here to *classify*
/// them.
pub fn alignment_pattern_positions(version: u8) -> Vec<i32> {
    if version == 1 {
        return Vec::new();
    }
    let size = 17 + 4 * i32::from(version);
    let numalign = i32::from(version) / 7 + 2;
    let step = if version == 32 {
        26
    } else {
        (i32::from(version) * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
    };
    let mut result: Vec<i32> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

static ALIGNMENT_CACHE: OnceLock<Mutex<HashMap<u8, Vec<i32>>>> = OnceLock::new();

fn cached_alignment_positions(version: u8) -> Vec<i32> {
    let cache = ALIGNMENT_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().expect("alignment cache poisoned");
    guard
        .entry(version)
        .or_insert_with(|| alignment_pattern_positions(version))
        .clone()
}

fn in_finder_quadrant(numalign: usize, i: usize, j: usize) -> bool {
    let last = numalign - 1;
    (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0)
}

fn is_alignment(x: i32, y: i32, version: u8) -> bool {
    if version < 2 {
        return false;
    }
    let centers = cached_alignment_positions(version);
    let numalign = centers.len();
    for (i, &cx) in centers.iter().enumerate() {
        for (j, &cy) in centers.iter().enumerate() {
            if in_finder_quadrant(numalign, i, j) {
                continue;
            }
            let dist = (x - cx).abs().max((y - cy).abs());
            if dist <= 2 {
                return true;
            }
        }
    }
    false
}

/// True iff `(x, y)` is part of a fixed QR function pattern for a symbol of
/// the given `size` and `version` — finder/separator, timing, alignment,
/// format info, or version info. Anything else is eligible for flipping.
pub fn is_function(x: i32, y: i32, size: i32, version: u8) -> bool {
    // Finder patterns plus their 1-module separator, absorbed into the 8-wide window.
    let finder = (x < 9 && y < 9) || (x >= size - 8 && y < 9) || (x < 9 && y >= size - 8);
    if finder {
        return true;
    }

    // Timing patterns.
    if x == 6 || y == 6 {
        return true;
    }

    // Format info, drawn around the top-left finder and mirrored along the
    // bottom/right edges.
    let format_info = (y == 8 && x <= 8)
        || (x == 8 && y <= 8)
        || (y == 8 && x >= size - 8)
        || (x == 8 && y >= size - 7);
    if format_info {
        return true;
    }

    // Version info blocks, present from version 7 upward.
    if version >= 7 {
        let version_info =
            (x <= 5 && y >= size - 11 && y <= size - 9) || (y <= 5 && x >= size - 11 && x <= size - 9);
        if version_info {
            return true;
        }
    }

    is_alignment(x, y, version)
}

/// Enumerates every flippable `(x, y)` coordinate in row-major order
/// (`y` outer, `x` inner, both ascending). This ordering is the canonical
/// index the distribution permutation indexes into, so encoder and decoder
/// must produce identical sequences for the same `(version, size)`.
pub fn enumerate_flippable(size: i32, version: u8) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..size {
        for x in 0..size {
            if !is_function(x, y, size, version) {
                out.push((x, y));
            }
        }
    }
    out
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn never_mark_the_top_left_finder_as_flippable() {
        assert!(is_function(0, 0, 21, 1));
        assert!(is_function(8, 8, 21, 1));
        assert!(!is_function(9, 9, 21, 1));
    }

    #[test]
    fn never_mark_timing_patterns_as_flippable() {
        assert!(is_function(6, 10, 21, 1));
        assert!(is_function(10, 6, 21, 1));
    }

    #[test]
    fn have_no_alignment_patterns_at_version_1() {
        assert!(alignment_pattern_positions(1).is_empty());
    }

    #[test]
    fn have_one_interior_alignment_center_at_version_2() {
        // Version 2 (size 25) has centers at [6, 18].
        assert_eq!(alignment_pattern_positions(2), vec![6, 18]);
        assert!(is_function(18, 18, 25, 2));
    }

    #[test]
    fn produce_no_function_patterns_in_the_flippable_list_across_all_versions() {
        for version in 1..=40u8 {
            let size = 17 + 4 * i32::from(version);
            for &(x, y) in &enumerate_flippable(size, version) {
                assert!(!is_function(x, y, size, version), "version {version}");
            }
        }
    }

    #[test]
    fn enumerate_in_row_major_order() {
        let flippable = enumerate_flippable(21, 1);
        let mut prev = None;
        for &(x, y) in &flippable {
            if let Some((px, py)) = prev {
                assert!((y, x) >= (py, px));
            }
            prev = Some((x, y));
        }
    }
}
