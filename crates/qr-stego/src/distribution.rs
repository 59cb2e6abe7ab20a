//! Prime-step permutation: a table-free, deterministic spread of logical bit
//! positions over the flippable modules.

use crate::error::StegoError;

/// Trial division up to `floor(sqrt(n))`. Good enough for the module sizes
/// this codec deals with (at most a few tens of thousands of flippable
/// modules for a version-40 symbol).
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u32;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// The largest prime strictly below `m`, or `2` if none exists below it.
pub fn largest_prime_below(m: u32) -> u32 {
    if m == 0 {
        return 2;
    }
    let mut n = m - 1;
    while n >= 3 {
        if is_prime(n) {
            return n;
        }
        n -= 1;
    }
    2
}

/// Produces `need` pairwise-distinct indices into `[0, total)` by stepping
/// `idx[i] = (i * p) mod total`, where `p` is the largest prime below `total`
/// (or `2` for `total <= 2`).
///
/// Because `p` is prime and `p < total`, `gcd(p, total) = 1`, so the full
/// sequence of `total` terms is a bijection over `[0, total)` and any prefix
/// of it is pairwise distinct. Decoding inverts this by generating the same
/// sequence and reading off which generated indices are in the observed
/// flip set.
pub fn distribution(need: usize, total: usize) -> Result<Vec<usize>, StegoError> {
    if need > total {
        return Err(StegoError::CapacityExceeded { need, total });
    }
    if need == 0 {
        return Ok(Vec::new());
    }
    let p = largest_prime_below(total as u32) as u64;
    let total = total as u64;
    Ok((0..need as u64)
        .map(|i| ((i * p) % total) as usize)
        .collect())
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn match_known_prime_boundaries() {
        assert_eq!(largest_prime_below(100), 97);
        assert_eq!(largest_prime_below(20), 19);
        assert_eq!(largest_prime_below(3), 2);
    }

    #[test]
    fn fall_back_to_two_for_tiny_totals() {
        assert_eq!(largest_prime_below(2), 2);
        assert_eq!(largest_prime_below(1), 2);
        assert_eq!(largest_prime_below(0), 2);
    }

    #[test]
    fn produce_pairwise_distinct_indices() {
        let seq = distribution(50, 97).unwrap();
        let mut sorted = seq.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), seq.len());
    }

    #[test]
    fn keep_every_index_in_bounds() {
        let total = 97;
        let seq = distribution(total, total).unwrap();
        assert!(seq.iter().all(|&i| i < total));
    }

    #[test]
    fn reject_need_greater_than_total() {
        let err = distribution(10, 5).unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded { need: 10, total: 5 }
        ));
    }

    #[test]
    fn degenerate_to_all_zeros_at_total_two_or_less() {
        let seq = distribution(2, 2).unwrap();
        assert_eq!(seq, vec![0, 0]);
    }
}
