//! Fully lane-wise search.
//!
//! Unlike [`crate::simd::batch_search`], validation never leaves the vector
//! registers: each lane builds its own [`DigitSet`](crate::DigitSet) bits
//! through a fixed number of divide/modulo rounds, tracks repeats, and the
//! per-lane verdict comes back as one mask bit per lane.

use std::simd::cmp::SimdPartialEq;
use std::simd::{LaneCount, Simd, SupportedLaneCount};

use crate::collections::{KBatch, batch_starts};
use crate::simd::{
    SimdMask, SimdU32, concat_lanes, div_mod_10, in_pandigital_range, products, reduce_lanes, zero,
};
use crate::{Best, DigitSet, MAX_K, SearchResult};

/// Lane count of the widest search.
pub const WIDE_WIDTH: usize = 16;

/// Decimal digits in the largest `p2 = 2 * MAX_K`.
const MAX_LANE_DIGITS: usize = 5;

// Add every digit of `v` to the per-lane set `seen`.
//
// A lane stops contributing once its remaining value reaches zero, so leading
// zeros of short numbers never land in bit 0. `repeated` picks up any digit
// already present in the lane's set.
#[inline(always)]
fn insert_digit_lanes<const LANES: usize>(
    mut v: SimdU32<LANES>,
    mut seen: SimdU32<LANES>,
    mut repeated: SimdMask<LANES>,
) -> (SimdU32<LANES>, SimdMask<LANES>)
where
    LaneCount<LANES>: SupportedLaneCount,
{
    let one = Simd::splat(1u32);
    for _ in 0..MAX_LANE_DIGITS {
        let active = v.simd_ne(zero());
        let (q, digit) = div_mod_10(v);
        let bit = one << digit;

        repeated |= active & (seen & bit).simd_ne(zero());
        seen |= active.select(bit, zero());
        v = q;
    }
    (seen, repeated)
}

/// Lanes where `p1 || p2` uses every digit 1..=9 exactly once.
///
/// A zero digit sets bit 0 and a repeat sets `repeated`; either keeps the lane
/// away from [`DigitSet::FULL`]. Inputs must have at most five digits.
#[inline(always)]
pub fn pandigital_lanes<const LANES: usize>(
    p1: SimdU32<LANES>,
    p2: SimdU32<LANES>,
) -> SimdMask<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    let (seen, repeated) = insert_digit_lanes(p1, zero(), SimdMask::splat(false));
    let (seen, repeated) = insert_digit_lanes(p2, seen, repeated);
    !repeated & seen.simd_eq(Simd::splat(DigitSet::FULL.bits() as u32))
}

/// Lane-wise search: products, concatenation and digit masks all computed
/// for `LANES` k values at a time.
///
/// The verdict is read back with `Mask::to_bitmask`, which yields exactly one
/// bit per logical lane, and only lanes backed by a real k are reduced.
#[inline(never)]
pub fn wide_search<const LANES: usize>(max_k: u32) -> SearchResult
where
    LaneCount<LANES>: SupportedLaneCount,
{
    debug_assert!(max_k <= MAX_K);

    let mut best = Best::new();
    let mut batch: KBatch<LANES> = KBatch::new();

    for start in batch_starts::<LANES>(max_k) {
        batch.fill(start, max_k);
        let k = batch.to_simd();
        let (p1, p2) = products(k);
        let concat = concat_lanes(p1, p2);

        let valid = pandigital_lanes(p1, p2) & in_pandigital_range(concat);
        if !valid.any() {
            continue;
        }
        reduce_lanes(valid.to_bitmask() & batch.live_mask(), concat, k, &mut best);
    }

    best.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::batch_search;
    use crate::{MULTIPLIER, is_pandigital_mask, simple_search};

    const ANSWER: SearchResult = SearchResult {
        max_val: 932_718_654,
        best_k: 9_327,
        best_n: 2,
    };

    #[test]
    fn wide_full_range() {
        assert_eq!(wide_search::<WIDE_WIDTH>(MAX_K), ANSWER);
        assert_eq!(wide_search::<8>(MAX_K), ANSWER);
    }

    #[test]
    fn wide_no_candidate_below_ten() {
        assert_eq!(wide_search::<WIDE_WIDTH>(10), SearchResult::EMPTY);
        assert_eq!(wide_search::<8>(10), SearchResult::EMPTY);
    }

    #[test]
    fn lane_verdict_matches_scalar_for_every_k() {
        let mut batch: KBatch<WIDE_WIDTH> = KBatch::new();
        for start in batch_starts::<WIDE_WIDTH>(MAX_K) {
            batch.fill(start, MAX_K);
            let (p1, p2) = products(batch.to_simd());
            let lanes = pandigital_lanes(p1, p2).to_array();
            for lane in 0..batch.len() {
                let k = batch.lanes()[lane];
                assert_eq!(
                    lanes[lane],
                    is_pandigital_mask(k, k * MULTIPLIER),
                    "lane verdict differs at k = {k}"
                );
            }
        }
    }

    #[test]
    fn short_numbers_do_not_count_leading_zeros() {
        // 4-digit p1 still runs five rounds; the fifth must not set bit 0.
        let p1 = Simd::from_array([9_327u32, 6_729, 1, 0, 0, 0, 0, 0]);
        let p2 = p1 * Simd::splat(MULTIPLIER);
        let verdict = pandigital_lanes(p1, p2).to_array();
        assert_eq!(verdict, [true, true, false, false, false, false, false, false]);
    }

    #[test]
    fn repeats_and_zeros_rejected() {
        let p1 = Simd::from_array([1_234u32, 1_234, 5_000, 0]);
        let p2 = Simd::from_array([56_781u32, 56_780, 10_000, 0]);
        let verdict = pandigital_lanes(p1, p2).to_array();
        assert_eq!(verdict, [false, false, false, false]);
    }

    #[test]
    fn padded_tail_never_wins() {
        for max_k in [9_327, 9_329, 9_997, 9_998] {
            let expect = simple_search(max_k);
            assert_eq!(wide_search::<8>(max_k), expect, "max_k = {max_k}");
            assert_eq!(wide_search::<16>(max_k), expect, "max_k = {max_k}");
        }
    }

    #[test]
    fn wide_agrees_with_batch_on_small_limits() {
        for max_k in 1..=64 {
            assert_eq!(wide_search::<16>(max_k), batch_search::<8>(max_k));
        }
    }
}
