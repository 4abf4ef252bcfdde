use std::simd::cmp::SimdPartialOrd;
use std::simd::num::SimdUint;
use std::simd::{LaneCount, Mask, Simd, SupportedLaneCount};

use crate::collections::{KBatch, batch_starts};
use crate::{
    Best, MAX_K, MULTIPLIER, PANDIGITAL_DIGITS, PANDIGITAL_MAX, PANDIGITAL_MIN, SearchResult,
    is_pandigital_digits, is_pandigital_mask, render_concat,
};

/// Lane count of the narrow batch searches.
pub const BATCH_WIDTH: usize = 8;

pub(crate) type SimdMask<const LANES: usize> = Mask<i32, LANES>;
pub(crate) type SimdU32<const LANES: usize> = Simd<u32, LANES>;

#[inline(always)]
fn div_mod_u32_const_portable<const LANES: usize>(
    v: SimdU32<LANES>,
    divisor: u32,
    reciprocal: u64,
) -> (SimdU32<LANES>, SimdU32<LANES>)
where
    LaneCount<LANES>: SupportedLaneCount,
{
    let wide: Simd<u64, LANES> = v.cast();
    let q = ((wide * Simd::splat(reciprocal)) >> Simd::splat(32u64)).cast::<u32>();
    let r = v - q * Simd::splat(divisor);
    let adjust = r.simd_ge(Simd::splat(divisor));
    let q_adj = q + adjust.select(Simd::splat(1u32), Simd::splat(0u32));
    let r_adj = r - adjust.select(Simd::splat(divisor), Simd::splat(0u32));
    (q_adj, r_adj)
}

/// Lane-wise `(v / 10, v % 10)`.
#[inline(always)]
pub(crate) fn div_mod_10<const LANES: usize>(v: SimdU32<LANES>) -> (SimdU32<LANES>, SimdU32<LANES>)
where
    LaneCount<LANES>: SupportedLaneCount,
{
    div_mod_u32_const_portable(v, 10, 0x1999_999Au64)
}

#[inline(always)]
const fn ten_threshold<const LANES: usize>() -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    Simd::splat(10)
}

#[inline(always)]
const fn hundred_threshold<const LANES: usize>() -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    Simd::splat(100)
}

#[inline(always)]
const fn thousand_threshold<const LANES: usize>() -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    Simd::splat(1_000)
}

#[inline(always)]
const fn ten_thousand_threshold<const LANES: usize>() -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    Simd::splat(10_000)
}

#[inline(always)]
const fn hundred_thousand_threshold<const LANES: usize>() -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    Simd::splat(100_000)
}

#[inline(always)]
pub(crate) const fn zero<const LANES: usize>() -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    Simd::splat(0)
}

/// `(k, 2k)` for every lane.
#[inline(always)]
pub fn products<const LANES: usize>(k: SimdU32<LANES>) -> (SimdU32<LANES>, SimdU32<LANES>)
where
    LaneCount<LANES>: SupportedLaneCount,
{
    (k, k * Simd::splat(MULTIPLIER))
}

/// Power of ten that shifts `p1` left past every digit of `p2`.
///
/// `p2 = 2k` has 1 to 5 digits for `k <= MAX_K`, so the shift is one of
/// 10^1..=10^5. Narrower thresholds are applied last so they win.
#[inline(always)]
pub fn concat_shift<const LANES: usize>(p2: SimdU32<LANES>) -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    let mut shift = hundred_thousand_threshold();
    shift = p2.simd_lt(ten_thousand_threshold()).select(ten_thousand_threshold(), shift);
    shift = p2.simd_lt(thousand_threshold()).select(thousand_threshold(), shift);
    shift = p2.simd_lt(hundred_threshold()).select(hundred_threshold(), shift);
    shift = p2.simd_lt(ten_threshold()).select(ten_threshold(), shift);
    shift
}

/// Lane-wise `p1 || p2`.
#[inline(always)]
pub fn concat_lanes<const LANES: usize>(p1: SimdU32<LANES>, p2: SimdU32<LANES>) -> SimdU32<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    p1 * concat_shift(p2) + p2
}

/// Lanes whose value has exactly 9 digits.
#[inline(always)]
pub fn in_pandigital_range<const LANES: usize>(concat: SimdU32<LANES>) -> SimdMask<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    concat.simd_ge(Simd::splat(PANDIGITAL_MIN)) & concat.simd_le(Simd::splat(PANDIGITAL_MAX))
}

// Scalar bit-mask validation of every lane, packed as one bit per lane.
#[inline(always)]
fn pandigital_bits<const LANES: usize>(p1: SimdU32<LANES>, p2: SimdU32<LANES>) -> u64
where
    LaneCount<LANES>: SupportedLaneCount,
{
    let p1 = p1.to_array();
    let p2 = p2.to_array();
    let mut bits = 0u64;
    for lane in 0..LANES {
        bits |= (is_pandigital_mask(p1[lane], p2[lane]) as u64) << lane;
    }
    bits
}

// Fold the set lanes of `bits` into `best`, lowest lane (smallest k) first.
#[inline(always)]
pub(crate) fn reduce_lanes<const LANES: usize>(
    mut bits: u64,
    concat: SimdU32<LANES>,
    k: SimdU32<LANES>,
    best: &mut Best,
) where
    LaneCount<LANES>: SupportedLaneCount,
{
    while bits != 0 {
        let lane = bits.trailing_zeros() as usize;
        bits &= bits - 1;
        best.offer(concat[lane], k[lane]);
    }
}

//
// Batch searches
//

/// Batched search: lane products and concatenation, scalar bit-mask
/// validation per lane.
///
/// Algorithm, per group of `LANES` consecutive k (zero padded):
/// - `p1 = k`, `p2 = 2k` lane-wise.
/// - `concat = p1 * shift(p2) + p2` lane-wise.
/// - Every lane checked with [`is_pandigital_mask`], then range-checked
///   against `[10^8, 10^9 - 1]`.
/// - Surviving lanes folded into [`Best`] in ascending lane order.
#[inline(never)]
pub fn batch_search<const LANES: usize>(max_k: u32) -> SearchResult
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

        let valid = pandigital_bits(p1, p2) & in_pandigital_range(concat).to_bitmask();
        reduce_lanes(valid & batch.live_mask(), concat, k, &mut best);
    }

    best.finish()
}

/// Hybrid search: lane products, text validation per lane.
///
/// The products for 8 k values come from one vector multiply; each real lane
/// is then rendered to a stack buffer and checked with
/// [`is_pandigital_digits`].
#[inline(never)]
pub fn formatted_batch_search(max_k: u32) -> SearchResult {
    debug_assert!(max_k <= MAX_K);

    let mut best = Best::new();
    let mut batch: KBatch<BATCH_WIDTH> = KBatch::new();

    for start in batch_starts::<BATCH_WIDTH>(max_k) {
        batch.fill(start, max_k);
        let (p1, p2) = products(batch.to_simd());
        let p1 = p1.to_array();
        let p2 = p2.to_array();

        for lane in 0..batch.len() {
            let text = render_concat(p1[lane], p2[lane]);
            if text.len() != PANDIGITAL_DIGITS as usize {
                continue;
            }
            if is_pandigital_digits(&text) {
                best.offer(crate::parse_u32(&text), batch.lanes()[lane]);
            }
        }
    }

    best.finish()
}
