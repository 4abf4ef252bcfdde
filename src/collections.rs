use std::simd::{LaneCount, Simd, SupportedLaneCount};

#[repr(align(64))]
pub(crate) struct AlignedBuf<const CAP: usize>(pub(crate) [u32; CAP]);

/// One group of consecutive `k` values, one per lane.
///
/// Lanes past the end of the search range hold the sentinel `0`, which has no
/// decimal digits and therefore never validates.
#[repr(C)]
pub struct KBatch<const LANES: usize> {
    pub(crate) buf: AlignedBuf<LANES>, // starts at offset 0, 64 aligned.
    pub(crate) len: usize,
}

impl<const LANES: usize> KBatch<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            buf: AlignedBuf([0; LANES]),
            len: 0,
        }
    }

    /// Load `start, start + 1, ...` up to `max_k`, padding the rest with 0.
    #[inline(always)]
    pub fn fill(&mut self, start: u32, max_k: u32) {
        debug_assert!(start >= 1);
        let mut len = 0usize;
        for (lane, slot) in self.buf.0.iter_mut().enumerate() {
            let k = start + lane as u32;
            if k <= max_k {
                *slot = k;
                len += 1;
            } else {
                *slot = 0;
            }
        }
        self.len = len;
    }

    /// Number of real (non-padding) lanes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn lanes(&self) -> &[u32; LANES] {
        &self.buf.0
    }

    /// Bit `i` set for every real lane `i`.
    #[inline(always)]
    pub fn live_mask(&self) -> u64 {
        if self.len >= 64 {
            u64::MAX
        } else {
            (1u64 << self.len) - 1
        }
    }

    #[inline(always)]
    pub fn to_simd(&self) -> Simd<u32, LANES> {
        Simd::from_array(self.buf.0)
    }
}

impl<const LANES: usize> Default for KBatch<LANES>
where
    LaneCount<LANES>: SupportedLaneCount,
{
    fn default() -> Self {
        Self::new()
    }
}

/// First `k` of every group covering `[1..=max_k]` in steps of `LANES`.
#[inline(always)]
pub fn batch_starts<const LANES: usize>(max_k: u32) -> impl Iterator<Item = u32> {
    (1..=max_k).step_by(LANES)
}
