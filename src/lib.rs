#![feature(portable_simd)]

//! Pandigital Concatenated Products
//! =========================================
//!
//! Problem
//! -------
//! For k in [1..=9999], concatenate the decimal forms of k and 2k. Find the
//! largest concatenation that is a 1-9 pandigital number: exactly 9 digits,
//! every digit 1..=9 exactly once, no zero.
//!
//! The answer is `932718654` (k = 9327, 2k = 18654).
//!
//! Approach
//! --------
//! 1) Pandigital test (numeric, no strings):
//!    - Length gate: digit_count(p1) + digit_count(p2) must equal 9.
//!    - Peel digits with %10 and /10, first p1 then p2, into a 10-bit
//!      [`DigitSet`]. A zero digit or a repeated digit rejects immediately.
//!    - Accept iff the set ends up equal to [`DigitSet::FULL`] (bits 1..=9).
//!
//! 2) Concatenation:
//!    - `p1 * 10^digit_count(p2) + p2`, using the same digit decomposition as
//!      the test so the length gate and the value can never disagree.
//!
//! 3) Searches (all return the same [`SearchResult`]):
//!    - [`simple_search`]: scalar reference. Renders the concatenation as text
//!      and checks it with the character-array validator.
//!    - [`simd::formatted_batch_search`]: 8 lanes of products at a time, text
//!      validation per lane.
//!    - [`simd::batch_search`]: lane vectors for products and concatenation,
//!      bit-mask validation per lane.
//!    - [`wide::wide_search`]: products, concatenation and digit masks are all
//!      computed lane-wise; only the final reduction is scalar.
//!
//! 4) Reduction:
//!    - Every search folds candidates through [`Best::offer`] in ascending k.
//!      Strictly-greater replacement means the first k reaching a value wins.
//!
//! Performance notes
//! -----------------
//! - The lane searches never allocate; batches live in a 64-byte aligned
//!   stack buffer (see [`collections::KBatch`]).
//! - Lane division by 10 is a reciprocal multiply, not a hardware divide.
//! - Build with release settings (opt-level=3, lto=thin, codegen-units=1).
//!   Consider RUSTFLAGS="-C target-cpu=native" for local runs.
//!
//! Correctness notes
//! -----------------
//! - Partial trailing batches are padded with k = 0. Zero has no digits, so a
//!   padded lane can never pass the length gate or the range check.
//! - The searches are only defined for `max_k <= MAX_K`; above that 2k gains a
//!   sixth digit and the concatenation no longer fits the 9-digit window.

use arrayvec::ArrayVec;

pub mod collections;
pub mod config;
pub mod error;
pub mod harness;
pub mod simd;
pub mod wide;

/// Upper bound of the searched k range (inclusive).
pub const MAX_K: u32 = 9_999;

/// The only multiplier the searches use.
pub const MULTIPLIER: u32 = 2;

/// Required number of decimal digits in a pandigital concatenation.
pub const PANDIGITAL_DIGITS: u32 = 9;

/// Smallest 9-digit value.
pub const PANDIGITAL_MIN: u32 = 100_000_000;

/// Largest 9-digit value.
pub const PANDIGITAL_MAX: u32 = 999_999_999;

pub(crate) const POW10: [u32; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

//
// Result record
//

/// Outcome of one search run.
///
/// `max_val == 0` and `best_k == 0` mean no pandigital concatenation was
/// found. `best_n` is always [`MULTIPLIER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchResult {
    pub max_val: u32,
    pub best_k: u32,
    pub best_n: u32,
}

impl SearchResult {
    pub const EMPTY: SearchResult = SearchResult {
        max_val: 0,
        best_k: 0,
        best_n: MULTIPLIER,
    };

    #[inline]
    pub fn is_found(&self) -> bool {
        self.max_val != 0
    }

    /// Checks the record against its invariants: an empty record is all zeros,
    /// a found record is pandigital and splits back into `best_k` and
    /// `best_n * best_k`.
    pub fn is_well_formed(&self) -> bool {
        if self.best_n != MULTIPLIER {
            return false;
        }
        if !self.is_found() {
            return self.best_k == 0;
        }
        if !(1..=MAX_K).contains(&self.best_k) {
            return false;
        }

        let p1 = self.best_k;
        let p2 = self.best_k * self.best_n;
        is_pandigital_mask(p1, p2) && concat(p1, p2) == self.max_val
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Running maximum shared by every search.
#[derive(Clone, Copy, Debug)]
pub struct Best {
    max_val: u32,
    best_k: u32,
}

impl Best {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            max_val: 0,
            best_k: 0,
        }
    }

    /// Replace the current best only on a strictly greater value, so the first
    /// k offered for a value keeps it.
    #[inline(always)]
    pub fn offer(&mut self, value: u32, k: u32) {
        if value > self.max_val {
            self.max_val = value;
            self.best_k = k;
        }
    }

    #[inline(always)]
    pub fn finish(self) -> SearchResult {
        SearchResult {
            max_val: self.max_val,
            best_k: self.best_k,
            best_n: MULTIPLIER,
        }
    }
}

impl Default for Best {
    fn default() -> Self {
        Self::new()
    }
}

//
// Digit helpers
//

/// Presence set for decimal digits, bit `d` set when digit `d` was seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitSet(u16);

impl DigitSet {
    pub const EMPTY: DigitSet = DigitSet(0);

    /// Digits 1..=9 present, 0 absent.
    pub const FULL: DigitSet = DigitSet(0x3FE);

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn contains(self, digit: u32) -> bool {
        self.0 & (1 << digit) != 0
    }

    /// Adds `digit`; returns false if it was already present.
    #[inline(always)]
    pub fn insert(&mut self, digit: u32) -> bool {
        debug_assert!(digit <= 9);
        if self.contains(digit) {
            return false;
        }
        self.0 |= 1 << digit;
        true
    }

    #[inline(always)]
    pub const fn is_full(self) -> bool {
        self.0 == Self::FULL.0
    }
}

/// Number of decimal digits in `n`. Zero has none.
#[inline(always)]
pub fn digit_count(mut n: u32) -> u32 {
    let mut count = 0;
    while n > 0 {
        count += 1;
        n /= 10;
    }
    count
}

/// Decimal concatenation `p1 || p2`.
///
/// Callers keep the result within `u32`; every pair the searches build is at
/// most 9 digits plus one spare.
#[inline(always)]
pub fn concat(p1: u32, p2: u32) -> u32 {
    p1 * POW10[digit_count(p2) as usize] + p2
}

// Adds each digit of `n` to `seen`. Returns false on a zero or a repeat.
#[inline(always)]
fn insert_digits(mut n: u32, seen: &mut DigitSet) -> bool {
    while n > 0 {
        let d = n % 10;
        if d == 0 || !seen.insert(d) {
            return false;
        }
        n /= 10;
    }
    true
}

/// Return true if `p1 || p2` is a 1-9 pandigital number (bit-mask method).
#[inline(always)]
pub fn is_pandigital_mask(p1: u32, p2: u32) -> bool {
    if digit_count(p1) + digit_count(p2) != PANDIGITAL_DIGITS {
        return false;
    }

    let mut seen = DigitSet::EMPTY;
    insert_digits(p1, &mut seen) && insert_digits(p2, &mut seen) && seen.is_full()
}

/// Return true if `digits` is the ASCII text of a 1-9 pandigital number.
///
/// Character-array reference for [`is_pandigital_mask`].
#[inline]
pub fn is_pandigital_digits(digits: &[u8]) -> bool {
    if digits.len() != PANDIGITAL_DIGITS as usize {
        return false;
    }

    let mut used = [false; 10];
    for &c in digits {
        if !(b'1'..=b'9').contains(&c) {
            return false;
        }
        let d = (c - b'0') as usize;
        if used[d] {
            return false;
        }
        used[d] = true;
    }

    used[1..].iter().all(|&u| u)
}

/// Decimal text of `p1` followed by `p2`, without allocation.
#[inline]
pub fn render_concat(p1: u32, p2: u32) -> ArrayVec<u8, 20> {
    let mut out = ArrayVec::new_const();
    append_u32(&mut out, p1);
    append_u32(&mut out, p2);
    out
}

// Append decimal digits of `v`; zero renders as "0".
#[inline]
fn append_u32(dst: &mut ArrayVec<u8, 20>, mut v: u32) {
    if v == 0 {
        dst.push(b'0');
        return;
    }
    let mut tmp = [0u8; 10];
    let mut i = 0;
    while v > 0 {
        tmp[i] = b'0' + (v % 10) as u8;
        v /= 10;
        i += 1;
    }
    // reverse into dst
    for j in (0..i).rev() {
        dst.push(tmp[j]);
    }
}

/// Parse ASCII decimal digits. Only called on validated text.
#[inline]
fn parse_u32(bytes: &[u8]) -> u32 {
    let mut v: u32 = 0;
    for &c in bytes {
        v = v * 10 + (c - b'0') as u32;
    }
    v
}

//
// Scalar search
//

/// Scalar reference search over `k` in `[1..=max_k]`.
///
/// Algorithm:
/// - Render `k` and `2k` as decimal text.
/// - Skip unless the text is exactly 9 bytes long.
/// - Validate with [`is_pandigital_digits`], parse, and fold into [`Best`].
#[inline(never)]
pub fn simple_search(max_k: u32) -> SearchResult {
    debug_assert!(max_k <= MAX_K);

    let mut best = Best::new();
    for k in 1..=max_k {
        let p1 = k;
        let p2 = k * MULTIPLIER;
        let text = render_concat(p1, p2);

        if text.len() != PANDIGITAL_DIGITS as usize {
            continue;
        }

        if is_pandigital_digits(&text) {
            best.offer(parse_u32(&text), k);
        }
    }

    best.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: SearchResult = SearchResult {
        max_val: 932_718_654,
        best_k: 9_327,
        best_n: 2,
    };

    #[test]
    fn simple_search_full_range() {
        assert_eq!(simple_search(MAX_K), ANSWER);
    }

    #[test]
    fn simple_search_no_candidate_below_ten() {
        assert_eq!(simple_search(10), SearchResult::EMPTY);
        assert_eq!(simple_search(0), SearchResult::EMPTY);
    }

    #[test]
    fn simple_search_stops_before_answer() {
        let got = simple_search(9_326);
        assert!(got.is_found());
        assert!(got.max_val < ANSWER.max_val);
        assert!(got.best_k < 9_327);
        assert!(got.is_well_formed());
    }

    #[test]
    fn answer_reconstructs() {
        let text = ANSWER.max_val.to_string();
        let split = digit_count(ANSWER.best_k) as usize;
        let (left, right) = text.split_at(split);
        assert_eq!(left, ANSWER.best_k.to_string());
        assert_eq!(right, (ANSWER.best_k * ANSWER.best_n).to_string());
        assert!(ANSWER.is_well_formed());
    }

    #[test]
    fn digit_count_edges() {
        assert_eq!(digit_count(0), 0);
        assert_eq!(digit_count(1), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(19_998), 5);
        assert_eq!(digit_count(u32::MAX), 10);
    }

    #[test]
    fn concat_shifts_by_second_operand() {
        assert_eq!(concat(9_327, 18_654), 932_718_654);
        assert_eq!(concat(1, 2), 12);
        assert_eq!(concat(5, 10), 510);
        assert_eq!(concat(0, 0), 0);
    }

    #[test]
    fn mask_accepts_answer() {
        assert!(is_pandigital_mask(9_327, 18_654));
        assert!(is_pandigital_mask(6_729, 13_458));
    }

    #[test]
    fn mask_rejects_zero_digit() {
        // 5_000 || 10_000
        assert!(!is_pandigital_mask(5_000, 10_000));
        // 9 digits, one zero
        assert!(!is_pandigital_mask(1_234, 56_780));
    }

    #[test]
    fn mask_rejects_repeat() {
        assert!(!is_pandigital_mask(1_234, 56_781));
    }

    #[test]
    fn mask_rejects_wrong_length() {
        assert!(!is_pandigital_mask(123, 456));
        assert!(!is_pandigital_mask(12_345, 678_912));
        assert!(!is_pandigital_mask(0, 0));
    }

    #[test]
    fn digits_reference() {
        assert!(is_pandigital_digits(b"932718654"));
        assert!(is_pandigital_digits(b"123456789"));
        assert!(!is_pandigital_digits(b"12345678"));
        assert!(!is_pandigital_digits(b"1234567890"));
        assert!(!is_pandigital_digits(b"123456780"));
        assert!(!is_pandigital_digits(b"123456788"));
        assert!(!is_pandigital_digits(b"12345678a"));
    }

    #[test]
    fn mask_and_digits_agree_over_range() {
        for k in 1..=MAX_K {
            let p2 = k * MULTIPLIER;
            let text = render_concat(k, p2);
            assert_eq!(
                is_pandigital_mask(k, p2),
                is_pandigital_digits(&text),
                "validators disagree at k = {k}"
            );
        }
    }

    #[test]
    fn render_matches_format() {
        assert_eq!(&render_concat(9_327, 18_654)[..], b"932718654");
        assert_eq!(&render_concat(0, 0)[..], b"00");
        assert_eq!(&render_concat(7, 14)[..], b"714");
    }

    #[test]
    fn digit_set_insert_and_full() {
        let mut set = DigitSet::EMPTY;
        for d in 1..=9 {
            assert!(set.insert(d));
        }
        assert!(!set.insert(5));
        assert!(set.is_full());
        assert_eq!(set, DigitSet::FULL);
        assert_eq!(DigitSet::FULL.bits(), 0b11_1111_1110);
        assert!(!DigitSet::FULL.contains(0));
    }

    #[test]
    fn best_keeps_first_of_equal_values() {
        let mut best = Best::new();
        best.offer(500, 3);
        best.offer(500, 7);
        best.offer(400, 9);
        let got = best.finish();
        assert_eq!(got.max_val, 500);
        assert_eq!(got.best_k, 3);
        assert_eq!(got.best_n, MULTIPLIER);
    }

    #[test]
    fn best_without_offers_is_empty() {
        assert_eq!(Best::new().finish(), SearchResult::EMPTY);
        assert_eq!(SearchResult::default(), SearchResult::EMPTY);
    }

    #[test]
    fn malformed_results_detected() {
        assert!(SearchResult::EMPTY.is_well_formed());
        assert!(
            !SearchResult {
                max_val: 0,
                best_k: 4,
                best_n: 2
            }
            .is_well_formed()
        );
        assert!(
            !SearchResult {
                best_n: 3,
                ..ANSWER
            }
            .is_well_formed()
        );
        assert!(
            !SearchResult {
                best_k: 6_729,
                ..ANSWER
            }
            .is_well_formed()
        );
    }
}
