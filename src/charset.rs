//! Sets of Unicode code points represented as ordered interval sequences.
//!
//! A [`CharSet`] is the predicate type of the engine: every transition of
//! the symbolic automaton is labeled with one.  The representation is a
//! sorted sequence of inclusive, disjoint, non-adjacent `(lo, hi)` ranges,
//! so structural equality coincides with set equality and every Boolean
//! operation preserves the canonical form.

use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

/// Largest Unicode scalar value.  The alphabet of the engine is
/// `0..=MAX_CHAR`; inputs only ever produce scalar values, but predicates
/// may name any code point in that span.
pub const MAX_CHAR: u32 = 0x0010_FFFF;

/// A set of code points in canonical ordered-disjoint-merged form.
///
/// Invariants (maintained by every constructor and operation):
/// ranges are sorted ascending, inclusive, pairwise disjoint, and
/// non-adjacent (`hi + 1 < next.lo`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
}

impl CharSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// The full alphabet `0..=MAX_CHAR`.
    pub fn full() -> Self {
        Self {
            ranges: vec![(0, MAX_CHAR)],
        }
    }

    /// A single character, optionally closed under simple case folding.
    pub fn from_char(c: char, fold: bool) -> Self {
        Self::from_range(c as u32, c as u32, fold)
    }

    /// An inclusive code point range, optionally closed under simple case
    /// folding.  Bounds are clamped to the alphabet; an inverted range is
    /// the empty set.
    pub fn from_range(lo: u32, hi: u32, fold: bool) -> Self {
        let hi = hi.min(MAX_CHAR);
        if lo > hi {
            return Self::empty();
        }
        let set = Self {
            ranges: vec![(lo, hi)],
        };
        if fold {
            set.case_close()
        } else {
            set
        }
    }

    /// Build a set from arbitrary inclusive ranges, normalizing to
    /// canonical form.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut v: Vec<(u32, u32)> = ranges
            .into_iter()
            .map(|(lo, hi)| (lo, hi.min(MAX_CHAR)))
            .filter(|&(lo, hi)| lo <= hi)
            .collect();
        v.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(v.len());
        for (lo, hi) in v {
            match merged.last_mut() {
                // Merge overlapping and adjacent ranges.
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => merged.push((lo, hi)),
            }
        }
        Self { ranges: merged }
    }

    /// The canonical ranges, sorted and disjoint.
    #[inline]
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether the set denotes a non-empty language of one-character
    /// strings.
    #[inline]
    pub fn is_satisfiable(&self) -> bool {
        !self.ranges.is_empty()
    }

    /// Whether the set is the whole alphabet.
    pub fn is_full(&self) -> bool {
        self.ranges == [(0, MAX_CHAR)]
    }

    /// Membership test by binary search over the range sequence.
    pub fn contains(&self, c: u32) -> bool {
        let i = self.ranges.partition_point(|&(_, hi)| hi < c);
        match self.ranges.get(i) {
            Some(&(lo, _)) => lo <= c,
            None => false,
        }
    }

    /// Structural equivalence.  Canonical form makes this the same as
    /// language equivalence.
    #[inline]
    pub fn equivalent(&self, other: &CharSet) -> bool {
        self == other
    }

    /// The smallest member, used as the representative when testing a
    /// minterm against a predicate.
    pub fn min_char(&self) -> Option<u32> {
        self.ranges.first().map(|&(lo, _)| lo)
    }

    /// `Some(c)` when the set contains exactly one code point.
    pub fn single_char(&self) -> Option<u32> {
        match self.ranges.as_slice() {
            [(lo, hi)] if lo == hi => Some(*lo),
            _ => None,
        }
    }

    /// Number of code points in the set.
    pub fn count(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| u64::from(hi - lo) + 1)
            .sum()
    }

    /// Whether every member is an ASCII code point.
    pub fn is_ascii(&self) -> bool {
        self.ranges.last().map_or(true, |&(_, hi)| hi < 0x80)
    }

    /// Set union.
    pub fn union(&self, other: &CharSet) -> CharSet {
        Self::from_ranges(
            self.ranges
                .iter()
                .chain(other.ranges.iter())
                .copied()
                .collect::<Vec<_>>(),
        )
    }

    /// Set intersection, by a two-pointer sweep over both range lists.
    pub fn intersect(&self, other: &CharSet) -> CharSet {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (alo, ahi) = self.ranges[i];
            let (blo, bhi) = other.ranges[j];
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if ahi < bhi {
                i += 1;
            } else {
                j += 1;
            }
        }
        // The sweep emits sorted disjoint non-adjacent ranges already.
        CharSet { ranges: out }
    }

    /// Set complement with respect to the full alphabet.
    pub fn complement(&self) -> CharSet {
        let mut out = Vec::new();
        let mut next = 0u32;
        for &(lo, hi) in &self.ranges {
            if lo > next {
                out.push((next, lo - 1));
            }
            if hi >= MAX_CHAR {
                return CharSet { ranges: out };
            }
            next = hi + 1;
        }
        out.push((next, MAX_CHAR));
        CharSet { ranges: out }
    }

    /// Set difference `self \ other`.
    pub fn minus(&self, other: &CharSet) -> CharSet {
        self.intersect(&other.complement())
    }

    /// Close the set under Unicode simple case folding, via the
    /// `regex-syntax` folding tables.  Code points with no scalar-value
    /// representation (the surrogate gap) pass through unchanged.
    pub fn case_close(&self) -> CharSet {
        let mut class = ClassUnicode::empty();
        for &(lo, hi) in &self.ranges {
            for (a, b) in split_scalar(lo, hi) {
                if let (Some(ca), Some(cb)) = (char::from_u32(a), char::from_u32(b)) {
                    class.push(ClassUnicodeRange::new(ca, cb));
                }
            }
        }
        if class.try_case_fold_simple().is_err() {
            return self.clone();
        }
        let folded = CharSet::from_ranges(
            class
                .ranges()
                .iter()
                .map(|r| (r.start() as u32, r.end() as u32)),
        );
        // Keep any surrogate-gap members the fold could not see.
        self.union(&folded)
    }

    /// Write the ranges form: lowercase-hex bounds, `lo-hi` per range
    /// (collapsed to `lo` for single points), joined by `,`.
    pub fn write_ranges_text(&self, out: &mut String) {
        use std::fmt::Write;
        for (i, &(lo, hi)) in self.ranges.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if lo == hi {
                let _ = write!(out, "{:x}", lo);
            } else {
                let _ = write!(out, "{:x}-{:x}", lo, hi);
            }
        }
    }

    /// Parse the ranges form produced by
    /// [`write_ranges_text`](Self::write_ranges_text).  Returns `None` on
    /// any malformed bound or separator.
    pub fn from_ranges_text(text: &str) -> Option<CharSet> {
        if text.is_empty() {
            return Some(CharSet::empty());
        }
        let mut ranges = Vec::new();
        for part in text.split(',') {
            let (lo, hi) = match part.split_once('-') {
                Some((a, b)) => (parse_hex(a)?, parse_hex(b)?),
                None => {
                    let c = parse_hex(part)?;
                    (c, c)
                }
            };
            if lo > hi || hi > MAX_CHAR {
                return None;
            }
            ranges.push((lo, hi));
        }
        Some(CharSet::from_ranges(ranges))
    }
}

fn parse_hex(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 6 {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

/// Split an inclusive range into at most two subranges avoiding the
/// UTF-16 surrogate gap, so each piece converts to `char` bounds.
fn split_scalar(lo: u32, hi: u32) -> impl Iterator<Item = (u32, u32)> {
    const SUR_LO: u32 = 0xD800;
    const SUR_HI: u32 = 0xDFFF;
    let below = (lo < SUR_LO).then(|| (lo, hi.min(SUR_LO - 1)));
    let above = (hi > SUR_HI).then(|| (lo.max(SUR_HI + 1), hi));
    below.into_iter().chain(above)
}

// ---------------------------------------------------------------------------
// Minterm generation
// ---------------------------------------------------------------------------

/// Compute the non-empty atoms of the Boolean algebra generated by
/// `preds`: start from `[⊤]` and refine each atom by `p` / `¬p` for every
/// predicate, keeping the non-empty halves.
///
/// The result is a partition of the alphabet: atoms are pairwise disjoint
/// and their union is `⊤`.  Every predicate in `preds` is a union of
/// atoms, so a derivative taken with respect to an atom never straddles a
/// predicate boundary.
pub fn generate_minterms(preds: &[CharSet]) -> Vec<CharSet> {
    let mut atoms = vec![CharSet::full()];
    for p in preds {
        let np = p.complement();
        let mut next = Vec::with_capacity(atoms.len() * 2);
        for a in &atoms {
            let inside = a.intersect(p);
            if !inside.is_empty() {
                next.push(inside);
            }
            let outside = a.intersect(&np);
            if !outside.is_empty() {
                next.push(outside);
            }
        }
        atoms = next;
    }
    atoms
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ranges_normalizes() {
        let s = CharSet::from_ranges([(0x61, 0x63), (0x62, 0x66), (0x68, 0x68), (0x67, 0x67)]);
        assert_eq!(s.ranges(), &[(0x61, 0x68)]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(CharSet::from_range(0x62, 0x61, false).is_empty());
    }

    #[test]
    fn test_contains() {
        let s = CharSet::from_ranges([(0x30, 0x39), (0x61, 0x7a)]);
        assert!(s.contains(0x30));
        assert!(s.contains(0x39));
        assert!(s.contains(0x6d));
        assert!(!s.contains(0x2f));
        assert!(!s.contains(0x3a));
        assert!(!s.contains(0x7b));
    }

    #[test]
    fn test_union_intersect_complement() {
        let a = CharSet::from_ranges([(0x61, 0x66)]);
        let b = CharSet::from_ranges([(0x64, 0x6a)]);
        assert_eq!(a.union(&b).ranges(), &[(0x61, 0x6a)]);
        assert_eq!(a.intersect(&b).ranges(), &[(0x64, 0x66)]);
        let c = a.complement();
        assert!(!c.contains(0x61));
        assert!(c.contains(0x60));
        assert!(c.contains(0x67));
        assert_eq!(a.complement().complement(), a);
    }

    #[test]
    fn test_complement_of_empty_and_full() {
        assert!(CharSet::empty().complement().is_full());
        assert!(CharSet::full().complement().is_empty());
    }

    #[test]
    fn test_minus() {
        let a = CharSet::from_ranges([(0x61, 0x7a)]);
        let b = CharSet::from_ranges([(0x6d, 0x6d)]);
        let d = a.minus(&b);
        assert!(d.contains(0x61));
        assert!(!d.contains(0x6d));
        assert!(d.contains(0x6e));
        assert_eq!(d.ranges().len(), 2);
    }

    #[test]
    fn test_single_and_min_char() {
        assert_eq!(CharSet::from_char('a', false).single_char(), Some(0x61));
        assert_eq!(CharSet::from_ranges([(0x61, 0x62)]).single_char(), None);
        assert_eq!(CharSet::from_ranges([(0x61, 0x62)]).min_char(), Some(0x61));
        assert_eq!(CharSet::empty().min_char(), None);
    }

    #[test]
    fn test_case_close_ascii() {
        let s = CharSet::from_char('a', true);
        assert!(s.contains('a' as u32));
        assert!(s.contains('A' as u32));
        assert_eq!(s.count(), 2);
        // Non-letters fold to themselves.
        let d = CharSet::from_char('7', true);
        assert_eq!(d.single_char(), Some('7' as u32));
    }

    #[test]
    fn test_case_close_range() {
        let s = CharSet::from_range('a' as u32, 'z' as u32, true);
        assert!(s.contains('Q' as u32));
        assert!(s.contains('q' as u32));
        // Simple folding also pulls in the Kelvin sign for `k`.
        assert!(s.contains(0x212A));
    }

    #[test]
    fn test_ranges_text_round_trip() {
        let s = CharSet::from_ranges([(0x30, 0x39), (0x41, 0x41), (0x10000, 0x10010)]);
        let mut text = String::new();
        s.write_ranges_text(&mut text);
        assert_eq!(text, "30-39,41,10000-10010");
        assert_eq!(CharSet::from_ranges_text(&text), Some(s));
        assert_eq!(CharSet::from_ranges_text(""), Some(CharSet::empty()));
        assert_eq!(CharSet::from_ranges_text("zz"), None);
        assert_eq!(CharSet::from_ranges_text("62-61"), None);
    }

    #[test]
    fn test_minterms_partition() {
        let preds = [
            CharSet::from_ranges([(0x30, 0x39)]),
            CharSet::from_ranges([(0x35, 0x5a)]),
            CharSet::from_char('\n', false),
        ];
        let atoms = generate_minterms(&preds);
        // Pairwise disjoint.
        for (i, a) in atoms.iter().enumerate() {
            for b in &atoms[i + 1..] {
                assert!(a.intersect(b).is_empty(), "atoms overlap");
            }
        }
        // Union is the full alphabet.
        let mut union = CharSet::empty();
        for a in &atoms {
            union = union.union(a);
        }
        assert!(union.is_full());
        // Every predicate is a union of whole atoms.
        for p in &preds {
            for a in &atoms {
                let x = a.intersect(p);
                assert!(x.is_empty() || x == *a, "atom straddles a predicate");
            }
        }
    }

    #[test]
    fn test_minterms_of_nothing_is_top() {
        let atoms = generate_minterms(&[]);
        assert_eq!(atoms.len(), 1);
        assert!(atoms[0].is_full());
    }
}
