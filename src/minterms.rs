//! Minterm generation and the character → minterm-id classifier.
//!
//! The predicates mentioned in a compiled pattern induce a partition of
//! the alphabet: each minterm is a non-empty atom of the Boolean algebra
//! they generate.  Derivatives are only ever taken with respect to
//! minterms, so the transition table of the lazy DFA is indexed by
//! `(state, minterm-id)` and its width is the minterm count, not the
//! alphabet size.
//!
//! Classification is a dense table over the BMP (one `u16` per code
//! point) with a sorted range list for the supplementary planes.

use crate::charset::{self, CharSet};
use crate::Error;

/// Size of the dense BMP lookup table.
const BMP_LEN: usize = 0x1_0000;

/// The ordered list of minterms of a compiled pattern.
#[derive(Debug)]
pub(crate) struct Minterms {
    sets: Vec<CharSet>,
    /// Id of the minterm containing `\n`, when line borders matter to
    /// the pattern.
    nl: Option<u16>,
}

impl Minterms {
    /// Partition the alphabet by `preds`.  Fails if the partition does
    /// not fit the `u16` id space (which would take a pattern with tens
    /// of thousands of distinct class boundaries).
    pub fn new(preds: &[CharSet]) -> Result<Minterms, Error> {
        let sets = charset::generate_minterms(preds);
        if sets.len() > usize::from(u16::MAX) {
            return Err(Error::InvalidRegex(format!(
                "pattern induces {} character classes, above the supported maximum",
                sets.len()
            )));
        }
        let nl = sets
            .iter()
            .position(|s| s.contains(u32::from(b'\n')))
            .map(|i| i as u16);
        Ok(Minterms { sets, nl })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn set(&self, id: u16) -> &CharSet {
        &self.sets[usize::from(id)]
    }

    /// Whether consuming a character of this minterm crosses a line
    /// border.  Minterms never straddle the `\n` singleton when the
    /// pattern mentions line anchors, so the id test is exact there.
    #[inline]
    pub fn is_newline(&self, id: u16) -> bool {
        self.nl == Some(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharSet> {
        self.sets.iter()
    }
}

/// Character → minterm-id lookup: dense for the BMP, sorted ranges
/// above it.
#[derive(Debug)]
pub(crate) struct Classifier {
    bmp: Box<[u16]>,
    astral: Vec<(u32, u32, u16)>,
}

impl Classifier {
    pub fn new(minterms: &Minterms) -> Classifier {
        let mut bmp = vec![0u16; BMP_LEN].into_boxed_slice();
        let mut astral = Vec::new();
        for (id, set) in minterms.iter().enumerate() {
            let id = id as u16;
            for &(lo, hi) in set.ranges() {
                if lo < BMP_LEN as u32 {
                    let end = hi.min(BMP_LEN as u32 - 1);
                    for slot in &mut bmp[lo as usize..=end as usize] {
                        *slot = id;
                    }
                }
                if hi >= BMP_LEN as u32 {
                    astral.push((lo.max(BMP_LEN as u32), hi, id));
                }
            }
        }
        astral.sort_unstable();
        Classifier { bmp, astral }
    }

    /// The id of the unique minterm containing `c`.
    #[inline]
    pub fn classify(&self, c: char) -> u16 {
        let c = c as u32;
        if (c as usize) < BMP_LEN {
            return self.bmp[c as usize];
        }
        let i = self.astral.partition_point(|&(_, hi, _)| hi < c);
        match self.astral.get(i) {
            // The minterms cover the alphabet, so the range at the
            // partition point always contains `c`.
            Some(&(_, _, id)) => id,
            None => 0,
        }
    }

    /// Heap footprint in bytes.
    pub fn memory_size(&self) -> usize {
        self.bmp.len() * std::mem::size_of::<u16>()
            + self.astral.len() * std::mem::size_of::<(u32, u32, u16)>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ranges: &[(u32, u32)]) -> CharSet {
        CharSet::from_ranges(ranges.iter().copied())
    }

    #[test]
    fn test_minterms_partition_and_count() {
        let preds = [set(&[(0x61, 0x7a)]), set(&[(0x61, 0x63)])];
        let mts = Minterms::new(&preds).expect("minterm generation should succeed");
        // [a-c], [d-z], and the rest of the alphabet.
        assert_eq!(mts.count(), 3);
        let mut union = CharSet::empty();
        for (i, a) in mts.iter().enumerate() {
            for b in mts.iter().skip(i + 1) {
                assert!(a.intersect(b).is_empty());
            }
            union = union.union(a);
        }
        assert!(union.is_full());
    }

    #[test]
    fn test_classifier_agrees_with_sets() {
        let preds = [
            set(&[(0x30, 0x39)]),
            set(&[(0x41, 0x5a), (0x61, 0x7a)]),
            CharSet::from_char('\n', false),
            set(&[(0x1F600, 0x1F64F)]),
        ];
        let mts = Minterms::new(&preds).expect("minterm generation should succeed");
        let cls = Classifier::new(&mts);
        for c in ['0', '9', 'A', 'z', '\n', ' ', '\u{1F600}', '\u{2603}', '\u{10FFFF}'] {
            let id = cls.classify(c);
            assert!(
                mts.set(id).contains(c as u32),
                "classify({:?}) -> {} but the minterm does not contain it",
                c,
                id
            );
        }
    }

    #[test]
    fn test_newline_minterm() {
        let preds = [CharSet::from_char('\n', false), set(&[(0x61, 0x7a)])];
        let mts = Minterms::new(&preds).expect("minterm generation should succeed");
        let cls = Classifier::new(&mts);
        let nl_id = cls.classify('\n');
        assert!(mts.is_newline(nl_id));
        assert!(!mts.is_newline(cls.classify('a')));
    }

    #[test]
    fn test_no_predicates_single_minterm() {
        let mts = Minterms::new(&[]).expect("minterm generation should succeed");
        assert_eq!(mts.count(), 1);
        let cls = Classifier::new(&mts);
        assert_eq!(cls.classify('x'), 0);
        assert_eq!(cls.classify('\u{10000}'), 0);
    }
}
