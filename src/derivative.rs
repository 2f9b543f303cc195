//! Brzozowski derivatives over predicate minterms.
//!
//! The derivative of a regex `R` with respect to a character class `α`
//! accepts exactly the suffixes `w` such that `c·w ∈ L(R)` for `c ∈ α`.
//! At run time `α` is always a minterm of the compiled pattern, so a
//! singleton predicate is either fully inside or fully outside `α` and
//! the leaf case reduces to one membership test on a representative.
//!
//! Anchors never consume characters; they are resolved through the set
//! of border conditions true at the current input position ([`Conds`]).
//! A leading anchor contributes ε when its condition holds and ∅
//! otherwise, which surfaces in the nullability test of the `Concat`
//! case — this is the border-derivative step, fused into the character
//! derivative.

use crate::ast::{ReBuilder, ReId, ReKind, UNBOUNDED};
use crate::charset::CharSet;

/// A set of border conditions holding at an input position.
///
/// Forward scans persist the begin-side bits (`BOI`/`BOL`) in the DFA
/// state context; reverse scans persist the end-side bits (`EOI`/`EOL`).
/// The side implied by the character being consumed is added per
/// transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Conds(u8);

impl Conds {
    /// Beginning of input precedes this position.
    pub const BOI: Conds = Conds(1 << 0);
    /// Beginning of a line precedes this position.
    pub const BOL: Conds = Conds(1 << 1);
    /// End of input follows this position.
    pub const EOI: Conds = Conds(1 << 2);
    /// End of a line follows this position.
    pub const EOL: Conds = Conds(1 << 3);

    #[inline]
    pub fn none() -> Conds {
        Conds(0)
    }

    #[inline]
    pub fn union(self, other: Conds) -> Conds {
        Conds(self.0 | other.0)
    }

    #[inline]
    pub fn has(self, other: Conds) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn from_bits(bits: u8) -> Conds {
        Conds(bits)
    }
}

impl ReBuilder {
    /// Nullability under a set of border conditions: like the cached
    /// `nullable` flag, but an anchor counts as ε exactly when its
    /// condition is in `conds`.
    pub(crate) fn nullable_in(&self, id: ReId, conds: Conds) -> bool {
        if !self.contains_anchors(id) {
            return self.nullable(id);
        }
        match *self.kind(id) {
            ReKind::Empty | ReKind::Singleton(_) => false,
            ReKind::Epsilon | ReKind::Watchdog(_) => true,
            ReKind::StartAnchor => conds.has(Conds::BOI),
            ReKind::BolAnchor => conds.has(Conds::BOL),
            ReKind::EndAnchor => conds.has(Conds::EOI),
            ReKind::EolAnchor => conds.has(Conds::EOL),
            ReKind::Concat(x, y) => self.nullable_in(x, conds) && self.nullable_in(y, conds),
            ReKind::Or(ref children) => children.iter().any(|&c| self.nullable_in(c, conds)),
            ReKind::And(ref children) => children.iter().all(|&c| self.nullable_in(c, conds)),
            ReKind::Loop { body, lo, .. } => lo == 0 || self.nullable_in(body, conds),
            ReKind::Ite { cond, then, els } => {
                if self.nullable_in(cond, conds) {
                    self.nullable_in(then, conds)
                } else {
                    self.nullable_in(els, conds)
                }
            }
        }
    }

    /// The derivative of `id` with respect to the minterm `minterm`,
    /// taken at a position where the border conditions `conds` hold.
    pub(crate) fn derivative(&mut self, id: ReId, minterm: &CharSet, conds: Conds) -> ReId {
        let kind = self.kind(id).clone();
        match kind {
            ReKind::Empty
            | ReKind::Epsilon
            | ReKind::StartAnchor
            | ReKind::EndAnchor
            | ReKind::BolAnchor
            | ReKind::EolAnchor
            | ReKind::Watchdog(_) => self.mk_empty(),
            ReKind::Singleton(p) => {
                // Minterm invariant: `minterm` is entirely inside or
                // entirely outside the predicate, so one representative
                // decides.
                let inside = match minterm.min_char() {
                    Some(c) => self.pred(p).contains(c),
                    None => false,
                };
                if inside {
                    self.mk_epsilon()
                } else {
                    self.mk_empty()
                }
            }
            ReKind::Or(children) => {
                let mut ds = Vec::with_capacity(children.len());
                for &c in children.iter() {
                    ds.push(self.derivative(c, minterm, conds));
                }
                self.mk_or(ds)
            }
            ReKind::And(children) => {
                let mut ds = Vec::with_capacity(children.len());
                for &c in children.iter() {
                    ds.push(self.derivative(c, minterm, conds));
                }
                self.mk_and(ds)
            }
            ReKind::Concat(x, y) => {
                let dx = self.derivative(x, minterm, conds);
                let left = self.mk_concat(dx, y);
                if self.nullable_in(x, conds) {
                    let dy = self.derivative(y, minterm, conds);
                    self.mk_or(vec![left, dy])
                } else {
                    left
                }
            }
            ReKind::Loop { body, lo, hi, lazy } => {
                if hi == 0 {
                    return self.mk_empty();
                }
                let db = self.derivative(body, minterm, conds);
                if db == self.mk_empty() {
                    return self.mk_empty();
                }
                let rest = self.loop_node(
                    body,
                    lo.saturating_sub(1),
                    if hi == UNBOUNDED { UNBOUNDED } else { hi - 1 },
                    lazy,
                );
                self.mk_concat(db, rest)
            }
            ReKind::Ite { cond, then, els } => {
                let dc = self.derivative(cond, minterm, conds);
                let dt = self.derivative(then, minterm, conds);
                let de = self.derivative(els, minterm, conds);
                self.mk_ite(dc, dt, de)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(b: &mut ReBuilder, pattern: &str) -> ReId {
        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .expect("test pattern should parse");
        b.from_hir(&hir).expect("lowering should succeed")
    }

    fn ch(c: char) -> CharSet {
        CharSet::from_char(c, false)
    }

    /// Accept-test by folding derivatives over the characters of `input`
    /// with no border conditions (no anchors involved).
    fn accepts(b: &mut ReBuilder, re: ReId, input: &str) -> bool {
        let mut cur = re;
        for c in input.chars() {
            cur = b.derivative(cur, &ch(c), Conds::none());
        }
        b.nullable(cur)
    }

    #[test]
    fn test_derivative_of_literal() {
        let mut b = ReBuilder::new();
        let re = lower(&mut b, "ab");
        let d = b.derivative(re, &ch('a'), Conds::none());
        let just_b = lower(&mut b, "b");
        assert_eq!(d, just_b);
        let dead = b.derivative(re, &ch('x'), Conds::none());
        assert_eq!(dead, b.mk_empty());
    }

    #[test]
    fn test_derivative_of_loop() {
        let mut b = ReBuilder::new();
        let re = lower(&mut b, "a{2,4}");
        let d1 = b.derivative(re, &ch('a'), Conds::none());
        assert!(!b.nullable(d1));
        let d2 = b.derivative(d1, &ch('a'), Conds::none());
        assert!(b.nullable(d2));
        let d3 = b.derivative(d2, &ch('a'), Conds::none());
        let d4 = b.derivative(d3, &ch('a'), Conds::none());
        assert!(b.nullable(d4));
        let d5 = b.derivative(d4, &ch('a'), Conds::none());
        assert_eq!(d5, b.mk_empty());
    }

    #[test]
    fn test_derivative_distributes_over_or() {
        let mut b = ReBuilder::new();
        let re = lower(&mut b, "ab|ac");
        let d = b.derivative(re, &ch('a'), Conds::none());
        let lit_b = b.mk_char('b', false);
        let lit_c = b.mk_char('c', false);
        let expect = b.mk_or(vec![lit_b, lit_c]);
        assert_eq!(d, expect);
    }

    #[test]
    fn test_derivative_nullable_concat_split() {
        let mut b = ReBuilder::new();
        // `a?b`: deriving by `b` must take the skip path through `a?`.
        let re = lower(&mut b, "a?b");
        let d = b.derivative(re, &ch('b'), Conds::none());
        assert!(b.nullable(d));
        assert!(accepts(&mut b, re, "ab"));
        assert!(accepts(&mut b, re, "b"));
        assert!(!accepts(&mut b, re, "a"));
    }

    #[test]
    fn test_derivative_soundness_small_enumeration() {
        use itertools::Itertools;

        let mut b = ReBuilder::new();
        let patterns = ["a(b|c)*", "(ab|ba){1,2}", "a{0,2}b", "(a|bc)(c|b)"];
        for pattern in patterns {
            let re = lower(&mut b, pattern);
            let oracle = regex::Regex::new(&format!("^(?:{})$", pattern))
                .expect("oracle pattern should parse");
            for len in 0..=4usize {
                for word in std::iter::repeat_n(['a', 'b', 'c'], len)
                    .map(|cs| cs.into_iter())
                    .multi_cartesian_product()
                {
                    let input: String = word.into_iter().collect();
                    assert_eq!(
                        accepts(&mut b, re, &input),
                        oracle.is_match(&input),
                        "pattern `{}` input `{}`",
                        pattern,
                        input
                    );
                }
            }
        }
    }

    #[test]
    fn test_anchor_nullability_in_context() {
        let mut b = ReBuilder::new();
        let re = lower(&mut b, "^a");
        // `^a` is never nullable, but its anchor gates the derivative.
        let at_bol = Conds::BOI.union(Conds::BOL);
        let d_start = b.derivative(re, &ch('a'), at_bol);
        assert!(b.nullable(d_start));
        let d_mid = b.derivative(re, &ch('a'), Conds::none());
        assert_eq!(d_mid, b.mk_empty());
    }

    #[test]
    fn test_end_anchor_nullable_at_end() {
        let mut b = ReBuilder::new();
        let re = lower(&mut b, "a$");
        let d = b.derivative(re, &ch('a'), Conds::none());
        assert!(!b.nullable_in(d, Conds::none()));
        assert!(b.nullable_in(d, Conds::EOL));
        assert!(b.nullable_in(d, Conds::EOI.union(Conds::EOL)));
    }

    #[test]
    fn test_watchdog_is_transparent_to_nullability() {
        let mut b = ReBuilder::new();
        let a = b.mk_char('a', false);
        let wd = b.mk_watchdog(1);
        let re = b.mk_concat(a, wd);
        let d = b.derivative(re, &ch('a'), Conds::none());
        assert!(b.nullable(d));
    }

    #[test]
    fn test_empty_enumeration_for_zero_len_words() {
        let mut b = ReBuilder::new();
        let re = lower(&mut b, "a*");
        assert!(accepts(&mut b, re, ""));
        assert!(accepts(&mut b, re, "aaa"));
        assert!(!accepts(&mut b, re, "ab"));
    }
}
