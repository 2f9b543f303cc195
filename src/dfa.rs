//! Lazily constructed deterministic transition tables.
//!
//! A DFA state is a `(regex, border-context)` pair interned in an
//! `IndexSet`; the insertion index is the state id, so `δ(q, α)` always
//! returns the same identity for the same pair.  Transition rows are
//! allocated per state and filled on demand by the derivative engine.
//!
//! Two automata share this machinery: the forward automaton (seeker and
//! find-end scans) persists begin-side border bits in the state context,
//! the reverse automaton persists end-side bits.  The [`Dir`] parameter
//! selects which border a `\n` transition implies.
//!
//! A configurable cap bounds the number of filled transitions; exceeding
//! it discards the oldest entries (sparing protected root states) and
//! relies on deterministic recomputation.

use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::ast::{ReBuilder, ReId};
use crate::derivative::Conds;
use crate::minterms::Minterms;

/// "Transition not yet computed" sentinel in a delta row.
const UNSET: u32 = u32::MAX;

/// Identity of an interned DFA state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateId(u32);

impl StateId {
    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Scan direction: decides which border side the state context persists
/// and which border a newline transition implies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Forward,
    Reverse,
}

impl Dir {
    /// Border implied *at the current position* by the character being
    /// consumed when it is a newline: the position is just before an
    /// end-of-line going forward, just after a beginning-of-line going
    /// backward.
    #[inline]
    fn char_cond(self) -> Conds {
        match self {
            Dir::Forward => Conds::EOL,
            Dir::Reverse => Conds::BOL,
        }
    }

    /// Context bit carried into the next state after consuming a
    /// newline.
    #[inline]
    fn carry_cond(self) -> Conds {
        match self {
            Dir::Forward => Conds::BOL,
            Dir::Reverse => Conds::EOL,
        }
    }

    /// Border at the edge of the scan (end of input going forward,
    /// beginning of input going backward), in addition to the line
    /// border.
    #[inline]
    fn edge_cond(self) -> Conds {
        match self {
            Dir::Forward => Conds::EOI,
            Dir::Reverse => Conds::BOI,
        }
    }
}

/// What follows the current position, for finality tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FinalPos {
    /// An ordinary character.
    Inner = 0,
    /// A line break.
    Line = 1,
    /// The input edge.
    Edge = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct StateKey {
    re: ReId,
    ctx: u8,
}

#[derive(Clone, Copy, Debug)]
struct StateInfo {
    dead: bool,
    /// Finality per [`FinalPos`] variant.
    finals: [bool; 3],
}

pub(crate) struct Dfa {
    dir: Dir,
    minterm_count: usize,
    states: IndexSet<StateKey>,
    info: Vec<StateInfo>,
    delta: Vec<Box<[u32]>>,
    protected: Vec<bool>,
    /// Filled `(state, minterm)` entries in insertion order, for
    /// eviction.
    fill_log: VecDeque<(u32, u16)>,
    /// Maximum filled transitions retained.
    limit: usize,
}

impl Dfa {
    pub fn new(dir: Dir, minterm_count: usize, limit: usize) -> Dfa {
        Dfa {
            dir,
            minterm_count,
            states: IndexSet::new(),
            info: Vec::new(),
            delta: Vec::new(),
            protected: Vec::new(),
            fill_log: VecDeque::new(),
            limit,
        }
    }

    /// Intern `(re, ctx)` and return its id.  `protect` pins the state's
    /// transitions against eviction (used for the scan entry states).
    pub fn intern(&mut self, bld: &ReBuilder, re: ReId, ctx: Conds, protect: bool) -> StateId {
        // Anchor-free regexes ignore border context entirely; collapsing
        // their context keeps the state space minimal.
        let ctx = if bld.contains_anchors(re) {
            ctx
        } else {
            Conds::none()
        };
        let key = StateKey {
            re,
            ctx: ctx.bits(),
        };
        if let Some(i) = self.states.get_index_of(&key) {
            if protect {
                self.protected[i] = true;
            }
            return StateId(i as u32);
        }
        let line = ctx.union(self.dir.char_cond());
        let edge = line.union(self.dir.edge_cond());
        let info = StateInfo {
            dead: re == bld.mk_empty(),
            finals: [
                bld.nullable_in(re, ctx),
                bld.nullable_in(re, line),
                bld.nullable_in(re, edge),
            ],
        };
        let (i, _) = self.states.insert_full(key);
        self.info.push(info);
        self.delta
            .push(vec![UNSET; self.minterm_count].into_boxed_slice());
        self.protected.push(protect);
        StateId(i as u32)
    }

    /// The memoized transition.  Computes (or recomputes, after
    /// eviction) the derivative on a miss; the result is identical
    /// either way.
    pub fn next(
        &mut self,
        bld: &mut ReBuilder,
        minterms: &Minterms,
        sid: StateId,
        mt: u16,
    ) -> StateId {
        let cached = self.delta[sid.idx()][usize::from(mt)];
        if cached != UNSET {
            return StateId(cached);
        }
        let key = self.states[sid.idx()];
        let is_nl = minterms.is_newline(mt);
        let mut conds = Conds::from_bits(key.ctx);
        let mut carry = Conds::none();
        if is_nl {
            conds = conds.union(self.dir.char_cond());
            carry = self.dir.carry_cond();
        }
        let dre = bld.derivative(key.re, minterms.set(mt), conds);
        let nid = self.intern(bld, dre, carry, false);
        self.delta[sid.idx()][usize::from(mt)] = nid.0;
        self.fill_log.push_back((sid.0, mt));
        self.evict_over_limit();
        nid
    }

    /// Drop the oldest filled transitions until under the cap, skipping
    /// protected states.  Bounded by one rotation of the log so an
    /// all-protected log terminates.
    fn evict_over_limit(&mut self) {
        let mut attempts = self.fill_log.len();
        while self.fill_log.len() > self.limit && attempts > 0 {
            attempts -= 1;
            let Some((s, m)) = self.fill_log.pop_front() else {
                return;
            };
            if self.protected[s as usize] {
                self.fill_log.push_back((s, m));
                continue;
            }
            self.delta[s as usize][usize::from(m)] = UNSET;
        }
    }

    #[inline]
    pub fn is_dead(&self, sid: StateId) -> bool {
        self.info[sid.idx()].dead
    }

    #[inline]
    pub fn is_final(&self, sid: StateId, pos: FinalPos) -> bool {
        self.info[sid.idx()].finals[pos as usize]
    }

    /// The regex component of a state, used by the prefilter to detect
    /// "still at the seek root".
    #[inline]
    pub fn state_re(&self, sid: StateId) -> ReId {
        self.states[sid.idx()].re
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.fill_log.len()
    }

    /// Heap footprint in bytes.
    pub fn memory_size(&self) -> usize {
        self.states.len() * std::mem::size_of::<StateKey>()
            + self.info.len() * std::mem::size_of::<StateInfo>()
            + self.delta.len() * self.minterm_count * std::mem::size_of::<u32>()
            + self.fill_log.len() * std::mem::size_of::<(u32, u16)>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CharSet;
    use crate::minterms::Classifier;

    fn compile(pattern: &str) -> (ReBuilder, ReId, Minterms, Classifier) {
        let mut bld = ReBuilder::new();
        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .expect("test pattern should parse");
        let root = bld.from_hir(&hir).expect("lowering should succeed");
        let mut preds: Vec<CharSet> = bld
            .collect_predicates(root)
            .into_iter()
            .map(|p| bld.pred(p).clone())
            .collect();
        if bld.contains_anchors(root) {
            preds.push(CharSet::from_char('\n', false));
        }
        let mts = Minterms::new(&preds).expect("minterm generation should succeed");
        let cls = Classifier::new(&mts);
        (bld, root, mts, cls)
    }

    #[test]
    fn test_transitions_are_memoized_identically() {
        let (mut bld, root, mts, cls) = compile("ab|ac");
        let mut dfa = Dfa::new(Dir::Forward, mts.count(), usize::MAX);
        let q0 = dfa.intern(&bld, root, Conds::none(), true);
        let a = cls.classify('a');
        let q1 = dfa.next(&mut bld, &mts, q0, a);
        let q1_again = dfa.next(&mut bld, &mts, q0, a);
        assert_eq!(q1, q1_again);
        let b = cls.classify('b');
        let q2 = dfa.next(&mut bld, &mts, q1, b);
        assert!(dfa.is_final(q2, FinalPos::Inner));
        assert!(dfa.is_final(q2, FinalPos::Edge));
    }

    #[test]
    fn test_dead_state() {
        let (mut bld, root, mts, cls) = compile("abc");
        let mut dfa = Dfa::new(Dir::Forward, mts.count(), usize::MAX);
        let q0 = dfa.intern(&bld, root, Conds::none(), true);
        let x = cls.classify('x');
        let qd = dfa.next(&mut bld, &mts, q0, x);
        assert!(dfa.is_dead(qd));
        // The dead state loops to itself.
        assert_eq!(dfa.next(&mut bld, &mts, qd, x), qd);
    }

    #[test]
    fn test_eviction_recomputes_same_identity() {
        let (mut bld, root, mts, cls) = compile("a[bc]d");
        let mut dfa = Dfa::new(Dir::Forward, mts.count(), 2);
        let q0 = dfa.intern(&bld, root, Conds::none(), false);
        let a = cls.classify('a');
        let b = cls.classify('b');
        let d = cls.classify('d');
        let q1 = dfa.next(&mut bld, &mts, q0, a);
        let q2 = dfa.next(&mut bld, &mts, q1, b);
        let q3 = dfa.next(&mut bld, &mts, q2, d);
        assert!(dfa.transition_count() <= 2);
        // Recomputation after eviction yields the same states.
        assert_eq!(dfa.next(&mut bld, &mts, q0, a), q1);
        assert_eq!(dfa.next(&mut bld, &mts, q1, b), q2);
        assert_eq!(dfa.next(&mut bld, &mts, q2, d), q3);
    }

    #[test]
    fn test_anchor_context_splits_states() {
        let (mut bld, root, mts, _cls) = compile("^a");
        let mut dfa = Dfa::new(Dir::Forward, mts.count(), usize::MAX);
        let at_start = dfa.intern(&bld, root, Conds::BOI.union(Conds::BOL), false);
        let midline = dfa.intern(&bld, root, Conds::none(), false);
        assert_ne!(at_start, midline);
        let a = mts
            .iter()
            .position(|s| s.contains(u32::from(b'a')))
            .map(|i| i as u16)
            .expect("some minterm contains `a`");
        let q_hit = dfa.next(&mut bld, &mts, at_start, a);
        assert!(dfa.is_final(q_hit, FinalPos::Inner));
        let q_miss = dfa.next(&mut bld, &mts, midline, a);
        assert!(dfa.is_dead(q_miss));
    }
}
