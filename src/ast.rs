//! Hash-consed symbolic regex AST and its builder.
//!
//! Nodes are interned in an [`IndexSet`]: the insertion index *is* the
//! node identity ([`ReId`]), so structurally equal constructions share an
//! id and deep equality is a single integer compare.  Children are
//! referenced downward-only by id; the builder owns the arena for the
//! lifetime of a compiled matcher.
//!
//! All `mk_*` constructors normalize bottom-up, so a node is canonical
//! the moment it exists: concatenations are right-associated with ε/∅
//! absorbed, alternations and conjunctions are flattened sorted sets with
//! their absorbing elements applied, and bounded zero-loops in an
//! alternation are folded to the maximal bound per `(body, tail)` pair.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use regex_syntax::hir::{self, Hir, HirKind};

use crate::charset::CharSet;
use crate::Error;

/// Loop upper bound standing for ∞.
pub const UNBOUNDED: u32 = u32::MAX;

/// Index of an interned predicate in the builder's predicate table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredId(u32);

impl PredId {
    #[inline]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identity of an interned regex node.  Equal ids mean structurally
/// equal regexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReId(u32);

impl ReId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A symbolic regex node.  Children are ids into the owning builder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ReKind {
    /// The empty language ∅.
    Empty,
    /// The language containing only the empty string.
    Epsilon,
    /// Any one character satisfying the predicate.
    Singleton(PredId),
    /// Sequence.  The left child is never itself a `Concat`.
    Concat(ReId, ReId),
    /// Alternation over a sorted, deduplicated set of ids.
    Or(Box<[ReId]>),
    /// Intersection over a sorted, deduplicated set of ids.
    And(Box<[ReId]>),
    /// Bounded or unbounded repetition (`hi == UNBOUNDED` is ∞).
    Loop {
        body: ReId,
        lo: u32,
        hi: u32,
        lazy: bool,
    },
    /// Conditional: behaves as `then` where `cond` holds and as `els`
    /// elsewhere; derivatives advance all three in lockstep.
    Ite { cond: ReId, then: ReId, els: ReId },
    /// `\A` — beginning of input.
    StartAnchor,
    /// `\z` — end of input.
    EndAnchor,
    /// `^` — beginning of a line.
    BolAnchor,
    /// `$` — end of a line.
    EolAnchor,
    /// Zero-width accept marker carrying the match length in characters.
    Watchdog(u32),
}

/// Attributes computed once when a node is interned.
#[derive(Clone, Copy, Debug)]
struct NodeAttrs {
    /// Accepts ε with every anchor condition unsatisfied.
    nullable: bool,
    /// Accepts ε under at least one assignment of anchor conditions.
    /// Used by the prefilter logic, which must over-approximate.
    null_hi: bool,
    /// Some descendant is an anchor.
    anchors: bool,
    /// Exact match length in characters when every accepted word has the
    /// same length.
    fixed: Option<u32>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Structural-sharing factory for symbolic regex nodes.
///
/// Holds the node arena, the predicate table, and the preinterned
/// `∅`/`ε`/`⊤*` nodes.  All construction goes through the `mk_*` methods,
/// which apply the normalization laws before interning.
#[derive(Debug)]
pub struct ReBuilder {
    nodes: IndexSet<ReKind>,
    attrs: Vec<NodeAttrs>,
    preds: IndexSet<CharSet>,
    empty: ReId,
    epsilon: ReId,
    dot_star: ReId,
}

impl Default for ReBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReBuilder {
    pub fn new() -> Self {
        let mut b = Self {
            nodes: IndexSet::new(),
            attrs: Vec::new(),
            preds: IndexSet::new(),
            empty: ReId(0),
            epsilon: ReId(0),
            dot_star: ReId(0),
        };
        b.empty = b.intern(ReKind::Empty);
        b.epsilon = b.intern(ReKind::Epsilon);
        let full = b.intern_pred(CharSet::full());
        let any = b.intern(ReKind::Singleton(full));
        b.dot_star = b.intern(ReKind::Loop {
            body: any,
            lo: 0,
            hi: UNBOUNDED,
            lazy: false,
        });
        b
    }

    // -- Interning ----------------------------------------------------------

    fn intern(&mut self, kind: ReKind) -> ReId {
        if let Some(i) = self.nodes.get_index_of(&kind) {
            return ReId(i as u32);
        }
        let attrs = self.compute_attrs(&kind);
        let (i, _) = self.nodes.insert_full(kind);
        self.attrs.push(attrs);
        ReId(i as u32)
    }

    pub(crate) fn intern_pred(&mut self, set: CharSet) -> PredId {
        let (i, _) = self.preds.insert_full(set);
        PredId(i as u32)
    }

    #[inline]
    pub(crate) fn kind(&self, id: ReId) -> &ReKind {
        &self.nodes[id.idx()]
    }

    #[inline]
    pub(crate) fn pred(&self, id: PredId) -> &CharSet {
        &self.preds[id.idx()]
    }

    #[inline]
    pub(crate) fn nullable(&self, id: ReId) -> bool {
        self.attrs[id.idx()].nullable
    }

    #[inline]
    pub(crate) fn null_hi(&self, id: ReId) -> bool {
        self.attrs[id.idx()].null_hi
    }

    #[inline]
    pub(crate) fn contains_anchors(&self, id: ReId) -> bool {
        self.attrs[id.idx()].anchors
    }

    /// Exact accepted-word length in characters, when all accepted words
    /// share one.
    #[inline]
    pub fn fixed_len(&self, id: ReId) -> Option<u32> {
        self.attrs[id.idx()].fixed
    }

    /// Number of interned nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of interned predicates.
    pub fn pred_count(&self) -> usize {
        self.preds.len()
    }

    /// Heap footprint of the arena and predicate table, in bytes.
    pub fn memory_size(&self) -> usize {
        let nodes = self.nodes.len() * std::mem::size_of::<ReKind>();
        let attrs = self.attrs.len() * std::mem::size_of::<NodeAttrs>();
        let preds: usize = self
            .preds
            .iter()
            .map(|p| p.ranges().len() * std::mem::size_of::<(u32, u32)>())
            .sum();
        nodes + attrs + preds
    }

    // -- Canonical leaves ---------------------------------------------------

    /// The empty language ∅.
    #[inline]
    pub fn mk_empty(&self) -> ReId {
        self.empty
    }

    /// The empty string ε.
    #[inline]
    pub fn mk_epsilon(&self) -> ReId {
        self.epsilon
    }

    /// `⊤*` — every string, including across line breaks.
    #[inline]
    pub fn mk_dot_star(&self) -> ReId {
        self.dot_star
    }

    // -- Constructors -------------------------------------------------------

    /// One character satisfying `set`.  An unsatisfiable predicate is the
    /// empty language.
    pub fn mk_singleton(&mut self, set: CharSet) -> ReId {
        if set.is_empty() {
            return self.empty;
        }
        let p = self.intern_pred(set);
        self.intern(ReKind::Singleton(p))
    }

    /// A single character, optionally closed under simple case folding.
    pub fn mk_char(&mut self, c: char, fold: bool) -> ReId {
        self.mk_singleton(CharSet::from_char(c, fold))
    }

    /// An inclusive code point range, optionally case-folded.
    pub fn mk_range(&mut self, lo: u32, hi: u32, fold: bool) -> ReId {
        self.mk_singleton(CharSet::from_range(lo, hi, fold))
    }

    /// One Unicode word character (`\w`).
    pub fn mk_word(&mut self) -> ReId {
        self.mk_singleton(crate::unicode::perl_word())
    }

    /// One Unicode whitespace character (`\s`).
    pub fn mk_space(&mut self) -> ReId {
        self.mk_singleton(crate::unicode::perl_space())
    }

    /// One decimal digit (`\d`).
    pub fn mk_digit(&mut self) -> ReId {
        self.mk_singleton(crate::unicode::perl_digit())
    }

    /// Sequence of `a` then `b`, re-threaded right-associative with ε/∅
    /// absorbed.
    pub fn mk_concat(&mut self, a: ReId, b: ReId) -> ReId {
        if a == self.empty || b == self.empty {
            return self.empty;
        }
        if a == self.epsilon {
            return b;
        }
        if b == self.epsilon {
            return a;
        }
        let head = match *self.kind(a) {
            ReKind::Concat(x, y) => Some((x, y)),
            _ => None,
        };
        if let Some((x, y)) = head {
            let tail = self.mk_concat(y, b);
            return self.mk_concat(x, tail);
        }
        self.intern(ReKind::Concat(a, b))
    }

    /// Right-fold a sequence of nodes into a concat chain.
    pub fn mk_concat_all(&mut self, items: Vec<ReId>) -> ReId {
        items
            .into_iter()
            .rev()
            .fold(self.epsilon, |acc, id| self.mk_concat(id, acc))
    }

    /// Alternation.  Flattens nested alternations, drops `∅`, absorbs
    /// `⊤*`, folds bounded zero-loops per `(body, tail)` to their maximal
    /// bound, and collapses singletons.
    pub fn mk_or(&mut self, items: Vec<ReId>) -> ReId {
        let mut flat: Vec<ReId> = Vec::with_capacity(items.len());
        let mut stack = items;
        stack.reverse();
        while let Some(id) = stack.pop() {
            if id == self.empty {
                continue;
            }
            if id == self.dot_star {
                return self.dot_star;
            }
            match self.kind(id) {
                ReKind::Or(children) => {
                    let children: Vec<ReId> = children.to_vec();
                    stack.extend(children);
                }
                _ => flat.push(id),
            }
        }

        // Fold `Loop(b, 0, k)·tail` entries to the maximal `k` per
        // `(b, tail, lazy)`.  The folded entries subsume the smaller
        // bounds, so dropping them preserves the language.
        let mut bound: HashMap<(ReId, ReId, bool), u32> = HashMap::new();
        let mut order: Vec<(ReId, ReId, bool)> = Vec::new();
        let mut rest: Vec<ReId> = Vec::with_capacity(flat.len());
        for id in flat {
            match self.zero_loop_parts(id) {
                Some((body, tail, lazy, k)) => {
                    let key = (body, tail, lazy);
                    match bound.get_mut(&key) {
                        Some(max) => *max = (*max).max(k),
                        None => {
                            bound.insert(key, k);
                            order.push(key);
                        }
                    }
                }
                None => rest.push(id),
            }
        }
        for key in order {
            let (body, tail, lazy) = key;
            let k = bound[&key];
            let looped = self.loop_node(body, 0, k, lazy);
            let entry = self.mk_concat(looped, tail);
            rest.push(entry);
        }

        rest.sort_unstable();
        rest.dedup();
        match rest.len() {
            0 => self.empty,
            1 => rest[0],
            _ => self.intern(ReKind::Or(rest.into_boxed_slice())),
        }
    }

    /// Decompose `Loop(b, 0, k)` or `Concat(Loop(b, 0, k), tail)`.
    fn zero_loop_parts(&self, id: ReId) -> Option<(ReId, ReId, bool, u32)> {
        match *self.kind(id) {
            ReKind::Loop {
                body,
                lo: 0,
                hi,
                lazy,
            } => Some((body, self.epsilon, lazy, hi)),
            ReKind::Concat(head, tail) => match *self.kind(head) {
                ReKind::Loop {
                    body,
                    lo: 0,
                    hi,
                    lazy,
                } => Some((body, tail, lazy, hi)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Intersection.  Flattens, short-circuits on `∅`, drops `⊤*`, and
    /// collapses singletons.  An empty conjunction is `⊤*`.
    pub fn mk_and(&mut self, items: Vec<ReId>) -> ReId {
        let mut flat: Vec<ReId> = Vec::with_capacity(items.len());
        let mut stack = items;
        stack.reverse();
        while let Some(id) = stack.pop() {
            if id == self.empty {
                return self.empty;
            }
            if id == self.dot_star {
                continue;
            }
            match self.kind(id) {
                ReKind::And(children) => {
                    let children: Vec<ReId> = children.to_vec();
                    stack.extend(children);
                }
                _ => flat.push(id),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => self.dot_star,
            1 => flat[0],
            _ => self.intern(ReKind::And(flat.into_boxed_slice())),
        }
    }

    /// `{lo,hi}` quantifier.  Fails on `lo > hi`.
    pub fn mk_loop(&mut self, body: ReId, lo: u32, hi: u32, lazy: bool) -> Result<ReId, Error> {
        if lo > hi {
            return Err(Error::InvalidRegex(format!(
                "loop lower bound {} exceeds upper bound {}",
                lo, hi
            )));
        }
        Ok(self.loop_node(body, lo, hi, lazy))
    }

    /// Loop constructor for callers that maintain `lo <= hi` themselves
    /// (the derivative engine, deserialization after validation).
    pub(crate) fn loop_node(&mut self, body: ReId, lo: u32, hi: u32, lazy: bool) -> ReId {
        debug_assert!(lo <= hi);
        if lo == 0 && hi == 0 {
            return self.epsilon;
        }
        if body == self.epsilon {
            return self.epsilon;
        }
        if body == self.empty {
            return if lo == 0 { self.epsilon } else { self.empty };
        }
        if lo == 1 && hi == 1 {
            return body;
        }
        // (r*)* = r*
        if lo == 0 && hi == UNBOUNDED {
            if let ReKind::Loop {
                lo: 0,
                hi: UNBOUNDED,
                ..
            } = *self.kind(body)
            {
                return body;
            }
        }
        self.intern(ReKind::Loop { body, lo, hi, lazy })
    }

    /// Conditional.  A `∅` else-branch reduces to `And(cond, then)`.
    pub fn mk_ite(&mut self, cond: ReId, then: ReId, els: ReId) -> ReId {
        if els == self.empty {
            return self.mk_and(vec![cond, then]);
        }
        if cond == self.empty {
            return els;
        }
        if cond == self.dot_star {
            return then;
        }
        if then == els {
            return then;
        }
        self.intern(ReKind::Ite { cond, then, els })
    }

    /// `\A` — beginning of input.
    pub fn mk_start_anchor(&mut self) -> ReId {
        self.intern(ReKind::StartAnchor)
    }

    /// `\z` — end of input.
    pub fn mk_end_anchor(&mut self) -> ReId {
        self.intern(ReKind::EndAnchor)
    }

    /// `^` — beginning of a line.
    pub fn mk_bol_anchor(&mut self) -> ReId {
        self.intern(ReKind::BolAnchor)
    }

    /// `$` — end of a line.
    pub fn mk_eol_anchor(&mut self) -> ReId {
        self.intern(ReKind::EolAnchor)
    }

    /// Zero-width accept marker carrying the match length in characters.
    pub fn mk_watchdog(&mut self, len: u32) -> ReId {
        self.intern(ReKind::Watchdog(len))
    }

    // -- Attributes ---------------------------------------------------------

    fn compute_attrs(&self, kind: &ReKind) -> NodeAttrs {
        let a = |id: ReId| self.attrs[id.idx()];
        match *kind {
            ReKind::Empty => NodeAttrs {
                nullable: false,
                null_hi: false,
                anchors: false,
                fixed: None,
            },
            ReKind::Epsilon => NodeAttrs {
                nullable: true,
                null_hi: true,
                anchors: false,
                fixed: Some(0),
            },
            ReKind::Singleton(_) => NodeAttrs {
                nullable: false,
                null_hi: false,
                anchors: false,
                fixed: Some(1),
            },
            ReKind::Concat(x, y) => {
                let (ax, ay) = (a(x), a(y));
                NodeAttrs {
                    nullable: ax.nullable && ay.nullable,
                    null_hi: ax.null_hi && ay.null_hi,
                    anchors: ax.anchors || ay.anchors,
                    fixed: match (ax.fixed, ay.fixed) {
                        (Some(m), Some(n)) => m.checked_add(n),
                        _ => None,
                    },
                }
            }
            ReKind::Or(ref children) => NodeAttrs {
                nullable: children.iter().any(|&c| a(c).nullable),
                null_hi: children.iter().any(|&c| a(c).null_hi),
                anchors: children.iter().any(|&c| a(c).anchors),
                fixed: uniform_fixed(children.iter().map(|&c| a(c).fixed)),
            },
            ReKind::And(ref children) => NodeAttrs {
                nullable: children.iter().all(|&c| a(c).nullable),
                null_hi: children.iter().all(|&c| a(c).null_hi),
                anchors: children.iter().any(|&c| a(c).anchors),
                fixed: uniform_fixed(children.iter().map(|&c| a(c).fixed)),
            },
            ReKind::Loop { body, lo, hi, .. } => {
                let ab = a(body);
                NodeAttrs {
                    nullable: lo == 0 || ab.nullable,
                    null_hi: lo == 0 || ab.null_hi,
                    anchors: ab.anchors,
                    fixed: match ab.fixed {
                        Some(0) => Some(0),
                        Some(n) if lo == hi && hi != UNBOUNDED => n.checked_mul(lo),
                        _ => None,
                    },
                }
            }
            ReKind::Ite { cond, then, els } => {
                let (ac, at, ae) = (a(cond), a(then), a(els));
                NodeAttrs {
                    nullable: if ac.nullable { at.nullable } else { ae.nullable },
                    null_hi: at.null_hi || ae.null_hi,
                    anchors: ac.anchors || at.anchors || ae.anchors,
                    fixed: match (at.fixed, ae.fixed) {
                        (Some(m), Some(n)) if m == n => Some(m),
                        _ => None,
                    },
                }
            }
            ReKind::StartAnchor | ReKind::EndAnchor | ReKind::BolAnchor | ReKind::EolAnchor => {
                NodeAttrs {
                    nullable: false,
                    null_hi: true,
                    anchors: true,
                    fixed: Some(0),
                }
            }
            ReKind::Watchdog(_) => NodeAttrs {
                nullable: true,
                null_hi: true,
                anchors: false,
                fixed: Some(0),
            },
        }
    }

    // -- Derived views ------------------------------------------------------

    /// All predicates mentioned in the subtree, in first-visit order.
    pub(crate) fn collect_predicates(&self, id: ReId) -> Vec<PredId> {
        let mut out = Vec::new();
        let mut seen_preds: HashSet<PredId> = HashSet::new();
        let mut seen: HashSet<ReId> = HashSet::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            match *self.kind(id) {
                ReKind::Singleton(p) => {
                    if seen_preds.insert(p) {
                        out.push(p);
                    }
                }
                ReKind::Concat(x, y) => stack.extend([x, y]),
                ReKind::Or(ref children) | ReKind::And(ref children) => {
                    stack.extend(children.iter().copied())
                }
                ReKind::Loop { body, .. } => stack.push(body),
                ReKind::Ite { cond, then, els } => stack.extend([cond, then, els]),
                _ => {}
            }
        }
        out
    }

    /// Over-approximation of the set of characters a match can start
    /// with.  Anchors are treated as satisfiable, so the result is a
    /// superset of the true start set — sound for prefilter skipping.
    pub(crate) fn start_set(&self, id: ReId) -> CharSet {
        match *self.kind(id) {
            ReKind::Empty
            | ReKind::Epsilon
            | ReKind::StartAnchor
            | ReKind::EndAnchor
            | ReKind::BolAnchor
            | ReKind::EolAnchor
            | ReKind::Watchdog(_) => CharSet::empty(),
            ReKind::Singleton(p) => self.pred(p).clone(),
            ReKind::Concat(x, y) => {
                let mut s = self.start_set(x);
                if self.null_hi(x) {
                    s = s.union(&self.start_set(y));
                }
                s
            }
            ReKind::Or(ref children) | ReKind::And(ref children) => {
                let mut s = CharSet::empty();
                for &c in children.iter() {
                    s = s.union(&self.start_set(c));
                }
                s
            }
            ReKind::Loop { body, .. } => self.start_set(body),
            ReKind::Ite { cond, then, els } => {
                let mut s = self.start_set(cond);
                s = s.union(&self.start_set(then));
                s.union(&self.start_set(els))
            }
        }
    }

    /// Whether every match of `id` is pinned to the beginning of input.
    /// Conservative: `false` means "unknown".
    pub(crate) fn is_start_anchored(&self, id: ReId) -> bool {
        match *self.kind(id) {
            ReKind::StartAnchor => true,
            ReKind::Concat(x, _) => self.is_start_anchored(x),
            ReKind::Or(ref children) => children.iter().all(|&c| self.is_start_anchored(c)),
            ReKind::And(ref children) => children.iter().any(|&c| self.is_start_anchored(c)),
            ReKind::Loop { body, lo, .. } => lo >= 1 && self.is_start_anchored(body),
            _ => false,
        }
    }

    /// The fixed leading characters of every match, up to five, obtained
    /// by walking `Concat` left spines and collapsing alternations to
    /// their common prefix.
    pub(crate) fn fixed_prefix(&self, id: ReId) -> Vec<char> {
        let mut out = Vec::new();
        self.prefix_into(id, &mut out);
        out.truncate(5);
        out
    }

    fn prefix_into(&self, id: ReId, out: &mut Vec<char>) {
        if out.len() >= 5 {
            return;
        }
        match *self.kind(id) {
            ReKind::Singleton(p) => {
                if let Some(c) = self.pred(p).single_char().and_then(char::from_u32) {
                    out.push(c);
                }
            }
            ReKind::Concat(x, y) => {
                let before = out.len();
                self.prefix_into(x, out);
                let took = (out.len() - before) as u32;
                // Continue into the tail only when the head is fully
                // accounted for by the collected characters.
                if self.fixed_len(x) == Some(took) {
                    self.prefix_into(y, out);
                }
            }
            ReKind::Or(ref children) => {
                let mut common: Option<Vec<char>> = None;
                for &c in children.iter() {
                    let mut p = Vec::new();
                    self.prefix_into(c, &mut p);
                    common = Some(match common {
                        None => p,
                        Some(q) => common_prefix(q, p),
                    });
                    if common.as_ref().is_some_and(Vec::is_empty) {
                        break;
                    }
                }
                out.extend(common.unwrap_or_default());
            }
            ReKind::And(ref children) => {
                // Every branch's prefix is required; take the longest.
                let mut best = Vec::new();
                for &c in children.iter() {
                    let mut p = Vec::new();
                    self.prefix_into(c, &mut p);
                    if p.len() > best.len() {
                        best = p;
                    }
                }
                out.extend(best);
            }
            ReKind::Loop { body, lo, .. } if lo >= 1 => self.prefix_into(body, out),
            _ => {}
        }
    }

    /// The reversal of `id`: concatenations are mirrored, everything else
    /// maps structurally.  Anchors are preserved; the reverse scan
    /// mirrors their border conditions instead.
    pub fn reverse(&mut self, id: ReId) -> ReId {
        let mut memo = HashMap::new();
        self.reverse_rec(id, &mut memo)
    }

    fn reverse_rec(&mut self, id: ReId, memo: &mut HashMap<ReId, ReId>) -> ReId {
        if let Some(&r) = memo.get(&id) {
            return r;
        }
        let kind = self.kind(id).clone();
        let reversed = match kind {
            ReKind::Empty
            | ReKind::Epsilon
            | ReKind::Singleton(_)
            | ReKind::StartAnchor
            | ReKind::EndAnchor
            | ReKind::BolAnchor
            | ReKind::EolAnchor
            | ReKind::Watchdog(_) => id,
            ReKind::Concat(x, y) => {
                let ry = self.reverse_rec(y, memo);
                let rx = self.reverse_rec(x, memo);
                self.mk_concat(ry, rx)
            }
            ReKind::Or(children) => {
                let mut rs = Vec::with_capacity(children.len());
                for &c in children.iter() {
                    rs.push(self.reverse_rec(c, memo));
                }
                self.mk_or(rs)
            }
            ReKind::And(children) => {
                let mut rs = Vec::with_capacity(children.len());
                for &c in children.iter() {
                    rs.push(self.reverse_rec(c, memo));
                }
                self.mk_and(rs)
            }
            ReKind::Loop { body, lo, hi, lazy } => {
                let rb = self.reverse_rec(body, memo);
                self.loop_node(rb, lo, hi, lazy)
            }
            ReKind::Ite { cond, then, els } => {
                let rc = self.reverse_rec(cond, memo);
                let rt = self.reverse_rec(then, memo);
                let re = self.reverse_rec(els, memo);
                self.mk_ite(rc, rt, re)
            }
        };
        memo.insert(id, reversed);
        reversed
    }

    // -- HIR lowering -------------------------------------------------------

    /// Lower a `regex-syntax` HIR into a symbolic regex.  Case folding,
    /// multiline anchor selection, and `.`-vs-`\n` are already resolved
    /// by the translator; only the node kinds the engine supports are
    /// accepted.
    pub fn from_hir(&mut self, hir: &Hir) -> Result<ReId, Error> {
        match hir.kind() {
            HirKind::Empty => Ok(self.epsilon),
            HirKind::Literal(lit) => {
                let Ok(text) = std::str::from_utf8(&lit.0) else {
                    return Err(Error::InvalidRegex(
                        "literal is not valid UTF-8".to_string(),
                    ));
                };
                let mut ids = Vec::new();
                for c in text.chars() {
                    ids.push(self.mk_char(c, false));
                }
                Ok(self.mk_concat_all(ids))
            }
            HirKind::Class(hir::Class::Unicode(class)) => {
                let set = CharSet::from_ranges(
                    class
                        .ranges()
                        .iter()
                        .map(|r| (r.start() as u32, r.end() as u32)),
                );
                Ok(self.mk_singleton(set))
            }
            HirKind::Class(hir::Class::Bytes(class)) => {
                let set = CharSet::from_ranges(
                    class
                        .ranges()
                        .iter()
                        .map(|r| (u32::from(r.start()), u32::from(r.end()))),
                );
                Ok(self.mk_singleton(set))
            }
            HirKind::Look(look) => match look {
                hir::Look::Start => Ok(self.mk_start_anchor()),
                hir::Look::End => Ok(self.mk_end_anchor()),
                hir::Look::StartLF => Ok(self.mk_bol_anchor()),
                hir::Look::EndLF => Ok(self.mk_eol_anchor()),
                other => Err(Error::UnsupportedFeature(look_feature(*other))),
            },
            HirKind::Capture(cap) => self.from_hir(&cap.sub),
            HirKind::Repetition(rep) => {
                let body = self.from_hir(&rep.sub)?;
                self.mk_loop(body, rep.min, rep.max.unwrap_or(UNBOUNDED), !rep.greedy)
            }
            HirKind::Concat(children) => {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.from_hir(child)?);
                }
                Ok(self.mk_concat_all(ids))
            }
            HirKind::Alternation(children) => {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.from_hir(child)?);
                }
                Ok(self.mk_or(ids))
            }
        }
    }
}

fn look_feature(look: hir::Look) -> &'static str {
    match look {
        hir::Look::WordAscii
        | hir::Look::WordAsciiNegate
        | hir::Look::WordUnicode
        | hir::Look::WordUnicodeNegate => "word boundary assertion",
        hir::Look::StartCRLF | hir::Look::EndCRLF => "CRLF-aware line anchor",
        _ => "look-around assertion",
    }
}

fn uniform_fixed(mut lens: impl Iterator<Item = Option<u32>>) -> Option<u32> {
    let first = lens.next()??;
    for len in lens {
        if len? != first {
            return None;
        }
    }
    Some(first)
}

fn common_prefix(a: Vec<char>, b: Vec<char>) -> Vec<char> {
    a.into_iter().zip(b).take_while(|(x, y)| x == y).map(|(x, _)| x).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
