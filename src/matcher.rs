//! The match-location driver.
//!
//! Locating one match takes up to three scans over the lazy DFAs:
//!
//! 1. **Forward earliest-accept.**  The *seeker* (`⊤*·R`, or `R` itself
//!    when the pattern is pinned to the input start) runs from the
//!    search position and stops at the first final state.  That position
//!    is the earliest point any match can end.
//! 2. **Reverse find-start.**  `reverse(R)` runs leftward from the
//!    accept position, recording the furthest-left final position — the
//!    earliest start of a match ending there.  When the pattern has a
//!    fixed length the seeker carries a watchdog and this scan is
//!    replaced by stepping back that many characters.
//! 3. **Forward find-end.**  `R` runs from the start position, tracking
//!    the last final position until the state dies or input ends; that
//!    position is the committed match end.
//!
//! Anchors are resolved against border conditions: the begin-side bits
//! travel in the DFA state context, the end-side bits come from the
//! character (or input edge) ahead of each position.  Between matches
//! the driver restarts one past the previous match (or one character
//! further for empty matches).

use std::cell::RefCell;

use memchr::{memchr, memchr2, memchr3, memmem};
use regex_syntax::hir::Hir;

use crate::ast::{ReBuilder, ReId};
use crate::charset::CharSet;
use crate::derivative::Conds;
use crate::dfa::{Dfa, Dir, FinalPos};
use crate::minterms::{Classifier, Minterms};
use crate::serialize;
use crate::{Error, Options};

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A located match: byte offset and byte length into the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    index: usize,
    length: usize,
}

impl Match {
    /// Byte offset of the first matched character.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the match in bytes.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// One past the last matched byte.
    #[inline]
    pub fn end(&self) -> usize {
        self.index + self.length
    }

    /// The matched byte range.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.index..self.end()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

// ---------------------------------------------------------------------------
// Step budget
// ---------------------------------------------------------------------------

/// Cooperative cancellation: one unit per consumed character across all
/// scans of a single `find`.
struct Budget {
    remaining: Option<u64>,
}

impl Budget {
    fn new(limit: Option<u64>) -> Budget {
        Budget { remaining: limit }
    }

    #[inline]
    fn tick(&mut self, at: usize) -> Result<(), Error> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Err(Error::MatchAborted { at });
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Prefilter
// ---------------------------------------------------------------------------

/// Vectorized candidate search used to skip the seeker ahead.
enum Prefilter {
    /// No usable prefix; every position is a candidate.
    None,
    /// The pattern begins with a fixed literal.
    Literal(memmem::Finder<'static>),
    /// The pattern begins with one of up to three ASCII bytes.
    StartBytes(Vec<u8>),
}

impl Prefilter {
    fn build(bld: &ReBuilder, root: ReId, anchored: bool, vectorize: bool) -> Prefilter {
        // A nullable pattern matches everywhere and an anchored one only
        // at the start; neither benefits from skipping.
        if !vectorize || anchored || bld.null_hi(root) {
            return Prefilter::None;
        }
        let prefix = bld.fixed_prefix(root);
        if !prefix.is_empty() {
            let needle: String = prefix.into_iter().collect();
            return Prefilter::Literal(memmem::Finder::new(needle.as_bytes()).into_owned());
        }
        let starts = bld.start_set(root);
        if !starts.is_empty() && starts.is_ascii() && starts.count() <= 3 {
            let mut bytes = Vec::new();
            for &(lo, hi) in starts.ranges() {
                for b in lo..=hi {
                    bytes.push(b as u8);
                }
            }
            return Prefilter::StartBytes(bytes);
        }
        Prefilter::None
    }

    /// The next position at or after `from` where a match could start,
    /// or `None` when the rest of the input cannot contain one.
    fn next_candidate(&self, haystack: &[u8], from: usize) -> Option<usize> {
        if from > haystack.len() {
            return None;
        }
        match self {
            Prefilter::None => Some(from),
            Prefilter::Literal(finder) => {
                finder.find(&haystack[from..]).map(|off| from + off)
            }
            Prefilter::StartBytes(bytes) => {
                let tail = &haystack[from..];
                let off = match bytes.as_slice() {
                    [a] => memchr(*a, tail),
                    [a, b] => memchr2(*a, *b, tail),
                    [a, b, c] => memchr3(*a, *b, *c, tail),
                    _ => Some(0),
                };
                off.map(|off| from + off)
            }
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Prefilter::None)
    }
}

// ---------------------------------------------------------------------------
// Engine (mutable compile + match state)
// ---------------------------------------------------------------------------

/// Everything that mutates during matching: the node arena grows with
/// lazily computed derivatives and the DFAs fill their transition rows.
struct Engine {
    bld: ReBuilder,
    minterms: Minterms,
    classifier: Classifier,
    fwd: Dfa,
    rev: Dfa,
    /// The pattern itself.
    root: ReId,
    /// `⊤*·root(·watchdog)` — or `root(·watchdog)` when start-anchored.
    seek: ReId,
    /// `reverse(root)`.
    rev_root: ReId,
}

fn ctx_fwd(s: &str, pos: usize) -> Conds {
    if pos == 0 {
        Conds::BOI.union(Conds::BOL)
    } else if s.as_bytes()[pos - 1] == b'\n' {
        Conds::BOL
    } else {
        Conds::none()
    }
}

fn ctx_rev(s: &str, pos: usize) -> Conds {
    if pos == s.len() {
        Conds::EOI.union(Conds::EOL)
    } else if s.as_bytes()[pos] == b'\n' {
        Conds::EOL
    } else {
        Conds::none()
    }
}

fn final_fwd(s: &str, pos: usize) -> FinalPos {
    if pos == s.len() {
        FinalPos::Edge
    } else if s.as_bytes()[pos] == b'\n' {
        FinalPos::Line
    } else {
        FinalPos::Inner
    }
}

fn final_rev(s: &str, pos: usize) -> FinalPos {
    if pos == 0 {
        FinalPos::Edge
    } else if s.as_bytes()[pos - 1] == b'\n' {
        FinalPos::Line
    } else {
        FinalPos::Inner
    }
}

/// Step back `n` characters from byte offset `end`.
fn back_chars(s: &str, end: usize, n: u32) -> Result<usize, Error> {
    let mut idx = end;
    for _ in 0..n {
        let Some(c) = s[..idx].chars().next_back() else {
            return Err(Error::Internal("watchdog length exceeds available input"));
        };
        idx -= c.len_utf8();
    }
    Ok(idx)
}

impl Engine {
    fn build(mut bld: ReBuilder, root: ReId, options: &Options) -> Result<(Engine, Option<u32>), Error> {
        let anchored = bld.is_start_anchored(root);
        let seek_core = if anchored {
            root
        } else {
            let dot_star = bld.mk_dot_star();
            bld.mk_concat(dot_star, root)
        };
        let (seek, watchdog) = match bld.fixed_len(root) {
            Some(n) => {
                let wd = bld.mk_watchdog(n);
                (bld.mk_concat(seek_core, wd), Some(n))
            }
            None => (seek_core, None),
        };
        let rev_root = bld.reverse(root);

        let mut pred_ids = bld.collect_predicates(seek);
        for p in bld.collect_predicates(rev_root) {
            if !pred_ids.contains(&p) {
                pred_ids.push(p);
            }
        }
        let mut preds: Vec<CharSet> = pred_ids.iter().map(|&p| bld.pred(p).clone()).collect();
        if bld.contains_anchors(root) {
            // Line borders need their own equivalence class.
            preds.push(CharSet::from_char('\n', false));
        }
        let minterms = Minterms::new(&preds)?;
        let classifier = Classifier::new(&minterms);
        let fwd = Dfa::new(Dir::Forward, minterms.count(), options.state_cache_limit);
        let rev = Dfa::new(Dir::Reverse, minterms.count(), options.state_cache_limit);

        Ok((
            Engine {
                bld,
                minterms,
                classifier,
                fwd,
                rev,
                root,
                seek,
                rev_root,
            },
            watchdog,
        ))
    }

    /// Phase 1: the earliest position where some match ends, at or after
    /// `from`.
    fn find_accept(
        &mut self,
        s: &str,
        from: usize,
        prefilter: &Prefilter,
        budget: &mut Budget,
    ) -> Result<Option<usize>, Error> {
        let n = s.len();
        let Some(mut pos) = prefilter.next_candidate(s.as_bytes(), from) else {
            return Ok(None);
        };
        let mut sid = self.fwd.intern(&self.bld, self.seek, ctx_fwd(s, pos), true);
        if self.fwd.is_final(sid, final_fwd(s, pos)) {
            return Ok(Some(pos));
        }
        let mut i = pos;
        while i < n {
            budget.tick(i)?;
            // Back at the bare seek state means no partial progress is
            // pending, so the prefilter may skip ahead.
            if !prefilter.is_none() && self.fwd.state_re(sid) == self.seek {
                match prefilter.next_candidate(s.as_bytes(), i) {
                    Some(candidate) if candidate > i => {
                        i = candidate;
                        pos = candidate;
                        sid = self.fwd.intern(&self.bld, self.seek, ctx_fwd(s, pos), true);
                        if i >= n {
                            break;
                        }
                    }
                    Some(_) => {}
                    None => return Ok(None),
                }
            }
            let Some(c) = s[i..].chars().next() else {
                return Err(Error::Internal("forward scan position desynchronized"));
            };
            let mt = self.classifier.classify(c);
            sid = self.fwd.next(&mut self.bld, &self.minterms, sid, mt);
            i += c.len_utf8();
            if self.fwd.is_dead(sid) {
                // The seeker subsumes every later start; dead means no
                // match anywhere ahead.
                return Ok(None);
            }
            if self.fwd.is_final(sid, final_fwd(s, i)) {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Phase 2: the earliest match start in `[floor, end]` for a match
    /// ending at `end`.
    fn find_start(
        &mut self,
        s: &str,
        end: usize,
        floor: usize,
        budget: &mut Budget,
    ) -> Result<usize, Error> {
        let mut sid = self.rev.intern(&self.bld, self.rev_root, ctx_rev(s, end), true);
        let mut best = if self.rev.is_final(sid, final_rev(s, end)) {
            Some(end)
        } else {
            None
        };
        let mut j = end;
        while j > floor {
            budget.tick(j)?;
            let Some(c) = s[..j].chars().next_back() else {
                return Err(Error::Internal("reverse scan position desynchronized"));
            };
            let mt = self.classifier.classify(c);
            sid = self.rev.next(&mut self.bld, &self.minterms, sid, mt);
            j -= c.len_utf8();
            if self.rev.is_dead(sid) {
                break;
            }
            if self.rev.is_final(sid, final_rev(s, j)) {
                best = Some(j);
            }
        }
        best.ok_or(Error::Internal("reverse scan failed to locate a match start"))
    }

    /// Phase 3: the last position where a match starting at `start`
    /// ends.
    fn find_end_from(&mut self, s: &str, start: usize, budget: &mut Budget) -> Result<usize, Error> {
        let mut sid = self.fwd.intern(&self.bld, self.root, ctx_fwd(s, start), true);
        let mut best = if self.fwd.is_final(sid, final_fwd(s, start)) {
            Some(start)
        } else {
            None
        };
        let mut i = start;
        while i < s.len() {
            budget.tick(i)?;
            let Some(c) = s[i..].chars().next() else {
                return Err(Error::Internal("forward scan position desynchronized"));
            };
            let mt = self.classifier.classify(c);
            sid = self.fwd.next(&mut self.bld, &self.minterms, sid, mt);
            i += c.len_utf8();
            if self.fwd.is_dead(sid) {
                break;
            }
            if self.fwd.is_final(sid, final_fwd(s, i)) {
                best = Some(i);
            }
        }
        best.ok_or(Error::Internal("match end lost between scans"))
    }

    fn find_from(
        &mut self,
        s: &str,
        from: usize,
        watchdog: Option<u32>,
        prefilter: &Prefilter,
        budget: &mut Budget,
    ) -> Result<Option<Match>, Error> {
        let Some(end) = self.find_accept(s, from, prefilter, budget)? else {
            return Ok(None);
        };
        if let Some(n) = watchdog {
            // Fixed-length pattern: the accept position determines the
            // start directly and no longer end can exist.
            let index = back_chars(s, end, n)?;
            return Ok(Some(Match {
                index,
                length: end - index,
            }));
        }
        let index = self.find_start(s, end, from, budget)?;
        let end = self.find_end_from(s, index, budget)?;
        Ok(Some(Match {
            index,
            length: end - index,
        }))
    }
}

// ---------------------------------------------------------------------------
// Matcher (public API)
// ---------------------------------------------------------------------------

/// A compiled symbolic regex matcher.
///
/// Compilation fixes the AST, the minterm partition, and the scan entry
/// points; DFA states and transitions are derived lazily during
/// matching, behind a `RefCell`.  The type is deliberately not `Sync`:
/// independent `Matcher` values match in parallel freely, while sharing
/// one across threads requires external locking.
pub struct Matcher {
    engine: RefCell<Engine>,
    options: Options,
    watchdog: Option<u32>,
    prefilter: Prefilter,
}

impl Matcher {
    /// Compile a matcher from a parsed AST.
    pub fn new(hir: &Hir, options: Options) -> Result<Matcher, Error> {
        let mut bld = ReBuilder::new();
        let root = bld.from_hir(hir)?;
        Self::from_root(bld, root, options)
    }

    /// Convenience path through the `regex-syntax` parser, honoring the
    /// `ignore_case`/`multiline`/`singleline` options.
    pub fn compile(pattern: &str, options: Options) -> Result<Matcher, Error> {
        let hir = regex_syntax::ParserBuilder::new()
            .case_insensitive(options.ignore_case)
            .multi_line(options.multiline)
            .dot_matches_new_line(options.singleline)
            .build()
            .parse(pattern)
            .map_err(|e| Error::InvalidRegex(e.to_string()))?;
        Self::new(&hir, options)
    }

    pub(crate) fn from_root(bld: ReBuilder, root: ReId, options: Options) -> Result<Matcher, Error> {
        let anchored = bld.is_start_anchored(root);
        let prefilter = Prefilter::build(&bld, root, anchored, options.vectorize);
        let (engine, watchdog) = Engine::build(bld, root, &options)?;
        Ok(Matcher {
            engine: RefCell::new(engine),
            options,
            watchdog,
            prefilter,
        })
    }

    /// Whether the pattern matches anywhere in `input`.
    pub fn is_match(&self, input: &str) -> Result<bool, Error> {
        let mut budget = Budget::new(self.options.step_limit);
        let mut engine = self.engine.borrow_mut();
        Ok(engine
            .find_accept(input, 0, &self.prefilter, &mut budget)?
            .is_some())
    }

    /// The leftmost match in `input`.
    pub fn find(&self, input: &str) -> Result<Option<Match>, Error> {
        self.find_at(input, 0)
    }

    /// The leftmost match starting at or after byte offset `start`.
    /// A `start` inside a multi-byte character is rounded up to the next
    /// character boundary.
    pub fn find_at(&self, input: &str, start: usize) -> Result<Option<Match>, Error> {
        if start > input.len() {
            return Ok(None);
        }
        let mut from = start;
        while from < input.len() && !input.is_char_boundary(from) {
            from += 1;
        }
        let mut budget = Budget::new(self.options.step_limit);
        let mut engine = self.engine.borrow_mut();
        engine.find_from(input, from, self.watchdog, &self.prefilter, &mut budget)
    }

    /// Iterator over non-overlapping matches in increasing index order.
    pub fn matches<'m, 'h>(&'m self, input: &'h str) -> Matches<'m, 'h> {
        Matches {
            matcher: self,
            input,
            at: 0,
            done: false,
        }
    }

    /// The `v1:`-tagged textual form of the compiled pattern.
    pub fn serialize(&self) -> String {
        let engine = self.engine.borrow();
        serialize::write_versioned(&engine.bld, engine.root)
    }

    /// Rebuild a matcher from its serialized form.  DFA tables are not
    /// persisted; they are re-derived on demand.
    pub fn deserialize(text: &str, options: Options) -> Result<Matcher, Error> {
        let mut bld = ReBuilder::new();
        let root = serialize::read_versioned(&mut bld, text)?;
        Self::from_root(bld, root, options)
    }

    /// Number of DFA states interned so far (both scan directions).
    pub fn state_count(&self) -> usize {
        let engine = self.engine.borrow();
        engine.fwd.state_count() + engine.rev.state_count()
    }

    /// Width of the transition tables.
    pub fn minterm_count(&self) -> usize {
        self.engine.borrow().minterms.count()
    }

    /// Number of filled transition-table entries currently retained.
    pub fn transition_count(&self) -> usize {
        let engine = self.engine.borrow();
        engine.fwd.transition_count() + engine.rev.transition_count()
    }

    /// Approximate heap footprint of the compiled matcher and its
    /// caches, in bytes.
    pub fn memory_size(&self) -> usize {
        let engine = self.engine.borrow();
        std::mem::size_of::<Self>()
            + engine.bld.memory_size()
            + engine.classifier.memory_size()
            + engine.fwd.memory_size()
            + engine.rev.memory_size()
    }
}

/// Iterator over non-overlapping matches, produced by
/// [`Matcher::matches`].  Each subsequent match starts at the first
/// position at or past the previous match end (one further for empty
/// matches).
pub struct Matches<'m, 'h> {
    matcher: &'m Matcher,
    input: &'h str,
    at: usize,
    done: bool,
}

impl Iterator for Matches<'_, '_> {
    type Item = Result<Match, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.matcher.find_at(self.input, self.at) {
            Ok(Some(m)) => {
                self.at = m.index() + m.length().max(1);
                Some(Ok(m))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pattern: &str) -> Matcher {
        Matcher::compile(pattern, Options::default()).expect("pattern should compile")
    }

    fn all(m: &Matcher, input: &str) -> Vec<(usize, usize)> {
        m.matches(input)
            .map(|r| r.expect("matching should not fail"))
            .map(|m| (m.index(), m.length()))
            .collect()
    }

    #[test]
    fn test_simple_find() {
        let m = matcher("abc");
        let found = m
            .find("xxabcxx")
            .expect("matching should not fail")
            .expect("should match");
        assert_eq!((found.index(), found.length()), (2, 3));
        assert_eq!(found.end(), 5);
        assert_eq!(found.range(), 2..5);
        assert!(m.find("xyz").expect("matching should not fail").is_none());
    }

    #[test]
    fn test_is_match() {
        let m = matcher("a+b");
        assert!(m.is_match("xxaab").expect("matching should not fail"));
        assert!(!m.is_match("xxb").expect("matching should not fail"));
        assert!(!m.is_match("").expect("matching should not fail"));
    }

    #[test]
    fn test_matches_non_overlapping() {
        let m = matcher("aa");
        assert_eq!(all(&m, "aaaaa"), vec![(0, 2), (2, 2)]);
    }

    #[test]
    fn test_empty_matches_advance() {
        let m = matcher("a*");
        assert_eq!(all(&m, "baa"), vec![(0, 0), (1, 2), (3, 0)]);
    }

    #[test]
    fn test_find_at_skips() {
        let m = matcher("ab");
        let found = m
            .find_at("ababab", 1)
            .expect("matching should not fail")
            .expect("should match");
        assert_eq!((found.index(), found.length()), (2, 2));
    }

    #[test]
    fn test_longest_end_from_start() {
        let m = matcher("a+");
        assert_eq!(all(&m, "xaaax"), vec![(1, 3)]);
    }

    #[test]
    fn test_unicode_offsets_are_bytes() {
        let m = matcher("é");
        let found = m
            .find("aéb")
            .expect("matching should not fail")
            .expect("should match");
        // `é` is two bytes; offsets count bytes.
        assert_eq!((found.index(), found.length()), (1, 2));
    }

    #[test]
    fn test_watchdog_path_matches_reverse_path() {
        // Fixed-length pattern (watchdog) vs variable-length equivalent.
        let fixed = matcher("abc");
        let variable = matcher("abc|abcd");
        let input = "xxabcxxabc";
        assert_eq!(all(&fixed, input), vec![(2, 3), (7, 3)]);
        assert_eq!(all(&variable, input), vec![(2, 3), (7, 3)]);
    }

    #[test]
    fn test_vectorize_literal_prefix() {
        let options = Options {
            vectorize: true,
            ..Options::default()
        };
        let m = Matcher::compile("needle[0-9]?", options).expect("pattern should compile");
        let input = "hay hay hay needle7 hay needle";
        assert_eq!(
            m.matches(input)
                .map(|r| r.expect("matching should not fail"))
                .map(|m| (m.index(), m.length()))
                .collect::<Vec<_>>(),
            vec![(12, 7), (24, 6)]
        );
        assert!(!m.is_match("no such thing").expect("matching should not fail"));
    }

    #[test]
    fn test_vectorize_start_bytes() {
        let options = Options {
            vectorize: true,
            ..Options::default()
        };
        let m = Matcher::compile("[xy]z", options).expect("pattern should compile");
        assert_eq!(
            m.matches("aaxzaayzaa")
                .map(|r| r.expect("matching should not fail"))
                .map(|m| (m.index(), m.length()))
                .collect::<Vec<_>>(),
            vec![(2, 2), (6, 2)]
        );
    }

    #[test]
    fn test_step_budget_aborts() {
        let options = Options {
            step_limit: Some(5),
            ..Options::default()
        };
        let m = Matcher::compile("zzz", options).expect("pattern should compile");
        let long_input = "a".repeat(100);
        match m.is_match(&long_input) {
            Err(Error::MatchAborted { at }) => assert!(at <= 100),
            other => panic!("expected MatchAborted, got {:?}", other),
        }
        // A comfortable budget succeeds.
        let options = Options {
            step_limit: Some(10_000),
            ..Options::default()
        };
        let m = Matcher::compile("zzz", options).expect("pattern should compile");
        assert!(!m.is_match(&long_input).expect("matching should not fail"));
    }

    #[test]
    fn test_abort_surfaces_once_in_iterator() {
        let options = Options {
            step_limit: Some(3),
            ..Options::default()
        };
        let m = Matcher::compile("zzz", options).expect("pattern should compile");
        let input = "a".repeat(50);
        let results: Vec<_> = m.matches(&input).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::MatchAborted { .. })));
    }

    #[test]
    fn test_state_cache_limit_still_correct() {
        let options = Options {
            state_cache_limit: 4,
            ..Options::default()
        };
        let m = Matcher::compile("ab|cd|ef", options).expect("pattern should compile");
        let input = "xxabxxcdxxefxx";
        assert_eq!(
            m.matches(input)
                .map(|r| r.expect("matching should not fail"))
                .map(|m| (m.index(), m.length()))
                .collect::<Vec<_>>(),
            vec![(2, 2), (6, 2), (10, 2)]
        );
        // The cap applies to non-root transitions; the count stays well
        // below what an uncapped run would retain.
        assert!(m.transition_count() > 0);
    }

    #[test]
    fn test_anchored_pattern_skips_seeker_prefix() {
        let m = matcher("^abc");
        assert_eq!(all(&m, "abcabc"), vec![(0, 3)]);
        assert!(all(&m, "xabc").is_empty());
    }

    #[test]
    fn test_find_at_inside_char_rounds_up() {
        let m = matcher("b");
        // Offset 2 is inside the two-byte `é`; rounding up lands on `b`.
        let found = m
            .find_at("aéb", 2)
            .expect("matching should not fail")
            .expect("should match");
        assert_eq!(found.index(), 3);
    }

    #[test]
    fn test_introspection() {
        let m = matcher("[a-c]+x");
        assert!(m.is_match("abcx").expect("matching should not fail"));
        assert!(m.minterm_count() >= 2);
        assert!(m.state_count() >= 1);
        assert!(m.memory_size() > 0);
    }
}
