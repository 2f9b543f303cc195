//! Symbolic regex matching engine.
//!
//! A regex is compiled into a *symbolic* finite automaton: transitions
//! are labeled with predicates over Unicode code points (ordered
//! interval sets) instead of individual characters, and the
//! deterministic state space is derived lazily with Brzozowski
//! derivatives.  Matching is linear in the input length regardless of
//! how complex the pattern's character classes are.
//!
//! # Architecture
//!
//! The pipeline is:
//!
//! ```text
//! regex_syntax::hir::Hir ──lower──> hash-consed symbolic AST (ReBuilder)
//!                                        │ collect predicates
//!                                        v
//!                              minterm partition + classifier
//!                                        │ derivatives, on demand
//!                                        v
//!                          lazy DFA  (state = regex × border context)
//!                                        │
//!                                        v
//!                three-scan driver: earliest accept → start → end
//! ```
//!
//! ## Minterms
//!
//! The predicates mentioned in a pattern partition the alphabet into
//! equivalence classes (*minterms*): two characters in the same class
//! produce the same derivative.  Transition tables are indexed by
//! `(state, minterm-id)`, so `[a-zA-Z0-9_]` costs the same as `x`.
//!
//! ## Borders
//!
//! Anchors never consume input.  They are resolved against *border
//! conditions* — beginning/end of input and of lines — carried partly in
//! the DFA state context (the side behind the scan direction) and partly
//! derived from the character ahead.  A leading anchor contributes ε
//! exactly when its condition holds at the current position.
//!
//! ## Match location
//!
//! Locating a match takes a forward scan of `⊤*·R` to the *earliest*
//! accepting position, a reverse scan of `reverse(R)` to the earliest
//! start, and a forward scan of `R` to the last accepting end.  When the
//! pattern has a fixed length the compiled seeker carries a watchdog
//! marker with that length and the reverse scan is replaced by
//! arithmetic.
//!
//! # Example
//!
//! ```
//! use regex_symbolic::{Matcher, Options};
//!
//! let m = Matcher::compile("a{2,4}", Options::default()).unwrap();
//! let found = m.find("..aaaaa..").unwrap().unwrap();
//! assert_eq!((found.index(), found.length()), (2, 4));
//! ```

use std::fmt;

pub mod charset;
pub mod unicode;

mod ast;
mod derivative;
mod dfa;
mod matcher;
mod minterms;
mod serialize;

pub use ast::{ReBuilder, ReId, UNBOUNDED};
pub use charset::{CharSet, MAX_CHAR};
pub use matcher::{Match, Matcher, Matches};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors surfaced at the engine boundary.
#[derive(Debug)]
pub enum Error {
    /// The AST contains a malformed construct (e.g. a loop lower bound
    /// above its upper bound).
    InvalidRegex(String),
    /// A construct the core matcher deliberately rejects rather than
    /// mis-handling: back-references, lookaround, word boundaries.
    UnsupportedFeature(&'static str),
    /// A serialized pattern could not be parsed.  `at` is the byte
    /// offset into the serialized text.
    InvalidFormat { at: usize, detail: String },
    /// The cooperative step budget ran out at input position `at`.
    MatchAborted { at: usize },
    /// Invariant violation; indicates an engine bug, not bad input.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex(reason) => write!(f, "invalid regex: {}", reason),
            Self::UnsupportedFeature(feature) => {
                write!(f, "unsupported feature: {}", feature)
            }
            Self::InvalidFormat { at, detail } => {
                write!(f, "invalid serialized form at byte {}: {}", at, detail)
            }
            Self::MatchAborted { at } => {
                write!(f, "match aborted by step budget at position {}", at)
            }
            Self::Internal(detail) => write!(f, "internal engine error: {}", detail),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Compile-time configuration.  All fields are fixed once a [`Matcher`]
/// is built.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Close literals and ranges under Unicode simple case folding.
    pub ignore_case: bool,
    /// `^`/`$` match at `\n` boundaries in addition to input boundaries.
    pub multiline: bool,
    /// `.` matches every code point including `\n`.
    pub singleline: bool,
    /// Enable the vectorized prefix prefilter.
    pub vectorize: bool,
    /// Maximum DFA transitions retained per scan direction before the
    /// oldest are evicted and recomputed on demand.
    pub state_cache_limit: usize,
    /// Cooperative step budget, checked once per consumed character;
    /// `None` is unlimited.
    pub step_limit: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignore_case: false,
            multiline: false,
            singleline: false,
            vectorize: false,
            state_cache_limit: usize::MAX,
            step_limit: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests: end-to-end scenarios, conformance oracle, cross-cutting properties
// ---------------------------------------------------------------------------
