//! Round-trip textual form for compiled patterns.
//!
//! Single-line, prefix-coded: `S(…)` sequence, `D(…)` disjunction,
//! `C(…)` conjunction, `L(lo,hi,body)` eager loop, `Z(lo,hi,body)` lazy
//! loop (`*` for an unbounded `hi`), `I(c,t,e)` if-then-else, `A`/`z`/
//! `^`/`$` anchors, `E` epsilon, `#(n)` watchdog, `.` for ⊤, and
//! `[ranges]` for a singleton predicate (an empty `[]` is the empty
//! language).  The matcher-level form carries a leading `v1:` version
//! tag; unknown tags are rejected.
//!
//! Reading goes through the builder's constructors, so a deserialized
//! pattern is re-normalized and re-interned: semantically identical to
//! the original and carrying the same minterms and start set.

use crate::ast::{ReBuilder, ReId, ReKind, UNBOUNDED};
use crate::charset::CharSet;
use crate::Error;

/// Length of the `v1:` version tag.
const TAG_LEN: usize = 3;

/// Serialize with the `v1:` version tag.
pub(crate) fn write_versioned(bld: &ReBuilder, root: ReId) -> String {
    let mut out = String::from("v1:");
    write_node(bld, root, &mut out);
    out
}

/// Parse a `v1:`-tagged pattern into `bld`.
pub(crate) fn read_versioned(bld: &mut ReBuilder, text: &str) -> Result<ReId, Error> {
    let Some(body) = text.strip_prefix("v1:") else {
        return Err(Error::InvalidFormat {
            at: 0,
            detail: "missing or unknown version tag".to_string(),
        });
    };
    let mut reader = Reader {
        bytes: body.as_bytes(),
        pos: 0,
    };
    let id = reader.parse_node(bld)?;
    if reader.pos != reader.bytes.len() {
        return Err(reader.err("trailing input after pattern"));
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

fn write_node(bld: &ReBuilder, id: ReId, out: &mut String) {
    use std::fmt::Write;
    match *bld.kind(id) {
        ReKind::Empty => out.push_str("[]"),
        ReKind::Epsilon => out.push('E'),
        ReKind::StartAnchor => out.push('A'),
        ReKind::EndAnchor => out.push('z'),
        ReKind::BolAnchor => out.push('^'),
        ReKind::EolAnchor => out.push('$'),
        ReKind::Watchdog(n) => {
            let _ = write!(out, "#({})", n);
        }
        ReKind::Singleton(p) => {
            let set = bld.pred(p);
            if set.is_full() {
                out.push('.');
            } else {
                out.push('[');
                set.write_ranges_text(out);
                out.push(']');
            }
        }
        ReKind::Concat(..) => {
            // Flatten the right-leaning chain for readability; the
            // reader rebuilds the same right association.
            out.push_str("S(");
            let mut cur = id;
            let mut first = true;
            loop {
                match *bld.kind(cur) {
                    ReKind::Concat(head, tail) => {
                        if !first {
                            out.push(',');
                        }
                        write_node(bld, head, out);
                        first = false;
                        cur = tail;
                    }
                    _ => {
                        if !first {
                            out.push(',');
                        }
                        write_node(bld, cur, out);
                        break;
                    }
                }
            }
            out.push(')');
        }
        ReKind::Or(ref children) => write_set(bld, 'D', children, out),
        ReKind::And(ref children) => write_set(bld, 'C', children, out),
        ReKind::Loop { body, lo, hi, lazy } => {
            out.push(if lazy { 'Z' } else { 'L' });
            let _ = write!(out, "({},", lo);
            if hi == UNBOUNDED {
                out.push('*');
            } else {
                let _ = write!(out, "{}", hi);
            }
            out.push(',');
            write_node(bld, body, out);
            out.push(')');
        }
        ReKind::Ite { cond, then, els } => {
            out.push_str("I(");
            write_node(bld, cond, out);
            out.push(',');
            write_node(bld, then, out);
            out.push(',');
            write_node(bld, els, out);
            out.push(')');
        }
    }
}

fn write_set(bld: &ReBuilder, tag: char, children: &[ReId], out: &mut String) {
    out.push(tag);
    out.push('(');
    for (i, &c) in children.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_node(bld, c, out);
    }
    out.push(')');
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn err(&self, detail: &str) -> Error {
        Error::InvalidFormat {
            at: self.pos + TAG_LEN,
            detail: detail.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, b: u8) -> Result<(), Error> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(&format!("expected `{}`", b as char)))
        }
    }

    fn parse_num(&mut self) -> Result<u32, Error> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err("expected a number"));
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.err("expected a number"))?;
        text.parse::<u32>()
            .map_err(|_| self.err("number out of range"))
    }

    fn parse_bound(&mut self) -> Result<u32, Error> {
        if self.peek() == Some(b'*') {
            self.pos += 1;
            return Ok(UNBOUNDED);
        }
        self.parse_num()
    }

    /// Comma-separated nodes up to the closing parenthesis.
    fn parse_list(&mut self, bld: &mut ReBuilder) -> Result<Vec<ReId>, Error> {
        let mut items = Vec::new();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.parse_node(bld)?);
            match self.bump() {
                Some(b',') => {}
                Some(b')') => return Ok(items),
                _ => return Err(self.err("expected `,` or `)`")),
            }
        }
    }

    fn parse_node(&mut self, bld: &mut ReBuilder) -> Result<ReId, Error> {
        match self.bump() {
            Some(b'E') => Ok(bld.mk_epsilon()),
            Some(b'A') => Ok(bld.mk_start_anchor()),
            Some(b'z') => Ok(bld.mk_end_anchor()),
            Some(b'^') => Ok(bld.mk_bol_anchor()),
            Some(b'$') => Ok(bld.mk_eol_anchor()),
            Some(b'.') => Ok(bld.mk_singleton(CharSet::full())),
            Some(b'#') => {
                self.expect(b'(')?;
                let n = self.parse_num()?;
                self.expect(b')')?;
                Ok(bld.mk_watchdog(n))
            }
            Some(b'[') => {
                let start = self.pos;
                while self.peek().is_some_and(|b| b != b']') {
                    self.pos += 1;
                }
                self.expect(b']')?;
                let text = std::str::from_utf8(&self.bytes[start..self.pos - 1])
                    .map_err(|_| self.err("malformed predicate ranges"))?;
                match CharSet::from_ranges_text(text) {
                    Some(set) => Ok(bld.mk_singleton(set)),
                    None => Err(self.err("malformed predicate ranges")),
                }
            }
            Some(b'S') => {
                self.expect(b'(')?;
                let items = self.parse_list(bld)?;
                Ok(bld.mk_concat_all(items))
            }
            Some(b'D') => {
                self.expect(b'(')?;
                let items = self.parse_list(bld)?;
                Ok(bld.mk_or(items))
            }
            Some(b'C') => {
                self.expect(b'(')?;
                let items = self.parse_list(bld)?;
                Ok(bld.mk_and(items))
            }
            Some(tag @ (b'L' | b'Z')) => {
                self.expect(b'(')?;
                let lo = self.parse_num()?;
                self.expect(b',')?;
                let hi = self.parse_bound()?;
                self.expect(b',')?;
                let body = self.parse_node(bld)?;
                self.expect(b')')?;
                bld.mk_loop(body, lo, hi, tag == b'Z')
            }
            Some(b'I') => {
                self.expect(b'(')?;
                let cond = self.parse_node(bld)?;
                self.expect(b',')?;
                let then = self.parse_node(bld)?;
                self.expect(b',')?;
                let els = self.parse_node(bld)?;
                self.expect(b')')?;
                Ok(bld.mk_ite(cond, then, els))
            }
            Some(other) => Err(self.err(&format!("unexpected byte `{}`", other as char))),
            None => Err(self.err("unexpected end of input")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
