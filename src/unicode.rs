//! Unicode character category predicates.
//!
//! The engine's class semantics are defined to agree with its parser
//! collaborator, so the `\w`/`\s`/`\d` and general-category tables are
//! obtained *from* `regex-syntax`: each category is translated as a
//! one-token pattern and the resulting HIR class ranges are read back as
//! a [`CharSet`].  This keeps the engine's view of Unicode identical to
//! the front-end's without duplicating the tables.

use regex_syntax::hir::{Class, HirKind};

use crate::charset::CharSet;

/// The `\w` predicate (Unicode word characters).
pub fn perl_word() -> CharSet {
    class_of(r"\w")
}

/// The `\s` predicate (Unicode whitespace).
pub fn perl_space() -> CharSet {
    class_of(r"\s")
}

/// The `\d` predicate (Unicode decimal digits, general category `Nd`).
pub fn perl_digit() -> CharSet {
    class_of(r"\d")
}

/// A Unicode general category or script by name (e.g. `Lu`, `Greek`).
/// Returns `None` when `regex-syntax` does not recognize the name.
pub fn general_category(name: &str) -> Option<CharSet> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let pattern = format!(r"\p{{{}}}", name);
    let hir = regex_syntax::Parser::new().parse(&pattern).ok()?;
    match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => Some(CharSet::from_ranges(
            class
                .ranges()
                .iter()
                .map(|r| (r.start() as u32, r.end() as u32)),
        )),
        _ => None,
    }
}

/// Translate a single-class pattern and read back its ranges.  The
/// patterns used here are fixed literals that `regex-syntax` always
/// accepts, so failure reduces to the empty set rather than an error.
fn class_of(pattern: &str) -> CharSet {
    let Ok(hir) = regex_syntax::Parser::new().parse(pattern) else {
        return CharSet::empty();
    };
    match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => CharSet::from_ranges(
            class
                .ranges()
                .iter()
                .map(|r| (r.start() as u32, r.end() as u32)),
        ),
        HirKind::Class(Class::Bytes(class)) => CharSet::from_ranges(
            class
                .ranges()
                .iter()
                .map(|r| (u32::from(r.start()), u32::from(r.end()))),
        ),
        _ => CharSet::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit() {
        let d = perl_digit();
        for c in '0'..='9' {
            assert!(d.contains(c as u32));
        }
        assert!(!d.contains('a' as u32));
        // Devanagari digits are decimal digits too.
        assert!(d.contains(0x0966));
    }

    #[test]
    fn test_word() {
        let w = perl_word();
        assert!(w.contains('a' as u32));
        assert!(w.contains('Z' as u32));
        assert!(w.contains('0' as u32));
        assert!(w.contains('_' as u32));
        assert!(!w.contains(' ' as u32));
        assert!(!w.contains('-' as u32));
    }

    #[test]
    fn test_space() {
        let s = perl_space();
        assert!(s.contains(' ' as u32));
        assert!(s.contains('\t' as u32));
        assert!(s.contains('\n' as u32));
        assert!(!s.contains('x' as u32));
    }

    #[test]
    fn test_general_category() {
        let lu = general_category("Lu").expect("Lu should resolve");
        assert!(lu.contains('A' as u32));
        assert!(!lu.contains('a' as u32));
        assert!(general_category("NoSuchCategory").is_none());
        assert!(general_category("").is_none());
    }
}
