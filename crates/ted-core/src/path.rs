//! A `nom`-based parser for dotted-path expressions.
//!
//! A path is one or more key segments joined by a configurable separator,
//! each optionally suffixed with `[n]` index segments: `a.b[0].c`, or
//! `spec#containers[2]#image` with `#` as the separator. The empty string
//! addresses the document root.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, i64 as nom_i64},
    combinator::map,
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair},
};

use crate::error::EditError;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '.';

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A mapping key (e.g. `spec`).
    Key(String),
    /// A sequence index (e.g. `[2]`). Negative values are accepted by the
    /// grammar but never address an element during traversal.
    Index(i64),
}

/// Parse a path string into segments. The empty string parses to the empty
/// segment list (the root); anything else must match the grammar in full or
/// the whole path is rejected as malformed.
pub fn parse_path(path: &str, separator: char) -> Result<Vec<Segment>, EditError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let groups = separated_list1(char(separator), segment_group(separator));
    match map(groups, |gs: Vec<Vec<Segment>>| {
        gs.into_iter().flatten().collect()
    })
    .parse(path)
    {
        Ok(("", segments)) => Ok(segments),
        Ok((rest, _)) => Err(EditError::MalformedPath(
            path.to_string(),
            format!("unexpected trailing input '{rest}'"),
        )),
        Err(e) => Err(EditError::MalformedPath(path.to_string(), e.to_string())),
    }
}

// Key tokens: alphanumerics plus `-`, `.`, `/`, `_`, minus the active
// separator.
fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '/' | '_')
}

fn key_segment(separator: char) -> impl FnMut(&str) -> IResult<&str, Segment> {
    move |input| {
        map(
            take_while1(move |c: char| c != separator && is_key_char(c)),
            |s: &str| Segment::Key(s.to_string()),
        )
        .parse(input)
    }
}

fn index_segment(input: &str) -> IResult<&str, Segment> {
    map(delimited(char('['), nom_i64, char(']')), Segment::Index).parse(input)
}

// A group between separators: a key with optional index suffixes, or bare
// index segments.
fn segment_group(separator: char) -> impl FnMut(&str) -> IResult<&str, Vec<Segment>> {
    move |input| {
        alt((
            map(
                pair(key_segment(separator), many0(index_segment)),
                |(key, mut indexes)| {
                    let mut segments = vec![key];
                    segments.append(&mut indexes);
                    segments
                },
            ),
            many1(index_segment),
        ))
        .parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Segment {
        Segment::Key(s.to_string())
    }

    #[test]
    fn empty_string_is_root() {
        assert!(parse_path("", '.').unwrap().is_empty());
    }

    #[test]
    fn dotted_keys() {
        assert_eq!(
            parse_path("a.b.c", '.').unwrap(),
            vec![key("a"), key("b"), key("c")]
        );
    }

    #[test]
    fn key_with_index_suffixes() {
        assert_eq!(
            parse_path("a.list[0][3].x", '.').unwrap(),
            vec![
                key("a"),
                key("list"),
                Segment::Index(0),
                Segment::Index(3),
                key("x"),
            ]
        );
    }

    #[test]
    fn bare_index_group() {
        assert_eq!(
            parse_path("[1].name", '.').unwrap(),
            vec![Segment::Index(1), key("name")]
        );
    }

    #[test]
    fn negative_index_parses() {
        assert_eq!(parse_path("a[-1]", '.').unwrap()[1], Segment::Index(-1));
    }

    #[test]
    fn alternate_separator_frees_the_dot() {
        assert_eq!(
            parse_path("a.b#c", '#').unwrap(),
            vec![key("a.b"), key("c")]
        );
    }

    #[test]
    fn key_charset() {
        assert_eq!(
            parse_path("metadata.labels/app_env-1", '.').unwrap(),
            vec![key("metadata"), key("labels/app_env-1")]
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["a..b", "a.", ".a", "a[", "a[x]", "a[1", "a[1]b", "a b"] {
            assert!(
                matches!(parse_path(bad, '.'), Err(EditError::MalformedPath(..))),
                "expected '{bad}' to be rejected"
            );
        }
    }
}
