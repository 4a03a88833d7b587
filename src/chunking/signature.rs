use std::sync::LazyLock;

use regex::Regex;

use super::delimiters::{BraceMode, mask_non_code};

/// Modifiers, a return type (generics allowed), a name, then anything up to the next `{`.
/// Only whitespace may cross a line break. Parameters are not parsed, only skipped.
static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:public|private|protected|static|\s)+[\w<>]+\s+(?P<name>\w+)\s*.*?\s*\{")
        .expect("signature pattern is valid")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("identifier pattern is valid"));

static CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|interface|enum)\s+(?P<name>\w+)").expect("container pattern is valid")
});

pub const UNKNOWN_CONTAINER: &str = "UnknownContainer";

/// Keywords that never appear in a method header before its parameter list
const NOT_RETURN_TYPES: &[&str] = &[
    "class",
    "interface",
    "enum",
    "record",
    "return",
    "new",
    "throw",
    "else",
    "case",
];

const CONTROL_KEYWORDS: &[&str] = &[
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "try",
    "catch",
    "synchronized",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatch<'a> {
    /// Byte offset of the first non-blank character of the header
    pub start: usize,
    /// Byte offset of the opening body brace
    pub open: usize,
    pub name: &'a str,
}

/// Name of the first type declared in the file, or [`UNKNOWN_CONTAINER`].
pub fn resolve_container(text: &str) -> &str {
    CONTAINER
        .captures(text)
        .and_then(|caps| caps.name("name"))
        .map_or(UNKNOWN_CONTAINER, |m| m.as_str())
}

/// Leftmost, non-overlapping signature matches in source order.
///
/// Type declarations, statements and control-flow headers that look like signatures are skipped,
/// but scanning resumes after them so members inside a type body are still found. In
/// [`BraceMode::LiteralAware`] the search ignores literals and comments, so Javadoc like
/// `{@code Foo}` never opens a method and a comment above a header is not part of it.
pub fn signatures(text: &str, mode: BraceMode) -> Vec<SignatureMatch<'_>> {
    match mode {
        BraceMode::Textual => find_signatures(text, text),
        BraceMode::LiteralAware => find_signatures(text, &mask_non_code(text)),
    }
}

/// `searched` has the same byte layout as `text`; names are sliced from `text`.
fn find_signatures<'a>(text: &'a str, searched: &str) -> Vec<SignatureMatch<'a>> {
    SIGNATURE
        .captures_iter(searched)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let open = whole.end() - 1;
            let base = whole.start();
            let head = &searched[base..open];
            let start = open - head.trim_start().len();

            // The name is the last identifier before the parameter list, so it is found after any
            // return type the pattern could not consume (`Map<K, V>`, `int[]`, `<T> T`).
            let (head, has_parameters) = match head.find('(') {
                Some(paren) => (&head[..paren], true),
                None => (head, false),
            };
            let mut last = None;
            for token in IDENTIFIER.find_iter(head) {
                if NOT_RETURN_TYPES.contains(&token.as_str()) {
                    return None;
                }
                last = Some(token.range());
            }

            let name = match last {
                Some(range) if has_parameters => base + range.start..base + range.end,
                _ => caps.name("name")?.range(),
            };
            let name = &text[name];
            if CONTROL_KEYWORDS.contains(&name) {
                return None;
            }

            Some(SignatureMatch { start, open, name })
        })
        .collect()
}
