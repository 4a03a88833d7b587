use std::{iter, ops::Range};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

pub const OPEN: u8 = b'{';
pub const CLOSE: u8 = b'}';

/// How braces are counted while looking for the end of a body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BraceMode {
    /// Ignore braces inside string, char and text-block literals and comments
    #[default]
    LiteralAware,

    /// Count every brace character, including those inside literals and comments
    Textual,
}

/// Returns the byte offset one past the brace that closes the one at `open`.
///
/// `None` means the end of input was reached before depth returned to zero.
pub fn find_body_end(text: &str, open: usize, mode: BraceMode) -> Option<usize> {
    debug_assert_eq!(text.as_bytes().get(open), Some(&OPEN));

    match mode {
        BraceMode::Textual => scan_textual(text.as_bytes(), open),
        BraceMode::LiteralAware => scan_literal_aware(text.as_bytes(), open),
    }
}

fn scan_textual(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            OPEN => depth += 1,
            CLOSE => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            },
            _ => {},
        }
    }

    None
}

fn scan_literal_aware(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        if let Some(next) = skip_non_code(bytes, i) {
            i = next;
            continue;
        }

        match bytes[i] {
            OPEN => depth += 1,
            CLOSE => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            },
            _ => {},
        }
        i += 1;
    }

    None
}

/// If a literal or comment starts at `i`, returns the offset just past it.
/// Unclosed text blocks and block comments run to the end of input.
fn skip_non_code(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes[i] {
        b'"' if bytes[i..].starts_with(b"\"\"\"") => Some(skip_text_block(bytes, i + 3)),
        b'"' | b'\'' => Some(skip_quoted(bytes, i + 1, bytes[i])),
        b'/' if bytes.get(i + 1) == Some(&b'/') => Some(skip_line(bytes, i + 2)),
        b'/' if bytes.get(i + 1) == Some(&b'*') => Some(skip_block_comment(bytes, i + 2)),
        _ => None,
    }
}

fn non_code_regions(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut regions = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match skip_non_code(bytes, i) {
            Some(end) => {
                regions.push(i..end);
                i = end;
            },
            None => i += 1,
        }
    }

    regions
}

/// Copy of `text` with literals and comments blanked to spaces.
///
/// Byte offsets and line breaks are preserved, so matches found in the copy index `text` directly.
pub fn mask_non_code(text: &str) -> String {
    let mut regions = non_code_regions(text.as_bytes()).into_iter().peekable();
    let mut masked = String::with_capacity(text.len());

    for (i, c) in text.char_indices() {
        while regions.next_if(|region| region.end <= i).is_some() {}

        if c != '\n' && regions.peek().is_some_and(|region| region.contains(&i)) {
            masked.extend(iter::repeat_n(' ', c.len_utf8()));
        } else {
            masked.push(c);
        }
    }

    masked
}

/// Skips a string or char literal. An unclosed literal stops at the end of its line.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }

    bytes.len()
}

fn skip_text_block(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i..].starts_with(b"\"\"\"") {
            return i + 3;
        } else {
            i += 1;
        }
    }

    bytes.len()
}

fn skip_line(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |pos| i + pos)
}

fn skip_block_comment(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .windows(2)
        .position(|w| w == b"*/")
        .map_or(bytes.len(), |pos| i + pos + 2)
}

/// True when nothing but whitespace sits between the outer braces of `span`.
pub fn has_empty_body(span: &str) -> bool {
    match (span.find(OPEN as char), span.rfind(CLOSE as char)) {
        (Some(open), Some(close)) if open < close => span[open + 1..close].trim().is_empty(),
        _ => false,
    }
}
