// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTML entity handling.
//!
//! Benchmark names come from external definitions and may contain markup
//! characters (template arguments are the usual suspects). Names are decoded
//! once when a results document is loaded and escaped every time they are
//! written into markup.

/// Escape the five reserved HTML characters.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode named and numeric character references.
///
/// Recognizes `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&#NN;` and
/// `&#xHH;`. Decoding is a single pass: text produced by a reference is
/// never decoded again, so `&amp;lt;` yields `&lt;`. Anything that does not
/// form a valid reference is copied through unchanged.
pub fn decode_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match decode_reference(candidate) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Longest reference body looked at, between `&` and `;`.
const MAX_REFERENCE_BODY: usize = 10;

/// Decode one reference at the start of `s` (which begins with `&`).
/// Returns the decoded char and the number of bytes consumed.
fn decode_reference(s: &str) -> Option<(char, usize)> {
    let end = s
        .bytes()
        .skip(1)
        .take(MAX_REFERENCE_BODY + 1)
        .position(|b| b == b';')?
        + 1;
    let body = &s[1..end];
    let consumed = end + 1;

    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = match digits.strip_prefix(|c: char| c == 'x' || c == 'X') {
                Some(hex) if !hex.is_empty() => u32::from_str_radix(hex, 16).ok()?,
                Some(_) => return None,
                None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                    digits.parse::<u32>().ok()?
                }
                None => return None,
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, consumed))
}
