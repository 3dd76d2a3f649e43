//! Bracket and quote aware scanning over query-builder source text.

use std::sync::LazyLock;

use regex::Regex;

use super::TransformError;

static CHAIN_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:await\s+)?[A-Za-z_$][\w$]*").expect("valid regex"));
static CALL_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\s*([A-Za-z_$][\w$]*)\s*\(").expect("valid regex"));

/// One `.name(args)` link of a builder chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<'a> {
    pub name: &'a str,
    pub args: &'a str,
}

/// Index of the bracket closing the one at `open`, skipping nested
/// brackets and string literals.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on `separator` where it occurs outside brackets and strings.
/// Empty trailing pieces (from a trailing comma) are dropped.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Returns the inside of `text` if it is fully wrapped by `open`..`close`.
pub fn unwrap_group(text: &str, open: char, close: char) -> Option<&str> {
    let text = text.trim();
    if !text.starts_with(open) {
        return None;
    }
    let end = matching_close(text, 0)?;
    (end == text.len() - close.len_utf8() && text.ends_with(close))
        .then(|| text[open.len_utf8()..end].trim())
}

/// Breaks `db.select().from(t)...` into its calls, dropping the root
/// identifier and a leading `await`.
pub fn parse_chain(input: &str) -> Result<Vec<Call<'_>>, TransformError> {
    let input = input.trim().trim_end_matches(';').trim_end();
    if input.is_empty() {
        return Err(TransformError::Empty);
    }
    let root = CHAIN_ROOT
        .find(input)
        .ok_or_else(|| TransformError::UnsupportedStatement {
            input: input.to_string(),
        })?;

    let mut calls = Vec::new();
    let mut rest = &input[root.end()..];
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let head = CALL_HEAD
            .captures(rest)
            .ok_or_else(|| TransformError::UnsupportedStatement {
                input: rest.to_string(),
            })?;
        let name = head.get(1).map_or("", |m| m.as_str());
        let open = head.get(0).map_or(0, |m| m.end()) - 1;
        let close = matching_close(rest, open).ok_or_else(|| TransformError::Unbalanced {
            input: rest.to_string(),
        })?;
        calls.push(Call {
            name,
            args: rest[open + 1..close].trim(),
        });
        rest = &rest[close + 1..];
    }

    if calls.is_empty() {
        return Err(TransformError::UnsupportedStatement {
            input: input.to_string(),
        });
    }
    Ok(calls)
}
