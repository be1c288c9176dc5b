//! Inline `{{name(args)}}` call markers inside string literals.
//!
//! A marker is recognised only when its body has call syntax; any other
//! `{{` text is kept literally.

use crate::args::Args;
use crate::error::TemplateError;
use crate::template::{Directive, Segment};
use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Split a string into literal text and inline calls.
///
/// Returns `None` when the string contains no call markers, so callers can
/// keep it as a plain literal.
pub fn parse_inline(s: &str) -> Result<Option<Vec<Segment>>, TemplateError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = s;
    let mut found_call = false;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        match parse_call(after_open[..end].trim())? {
            Some(directive) => {
                text.push_str(&rest[..start]);
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Call(directive));
                found_call = true;
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                text.push_str(&rest[..start + OPEN.len()]);
                rest = after_open;
            }
        }
    }

    if !found_call {
        return Ok(None);
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(Some(segments))
}

/// Parse `name(arg, ...)`. Returns `None` if the body is not call-shaped.
fn parse_call(body: &str) -> Result<Option<Directive>, TemplateError> {
    let Some(open) = body.find('(') else {
        return Ok(None);
    };
    if !body.ends_with(')') {
        return Ok(None);
    }

    let name = body[..open].trim();
    if !is_identifier(name) {
        return Ok(None);
    }

    let inner = &body[open + 1..body.len() - 1];
    let args = split_args(inner)
        .map_err(|msg| TemplateError::Malformed(format!("Inline call '{body}': {msg}")))?
        .into_iter()
        .map(|token| parse_arg(&token))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|msg| TemplateError::Malformed(format!("Inline call '{body}': {msg}")))?;

    Ok(Some(Directive::new(name, Args::positional(args))))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split on commas that are not inside quotes.
fn split_args(inner: &str) -> Result<Vec<String>, String> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in inner.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match (quote, c) {
            (Some(_), '\\') => {
                current.push(c);
                escaped = true;
            }
            (Some(q), c) if c == q => {
                current.push(c);
                quote = None;
            }
            (None, '"' | '\'') => {
                current.push(c);
                quote = Some(c);
            }
            (None, ',') => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string argument".to_string());
    }
    tokens.push(current);
    Ok(tokens)
}

fn parse_arg(token: &str) -> Result<Value, String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("empty argument".to_string());
    }

    for quote in ['"', '\''] {
        if let Some(body) = token
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return Ok(Value::String(unescape(body)));
        }
    }

    match serde_json::from_str::<Value>(token) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => Ok(value),
        // Bare words are taken as strings
        _ => Ok(Value::String(token.to_string())),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
