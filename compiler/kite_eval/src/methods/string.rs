//! Native string methods.
//!
//! Positions and `start`/`end` bounds count code points, not bytes.

use crate::errors::{type_mismatch, unreachable, EvalError, EvalResult};
use crate::value::{StrValue, Value};

use super::format::format_template;
use super::helpers::{
    len_to_value, optional_int_arg, optional_str_arg, require_str_arg, slice_window,
};

pub(super) fn dispatch_string_method(s: &StrValue, method: &str, args: &[Value]) -> EvalResult {
    match method {
        "count" => count(s, args),
        "find" => find(s, args),
        "format" => format_template(s.as_str(), args).map(Value::string),
        "join" => join(s, args),
        "split" => split(s, args),
        "strip" => strip(s, args, Trim::Both),
        "lstrip" => strip(s, args, Trim::Start),
        "rstrip" => strip(s, args, Trim::End),
        "lower" => Ok(Value::string(s.to_lowercase())),
        "upper" => Ok(Value::string(s.to_uppercase())),
        "capitalize" => Ok(Value::string(capitalize(s))),
        "swapcase" => Ok(Value::string(swapcase(s))),
        "title" => Ok(Value::string(title(s))),
        "startswith" => affix(s, args, "startswith", |window, affix| window.starts_with(affix)),
        "endswith" => affix(s, args, "endswith", |window, affix| window.ends_with(affix)),
        _ => Err(unreachable(format!(
            "string method '{method}' is listed but not dispatched"
        ))),
    }
}

/// The code-point window `s[start:end]` with its offset, or `None` when the
/// window is inverted or `start` lies past the end of the string.
fn window<'a>(
    s: &'a StrValue,
    method: &str,
    args: &[Value],
    first_bound: usize,
) -> Result<Option<(usize, &'a str)>, EvalError> {
    let start = optional_int_arg(method, args, first_bound)?;
    let end = optional_int_arg(method, args, first_bound + 1)?;
    let len = s.char_len();
    let (from, to) = slice_window(start, end, len);
    if from > to || start.is_some_and(|raw| raw > i64::try_from(len).unwrap_or(i64::MAX)) {
        return Ok(None);
    }
    Ok(Some((from, char_slice(s.as_str(), from, to))))
}

/// Byte-slice `text` by code-point positions.
fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let byte_at = |pos: usize| {
        text.char_indices()
            .nth(pos)
            .map_or(text.len(), |(byte, _)| byte)
    };
    &text[byte_at(from)..byte_at(to)]
}

fn count(s: &StrValue, args: &[Value]) -> EvalResult {
    let needle = require_str_arg("count", args, 0)?;
    let Some((_, haystack)) = window(s, "count", args, 1)? else {
        return Ok(Value::int(0));
    };
    if needle.is_empty() {
        return Ok(len_to_value(haystack.chars().count() + 1));
    }
    Ok(len_to_value(haystack.matches(needle).count()))
}

fn find(s: &StrValue, args: &[Value]) -> EvalResult {
    let needle = require_str_arg("find", args, 0)?;
    let Some((offset, haystack)) = window(s, "find", args, 1)? else {
        return Ok(Value::int(-1));
    };
    match haystack.find(needle) {
        Some(byte) => Ok(len_to_value(offset + haystack[..byte].chars().count())),
        None => Ok(Value::int(-1)),
    }
}

fn affix(s: &StrValue, args: &[Value], method: &str, test: fn(&str, &str) -> bool) -> EvalResult {
    let affix = require_str_arg(method, args, 0)?;
    let Some((_, haystack)) = window(s, method, args, 1)? else {
        return Ok(Value::Bool(false));
    };
    Ok(Value::Bool(test(haystack, affix)))
}

fn join(separator: &StrValue, args: &[Value]) -> EvalResult {
    let parts: Vec<String> = match args.first() {
        Some(Value::List(items)) => items
            .borrow()
            .iter()
            .map(|item| match item {
                Value::Str(part) => Ok(part.as_str().to_string()),
                other => Err(type_mismatch("join() item", "string", other.type_name())),
            })
            .collect::<Result<_, _>>()?,
        Some(Value::Str(text)) => text.chars().map(String::from).collect(),
        other => {
            return Err(type_mismatch(
                "join() argument 1",
                "list of strings",
                other.map_or("nothing", Value::type_name),
            ))
        }
    };
    Ok(Value::string(parts.join(separator.as_str())))
}

fn split(s: &StrValue, args: &[Value]) -> EvalResult {
    let separator = optional_str_arg("split", args, 0)?;
    let limit = optional_int_arg("split", args, 1)?
        .and_then(|n| usize::try_from(n).ok());

    let parts: Vec<Value> = match separator {
        Some("") => return Err(EvalError::new("empty separator")),
        Some(sep) => match limit {
            Some(max) => s.splitn(max + 1, sep).map(Value::string).collect(),
            None => s.split(sep).map(Value::string).collect(),
        },
        None => split_whitespace(s.as_str(), limit)
            .into_iter()
            .map(Value::string)
            .collect(),
    };
    Ok(Value::list(parts))
}

/// Split on runs of whitespace. With a limit, the remainder keeps its
/// trailing whitespace.
fn split_whitespace(text: &str, limit: Option<usize>) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        if limit.is_some_and(|max| parts.len() >= max) {
            parts.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                parts.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                parts.push(rest);
                break;
            }
        }
    }
    parts
}

#[derive(Clone, Copy)]
enum Trim {
    Start,
    End,
    Both,
}

fn strip(s: &StrValue, args: &[Value], side: Trim) -> EvalResult {
    let method = match side {
        Trim::Start => "lstrip",
        Trim::End => "rstrip",
        Trim::Both => "strip",
    };
    let text = s.as_str();
    let trimmed = match optional_str_arg(method, args, 0)? {
        None => match side {
            Trim::Start => text.trim_start(),
            Trim::End => text.trim_end(),
            Trim::Both => text.trim(),
        },
        Some(set) => {
            let in_set = |c: char| set.contains(c);
            match side {
                Trim::Start => text.trim_start_matches(in_set),
                Trim::End => text.trim_end_matches(in_set),
                Trim::Both => text.trim_matches(in_set),
            }
        }
    };
    Ok(Value::string(trimmed))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn swapcase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
