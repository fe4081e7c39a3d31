//! `str.format` template expansion.
//!
//! Supported fields are `{}` (automatic numbering) and `{N}` (explicit
//! index). `{{` and `}}` are literal braces. Arguments render with their
//! display form.

use std::iter::Peekable;
use std::str::Chars;

use crate::errors::{format_error, EvalError};
use crate::value::Value;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Automatic,
    Manual,
}

/// Expand `template` with `args`.
pub fn format_template(template: &str, args: &[Value]) -> Result<String, EvalError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut numbering = Numbering::Unset;
    let mut next_auto = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let field = read_field(&mut chars)?;
                let index = if field.is_empty() {
                    if numbering == Numbering::Manual {
                        return Err(format_error(
                            "cannot switch from manual field specification to automatic field numbering",
                        ));
                    }
                    numbering = Numbering::Automatic;
                    next_auto += 1;
                    next_auto - 1
                } else {
                    let Ok(index) = field.parse::<usize>() else {
                        return Err(format_error(format!(
                            "unsupported format field '{field}'"
                        )));
                    };
                    if numbering == Numbering::Automatic {
                        return Err(format_error(
                            "cannot switch from automatic field numbering to manual field specification",
                        ));
                    }
                    numbering = Numbering::Manual;
                    index
                };
                let Some(arg) = args.get(index) else {
                    return Err(format_error(format!(
                        "Replacement index {index} out of range for positional args tuple"
                    )));
                };
                out.push_str(&arg.display_value());
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(format_error("Single '}' encountered in format string"));
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Read a field body up to its closing `}`.
fn read_field(chars: &mut Peekable<Chars<'_>>) -> Result<String, EvalError> {
    let mut field = String::new();
    for c in chars.by_ref() {
        match c {
            '}' => return Ok(field),
            '{' => return Err(format_error("unexpected '{' in field name")),
            other => field.push(other),
        }
    }
    Err(format_error("Single '{' encountered in format string"))
}
