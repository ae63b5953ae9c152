//! printf-style formatting of translated strings.
//!
//! Supports the conversions translation catalogs use in practice:
//!
//! | Spec    | Output                                 |
//! |---------|----------------------------------------|
//! | `%%`    | literal `%`                            |
//! | `%s`    | string                                 |
//! | `%d`    | signed integer                         |
//! | `%u`    | unsigned integer                       |
//! | `%c`    | character from its code point          |
//! | `%f %F` | float (precision defaults to 6)        |
//! | `%e %E` | scientific notation (`1.5e+3`)         |
//! | `%b %o` | binary / octal                         |
//! | `%x %X` | hexadecimal                            |
//!
//! Each spec may carry an argument number (`%2$s`), flags (`-` left align,
//! `+` force sign, `0` or space padding, `'c` custom padding char), a width
//! and a `.precision`.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// `%[argnum$][flags][width][.precision]conversion`
static RE_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:([1-9][0-9]*)\$)?((?:[-+ 0]|'.)*)([0-9]+)?(?:\.([0-9]+))?(.?)").unwrap()
});

/// Leading number of a string, as numeric conversions read it.
static RE_LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r]*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap()
});

/// Largest accepted field width or precision.
pub const MAX_WIDTH: usize = 4096;

/// Float precision is truncated to this many digits.
const MAX_FLOAT_PRECISION: usize = 53;

/// Template and arguments do not fit together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("argument {index} is required but only {supplied} were supplied")]
    MissingArgument { index: usize, supplied: usize },

    #[error("unknown format conversion `%{0}`")]
    UnknownConversion(char),

    #[error("missing format conversion at end of string")]
    MissingConversion,

    #[error("format {field} `{value}` exceeds the maximum of {max}")]
    OutOfRange {
        field: &'static str,
        value: String,
        max: usize,
    },
}

/// One parsed conversion spec.
#[derive(Debug)]
struct Spec {
    argnum: Option<usize>,
    left_align: bool,
    force_sign: bool,
    pad: char,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

impl Spec {
    fn parse(caps: &regex::Captures<'_>) -> Result<Self, FormatError> {
        let conversion = caps
            .get(5)
            .and_then(|m| m.as_str().chars().next())
            .ok_or(FormatError::MissingConversion)?;

        // An argument number too large for usize can only point past the arguments
        let argnum = caps
            .get(1)
            .map(|m| m.as_str().parse().unwrap_or(usize::MAX));

        let mut spec = Self {
            argnum,
            left_align: false,
            force_sign: false,
            pad: ' ',
            width: bounded(caps.get(3), "width")?.unwrap_or(0),
            precision: bounded(caps.get(4), "precision")?,
            conversion,
        };

        let mut flags = caps.get(2).map_or("", |m| m.as_str()).chars();
        while let Some(flag) = flags.next() {
            match flag {
                '-' => spec.left_align = true,
                '+' => spec.force_sign = true,
                '0' | ' ' => spec.pad = flag,
                '\'' => {
                    if let Some(pad) = flags.next() {
                        spec.pad = pad;
                    }
                }
                _ => {}
            }
        }
        Ok(spec)
    }

    /// Render `arg` with this spec, padding included.
    fn render(&self, arg: &Value) -> Result<String, FormatError> {
        let body = match self.conversion {
            's' => {
                let s = to_display(arg);
                match self.precision {
                    Some(p) => s.chars().take(p).collect(),
                    None => s,
                }
            }
            'd' => self.signed(to_int(arg).to_string(), to_int(arg) >= 0),
            'u' => (to_int(arg) as u64).to_string(),
            // Width and padding do not apply to characters
            'c' => {
                return Ok(u32::try_from(to_int(arg))
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_default());
            }
            'f' | 'F' => {
                let f = to_float(arg);
                self.signed(format!("{:.*}", self.float_precision(), f), f >= 0.0)
            }
            'e' | 'E' => {
                let f = to_float(arg);
                let s = exponent_with_sign(&format!("{:.*e}", self.float_precision(), f));
                let s = if self.conversion == 'E' {
                    s.to_uppercase()
                } else {
                    s
                };
                self.signed(s, f >= 0.0)
            }
            'b' => format!("{:b}", to_int(arg) as u64),
            'o' => format!("{:o}", to_int(arg) as u64),
            'x' => format!("{:x}", to_int(arg) as u64),
            'X' => format!("{:X}", to_int(arg) as u64),
            other => return Err(FormatError::UnknownConversion(other)),
        };
        Ok(self.pad(body))
    }

    fn float_precision(&self) -> usize {
        self.precision.unwrap_or(6).min(MAX_FLOAT_PRECISION)
    }

    fn signed(&self, digits: String, non_negative: bool) -> String {
        if self.force_sign && non_negative {
            format!("+{digits}")
        } else {
            digits
        }
    }

    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let fill: String = std::iter::repeat_n(self.pad, self.width - len).collect();

        if self.left_align {
            return body + &fill;
        }
        // Zero padding goes between the sign and the digits
        let numeric = !matches!(self.conversion, 's');
        if self.pad == '0' && numeric && body.starts_with(['+', '-']) {
            let (sign, digits) = body.split_at(1);
            return format!("{sign}{fill}{digits}");
        }
        fill + &body
    }
}

/// Parse a width or precision capture, rejecting values above [`MAX_WIDTH`].
fn bounded(
    m: Option<regex::Match<'_>>,
    field: &'static str,
) -> Result<Option<usize>, FormatError> {
    let Some(m) = m else { return Ok(None) };
    match m.as_str().parse::<usize>() {
        Ok(n) if n <= MAX_WIDTH => Ok(Some(n)),
        _ => Err(FormatError::OutOfRange {
            field,
            value: m.as_str().to_owned(),
            max: MAX_WIDTH,
        }),
    }
}

/// Format `template` with positional `args`.
///
/// Arguments are consumed in order by specs without an argument number.
/// Surplus arguments are ignored.
///
/// # Errors
///
/// - [`FormatError::MissingArgument`] when a spec refers past the last argument
/// - [`FormatError::UnknownConversion`] for an unsupported conversion char
/// - [`FormatError::MissingConversion`] for a lone `%` at the end
/// - [`FormatError::OutOfRange`] for a width or precision above [`MAX_WIDTH`]
pub fn sprintf(template: &str, args: &[Value]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    let mut next_arg = 0;

    for caps in RE_SPEC.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        let spec = Spec::parse(&caps)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }

        let index = match spec.argnum {
            Some(n) => n - 1,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let arg = args.get(index).ok_or(FormatError::MissingArgument {
            index: index + 1,
            supplied: args.len(),
        })?;
        out.push_str(&spec.render(arg)?);
    }

    out.push_str(&template[last..]);
    Ok(out)
}

// ============================================================================
// Argument Coercion
// ============================================================================

/// String form of an argument.
fn to_display(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_owned(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn to_float(arg: &Value) -> f64 {
    match arg {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => RE_LEADING_NUMBER
            .find(s)
            .and_then(|m| m.as_str().trim_start().parse().ok())
            .unwrap_or_default(),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

fn to_int(arg: &Value) -> i64 {
    match arg {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| to_float(arg) as i64),
        _ => to_float(arg) as i64,
    }
}

/// `1.5e3` → `1.5e+3`
fn exponent_with_sign(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s.to_owned(),
    }
}

// ============================================================================
// Tests
// ============================================================================
