//! Display formatting for numbers and temporal values.

use std::fmt::Write;

use crate::value::Value;

/// Number format type, parsed from a column's format override
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NumberFormat {
    /// Integers without decimals, everything else as-is
    #[default]
    General,
    /// No thousands separators, full precision
    Plain,
    Percent { decimals: usize },
    Dollar { decimals: usize },
    Euro { decimals: usize },
    Scientific { decimals: usize },
    /// printf-style: `%d`, `%i`, `%.2f`, `%e` with optional surrounding text
    Printf {
        prefix: String,
        precision: Option<usize>,
        conversion: char,
        suffix: String,
    },
}

impl NumberFormat {
    /// Parse a format spec. Unknown specs yield `None`.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        match spec {
            "" => Some(NumberFormat::General),
            "plain" => Some(NumberFormat::Plain),
            "percent" => Some(NumberFormat::Percent { decimals: 2 }),
            "dollar" => Some(NumberFormat::Dollar { decimals: 2 }),
            "euro" => Some(NumberFormat::Euro { decimals: 2 }),
            "scientific" => Some(NumberFormat::Scientific { decimals: 2 }),
            _ => Self::parse_printf(spec),
        }
    }

    fn parse_printf(spec: &str) -> Option<Self> {
        // Find the first '%' that is not an escaped "%%"
        let bytes = spec.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                if bytes.get(i + 1) == Some(&b'%') {
                    i += 2;
                    continue;
                }
                break;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }

        let prefix = spec[..i].replace("%%", "%");
        let rest = &spec[i + 1..];
        let (precision, rest) = match rest.strip_prefix('.') {
            Some(after_dot) => {
                let digits: String = after_dot.chars().take_while(|c| c.is_ascii_digit()).collect();
                let precision = digits.parse::<usize>().ok()?;
                (Some(precision), &after_dot[digits.len()..])
            }
            None => (None, rest),
        };

        let mut chars = rest.chars();
        let conversion = chars.next()?;
        if !matches!(conversion, 'd' | 'i' | 'f' | 'e' | 'u') {
            return None;
        }
        let suffix = chars.as_str().replace("%%", "%");

        Some(NumberFormat::Printf {
            prefix,
            precision,
            conversion,
            suffix,
        })
    }

    pub fn format(&self, n: f64) -> String {
        if n.is_nan() {
            return String::new();
        }
        match self {
            NumberFormat::General => Value::format_general(n),
            NumberFormat::Plain => format!("{}", n),
            NumberFormat::Percent { decimals } => format!("{:.*}%", *decimals, n * 100.0),
            NumberFormat::Dollar { decimals } => with_currency("$", n, *decimals),
            NumberFormat::Euro { decimals } => with_currency("€", n, *decimals),
            NumberFormat::Scientific { decimals } => format!("{:.*e}", *decimals, n),
            NumberFormat::Printf {
                prefix,
                precision,
                conversion,
                suffix,
            } => {
                let body = match conversion {
                    'd' | 'i' | 'u' => format!("{}", n.round() as i64),
                    'e' => format!("{:.*e}", precision.unwrap_or(6), n),
                    _ => format!("{:.*}", precision.unwrap_or(6), n),
                };
                format!("{prefix}{body}{suffix}")
            }
        }
    }

    /// Fixed decimals derived from a step, e.g. 0.01 -> 2
    pub fn from_step(step: f64) -> Self {
        if step <= 0.0 || !step.is_finite() {
            return NumberFormat::General;
        }
        let text = format!("{}", step);
        let decimals = text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0);
        NumberFormat::Printf {
            prefix: String::new(),
            precision: Some(decimals),
            conversion: if decimals == 0 { 'd' } else { 'f' },
            suffix: String::new(),
        }
    }
}

fn with_currency(symbol: &str, n: f64, decimals: usize) -> String {
    let body = group_thousands(&format!("{:.*}", decimals, n.abs()));
    if n < 0.0 {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

/// Insert `,` between groups of three integer digits
pub fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Render anything chrono can format with a strftime pattern.
///
/// chrono reports bad patterns as a `fmt::Error` while writing, so this
/// returns `None` instead of panicking inside `to_string()`.
pub fn strftime<D: std::fmt::Display>(formatted: D) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", formatted).ok()?;
    Some(out)
}
