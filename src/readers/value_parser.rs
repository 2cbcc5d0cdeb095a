//! Measurement value grammar.
//!
//! ```text
//! value := ws* '-'? digit* '.'? digit* ws*      (at least one digit)
//! ```
//!
//! Exponents, `+`, `inf`/`nan` and embedded whitespace are rejected. The
//! digits are checked in place and the trimmed slice is handed to
//! `lexical-core`, so nothing is copied and rounding matches `f32::from_str`.

/// Parse a value field, returning `None` when it does not match the grammar.
pub fn parse_value(field: &[u8]) -> Option<f32> {
    let number = trim_ascii_whitespace(field);

    let unsigned = number.strip_prefix(b"-").unwrap_or(number);
    let (integer, fraction) = match unsigned.iter().position(|&b| b == b'.') {
        Some(dot) => (&unsigned[..dot], &unsigned[dot + 1..]),
        None => (unsigned, &[][..]),
    };

    let all_digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);
    if integer.len() + fraction.len() == 0 || !all_digits(integer) || !all_digits(fraction) {
        return None;
    }

    lexical_core::parse::<f32>(number).ok()
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
