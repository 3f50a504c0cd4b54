//! Parse/stringify strategies for URL-bound values.
//!
//! A codec decides three things: how a raw parameter string becomes a
//! value, how a value becomes a parameter string, and which values count
//! as "empty". Empty values are never written (the parameter is removed
//! instead) and never assigned when read back. That makes a numeric 0 and
//! a boolean false indistinguishable from an absent parameter; this
//! matches the dashboard's historical behavior and is deliberately kept.

/// Strategy for converting between a value and its URL string form.
#[derive(Debug, Clone, Copy)]
pub struct ParamCodec<T> {
    pub parse: fn(&str) -> T,
    pub stringify: fn(&T) -> String,
    pub is_empty: fn(&T) -> bool,
}

/// Identity codec; the empty string counts as empty.
pub fn string_param() -> ParamCodec<String> {
    ParamCodec {
        parse: |raw| raw.to_string(),
        stringify: |value| value.clone(),
        is_empty: |value| value.is_empty(),
    }
}

/// Lenient numeric codec: unparsable input coerces to 0, values serialize
/// rounded to 5 decimal places (enough precision for map coordinates),
/// and 0 counts as empty.
pub fn number_param() -> ParamCodec<f64> {
    ParamCodec {
        parse: |raw| raw.trim().parse().unwrap_or(0.0),
        stringify: |value| format!("{:.5}", value),
        is_empty: |value| *value == 0.0,
    }
}

/// Boolean codec: `"true"` in any casing parses to true, everything else
/// to false; false counts as empty.
pub fn boolean_param() -> ParamCodec<bool> {
    ParamCodec {
        parse: |raw| raw.trim().eq_ignore_ascii_case("true"),
        stringify: |value| if *value { "true".to_string() } else { String::new() },
        is_empty: |value| !*value,
    }
}
