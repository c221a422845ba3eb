//! # Value Encoder
//!
//! Renders scalar values into the restricted text encoding used by
//! metadata cells and inline endpoints.
//!
//! The encoding is JSON-shaped but deliberately not strict JSON:
//!
//! - Non-finite numbers render as the bare sentinel tokens `inf`,
//!   `-inf`, `-nan`. Consumers must special-case them.
//! - Strings containing bytes invalid in UTF-8 are still emitted,
//!   escaped byte-by-byte as `\u00XX`. Decoding such output does not
//!   reproduce the original bytes. This is a known, carried-forward
//!   deviation; do not "fix" it by guessing an intended encoding.
//!
//! Encoding never fails: unencodable input always degrades to an
//! escaped form.

use crate::types::Scalar;

// =============================================================================
// SCALAR ENCODING
// =============================================================================

/// Encode one scalar into its cell text.
///
/// Absent encodes to the empty string, distinct from any in-band null
/// marker.
#[must_use]
pub fn encode(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Absent => String::new(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Number(n) => encode_number(*n),
        Scalar::Str(bytes) => encode_str(bytes),
    }
}

/// Encode a number in canonical textual form.
///
/// Integral finite values print without a fractional part. Non-finite
/// values print the sentinel tokens; NaN of either sign is `-nan`.
#[must_use]
pub fn encode_number(n: f64) -> String {
    if n.is_nan() {
        return "-nan".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }
    // Integral doubles print as integers; 2^53 bounds exact conversion.
    if n == n.trunc() && n.abs() < 9_007_199_254_740_992.0 {
        return (n as i64).to_string();
    }
    n.to_string()
}

/// Encode a byte string as a double-quoted, backslash-escaped token.
///
/// Well-formed UTF-8 passes through; control bytes 0–31 and bytes
/// invalid in UTF-8 escape to `\u00XX`.
#[must_use]
pub fn encode_str(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                escape_into(valid, &mut out);
                rest = &[];
            }
            Err(err) => {
                let (valid, tail) = rest.split_at(err.valid_up_to());
                if let Ok(prefix) = std::str::from_utf8(valid) {
                    escape_into(prefix, &mut out);
                }
                // error_len() is None only when the input ends mid-sequence.
                let bad = err.error_len().unwrap_or(tail.len());
                for byte in &tail[..bad] {
                    push_escaped_byte(*byte, &mut out);
                }
                rest = &tail[bad..];
            }
        }
    }
    out.push('"');
    out
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => push_escaped_byte(c as u8, out),
            c => out.push(c),
        }
    }
}

fn push_escaped_byte(byte: u8, out: &mut String) {
    out.push_str(&format!("\\u{:04x}", byte));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_empty_cell() {
        assert_eq!(encode(&Scalar::Absent), "");
    }

    #[test]
    fn booleans_are_bare_tokens() {
        assert_eq!(encode(&Scalar::Bool(true)), "true");
        assert_eq!(encode(&Scalar::Bool(false)), "false");
    }

    #[test]
    fn integral_numbers_drop_fraction() {
        assert_eq!(encode(&Scalar::Number(5.0)), "5");
        assert_eq!(encode(&Scalar::Number(-42.0)), "-42");
        assert_eq!(encode(&Scalar::Number(0.0)), "0");
    }

    #[test]
    fn fractional_numbers_round_trip() {
        assert_eq!(encode(&Scalar::Number(2.5)), "2.5");
        assert_eq!(encode(&Scalar::Number(-0.125)), "-0.125");
    }

    #[test]
    fn positive_infinity_is_inf_token() {
        assert_eq!(encode(&Scalar::Number(f64::INFINITY)), "inf");
    }

    #[test]
    fn negative_infinity_and_nan_sentinels() {
        assert_eq!(encode(&Scalar::Number(f64::NEG_INFINITY)), "-inf");
        // NaN of either sign renders the same sentinel.
        assert_eq!(encode(&Scalar::Number(f64::NAN)), "-nan");
        assert_eq!(encode(&Scalar::Number(-f64::NAN)), "-nan");
        let sign_bit_nan = f64::from_bits(f64::NAN.to_bits() | (1 << 63));
        assert_eq!(encode(&Scalar::Number(sign_bit_nan)), "-nan");
    }

    #[test]
    fn plain_string_is_quoted() {
        assert_eq!(encode(&Scalar::str("hello")), "\"hello\"");
    }

    #[test]
    fn escapes_round_trip_through_conforming_parser() {
        let original = "a\"b\\c\nd\u{1}e\tf";
        let encoded = encode_str(original.as_bytes());
        let decoded: String = serde_json::from_str(&encoded).expect("conforming parse");
        assert_eq!(decoded, original);
    }

    #[test]
    fn control_bytes_escape_uniformly() {
        assert_eq!(encode_str(b"\x01\x1f"), "\"\\u0001\\u001f\"");
    }

    #[test]
    fn invalid_utf8_escapes_byte_by_byte() {
        assert_eq!(encode_str(b"f\xffo"), "\"f\\u00ffo\"");
        // Truncated multi-byte sequence at end of input.
        assert_eq!(encode_str(b"ab\xe2\x82"), "\"ab\\u00e2\\u0082\"");
    }

    #[test]
    fn multibyte_utf8_passes_through() {
        assert_eq!(encode_str("λ→".as_bytes()), "\"λ→\"");
    }
}
