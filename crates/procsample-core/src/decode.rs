//! Byte-slice to number decoding, without an intermediate `String` allocation.

use crate::Error;

/// Parses an unsigned decimal integer directly from ASCII bytes.
///
/// Overflow is checked digit-by-digit (mirrors the cutoff/maxval technique
/// used by `strconv.ParseUint`) rather than parsed into a wider type and
/// truncated, so a field that genuinely overflows `u64` is reported as
/// [`Error::Range`] instead of silently wrapping.
pub fn parse_u64(field: &str, bytes: &[u8]) -> Result<u64, Error> {
    if bytes.is_empty() {
        return Err(Error::parse(field, bytes));
    }
    let mut value: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return Err(Error::parse(field, bytes));
        }
        let digit = (b - b'0') as u64;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::range(field))?;
    }
    Ok(value)
}

/// Parses a signed decimal integer, accepting an optional leading `-`.
pub fn parse_i64(field: &str, bytes: &[u8]) -> Result<i64, Error> {
    match bytes.split_first() {
        Some((b'-', rest)) => {
            let magnitude = parse_u64(field, rest)?;
            i64::try_from(magnitude)
                .map(|v| -v)
                .map_err(|_| Error::range(field))
        }
        _ => {
            let magnitude = parse_u64(field, bytes)?;
            i64::try_from(magnitude).map_err(|_| Error::range(field))
        }
    }
}

/// Parses a decimal float (used by `/proc/loadavg` and `/proc/uptime`).
///
/// Floats have no fixed-width overflow story, so this defers to the
/// standard library parser after validating the slice is UTF-8.
pub fn parse_f64(field: &str, bytes: &[u8]) -> Result<f64, Error> {
    let text = std::str::from_utf8(bytes).map_err(|_| Error::parse(field, bytes))?;
    text.parse::<f64>().map_err(|_| Error::parse(field, bytes))
}

/// Splits a `"123 kB"`-shaped meminfo value and parses the numeric part.
pub fn parse_u64_prefix(field: &str, bytes: &[u8]) -> Result<u64, Error> {
    let digits_end = bytes.iter().position(|b| !b.is_ascii_digit()).unwrap_or(bytes.len());
    parse_u64(field, &bytes[..digits_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_u64() {
        assert_eq!(parse_u64("x", b"16384").unwrap(), 16384);
    }

    #[test]
    fn rejects_non_digit() {
        assert!(parse_u64("x", b"16k84").is_err());
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_u64("x", b"99999999999999999999999").is_err());
    }

    #[test]
    fn parses_negative_i64() {
        assert_eq!(parse_i64("x", b"-42").unwrap(), -42);
    }

    #[test]
    fn parses_float() {
        assert!((parse_f64("x", b"0.42").unwrap() - 0.42).abs() < 1e-9);
    }

    #[test]
    fn parses_prefix_before_unit() {
        assert_eq!(parse_u64_prefix("x", b"16384 kB").unwrap(), 16384);
    }
}
