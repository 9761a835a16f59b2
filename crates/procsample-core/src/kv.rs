//! Splits a `key: value`-shaped line at its first colon.

/// Splits `line` into a key and a value at the first `:`.
///
/// The key is trimmed of trailing whitespace (several `/proc` files pad keys
/// with spaces before the colon); the value is trimmed of leading whitespace.
/// Returns `None` if `line` has no colon.
pub fn split_colon(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let idx = line.iter().position(|&b| b == b':')?;
    let (key, rest) = line.split_at(idx);
    let value = &rest[1..];
    Some((trim_end(key), trim_start(value)))
}

/// Splits `line` on runs of ASCII whitespace, skipping empty fields.
///
/// Used by the whitespace-delimited counter files (`stat`, `diskstats`,
/// `loadavg`) where fields are not comma- or colon-separated.
pub fn split_fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|&b| b == b' ' || b == b'\t').filter(|f| !f.is_empty())
}

fn trim_start(mut buf: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = buf {
        buf = rest;
    }
    buf
}

fn trim_end(mut buf: &[u8]) -> &[u8] {
    while let [rest @ .., b' ' | b'\t'] = buf {
        buf = rest;
    }
    buf
}
