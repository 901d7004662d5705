//! sysfs attribute readers
//!
//! Attributes are read as `<endpoint>/<entry>`. Numeric readers behave like
//! `atof`/`atoi`: leading whitespace is skipped, the longest numeric prefix
//! is parsed and anything unreadable yields zero.

use std::fs;
use std::path::Path;

fn numeric_prefix(content: &str, allow_fraction: bool) -> &str {
    let trimmed = content.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_exp = false;

    while end < bytes.len() {
        let c = bytes[end];
        let ok = match c {
            b'0'..=b'9' => true,
            b'+' | b'-' => {
                end == 0 || (allow_fraction && matches!(bytes[end - 1], b'e' | b'E'))
            }
            b'.' if allow_fraction && !seen_dot && !seen_exp => {
                seen_dot = true;
                true
            }
            b'e' | b'E' if allow_fraction && !seen_exp && end > 0 => {
                seen_exp = true;
                true
            }
            _ => false,
        };
        if !ok {
            break;
        }
        end += 1;
    }

    // Drop a dangling exponent or sign ("12e", "-").
    let mut prefix = &trimmed[..end];
    while prefix.ends_with(['e', 'E', '+', '-']) {
        prefix = &prefix[..prefix.len() - 1];
    }
    prefix
}

fn read(endpoint: &Path, entry: &str) -> Option<String> {
    fs::read_to_string(endpoint.join(entry)).ok()
}

/// Read a floating point attribute.
pub fn read_float(endpoint: impl AsRef<Path>, entry: &str) -> f32 {
    read(endpoint.as_ref(), entry)
        .and_then(|content| numeric_prefix(&content, true).parse().ok())
        .unwrap_or(0.0)
}

/// Read an integer attribute.
pub fn read_int(endpoint: impl AsRef<Path>, entry: &str) -> i32 {
    read(endpoint.as_ref(), entry)
        .and_then(|content| numeric_prefix(&content, false).parse().ok())
        .unwrap_or(0)
}

/// Read a string attribute with surrounding whitespace removed.
pub fn read_string(endpoint: impl AsRef<Path>, entry: &str) -> Option<String> {
    read(endpoint.as_ref(), entry).map(|content| content.trim().to_string())
}
