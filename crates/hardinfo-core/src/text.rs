//! String formatting helpers

const KIB: f32 = 1024.0;
const MIB: f32 = 1_048_576.0;
const GIB: f32 = 1_073_741_824.0;

fn plural(value: u32) -> &'static str {
    if value > 1 {
        "s"
    } else {
        ""
    }
}

/// Format an uptime-style duration given in seconds.
///
/// Seconds below a minute are dropped. Days are only shown once the value
/// reaches a full day, hours once it reaches a full hour.
pub fn seconds_to_string(seconds: u32) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;
    let days = hours / 24;
    let hours = hours % 24;

    if days < 1 {
        if hours < 1 {
            return format!("{minutes} minute{}", plural(minutes));
        }
        return format!(
            "{hours} hour{}, {minutes} minute{}",
            plural(hours),
            plural(minutes)
        );
    }

    format!(
        "{days} day{}, {hours} hour{} and {minutes} minute{}",
        plural(days),
        plural(hours),
        plural(minutes)
    )
}

/// Format a byte count with binary units and one decimal.
pub fn size_human_readable(size: f32) -> String {
    if size < KIB {
        format!("{size:.1} B")
    } else if size < MIB {
        format!("{:.1} KiB", size / KIB)
    } else if size < GIB {
        format!("{:.1} MiB", size / MIB)
    } else {
        format!("{:.1} GiB", size / GIB)
    }
}

/// Cut `s` at the first occurrence of `chr`.
pub fn strend(s: &str, chr: char) -> &str {
    match s.find(chr) {
        Some(pos) => &s[..pos],
        None => s,
    }
}

/// Blank out leading double quotes and cut at the next one.
///
/// `"\"value\" trailing"` becomes `" value"`; the leading quote keeps its
/// column as a space.
pub fn remove_quotes(s: &str) -> String {
    let leading = s.len() - s.trim_start_matches('"').len();
    let rest = strend(&s[leading..], '"');

    let mut out = String::with_capacity(leading + rest.len());
    out.extend(std::iter::repeat(' ').take(leading));
    out.push_str(rest);
    out
}

/// Cut `s` at the first line feed.
pub fn remove_linefeed(s: &str) -> &str {
    strend(s, '\n')
}

/// Replace every character of `s` that appears in `set` with `new_char`.
pub fn strreplacechr(s: &str, set: &str, new_char: char) -> String {
    s.chars()
        .map(|c| if set.contains(c) { new_char } else { c })
        .collect()
}

/// Replace every occurrence of `pattern` in `s` with `replacement`.
///
/// An empty pattern leaves the string untouched.
pub fn strreplace(s: &str, pattern: &str, replacement: &str) -> String {
    if pattern.is_empty() {
        return s.to_string();
    }
    s.replace(pattern, replacement)
}
