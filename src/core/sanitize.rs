// src/core/sanitize.rs

/// Captaincy marker appended to names on scorecards.
const CAPTAIN_MARK: &str = "(c)";

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

fn allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch.is_whitespace() || matches!(ch, '.' | '(' | ')' | '/')
}

/// Scraped cell text → comparable text.
/// Keeps ASCII letters, digits, whitespace, `.`, `(`, `)` and `/`; collapses whitespace.
/// Markup residue like `†`, `*` or `&` is dropped.
pub fn clean_text(s: &str) -> String {
    let kept: String = s.chars().filter(|&c| allowed(c)).collect();
    normalize_ws(&kept)
}

/// `clean_text` plus removal of the captaincy marker.
pub fn clean_player_name(s: &str) -> String {
    normalize_ws(&clean_text(s).replace(CAPTAIN_MARK, " "))
}

/// Last whitespace-delimited token, or "" for an empty name.
pub fn last_token(name: &str) -> &str {
    name.split_whitespace().last().unwrap_or("")
}

/// Leading ASCII digits parsed as an integer, like a scorecard "45*".
pub fn leading_int(s: &str) -> Option<u32> {
    let t = s.trim();
    let end = t.find(|c: char| !c.is_ascii_digit()).unwrap_or(t.len());
    t[..end].parse().ok()
}

/// Lenient numeric read for aggregation. Anything unparseable counts as zero.
pub fn int_or_zero(s: &str) -> u32 {
    leading_int(s).unwrap_or(0)
}
