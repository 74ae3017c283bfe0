//! HTML escaping (spec §4.3.7).

/// Escape the characters Handlebars escapes: `&`, `<`, `>`, `"`, `'` with
/// named entities, plus the backtick and `=` with numeric ones.
/// Applied unconditionally, even to already-escaped input — spec §4.3.7
/// is explicit that this double-escaping is the required behavior.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            other => out.push(other),
        }
    }
    out
}
