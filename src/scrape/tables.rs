//! Extraction of structured data tables embedded in page script payloads.
//!
//! Each page family serializes its data differently: listing pages push a
//! key -> record object through `WH.Gatherer.addData(...)`, detail pages
//! construct `new Listview({... id: '<name>' ... data: [...]})` tables, and
//! tooltips are stored as one escaped JS string. The functions here locate a
//! discriminator token and parse the trailing literal; upstream format drift
//! stays a localized fix.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

static DATA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"data\s*:\s*\[").unwrap());
static TOOLTIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.tooltip_enus\s*=\s*""#).unwrap());

const GATHERER_MARKER: &str = "WH.Gatherer.addData(";
const LISTVIEW_MARKER: &str = "new Listview(";

/// Concatenated text of every `<script>` element in the document.
pub fn script_payloads(body: &str) -> Vec<String> {
    static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
    let doc = Html::parse_document(body);
    doc.select(&SCRIPT)
        .map(|el| el.text().collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// The key -> record object passed to `WH.Gatherer.addData`, if any script
/// carries one and it parses. Malformed payloads yield `None`.
pub fn gatherer_data(body: &str) -> Option<Map<String, Value>> {
    for script in script_payloads(body) {
        let Some(at) = script.find(GATHERER_MARKER) else {
            continue;
        };
        let open = at + script[at..].find('{')?;
        let literal = balanced_slice(&script, open)?;
        if let Ok(Value::Object(map)) = serde_json::from_str(literal) {
            return Some(map);
        }
    }
    None
}

/// The `data` array of the Listview constructed with `id: '<table_id>'`.
/// Returns `None` when no script constructs that table or its data array does
/// not parse.
pub fn listview_data(body: &str, table_id: &str) -> Option<Vec<Value>> {
    let discriminator = format!("id: '{table_id}'");
    for script in script_payloads(body) {
        for window in listview_windows(&script) {
            if !window.contains(&discriminator) {
                continue;
            }
            let m = DATA_RE.find(window)?;
            let open = m.end() - 1;
            let literal = balanced_slice(window, open)?;
            if let Ok(Value::Array(rows)) = serde_json::from_str(literal) {
                return Some(rows);
            }
            return None;
        }
    }
    None
}

/// Raw tooltip markup assigned to `<record>.tooltip_enus`, JS-unescaped.
pub fn tooltip_markup(body: &str) -> Option<String> {
    for script in script_payloads(body) {
        if let Some(m) = TOOLTIP_RE.find(&script) {
            return Some(decode_js_string(&script[m.end()..]));
        }
    }
    None
}

/// Split a script into per-Listview windows: each starts at a
/// `new Listview(` marker and runs to the next marker (or end of script).
fn listview_windows(script: &str) -> Vec<&str> {
    let starts: Vec<usize> = script
        .match_indices(LISTVIEW_MARKER)
        .map(|(i, _)| i)
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(script.len());
            &script[start..end]
        })
        .collect()
}

/// Slice the balanced `{...}` or `[...]` literal opening at byte `open`.
/// String-aware: brackets inside quoted strings do not count.
fn balanced_slice(s: &str, open: usize) -> Option<&str> {
    let bytes = s.as_bytes();
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;
    for (i, &c) in bytes.iter().enumerate().skip(open) {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            b'"' | b'\'' => in_string = Some(c),
            c if c == open_ch => depth += 1,
            c if c == close_ch => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[open..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode a JS string literal body (everything up to the closing unescaped
/// double quote).
fn decode_js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('/') => out.push('/'),
                Some('x') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        out.push(c);
                    }
                }
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        out.push(c);
                    }
                }
                Some(other) => out.push(other),
                None => break,
            },
            c => out.push(c),
        }
    }
    out
}

// ── Tests ──
