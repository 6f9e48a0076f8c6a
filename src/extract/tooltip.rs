//! Tooltip extraction: raw tooltip markup -> ordered label sequence with
//! formatting tags. Labels come from a document-order traversal of the
//! markup's text nodes, so source order and duplicate labels are preserved by
//! construction.

use scraper::Html;

use crate::model::{Item, TooltipLine};
use crate::scrape::tables;

pub fn apply(item: &mut Item, body: &str) {
    let Some(markup) = tables::tooltip_markup(body) else {
        return;
    };
    let lines = parse(&markup);
    if !lines.is_empty() {
        item.tooltip = Some(lines);
    }
}

/// Tokenize tooltip markup into labels, each annotated with the format
/// derived from its nearest ancestor's class (or `alignRight` for table
/// headers). A "Sell Price:" label absorbs the numeric-only coin tokens that
/// follow it.
pub fn parse(markup: &str) -> Vec<TooltipLine> {
    let doc = Html::parse_document(markup);
    let mut lines = Vec::new();

    for node in doc.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            continue;
        }
        let format = node.ancestors().find_map(|anc| {
            let el = anc.value().as_element()?;
            if el.name() == "th" {
                return Some("alignRight".to_string());
            }
            el.classes().find_map(class_format).map(str::to_string)
        });
        lines.push(TooltipLine { label, format });
    }

    absorb_coin_tokens(lines)
}

/// Coin denominations render as separate numeric-only tokens after the
/// "Sell Price:" label; they are display artifacts, not tooltip lines.
fn absorb_coin_tokens(lines: Vec<TooltipLine>) -> Vec<TooltipLine> {
    let mut out: Vec<TooltipLine> = Vec::with_capacity(lines.len());
    let mut absorbing = false;
    for line in lines {
        if absorbing && !line.label.is_empty() && line.label.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        absorbing = line.label.starts_with("Sell Price:");
        out.push(line);
    }
    out
}

fn class_format(class: &str) -> Option<&'static str> {
    match class {
        "q0" => Some("Poor"),
        "q1" => Some("Common"),
        "q2" => Some("Uncommon"),
        "q3" => Some("Rare"),
        "q4" => Some("Epic"),
        "q5" => Some("Legendary"),
        "q" => Some("Misc"),
        "indent" => Some("indent"),
        _ => None,
    }
}

// ── Tests ──
