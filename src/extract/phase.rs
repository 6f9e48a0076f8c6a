//! Content phase marker: the detail page states "Added in content phase N"
//! for items gated behind a later release stage.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Item;

static PHASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Added in content phase (\d)").unwrap());

pub fn apply(item: &mut Item, body: &str) {
    if let Some(phase) = parse(body) {
        item.content_phase = Some(phase);
    }
}

pub fn parse(body: &str) -> Option<u8> {
    PHASE_RE
        .captures(body)?
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_after_marker() {
        assert_eq!(parse("<div>Added in content phase 5</div>"), Some(5));
    }

    #[test]
    fn no_marker() {
        assert_eq!(parse("<div>Added in patch 1.12</div>"), None);
    }
}
