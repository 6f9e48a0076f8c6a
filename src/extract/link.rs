//! In-game chat link encoding, rebuilt from the structured object embedded in
//! the detail page's inline link handler.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Item;

const LINK_MARKER: &str = "WH.Links.show(this,";

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""linkColor"\s*:\s*"([0-9a-fA-F]{6,8})""#).unwrap());
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""linkId"\s*:\s*"([^"]+)""#).unwrap());
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""linkName"\s*:\s*"([^"]+)""#).unwrap());

pub fn apply(item: &mut Item, body: &str) {
    if let Some(link) = parse(body) {
        item.item_link = Some(link);
    }
}

/// Format the link parameters into the fixed chat-link template
/// `|c<color>|H<linkId>|h[<name>]|h|r`.
pub fn parse(body: &str) -> Option<String> {
    let at = body.find(LINK_MARKER)?;
    // The handler object lives inside an HTML attribute; entities first.
    let window: String = body[at..].chars().take(600).collect();
    let window = window
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let color = COLOR_RE.captures(&window)?[1].to_lowercase();
    let link_id = ID_RE.captures(&window)?[1].to_string();
    let name = NAME_RE.captures(&window)?[1].to_string();

    // Chat links carry an 8-digit argb color; 6-digit payloads are opaque.
    let color = if color.len() == 6 {
        format!("ff{color}")
    } else {
        color
    };
    Some(format!("|c{color}|H{link_id}|h[{name}]|h|r"))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_template() {
        let body = concat!(
            r#"<a onclick="WH.Links.show(this, {&quot;type&quot;:3,"#,
            r#"&quot;linkColor&quot;:&quot;ffffffff&quot;,"#,
            r#"&quot;linkId&quot;:&quot;item:2592::::::::::::&quot;,"#,
            r#"&quot;linkName&quot;:&quot;Wool Cloth&quot;});">Link</a>"#,
        );
        assert_eq!(
            parse(body).as_deref(),
            Some("|cffffffff|Hitem:2592::::::::::::|h[Wool Cloth]|h|r")
        );
    }

    #[test]
    fn six_digit_color_made_opaque() {
        let body = concat!(
            r#"WH.Links.show(this, {"linkColor":"a335ee","#,
            r#""linkId":"item:19019","linkName":"Thunderfury"})"#,
        );
        assert_eq!(
            parse(body).as_deref(),
            Some("|cffa335ee|Hitem:19019|h[Thunderfury]|h|r")
        );
    }

    #[test]
    fn absent_handler_is_none() {
        assert!(parse("<html><body>no links here</body></html>").is_none());
    }
}
