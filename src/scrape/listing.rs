//! Paginated listing walk: one request per id window, sequentially, emitting
//! a stub per key of the embedded listing payload. Empty or malformed windows
//! contribute zero stubs and never abort the walk.

use anyhow::Result;
use tracing::{info, warn};

use super::{progress_bar, tables, BuildContext};
use crate::model::Item;

pub async fn run(ctx: &BuildContext) -> Result<Vec<Item>> {
    let settings = &ctx.settings;
    let windows: Vec<u32> = (0..settings.id_space).step_by(settings.window as usize).collect();
    info!(
        "listing {} id windows of {}",
        windows.len(),
        settings.window
    );

    let pb = progress_bar(windows.len() as u64);
    let mut items = Vec::new();
    for start in windows {
        let url = listing_url(settings, start);
        match ctx.get_text(&url).await {
            Ok(body) => items.extend(parse_listing(&body)),
            Err(e) => warn!("listing window {} failed: {e:#}", start),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!("listing produced {} stubs", items.len());
    Ok(items)
}

fn listing_url(settings: &crate::config::Settings, start: u32) -> String {
    format!(
        "{}/items?filter=151:151;2:5;{}:{}",
        settings.listing_base,
        start,
        start + settings.window
    )
}

/// One stub per key of the embedded payload, ascending by id within the
/// window. Windows are walked in order, so the overall output is ascending.
pub fn parse_listing(body: &str) -> Vec<Item> {
    let Some(data) = tables::gatherer_data(body) else {
        return Vec::new();
    };
    let mut items: Vec<Item> = data
        .iter()
        .filter_map(|(key, record)| {
            let id: u32 = key.parse().ok()?;
            let name = record["name_enus"].as_str()?;
            let icon = record["icon"].as_str()?;
            Some(Item::stub(id, name, icon))
        })
        .collect();
    items.sort_by_key(|i| i.item_id);
    items
}

// ── Tests ──
