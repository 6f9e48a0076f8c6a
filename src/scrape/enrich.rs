//! Authoritative enrichment via the Blizzard item API. One request per stub,
//! batched; items the API does not know are dropped entirely. Without a
//! token the stage passes stubs through unchanged.

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use super::{fetch_batched, progress_bar, BuildContext};
use crate::model::Item;

pub async fn run(ctx: &BuildContext, items: Vec<Item>) -> Result<Vec<Item>> {
    let Some(token) = ctx.token.clone() else {
        info!("no API token present, skipping enrichment");
        return Ok(items);
    };

    info!("enriching {} items", items.len());
    let pb = progress_bar(items.len() as u64);
    let results = fetch_batched(items, ctx.settings.batch_size, &pb, |item| {
        enrich_one(ctx, &token, item)
    })
    .await;
    pb.finish_and_clear();

    let enriched: Vec<Item> = results.into_iter().flatten().collect();
    info!("{} items known to the API", enriched.len());
    Ok(enriched)
}

async fn enrich_one(ctx: &BuildContext, token: &str, item: Item) -> Option<Item> {
    let url = format!(
        "{}/data/wow/item/{}?namespace=static-classic-us&locale=en_US",
        ctx.settings.api_base, item.item_id
    );
    let resp = match ctx.client.get(&url).bearer_auth(token).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!("item {}: enrichment request failed: {e}", item.item_id);
            return None;
        }
    };
    let payload: Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => {
            warn!("item {}: malformed enrichment payload: {e}", item.item_id);
            return None;
        }
    };
    apply_response(item, &payload)
}

/// Merge an API response into the stub. A 404-coded payload drops the item
/// silently; any other coded error drops it with a warning.
pub fn apply_response(mut item: Item, payload: &Value) -> Option<Item> {
    if let Some(code) = payload["code"].as_i64() {
        if code != 404 {
            warn!(
                "item {}: unexpected API error {code}: {}",
                item.item_id,
                payload["detail"].as_str().unwrap_or("unknown")
            );
        }
        return None;
    }

    item.class = name_of(&payload["item_class"]);
    item.subclass = name_of(&payload["item_subclass"]);
    item.quality = payload["quality"]["name"].as_str().map(str::to_string);
    item.item_level = payload["level"].as_i64();
    item.required_level = payload["required_level"].as_i64();
    item.sell_price = payload["sell_price"].as_i64();
    item.slot = derive_slot(payload);
    Some(item)
}

fn name_of(v: &Value) -> Option<String> {
    v["name"].as_str().map(str::to_string)
}

/// Equip slot from the inventory type. Wands, guns and crossbows report the
/// `RANGEDRIGHT` type whose display name varies by weapon; they all occupy
/// the Ranged slot.
fn derive_slot(payload: &Value) -> Option<String> {
    let inventory = &payload["inventory_type"];
    if inventory["type"].as_str() == Some("RANGEDRIGHT") {
        return Some("Ranged".to_string());
    }
    inventory["name"].as_str().map(str::to_string)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn not_found_drops_silently() {
        let item = Item::stub(42, "Ghost", "icon");
        let payload = json!({"code": 404, "detail": "Not Found"});
        assert!(apply_response(item, &payload).is_none());
    }

    #[test]
    fn other_error_code_drops() {
        let item = Item::stub(42, "Ghost", "icon");
        let payload = json!({"code": 403, "detail": "Forbidden"});
        assert!(apply_response(item, &payload).is_none());
    }

    #[test]
    fn success_copies_fields() {
        let item = Item::stub(2592, "Wool Cloth", "inv_fabric_wool_01");
        let payload = json!({
            "item_class": {"name": "Trade Goods"},
            "item_subclass": {"name": "Cloth"},
            "quality": {"type": "COMMON", "name": "Common"},
            "level": 15,
            "required_level": 0,
            "sell_price": 32,
            "inventory_type": {"type": "NON_EQUIP", "name": "Non-equippable"},
        });
        let item = apply_response(item, &payload).unwrap();
        assert_eq!(item.class.as_deref(), Some("Trade Goods"));
        assert_eq!(item.subclass.as_deref(), Some("Cloth"));
        assert_eq!(item.quality.as_deref(), Some("Common"));
        assert_eq!(item.item_level, Some(15));
        assert_eq!(item.sell_price, Some(32));
        assert_eq!(item.slot.as_deref(), Some("Non-equippable"));
        // Identity untouched
        assert_eq!(item.item_id, 2592);
        assert_eq!(item.name, "Wool Cloth");
    }

    #[test]
    fn rangedright_quirk_maps_to_ranged() {
        let item = Item::stub(2100, "Wand", "icon");
        let payload = json!({
            "item_class": {"name": "Weapon"},
            "item_subclass": {"name": "Wand"},
            "quality": {"name": "Uncommon"},
            "inventory_type": {"type": "RANGEDRIGHT", "name": "Held In Off-hand"},
        });
        let item = apply_response(item, &payload).unwrap();
        assert_eq!(item.slot.as_deref(), Some("Ranged"));
    }
}
