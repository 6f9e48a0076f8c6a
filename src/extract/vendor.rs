//! Vendor price derivation from the `sold-by` table: a popularity-weighted
//! average of per-unit cost over unlimited-stock vendors.

use serde_json::Value;

use crate::model::Item;
use crate::scrape::tables;

pub fn apply(item: &mut Item, body: &str) {
    let Some(rows) = tables::listview_data(body, "sold-by") else {
        return;
    };
    if let Some(price) = weighted_price(&rows) {
        item.vendor_price = Some(price);
    }
}

/// Average unit cost across unlimited-stock entries, weighted by each
/// vendor's share of total popularity. Items with no unlimited-stock vendor
/// get no vendor price.
pub fn weighted_price(rows: &[Value]) -> Option<i64> {
    let entries: Vec<(f64, f64)> = rows
        .iter()
        .filter(|r| r["stock"].as_i64() == Some(-1))
        .filter_map(|r| {
            let cost: f64 = r["cost"]
                .as_array()?
                .iter()
                .filter_map(Value::as_f64)
                .sum();
            let stack = match r["stack"].as_f64() {
                Some(s) if s > 0.0 => s,
                _ => 1.0,
            };
            let popularity = r["popularity"].as_f64().unwrap_or(0.0);
            Some((cost / stack, popularity))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }

    let total: f64 = entries.iter().map(|(_, p)| p).sum();
    let price = if total > 0.0 {
        entries.iter().map(|(c, p)| c * p / total).sum()
    } else {
        entries.iter().map(|(c, _)| c).sum::<f64>() / entries.len() as f64
    };
    Some(price.round() as i64)
}

// ── Tests ──
