//! Acquisition source classification. Exactly one category per item, decided
//! by which data tables the detail page carries; quest rewards win over drop
//! data, and a vendor source is recorded only when a single vendor stocks the
//! item.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::model::{Item, ItemSource, QuestRef};
use crate::scrape::tables;

pub fn apply(item: &mut Item, body: &str) {
    let quests = tables::listview_data(body, "reward-from-q");
    let drops = tables::listview_data(body, "dropped-by");
    let vendors = tables::listview_data(body, "sold-by");
    if let Some(source) = classify(quests.as_deref(), drops.as_deref(), vendors.as_deref()) {
        item.source = Some(source);
    }
}

pub fn classify(
    quests: Option<&[Value]>,
    drops: Option<&[Value]>,
    vendors: Option<&[Value]>,
) -> Option<ItemSource> {
    if let Some(rows) = quests.filter(|r| !r.is_empty()) {
        return Some(quest_source(rows));
    }
    if let Some(rows) = drops.filter(|r| !r.is_empty()) {
        return drop_source(rows);
    }
    if let Some(rows) = vendors {
        // Ambiguous multi-vendor sources are dropped.
        if let [row] = rows {
            return Some(vendor_source(row));
        }
    }
    None
}

fn quest_source(rows: &[Value]) -> ItemSource {
    let quests = rows
        .iter()
        .filter_map(|r| {
            Some(QuestRef {
                quest_id: r["id"].as_u64()? as u32,
                name: r["name"].as_str()?.to_string(),
                faction: r["side"].as_i64().and_then(faction_name),
            })
        })
        .collect();
    ItemSource::Quest { quests }
}

fn drop_source(rows: &[Value]) -> Option<ItemSource> {
    let mut zones: BTreeSet<u32> = BTreeSet::new();
    let mut enemies: BTreeSet<String> = BTreeSet::new();
    // Length-weighted average: a row spanning N locations contributes its
    // chance N times.
    let mut chances: Vec<f64> = Vec::new();

    for row in rows {
        let locations: Vec<u32> = row["location"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_u64().map(|z| z as u32)).collect())
            .unwrap_or_default();
        zones.extend(&locations);
        if let Some(name) = row["name"].as_str() {
            enemies.insert(name.to_string());
        }
        let chance = row["percent"].as_f64().or_else(|| {
            let count = row["count"].as_f64()?;
            let outof = row["outof"].as_f64()?;
            (outof > 0.0).then(|| count / outof)
        });
        if let Some(chance) = chance {
            for _ in 0..locations.len().max(1) {
                chances.push(chance);
            }
        }
    }

    if chances.is_empty() {
        return None;
    }
    let drop_chance = chances.iter().sum::<f64>() / chances.len() as f64;

    Some(match (zones.len(), enemies.len()) {
        (0 | 1, 1) => ItemSource::BossDrop {
            name: enemies.into_iter().next().unwrap_or_default(),
            zone: zones.into_iter().next(),
            drop_chance,
        },
        (0 | 1, _) => ItemSource::ZoneDrop {
            zone: zones.into_iter().next(),
            drop_chance,
        },
        _ => ItemSource::RareDrop { drop_chance },
    })
}

fn vendor_source(row: &Value) -> ItemSource {
    let cost = row["cost"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_i64).sum());
    ItemSource::Vendor {
        name: row["name"].as_str().map(str::to_string),
        cost,
    }
}

fn faction_name(side: i64) -> Option<String> {
    match side {
        1 => Some("Alliance".to_string()),
        2 => Some("Horde".to_string()),
        3 => Some("Both".to_string()),
        _ => None,
    }
}

// ── Tests ──
