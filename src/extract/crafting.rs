//! Crafting recipes from the `created-by-spell` table. Teaching items (the
//! recipe items that grant the spell) live on a secondary per-spell page and
//! are merged in by the detail stage after this extractor runs.

use serde_json::Value;

use crate::model::{CreatedBy, Item, Reagent};
use crate::scrape::tables;

pub fn apply(item: &mut Item, body: &str) {
    let Some(rows) = tables::listview_data(body, "created-by-spell") else {
        return;
    };
    let recipes: Vec<CreatedBy> = rows.iter().filter_map(parse_row).collect();
    if !recipes.is_empty() {
        item.created_by = Some(recipes);
    }
}

fn parse_row(row: &Value) -> Option<CreatedBy> {
    // Entries without a category marker are display-only rows, not recipes.
    let category = row["cat"].as_i64().filter(|c| *c != 0)?;
    let spell_id = row["id"].as_u64()? as u32;

    let amount = row["creates"]
        .as_array()
        .map(|creates| {
            let min = creates.get(1).and_then(Value::as_i64).unwrap_or(1);
            let max = creates.get(2).and_then(Value::as_i64).unwrap_or(1);
            [normalize_amount(min), normalize_amount(max)]
        })
        .unwrap_or([1, 1]);

    let reagents = row["reagents"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|pair| {
                    let pair = pair.as_array()?;
                    Some(Reagent {
                        item_id: pair.first()?.as_u64()? as u32,
                        amount: pair.get(1).and_then(Value::as_i64).unwrap_or(1),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Some(CreatedBy {
        amount,
        required_skill: row["learnedat"].as_i64().unwrap_or(0),
        category,
        reagents,
        recipes: Vec::new(),
        content_phase: None,
        spell_id,
    })
}

/// Reported output quantities <= 0 mean "one".
fn normalize_amount(n: i64) -> i64 {
    if n <= 0 {
        1
    } else {
        n
    }
}

/// Item ids from a spell page's `taught-by-item` table.
pub fn taught_by(body: &str) -> Vec<u32> {
    let Some(rows) = tables::listview_data(body, "taught-by-item") else {
        return Vec::new();
    };
    let mut ids: Vec<u32> = rows
        .iter()
        .filter_map(|r| r["id"].as_u64().map(|id| id as u32))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

// ── Tests ──
