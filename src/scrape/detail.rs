//! Detail stage: one Wowhead item page per entity, all sub-extractors run
//! against the same body, then a secondary batched pass over the recipe
//! spell pages resolves which items teach each recipe.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use tracing::{info, warn};

use super::{fetch_batched, progress_bar, BuildContext};
use crate::extract;
use crate::model::Item;

pub async fn run(ctx: &BuildContext, items: Vec<Item>) -> Result<Vec<Item>> {
    info!("fetching {} detail pages", items.len());
    let pb = progress_bar(items.len() as u64);
    let mut items = fetch_batched(items, ctx.settings.batch_size, &pb, |mut item| async move {
        let url = format!("{}/item={}", ctx.settings.listing_base, item.item_id);
        match ctx.get_text(&url).await {
            Ok(body) => extract::apply_all(&mut item, &body),
            Err(e) => warn!("item {}: detail fetch failed: {e}", item.item_id),
        }
        item
    })
    .await;
    pb.finish_and_clear();

    let taught_by = resolve_taught_by(ctx, &items).await;
    for item in &mut items {
        let Some(recipes) = item.created_by.as_mut() else {
            continue;
        };
        for recipe in recipes {
            if let Some(ids) = taught_by.get(&recipe.spell_id) {
                recipe.recipes = ids.clone();
            }
        }
    }
    Ok(items)
}

/// Fetch each distinct recipe spell page once and collect its teaching items.
async fn resolve_taught_by(ctx: &BuildContext, items: &[Item]) -> HashMap<u32, Vec<u32>> {
    let spell_ids: BTreeSet<u32> = items
        .iter()
        .flat_map(|i| i.created_by.iter().flatten())
        .map(|r| r.spell_id)
        .collect();
    if spell_ids.is_empty() {
        return HashMap::new();
    }

    info!("resolving teachers for {} recipe spells", spell_ids.len());
    let pb = progress_bar(spell_ids.len() as u64);
    let pairs = fetch_batched(
        spell_ids.into_iter().collect(),
        ctx.settings.batch_size,
        &pb,
        |spell_id| async move {
            let url = format!("{}/spell={}", ctx.settings.listing_base, spell_id);
            match ctx.get_text(&url).await {
                Ok(body) => (spell_id, extract::crafting::taught_by(&body)),
                Err(e) => {
                    warn!("spell {spell_id}: fetch failed: {e}");
                    (spell_id, Vec::new())
                }
            }
        },
    )
    .await;
    pb.finish_and_clear();

    pairs.into_iter().collect()
}
