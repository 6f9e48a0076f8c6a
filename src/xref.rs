//! Cross-reference pass: runs after detail extraction has finished for the
//! whole dataset. Joins recipe teaching items back against the collection to
//! derive each recipe's minimum content phase, and assigns collision-free
//! `uniqueName` slugs.

use std::collections::HashMap;

use crate::model::Item;

pub fn run(mut items: Vec<Item>) -> Vec<Item> {
    assign_recipe_phases(&mut items);
    assign_unique_names(&mut items);
    items
}

/// For every recipe, the minimum `contentPhase` over its teaching items —
/// but only when every teaching item resolves to a known phase. A partial
/// minimum would understate availability, so it is never assigned.
fn assign_recipe_phases(items: &mut [Item]) {
    let phases: HashMap<u32, Option<u8>> = items
        .iter()
        .map(|i| (i.item_id, i.content_phase))
        .collect();

    for item in items.iter_mut() {
        let Some(recipes) = item.created_by.as_mut() else {
            continue;
        };
        for recipe in recipes {
            recipe.content_phase = min_phase(&phases, &recipe.recipes);
        }
    }
}

fn min_phase(phases: &HashMap<u32, Option<u8>>, teachers: &[u32]) -> Option<u8> {
    if teachers.is_empty() {
        return None;
    }
    let mut min = u8::MAX;
    for id in teachers {
        let phase = phases.get(id).copied().flatten()?;
        min = min.min(phase);
    }
    Some(min)
}

/// Entities sharing a display name get their id appended to the slug; a
/// uniquely-named entity keeps the plain slug.
fn assign_unique_names(items: &mut [Item]) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for item in items.iter() {
        *counts.entry(item.name.as_str()).or_default() += 1;
    }
    let duplicated: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect();

    for item in items.iter_mut() {
        let slug = slugify(&item.name);
        item.unique_name = Some(if duplicated.contains(&item.name) {
            format!("{}-{}", slug, item.item_id)
        } else {
            slug
        });
    }
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_dash = true; // suppress leading dashes
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

// ── Tests ──
