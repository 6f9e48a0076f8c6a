//! Record types for the persisted datasets. Field names serialize to the
//! camelCase keys used by the on-disk JSON arrays.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: u32,
    pub name: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subclass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Vec<TooltipLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ItemSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_phase: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Vec<CreatedBy>>,
}

impl Item {
    /// Minimal stub as emitted by the listing stage. Identity fields only;
    /// later stages add fields but never revise `item_id`.
    pub fn stub(item_id: u32, name: &str, icon: &str) -> Self {
        Self {
            item_id,
            name: name.to_string(),
            icon: icon.to_string(),
            ..Self::default()
        }
    }
}

/// One tooltip line with an optional formatting tag (quality color,
/// `alignRight` for table headers, `indent` for nested detail lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLine {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Where an item is obtained. Exactly one category per item; serialized with
/// an inline `category` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ItemSource {
    Vendor {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cost: Option<i64>,
    },
    Quest {
        quests: Vec<QuestRef>,
    },
    #[serde(rename = "Boss Drop")]
    BossDrop {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        zone: Option<u32>,
        #[serde(rename = "dropChance")]
        drop_chance: f64,
    },
    #[serde(rename = "Zone Drop")]
    ZoneDrop {
        #[serde(skip_serializing_if = "Option::is_none")]
        zone: Option<u32>,
        #[serde(rename = "dropChance")]
        drop_chance: f64,
    },
    #[serde(rename = "Rare Drop")]
    RareDrop {
        #[serde(rename = "dropChance")]
        drop_chance: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestRef {
    #[serde(rename = "questId")]
    pub quest_id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
}

/// A crafting recipe that produces this item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    /// Output quantity as `[min, max]`; reported quantities <= 0 are
    /// normalized to 1 during extraction.
    pub amount: [i64; 2],
    pub required_skill: i64,
    pub category: i64,
    pub reagents: Vec<Reagent>,
    /// Item ids of the recipe items that teach this recipe.
    pub recipes: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_phase: Option<u8>,
    /// Spell id backing the recipe; used only within the detail stage to
    /// resolve the teaching items, never persisted.
    #[serde(skip)]
    pub spell_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reagent {
    #[serde(rename = "itemId")]
    pub item_id: u32,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    pub category: String,
    /// `[min, max]` level range.
    pub level: [i64; 2],
    pub territory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub id: u32,
    pub name: String,
    pub tooltip: Vec<TooltipLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profession {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub specs: Vec<ClassSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub name: String,
    pub icon: String,
}
