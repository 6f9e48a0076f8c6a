//! Consumer-facing query surface: a dataset loads wholesale into an ordered
//! `Database<T>` that behaves like a filterable collection while preserving
//! its load options, so `filter` never degrades to a bare Vec.

use std::path::Path;

use anyhow::Result;

use crate::model::{CharacterClass, Item, Profession, Talent, Zone};
use crate::store;

/// Which icon CDN the bare icon names are templated against at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSource {
    #[default]
    Blizzard,
    Wowhead,
}

impl IconSource {
    pub fn url(self, icon: &str) -> String {
        match self {
            Self::Blizzard => format!(
                "https://render-classic-us.worldofwarcraft.com/icons/56/{icon}.jpg"
            ),
            Self::Wowhead => format!("https://wow.zamimg.com/images/wow/icons/large/{icon}.jpg"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseOptions {
    pub icon_source: IconSource,
}

#[derive(Debug, Clone)]
pub struct Database<T> {
    records: Vec<T>,
    options: DatabaseOptions,
}

pub type Items = Database<Item>;
pub type Zones = Database<Zone>;
pub type Talents = Database<Talent>;
pub type Professions = Database<Profession>;
pub type Classes = Database<CharacterClass>;

impl<T> Database<T> {
    pub fn from_records(records: Vec<T>, options: DatabaseOptions) -> Self {
        Self { records, options }
    }

    pub fn options(&self) -> DatabaseOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn find<F: Fn(&T) -> bool>(&self, f: F) -> Option<&T> {
        self.records.iter().find(|r| f(r))
    }

    /// Filter into a new `Database` of the same concrete type, carrying the
    /// original load options along.
    pub fn filter<F: Fn(&T) -> bool>(&self, f: F) -> Self
    where
        T: Clone,
    {
        Self {
            records: self.records.iter().filter(|r| f(r)).cloned().collect(),
            options: self.options,
        }
    }
}

impl<'a, T> IntoIterator for &'a Database<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Database<Item> {
    pub fn load(path: &Path, options: DatabaseOptions) -> Result<Self> {
        let mut records: Vec<Item> = store::load(path)?;
        for item in &mut records {
            item.icon = options.icon_source.url(&item.icon);
        }
        Ok(Self::from_records(records, options))
    }

    pub fn get(&self, item_id: u32) -> Option<&Item> {
        self.find(|i| i.item_id == item_id)
    }

    /// The chat-encoded link for an item, when the detail stage captured one.
    pub fn item_link(&self, item_id: u32) -> Option<&str> {
        self.get(item_id)?.item_link.as_deref()
    }
}

impl Database<Zone> {
    pub fn load(path: &Path, options: DatabaseOptions) -> Result<Self> {
        Ok(Self::from_records(store::load(path)?, options))
    }
}

impl Database<Talent> {
    pub fn load(path: &Path, options: DatabaseOptions) -> Result<Self> {
        Ok(Self::from_records(store::load(path)?, options))
    }
}

impl Database<Profession> {
    pub fn load(path: &Path, options: DatabaseOptions) -> Result<Self> {
        let mut records: Vec<Profession> = store::load(path)?;
        for p in &mut records {
            p.icon = options.icon_source.url(&p.icon);
        }
        Ok(Self::from_records(records, options))
    }

    pub fn get(&self, name: &str) -> Option<&Profession> {
        self.find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl Database<CharacterClass> {
    pub fn load(path: &Path, options: DatabaseOptions) -> Result<Self> {
        let mut records: Vec<CharacterClass> = store::load(path)?;
        for class in &mut records {
            class.icon = options.icon_source.url(&class.icon);
            for spec in &mut class.specs {
                spec.icon = options.icon_source.url(&spec.icon);
            }
        }
        Ok(Self::from_records(records, options))
    }

    pub fn get(&self, name: &str) -> Option<&CharacterClass> {
        self.find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;

    fn sample_items() -> Vec<Item> {
        let mut a = Item::stub(2589, "Linen Cloth", "inv_fabric_linen_01");
        a.class = Some("Trade Goods".into());
        a.item_link = Some("|cffffffff|Hitem:2589|h[Linen Cloth]|h|r".into());
        let mut b = Item::stub(2592, "Wool Cloth", "inv_fabric_wool_01");
        b.class = Some("Trade Goods".into());
        let mut c = Item::stub(19019, "Thunderfury", "inv_sword_39");
        c.class = Some("Weapon".into());
        vec![a, b, c]
    }

    #[test]
    fn filter_preserves_type_and_options() {
        let options = DatabaseOptions {
            icon_source: IconSource::Wowhead,
        };
        let items = Items::from_records(sample_items(), options);
        let trade = items.filter(|i| i.class.as_deref() == Some("Trade Goods"));
        assert_eq!(trade.len(), 2);
        assert_eq!(trade.options().icon_source, IconSource::Wowhead);
        // Filtering the filtered set still works and still carries options.
        let wool = trade.filter(|i| i.name.contains("Wool"));
        assert_eq!(wool.len(), 1);
        assert_eq!(wool.options().icon_source, IconSource::Wowhead);
    }

    #[test]
    fn icon_templating_applied_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        store::save(&path, &sample_items()).unwrap();

        let blizzard = Items::load(&path, DatabaseOptions::default()).unwrap();
        assert_eq!(
            blizzard.get(2589).unwrap().icon,
            "https://render-classic-us.worldofwarcraft.com/icons/56/inv_fabric_linen_01.jpg"
        );

        let wowhead = Items::load(
            &path,
            DatabaseOptions {
                icon_source: IconSource::Wowhead,
            },
        )
        .unwrap();
        assert_eq!(
            wowhead.get(2589).unwrap().icon,
            "https://wow.zamimg.com/images/wow/icons/large/inv_fabric_linen_01.jpg"
        );
    }

    #[test]
    fn item_link_lookup() {
        let items = Items::from_records(sample_items(), DatabaseOptions::default());
        assert_eq!(
            items.item_link(2589),
            Some("|cffffffff|Hitem:2589|h[Linen Cloth]|h|r")
        );
        assert_eq!(items.item_link(2592), None);
        assert_eq!(items.item_link(1), None);
    }

    #[test]
    fn name_keyed_lookup() {
        let professions = Professions::from_records(
            vec![
                Profession {
                    name: "Alchemy".into(),
                    icon: "trade_alchemy".into(),
                },
                Profession {
                    name: "Blacksmithing".into(),
                    icon: "trade_blacksmithing".into(),
                },
            ],
            DatabaseOptions::default(),
        );
        assert!(professions.get("alchemy").is_some());
        assert!(professions.get("Tailoring").is_none());
    }
}
