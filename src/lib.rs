//! classicdb builds static WoW Classic datasets (items, zones, talents) by
//! scraping Wowhead Classic and the Blizzard API, and exposes the persisted
//! JSON arrays as queryable in-memory collections.

pub mod config;
pub mod database;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod scrape;
pub mod store;
pub mod validate;
pub mod xref;

pub use database::{
    Classes, Database, DatabaseOptions, IconSource, Items, Professions, Talents, Zones,
};
pub use model::{
    CharacterClass, CreatedBy, Item, ItemSource, Profession, Talent, TooltipLine, Zone,
};
