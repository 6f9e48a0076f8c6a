//! Sub-extractors run against a single detail page body. Each writes to
//! disjoint fields of the item, so ordering between them is irrelevant;
//! absence of any expected table or markup leaves the field unset.

pub mod crafting;
pub mod link;
pub mod phase;
pub mod source;
pub mod tooltip;
pub mod vendor;

use crate::model::Item;

pub fn apply_all(item: &mut Item, body: &str) {
    crafting::apply(item, body);
    tooltip::apply(item, body);
    link::apply(item, body);
    vendor::apply(item, body);
    source::apply(item, body);
    phase::apply(item, body);
}
