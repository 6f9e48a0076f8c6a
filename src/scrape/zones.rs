//! Zone dataset: one listing page carrying a single `zones` table.

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use super::{tables, BuildContext};
use crate::model::Zone;

pub async fn run(ctx: &BuildContext) -> Result<Vec<Zone>> {
    let url = format!("{}/zones", ctx.settings.listing_base);
    let body = ctx.get_text(&url).await?;
    let zones = parse_zones(&body);
    info!("listing produced {} zones", zones.len());
    Ok(zones)
}

pub fn parse_zones(body: &str) -> Vec<Zone> {
    let Some(rows) = tables::listview_data(body, "zones") else {
        return Vec::new();
    };
    let mut zones: Vec<Zone> = rows.iter().filter_map(parse_row).collect();
    zones.sort_by_key(|z| z.id);
    zones
}

fn parse_row(row: &Value) -> Option<Zone> {
    Some(Zone {
        id: row["id"].as_u64()? as u32,
        name: row["name"].as_str()?.to_string(),
        category: category_name(row["instance"].as_i64().unwrap_or(0)),
        level: [
            row["minlevel"].as_i64().unwrap_or(0),
            row["maxlevel"].as_i64().unwrap_or(0),
        ],
        territory: territory_name(row["territory"].as_i64().unwrap_or(2)),
    })
}

fn category_name(instance: i64) -> String {
    match instance {
        1 => "Dungeon",
        2 => "Raid",
        3 => "Battleground",
        4 => "Arena",
        0 => "Open World",
        _ => "undefined",
    }
    .to_string()
}

fn territory_name(territory: i64) -> String {
    match territory {
        0 => "Alliance",
        1 => "Horde",
        2 => "Contested",
        3 => "PvP",
        4 => "Sanctuary",
        _ => "Contested",
    }
    .to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_parsed_and_sorted() {
        let body = concat!(
            "<html><script>new Listview({template: 'zone', id: 'zones', data: [",
            r#"{"id":1977,"name":"Zul'Gurub","instance":2,"minlevel":60,"maxlevel":60,"territory":2},"#,
            r#"{"id":12,"name":"Elwynn Forest","instance":0,"minlevel":1,"maxlevel":10,"territory":0}"#,
            "]});</script></html>",
        );
        let zones = parse_zones(body);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, 12);
        assert_eq!(zones[0].category, "Open World");
        assert_eq!(zones[0].territory, "Alliance");
        assert_eq!(zones[1].name, "Zul'Gurub");
        assert_eq!(zones[1].category, "Raid");
        assert_eq!(zones[1].level, [60, 60]);
    }

    #[test]
    fn missing_table_is_empty() {
        assert!(parse_zones("<html><script>var x;</script></html>").is_empty());
    }
}
