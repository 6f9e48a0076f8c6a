//! Talent dataset: a listing stage over the `talents` table, then a batched
//! tooltip stage against each talent's spell page.

use anyhow::Result;
use tracing::{info, warn};

use super::{fetch_batched, progress_bar, tables, BuildContext};
use crate::extract::tooltip;
use crate::model::Talent;

pub async fn listing(ctx: &BuildContext) -> Result<Vec<Talent>> {
    let url = format!("{}/talents", ctx.settings.listing_base);
    let body = ctx.get_text(&url).await?;
    let talents = parse_talents(&body);
    info!("listing produced {} talents", talents.len());
    Ok(talents)
}

pub fn parse_talents(body: &str) -> Vec<Talent> {
    let Some(rows) = tables::listview_data(body, "talents") else {
        return Vec::new();
    };
    let mut talents: Vec<Talent> = rows
        .iter()
        .filter_map(|row| {
            Some(Talent {
                id: row["id"].as_u64()? as u32,
                name: row["name"].as_str()?.to_string(),
                tooltip: Vec::new(),
            })
        })
        .collect();
    talents.sort_by_key(|t| t.id);
    talents
}

pub async fn tooltips(ctx: &BuildContext, talents: Vec<Talent>) -> Result<Vec<Talent>> {
    info!("fetching tooltips for {} talents", talents.len());
    let pb = progress_bar(talents.len() as u64);
    let talents = fetch_batched(talents, ctx.settings.batch_size, &pb, |mut talent| async move {
        let url = format!("{}/spell={}", ctx.settings.listing_base, talent.id);
        match ctx.get_text(&url).await {
            Ok(body) => {
                if let Some(markup) = tables::tooltip_markup(&body) {
                    talent.tooltip = tooltip::parse(&markup);
                }
            }
            Err(e) => warn!("talent {}: tooltip fetch failed: {e}", talent.id),
        }
        talent
    })
    .await;
    pb.finish_and_clear();
    Ok(talents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talents_parsed_and_sorted() {
        let body = concat!(
            "<html><script>new Listview({template: 'spell', id: 'talents', data: [",
            r#"{"id":12294,"name":"Mortal Strike"},"#,
            r#"{"id":20243,"name":"Devastate","#,
            r#""extra":1}"#,
            "]});</script></html>",
        );
        let talents = parse_talents(body);
        assert_eq!(talents.len(), 2);
        assert_eq!(talents[0].id, 12294);
        assert_eq!(talents[1].name, "Devastate");
        assert!(talents[0].tooltip.is_empty());
    }
}
