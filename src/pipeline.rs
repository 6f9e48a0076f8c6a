//! Stage orchestration. Each dataset declares an ordered list of named
//! stages; a full run threads each stage's output into the next and persists
//! only the final output, while a single named stage can run with file-based
//! input/output overrides.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::model::{Item, Talent, Zone};
use crate::scrape::{self, BuildContext};
use crate::store;
use crate::xref;

pub type StageFn<T> =
    Box<dyn Fn(Vec<T>, Arc<BuildContext>) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;

pub struct Stage<T> {
    pub name: &'static str,
    run: StageFn<T>,
}

impl<T> Stage<T> {
    pub fn new<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(Vec<T>, Arc<BuildContext>) -> BoxFuture<'static, Result<Vec<T>>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            run: Box::new(f),
        }
    }
}

pub struct Pipeline<T> {
    pub dataset: &'static str,
    /// File name of the dataset under `data/json` and `data/build`.
    pub file: &'static str,
    pub stages: Vec<Stage<T>>,
}

impl<T: Serialize + DeserializeOwned> Pipeline<T> {
    /// Run every stage in order and persist the final output to the build
    /// directory.
    pub async fn run_full(&self, ctx: Arc<BuildContext>) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for stage in &self.stages {
            info!("[{}] running stage '{}'", self.dataset, stage.name);
            records = (stage.run)(records, ctx.clone()).await?;
        }
        let out = ctx.settings.build_path(self.file);
        store::save(&out, &records)?;
        info!(
            "[{}] wrote {} records to {}",
            self.dataset,
            records.len(),
            out.display()
        );
        Ok(records)
    }

    /// Run one named stage. Input comes from `input` when given, otherwise
    /// from the dataset's snapshot (or empty when none exists). Output is
    /// persisted only when a target was given.
    pub async fn run_stage(
        &self,
        ctx: Arc<BuildContext>,
        name: &str,
        input: Option<&Path>,
        output: Option<&Path>,
    ) -> Result<Vec<T>> {
        let Some(stage) = self.find(name) else {
            bail!(
                "unknown stage '{}' for {} (expected one of: {})",
                name,
                self.dataset,
                self.stage_names().join(", ")
            );
        };

        let records = match input {
            Some(path) => store::load(path)?,
            None => {
                let path = ctx.settings.snapshot_path(self.file);
                if path.exists() {
                    store::load(&path)?
                } else {
                    Vec::new()
                }
            }
        };

        info!("[{}] running stage '{}'", self.dataset, stage.name);
        let records = (stage.run)(records, ctx).await?;
        if let Some(path) = output {
            store::save(path, &records)?;
        }
        Ok(records)
    }

    pub fn find(&self, name: &str) -> Option<&Stage<T>> {
        let wanted = normalize(name);
        self.stages.iter().find(|s| normalize(s.name) == wanted)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }
}

/// Stage names match case- and separator-insensitively.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn items() -> Pipeline<Item> {
    Pipeline {
        dataset: "items",
        file: "data.json",
        stages: vec![
            Stage::new("listing", |_, ctx| {
                Box::pin(async move { scrape::listing::run(&ctx).await })
            }),
            Stage::new("enrichment", |items, ctx| {
                Box::pin(async move { scrape::enrich::run(&ctx, items).await })
            }),
            Stage::new("details", |items, ctx| {
                Box::pin(async move { scrape::detail::run(&ctx, items).await })
            }),
            Stage::new("cross-reference", |items, _| {
                Box::pin(async move { Ok(xref::run(items)) })
            }),
        ],
    }
}

pub fn zones() -> Pipeline<Zone> {
    Pipeline {
        dataset: "zones",
        file: "zones.json",
        stages: vec![Stage::new("listing", |_, ctx| {
            Box::pin(async move { scrape::zones::run(&ctx).await })
        })],
    }
}

pub fn talents() -> Pipeline<Talent> {
    Pipeline {
        dataset: "talents",
        file: "talents.json",
        stages: vec![
            Stage::new("listing", |_, ctx| {
                Box::pin(async move { scrape::talents::listing(&ctx).await })
            }),
            Stage::new("tooltips", |talents, ctx| {
                Box::pin(async move { scrape::talents::tooltips(&ctx, talents).await })
            }),
        ],
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn test_ctx(dir: &Path) -> Arc<BuildContext> {
        let settings = Settings::default().with_data_dir(dir);
        Arc::new(BuildContext::new(settings).unwrap())
    }

    fn counting_pipeline() -> Pipeline<Item> {
        Pipeline {
            dataset: "test",
            file: "test.json",
            stages: vec![
                Stage::new("seed", |_, _| {
                    Box::pin(async move { Ok(vec![Item::stub(1, "A", "a")]) })
                }),
                Stage::new("append-one", |mut records, _| {
                    Box::pin(async move {
                        let next = records.iter().map(|i: &Item| i.item_id).max().unwrap_or(0) + 1;
                        records.push(Item::stub(next, "B", "b"));
                        Ok(records)
                    })
                }),
            ],
        }
    }

    #[tokio::test]
    async fn full_run_threads_stages_and_persists_final_output() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_ctx(dir.path());
        let out = counting_pipeline().run_full(ctx.clone()).await.unwrap();
        assert_eq!(out.len(), 2);

        let persisted: Vec<Item> =
            store::load(&ctx.settings.build_path("test.json")).unwrap();
        assert_eq!(persisted, out);
    }

    #[tokio::test]
    async fn stage_name_matching_ignores_case_and_separators() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_ctx(dir.path());
        let p = counting_pipeline();
        assert!(p.find("Append_One").is_some());
        assert!(p.find("APPEND-ONE").is_some());
        assert!(p.find("appendone").is_some());
        assert!(p.find("nope").is_none());

        let err = p
            .run_stage(ctx, "nope", None, None)
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown stage"));
    }

    #[tokio::test]
    async fn single_stage_with_overrides_touches_only_its_output() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_ctx(dir.path());
        let p = counting_pipeline();

        // Unrelated persisted file must stay untouched.
        let other = ctx.settings.snapshot_path("zones.json");
        store::save::<Item>(&other, &[]).unwrap();
        let before = std::fs::read_to_string(&other).unwrap();

        let input = dir.path().join("in.json");
        store::save(&input, &[Item::stub(7, "Seven", "s")]).unwrap();
        let output = dir.path().join("out.json");

        let out = p
            .run_stage(ctx.clone(), "append-one", Some(&input), Some(&output))
            .await
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].item_id, 8);

        let persisted: Vec<Item> = store::load(&output).unwrap();
        assert_eq!(persisted, out);
        assert_eq!(std::fs::read_to_string(&other).unwrap(), before);
        // Default snapshot untouched too.
        assert!(!ctx.settings.snapshot_path("test.json").exists());
    }

    #[tokio::test]
    async fn single_stage_without_output_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_ctx(dir.path());
        let p = counting_pipeline();
        p.run_stage(ctx.clone(), "seed", None, None).await.unwrap();
        assert!(!ctx.settings.build_path("test.json").exists());
        assert!(!ctx.settings.snapshot_path("test.json").exists());
    }

    #[test]
    fn declared_pipelines_have_expected_stages() {
        assert_eq!(
            items().stage_names(),
            vec!["listing", "enrichment", "details", "cross-reference"]
        );
        assert_eq!(zones().stage_names(), vec!["listing"]);
        assert_eq!(talents().stage_names(), vec!["listing", "tooltips"]);
    }
}
