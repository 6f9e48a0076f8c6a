use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use classicdb::config::Settings;
use classicdb::model::Item;
use classicdb::scrape::BuildContext;
use classicdb::{pipeline, store, validate};

#[derive(Parser)]
#[command(name = "classicdb", about = "WoW Classic dataset builder")]
struct Cli {
    /// Root directory for persisted datasets
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Max in-flight requests per batch
    #[arg(long)]
    batch_size: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipelines and persist fresh datasets
    Build {
        /// Which dataset to build (default: all)
        #[arg(short, long, value_enum, default_value = "all")]
        dataset: Dataset,
    },
    /// Run a single named stage, optionally with file overrides
    Stage {
        #[arg(value_enum)]
        dataset: Dataset,
        /// Stage name (case/separator-insensitive)
        stage: String,
        /// Read stage input from this file instead of the snapshot
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Persist stage output to this file (otherwise nothing is written)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Diff the published snapshot against the latest build output
    Validate,
    /// Record counts and field coverage for the published snapshot
    Stats,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    Items,
    Zones,
    Talents,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::default().with_data_dir(&cli.data_dir);
    if let Some(batch_size) = cli.batch_size {
        settings.batch_size = batch_size;
    }

    let result = match cli.command {
        Commands::Build { dataset } => {
            let ctx = Arc::new(BuildContext::new(settings)?);
            if matches!(dataset, Dataset::Items | Dataset::All) {
                let items = pipeline::items().run_full(ctx.clone()).await?;
                println!("Built {} items.", items.len());
            }
            if matches!(dataset, Dataset::Zones | Dataset::All) {
                let zones = pipeline::zones().run_full(ctx.clone()).await?;
                println!("Built {} zones.", zones.len());
            }
            if matches!(dataset, Dataset::Talents | Dataset::All) {
                let talents = pipeline::talents().run_full(ctx.clone()).await?;
                println!("Built {} talents.", talents.len());
            }
            Ok(())
        }
        Commands::Stage {
            dataset,
            stage,
            input,
            output,
        } => {
            let ctx = Arc::new(BuildContext::new(settings)?);
            let count = match dataset {
                Dataset::Items => {
                    pipeline::items()
                        .run_stage(ctx, &stage, input.as_deref(), output.as_deref())
                        .await?
                        .len()
                }
                Dataset::Zones => {
                    pipeline::zones()
                        .run_stage(ctx, &stage, input.as_deref(), output.as_deref())
                        .await?
                        .len()
                }
                Dataset::Talents => {
                    pipeline::talents()
                        .run_stage(ctx, &stage, input.as_deref(), output.as_deref())
                        .await?
                        .len()
                }
                Dataset::All => {
                    anyhow::bail!("a single stage needs a concrete dataset, not 'all'")
                }
            };
            println!("Stage '{stage}' produced {count} records.");
            Ok(())
        }
        Commands::Validate => run_validate(&settings),
        Commands::Stats => run_stats(&settings),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_validate(settings: &Settings) -> Result<()> {
    let datasets: &[(&str, &str, &str)] = &[
        ("items", "data.json", "itemId"),
        ("zones", "zones.json", "id"),
        ("talents", "talents.json", "id"),
    ];

    let mut clean = true;
    for (dataset, file, id_key) in datasets {
        let old = settings.snapshot_path(file);
        let new = settings.build_path(file);
        if !old.exists() || !new.exists() {
            println!("{dataset}: skipped (snapshot or build output missing)");
            continue;
        }
        let diff = validate::diff_files(&old, &new, id_key)?;
        validate::print_report(dataset, &diff);
        clean &= diff.is_clean();
    }

    if clean {
        println!("Build successfully validated");
    } else {
        println!("Changes detected");
        println!("Either something went wrong with the build or it improved (e.g. better sanitization). In the latter case, publish the new snapshot.");
    }
    Ok(())
}

fn run_stats(settings: &Settings) -> Result<()> {
    for (dataset, file) in [("zones", "zones.json"), ("talents", "talents.json")] {
        let path = settings.snapshot_path(file);
        if path.exists() {
            let records: Vec<serde_json::Value> = store::load(&path)?;
            println!("{:<10} {}", format!("{dataset}:"), records.len());
        }
    }

    let path = settings.snapshot_path("data.json");
    if !path.exists() {
        println!("items:     no snapshot at {}", path.display());
        return Ok(());
    }
    let items: Vec<Item> = store::load(&path)?;
    println!("{:<10} {}", "items:", items.len());

    let coverage = |label: &str, n: usize| {
        let pct = if items.is_empty() {
            0.0
        } else {
            100.0 * n as f64 / items.len() as f64
        };
        println!("  {label:<14} {n:>6} ({pct:.1}%)");
    };
    coverage("tooltip", items.iter().filter(|i| i.tooltip.is_some()).count());
    coverage("itemLink", items.iter().filter(|i| i.item_link.is_some()).count());
    coverage("source", items.iter().filter(|i| i.source.is_some()).count());
    coverage("vendorPrice", items.iter().filter(|i| i.vendor_price.is_some()).count());
    coverage("createdBy", items.iter().filter(|i| i.created_by.is_some()).count());
    coverage("contentPhase", items.iter().filter(|i| i.content_phase.is_some()).count());

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
