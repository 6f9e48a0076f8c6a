//! Network side of the pipeline: a shared build context plus the bounded
//! batch scheduler every fetch stage goes through.

pub mod detail;
pub mod enrich;
pub mod listing;
pub mod tables;
pub mod talents;
pub mod zones;

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;

/// Shared state for one build run: HTTP client, settings, and the optional
/// enrichment token.
pub struct BuildContext {
    pub client: reqwest::Client,
    pub settings: Settings,
    pub token: Option<String>,
}

impl BuildContext {
    pub fn new(settings: Settings) -> Result<Self> {
        let token = settings.load_token()?;
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            settings,
            token,
        })
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.text().await?)
    }
}

pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .expect("static template")
            .progress_chars("=> "),
    );
    pb
}

/// Run `f` over `inputs` in batches of at most `batch_size` concurrent
/// futures. A batch resolves fully before the next one starts; that barrier
/// is the pipeline's only rate limiting. Output order matches input order.
pub async fn fetch_batched<T, R, F, Fut>(
    inputs: Vec<T>,
    batch_size: usize,
    pb: &ProgressBar,
    f: F,
) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let mut out = Vec::with_capacity(inputs.len());
    let mut rest = inputs;
    while !rest.is_empty() {
        let take = batch_size.min(rest.len());
        let batch: Vec<T> = rest.drain(..take).collect();
        let results = futures::future::join_all(batch.into_iter().map(&f)).await;
        pb.inc(results.len() as u64);
        out.extend(results);
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn batches_preserve_order_and_barrier() {
        // Track the max number of concurrently started-but-unfinished calls.
        let active = RefCell::new((0usize, 0usize)); // (current, max)
        let pb = ProgressBar::hidden();

        let inputs: Vec<u32> = (0..10).collect();
        let out = fetch_batched(inputs, 3, &pb, |n| {
            {
                let mut a = active.borrow_mut();
                a.0 += 1;
                a.1 = a.1.max(a.0);
            }
            let active = &active;
            async move {
                tokio::task::yield_now().await;
                active.borrow_mut().0 -= 1;
                n * 2
            }
        })
        .await;

        assert_eq!(out, (0..10).map(|n| n * 2).collect::<Vec<_>>());
        assert!(active.borrow().1 <= 3, "batch boundary was not respected");
    }

    #[tokio::test]
    async fn final_partial_batch_runs() {
        let pb = ProgressBar::hidden();
        let out = fetch_batched(vec![1, 2, 3, 4, 5], 4, &pb, |n| async move { n }).await;
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
    }
}
