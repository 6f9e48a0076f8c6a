//! Snapshot validation: diff the previous published dataset against a fresh
//! build, reporting records that went missing, appeared, or changed.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::store;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Diff {
    pub missing: usize,
    pub added: usize,
    pub changed: usize,
}

impl Diff {
    pub fn is_clean(&self) -> bool {
        self.missing == 0 && self.added == 0 && self.changed == 0
    }
}

/// Compare two persisted datasets record-by-record, keyed by `id_key`.
pub fn diff_files(old: &Path, new: &Path, id_key: &str) -> Result<Diff> {
    let old: Vec<Value> = store::load(old)?;
    let new: Vec<Value> = store::load(new)?;
    Ok(diff(&old, &new, id_key))
}

pub fn diff(old: &[Value], new: &[Value], id_key: &str) -> Diff {
    let by_id: HashMap<u64, &Value> = new
        .iter()
        .filter_map(|r| Some((r.get(id_key)?.as_u64()?, r)))
        .collect();

    let mut out = Diff::default();
    let mut matched = 0usize;
    for record in old {
        match record
            .get(id_key)
            .and_then(Value::as_u64)
            .and_then(|id| by_id.get(&id))
        {
            None => out.missing += 1,
            Some(counterpart) => {
                matched += 1;
                if *counterpart != record {
                    out.changed += 1;
                }
            }
        }
    }
    // Arbitrary on-disk input may repeat ids, so matches can exceed the new
    // record count.
    out.added = new.len().saturating_sub(matched);
    out
}

pub fn print_report(dataset: &str, diff: &Diff) {
    let line = |n: usize, what: &str| {
        let tag = if n > 0 { "Change" } else { "Validated" };
        println!("{tag:>10}: {n} {dataset} {what}.");
    };
    line(diff.missing, "missing");
    line(diff.added, "added");
    line(diff.changed, "changed");
}

// ── Tests ──
