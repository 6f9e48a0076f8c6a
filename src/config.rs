use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Build settings. Defaults cover the public endpoints; the CLI overrides
/// the data directory and batch size.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory for persisted datasets (`json/` snapshot, `build/` output).
    pub data_dir: PathBuf,
    /// Wowhead Classic base URL (listing and detail pages).
    pub listing_base: String,
    /// Blizzard API base URL (per-item enrichment endpoint).
    pub api_base: String,
    /// Upper bound of the item id space walked by the listing stage.
    pub id_space: u32,
    /// Listing window size; the listing endpoint caps results per page.
    pub window: u32,
    /// Max in-flight requests per batch. Batches run to completion before the
    /// next starts, which is the sole rate-limiting mechanism.
    pub batch_size: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Bearer token file for the enrichment endpoint. Absence is non-fatal:
    /// the enrichment stage degrades to a pass-through.
    pub token_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            listing_base: "https://classic.wowhead.com".to_string(),
            api_base: "https://us.api.blizzard.com".to_string(),
            id_space: 24000,
            window: 500,
            batch_size: 50,
            request_timeout_secs: 30,
            user_agent: "classicdb/0.1 (dataset builder)".to_string(),
            token_path: PathBuf::from("data/.blizzard-token"),
        }
    }
}

impl Settings {
    /// Directory holding the last published snapshot.
    pub fn snapshot_dir(&self) -> PathBuf {
        self.data_dir.join("json")
    }

    /// Directory the build writes fresh outputs to.
    pub fn build_dir(&self) -> PathBuf {
        self.data_dir.join("build")
    }

    pub fn snapshot_path(&self, file: &str) -> PathBuf {
        self.snapshot_dir().join(file)
    }

    pub fn build_path(&self, file: &str) -> PathBuf {
        self.build_dir().join(file)
    }

    /// Read the API bearer token. A missing file means "run without
    /// enrichment"; any other filesystem error is fatal.
    pub fn load_token(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                Ok(if token.is_empty() { None } else { Some(token) })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!(
                "failed to read token file {}",
                self.token_path.display()
            )),
        }
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.token_path = dir.join(".blizzard-token");
        self.data_dir = dir.to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_token_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_data_dir(dir.path());
        assert!(settings.load_token().unwrap().is_none());
    }

    #[test]
    fn token_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_data_dir(dir.path());
        let mut f = std::fs::File::create(&settings.token_path).unwrap();
        writeln!(f, "  abc123  ").unwrap();
        assert_eq!(settings.load_token().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn empty_token_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_data_dir(dir.path());
        std::fs::write(&settings.token_path, "\n").unwrap();
        assert!(settings.load_token().unwrap().is_none());
    }
}
