//! seen.rs — the persisted set of already-broadcast notice identities.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

/// Identities already broadcast, backed by a flat JSON array of strings.
/// Loaded once at startup, mutated in memory, rewritten wholesale on save.
/// Grows monotonically; there is no eviction.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    ids: HashSet<String>,
}

impl SeenStore {
    /// Load from `path`. A missing, unreadable, or corrupt file yields an
    /// empty set; the deployment then re-announces the current backlog.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str::<Vec<String>>(&s) {
                Ok(v) => v.into_iter().collect(),
                Err(e) => {
                    tracing::warn!(error = ?e, path = %path.display(), "seen file corrupt, starting empty");
                    HashSet::new()
                }
            },
            Err(_) => HashSet::new(),
        };
        Self { path, ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` for first-seen identities.
    pub fn insert(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Rewrite the whole file. The write is not atomic; a torn write simply
    /// reads back as an empty set on the next load.
    pub async fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating state dir {}", dir.display()))?;
        }
        let mut ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        let json = serde_json::to_vec_pretty(&ids).context("encoding seen set")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
