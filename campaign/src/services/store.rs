//! Append-only JSONL engagement store
//!
//! One JSON line per engagement record, replayed into an in-memory index at
//! open. A bloom filter fronts the exact id set so the common case (a fresh
//! id) is rejected without touching the set. The mutex gives `record` its
//! create-if-absent semantics; stats readers never block the writer for
//! longer than an index lookup.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use growable_bloom_filter::GrowableBloom;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::traits::EngagementStore;
use shared::{today_key, EngagementRecord, SessionStats};

/// Expected id volume for the bloom filter (1% false positive target)
const BLOOM_CAPACITY: usize = 100_000;

pub struct JsonlEngagementStore {
    path: PathBuf,
    index: Mutex<StoreIndex>,
}

struct StoreIndex {
    ids: HashSet<String>,
    bloom: GrowableBloom,
    day_counts: HashMap<String, u64>,
    day_authors: HashMap<String, HashSet<String>>,
    total: u64,
}

impl StoreIndex {
    fn new() -> Self {
        Self {
            ids: HashSet::new(),
            bloom: GrowableBloom::new(0.01, BLOOM_CAPACITY),
            day_counts: HashMap::new(),
            day_authors: HashMap::new(),
            total: 0,
        }
    }

    fn contains(&self, id: &str) -> bool {
        // Bloom miss means definitely unseen; a hit still needs the exact set
        self.bloom.contains(id) && self.ids.contains(id)
    }

    fn insert(&mut self, record: &EngagementRecord) {
        self.bloom.insert(&record.id);
        self.ids.insert(record.id.clone());
        *self.day_counts.entry(record.date_key.clone()).or_default() += 1;
        self.day_authors
            .entry(record.date_key.clone())
            .or_default()
            .insert(record.author.clone());
        self.total += 1;
    }
}

impl JsonlEngagementStore {
    /// Open the store, replaying any existing records into the index.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let mut index = StoreIndex::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                for (line_no, line) in raw.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<EngagementRecord>(line) {
                        Ok(record) => index.insert(&record),
                        Err(e) => {
                            // A torn trailing line from a crash is tolerable;
                            // the record it belonged to was never confirmed.
                            tracing::warn!(
                                "⚠️ Skipping unreadable record at {}:{}: {}",
                                path.display(),
                                line_no + 1,
                                e
                            );
                        }
                    }
                }
                tracing::info!(
                    "💾 Engagement store loaded: {} records from {}",
                    index.total,
                    path.display()
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("💾 Starting fresh engagement store at {}", path.display());
            }
            Err(e) => {
                return Err(StoreError::Unavailable {
                    message: format!("failed to read {}: {e}", path.display()),
                });
            }
        }

        Ok(Self {
            path,
            index: Mutex::new(index),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_line(&self, record: &EngagementRecord) -> StoreResult<()> {
        let mut line = serde_json::to_string(record).map_err(|e| StoreError::Unavailable {
            message: format!("serialization failed: {e}"),
        })?;
        line.push('\n');

        let io_err = |e: std::io::Error| StoreError::Unavailable {
            message: format!("append to {} failed: {e}", self.path.display()),
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl EngagementStore for JsonlEngagementStore {
    async fn has_acted(&self, id: &str) -> StoreResult<bool> {
        let index = self.index.lock().await;
        Ok(index.contains(id))
    }

    async fn record(&self, entry: EngagementRecord) -> StoreResult<()> {
        let mut index = self.index.lock().await;
        if index.contains(&entry.id) {
            return Err(StoreError::DuplicateId { id: entry.id });
        }

        // Durable append first; the index only reflects confirmed writes
        self.append_line(&entry).await?;
        index.insert(&entry);
        Ok(())
    }

    async fn count_today(&self) -> StoreResult<u64> {
        let index = self.index.lock().await;
        Ok(index.day_counts.get(&today_key()).copied().unwrap_or(0))
    }

    async fn stats(&self) -> StoreResult<SessionStats> {
        let index = self.index.lock().await;
        let today = today_key();
        Ok(SessionStats {
            replies_today: index.day_counts.get(&today).copied().unwrap_or(0),
            distinct_authors_today: index
                .day_authors
                .get(&today)
                .map(|authors| authors.len() as u64)
                .unwrap_or(0),
            total_all_time: index.total,
        })
    }

    async fn health_check(&self) -> bool {
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .is_ok()
    }
}
