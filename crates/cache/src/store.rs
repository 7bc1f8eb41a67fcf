use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use common::{Error, Result, Setup};

/// A setup plus serving metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CachedSetup {
    #[serde(flatten)]
    pub setup: Setup,
    pub last_updated: DateTime<Utc>,
    /// True when the most recent refresh attempt for this symbol failed and
    /// the value is carried over from the last successful cycle.
    pub stale: bool,
}

/// Per-symbol cache slot. The mutex serializes refreshes for this symbol;
/// the generation counter lets a queued refresher detect that the refresh it
/// waited behind already produced a fresh value.
struct SymbolEntry {
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
    current: RwLock<Option<CachedSetup>>,
}

impl SymbolEntry {
    fn new() -> Self {
        Self {
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }
}

/// How a refresh request was satisfied.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// This call performed the computation and stored a fresh setup.
    Refreshed(CachedSetup),
    /// An in-flight refresh completed while this call waited; its result is
    /// returned without recomputing.
    Joined(CachedSetup),
    /// The refresh failed. The last good setup, if any, is served stale.
    Failed {
        stale: Option<CachedSetup>,
        error: Error,
    },
}

impl RefreshOutcome {
    /// The best setup this outcome can serve, fresh or stale.
    pub fn setup(&self) -> Option<&CachedSetup> {
        match self {
            RefreshOutcome::Refreshed(s) | RefreshOutcome::Joined(s) => Some(s),
            RefreshOutcome::Failed { stale, .. } => stale.as_ref(),
        }
    }
}

/// Holds the latest setup per symbol and guarantees at most one in-flight
/// computation per symbol, however many callers race a refresh.
#[derive(Default)]
pub struct SetupCache {
    entries: RwLock<HashMap<String, Arc<SymbolEntry>>>,
}

impl SetupCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, symbol: &str) -> Arc<SymbolEntry> {
        if let Some(entry) = self.entries.read().await.get(symbol) {
            return entry.clone();
        }
        let mut entries = self.entries.write().await;
        entries
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(SymbolEntry::new()))
            .clone()
    }

    /// Current setup for one symbol, if it has ever refreshed successfully.
    pub async fn get(&self, symbol: &str) -> Option<CachedSetup> {
        let entry = self.entries.read().await.get(symbol)?.clone();
        let current = entry.current.read().await;
        current.clone()
    }

    /// All current setups, sorted by overall score descending.
    pub async fn all(&self) -> Vec<CachedSetup> {
        let entries: Vec<Arc<SymbolEntry>> =
            self.entries.read().await.values().cloned().collect();
        let mut setups = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(cached) = entry.current.read().await.clone() {
                setups.push(cached);
            }
        }
        setups.sort_by(|a, b| {
            b.setup
                .overall_score
                .partial_cmp(&a.setup.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        setups
    }

    /// Refresh one symbol through the single-flight gate.
    ///
    /// If another refresh for the same symbol is in flight, this call waits
    /// for it and joins its result instead of recomputing. On success the
    /// new setup replaces the old one atomically; on failure the previous
    /// setup is retained, marked stale, and returned alongside the error.
    pub async fn refresh<F, Fut>(&self, symbol: &str, compute: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Setup>>,
    {
        let entry = self.entry(symbol).await;

        let generation_before = entry.generation.load(Ordering::Acquire);
        let _guard = entry.refresh_lock.lock().await;

        // If the generation moved while we queued, the refresh we were
        // waiting behind already stored a fresh setup.
        if entry.generation.load(Ordering::Acquire) != generation_before {
            if let Some(cached) = entry.current.read().await.clone() {
                return RefreshOutcome::Joined(cached);
            }
        }

        match compute().await {
            Ok(setup) => {
                let cached = CachedSetup {
                    setup,
                    last_updated: Utc::now(),
                    stale: false,
                };
                *entry.current.write().await = Some(cached.clone());
                entry.generation.fetch_add(1, Ordering::AcqRel);
                RefreshOutcome::Refreshed(cached)
            }
            Err(error) => {
                let mut current = entry.current.write().await;
                if let Some(cached) = current.as_mut() {
                    cached.stale = true;
                }
                RefreshOutcome::Failed {
                    stale: current.clone(),
                    error,
                }
            }
        }
    }
}
