//! Process-lifetime memoization of the parsed catalog.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use forgeprice_core::{PricingError, PricingResult};

use super::loader::parse_catalog;
use super::row::CatalogRow;
use crate::store::CatalogSource;

/// An immutable parse of the catalog source.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub rows: Vec<CatalogRow>,
    pub skipped: usize,
    pub origin: String,
    pub loaded_at: DateTime<Utc>,
}

/// Lazily-populated, thread-safe cache of one catalog source.
///
/// The source is read at most once until [`CatalogCache::invalidate`] or
/// [`CatalogCache::reload`] is called. Readers share the same
/// `Arc<CatalogSnapshot>`; a snapshot is never mutated after publication.
#[derive(Debug)]
pub struct CatalogCache<S> {
    source: S,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
    reads: AtomicUsize,
}

impl<S: CatalogSource> CatalogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
            reads: AtomicUsize::new(0),
        }
    }

    /// Cached snapshot, parsing the source on first use.
    pub fn get(&self) -> PricingResult<Arc<CatalogSnapshot>> {
        {
            let guard = self.snapshot.read().map_err(|_| poisoned())?;
            if let Some(snapshot) = guard.as_ref() {
                return Ok(Arc::clone(snapshot));
            }
        }

        let mut guard = self.snapshot.write().map_err(|_| poisoned())?;
        // Another reader may have populated it while we waited for the lock.
        if let Some(snapshot) = guard.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(self.load()?);
        *guard = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next [`get`](Self::get) re-reads the source.
    pub fn invalidate(&self) -> PricingResult<()> {
        let mut guard = self.snapshot.write().map_err(|_| poisoned())?;
        *guard = None;
        Ok(())
    }

    /// Re-read the source now. On failure the previous snapshot is kept.
    pub fn reload(&self) -> PricingResult<Arc<CatalogSnapshot>> {
        let mut guard = self.snapshot.write().map_err(|_| poisoned())?;
        let snapshot = Arc::new(self.load()?);
        *guard = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// How many times the source has been read.
    pub fn source_reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn load(&self) -> PricingResult<CatalogSnapshot> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let origin = self.source.origin();
        let text = self.source.read_catalog()?;
        let parsed = parse_catalog(&text);

        if parsed.skipped > 0 {
            warn!(origin = %origin, skipped = parsed.skipped, "catalog contained malformed rows");
        }
        info!(origin = %origin, rows = parsed.rows.len(), "catalog loaded");

        Ok(CatalogSnapshot {
            rows: parsed.rows,
            skipped: parsed.skipped,
            origin,
            loaded_at: Utc::now(),
        })
    }
}

fn poisoned() -> PricingError {
    PricingError::data_source("catalog cache lock poisoned")
}
