use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::fs;
use tracing::{debug, warn};

use super::types::Crl;
use crate::config::CrlConfig;
use crate::error::ValidationResult;

/// Default lifetime of entries in the memory tier of the hybrid cache.
pub const DEFAULT_MEMORY_TTL: Duration = Duration::from_millis(60_000);

/// A cache of CRLs keyed by distribution point URL.
///
/// Setting `None` for a URL evicts the entry; it is not an error.
#[async_trait]
pub trait CrlCache: Send + Sync {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>>;

    async fn set(&self, url: &str, crl: Option<Crl>) -> ValidationResult<()>;

    /// The set of distribution point URLs currently known to the cache.
    async fn urls(&self) -> ValidationResult<HashSet<String>>;
}

/// In-memory CRL cache backed by a concurrency-safe map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCrlCache {
    cache: Arc<DashMap<String, Crl>>,
}

impl MemoryCrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Snapshot of the known URLs. Key additions and removals after the
    /// snapshot is taken are not reflected in it.
    pub(crate) fn urls_snapshot(&self) -> HashSet<String> {
        self.cache.iter().map(|entry| entry.key().clone()).collect()
    }

    pub(crate) fn insert(&self, url: &str, crl: Option<Crl>) {
        match crl {
            Some(crl) => {
                self.cache.insert(url.to_string(), crl);
            }
            None => {
                self.cache.remove(url);
            }
        }
    }
}

#[async_trait]
impl CrlCache for MemoryCrlCache {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>> {
        Ok(self.cache.get(url).map(|entry| entry.value().clone()))
    }

    async fn set(&self, url: &str, crl: Option<Crl>) -> ValidationResult<()> {
        self.insert(url, crl);
        Ok(())
    }

    async fn urls(&self) -> ValidationResult<HashSet<String>> {
        Ok(self.urls_snapshot())
    }
}

/// Disk-backed CRL cache persisting one file per distribution point URL.
///
/// The filename is the percent-encoded URL, which is deterministic,
/// filesystem-safe and reversible, so the set of known URLs can be recovered
/// from a directory listing. File contents are the CRL's DER bytes.
#[derive(Debug, Clone)]
pub struct DirectoryCrlCache {
    folder: PathBuf,
}

impl DirectoryCrlCache {
    pub async fn new(folder: impl Into<PathBuf>) -> ValidationResult<Self> {
        let folder = folder.into();
        fs::create_dir_all(&folder).await?;
        Ok(Self { folder })
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.folder.join(urlencoding::encode(url).into_owned())
    }
}

#[async_trait]
impl CrlCache for DirectoryCrlCache {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>> {
        let path = self.path_for(url);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let der_data = fs::read(&path).await?;
        Ok(Some(Crl::from_der(der_data)?))
    }

    async fn set(&self, url: &str, crl: Option<Crl>) -> ValidationResult<()> {
        let path = self.path_for(url);
        match crl {
            Some(crl) => {
                fs::write(&path, crl.as_der()).await?;
                debug!("Persisted CRL for {} to {}", url, path.display());
            }
            None => {
                if fs::try_exists(&path).await? {
                    fs::remove_file(&path).await?;
                    debug!("Removed persisted CRL for {}", url);
                }
            }
        }
        Ok(())
    }

    async fn urls(&self) -> ValidationResult<HashSet<String>> {
        let mut urls = HashSet::new();
        let mut entries = fs::read_dir(&self.folder).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match urlencoding::decode(name) {
                Ok(url) => {
                    urls.insert(url.into_owned());
                }
                Err(_) => warn!("Ignoring unexpected file in CRL cache: {}", name),
            }
        }

        Ok(urls)
    }
}

#[derive(Debug, Clone)]
struct CachedCrl {
    crl: Crl,
    cached_at: Instant,
}

impl CachedCrl {
    fn new(crl: Crl) -> Self {
        Self {
            crl,
            cached_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }
}

/// Disk-backed cache fronted by a short-lived memory tier, to avoid reading
/// the CRL file from disk on every validation.
///
/// Writes go to disk only; the memory tier is populated lazily on the next
/// `get`, never on `set`. A memory entry that has not yet expired can
/// therefore briefly serve a value that `set` has already replaced on disk.
#[derive(Debug, Clone)]
pub struct MemoryAndDiskCrlCache {
    disk: DirectoryCrlCache,
    memory: Arc<DashMap<String, CachedCrl>>,
    memory_ttl: Duration,
}

impl MemoryAndDiskCrlCache {
    pub async fn new(folder: impl Into<PathBuf>) -> ValidationResult<Self> {
        Self::with_memory_ttl(folder, DEFAULT_MEMORY_TTL).await
    }

    /// Cache rooted at the configured directory with the configured
    /// memory-tier lifetime.
    pub async fn from_config(config: &CrlConfig) -> ValidationResult<Self> {
        Self::with_memory_ttl(&config.cache_dir, config.memory_ttl()).await
    }

    pub async fn with_memory_ttl(
        folder: impl Into<PathBuf>,
        memory_ttl: Duration,
    ) -> ValidationResult<Self> {
        Ok(Self {
            disk: DirectoryCrlCache::new(folder).await?,
            memory: Arc::new(DashMap::new()),
            memory_ttl,
        })
    }

    async fn read_through(&self, url: &str) -> ValidationResult<Option<Crl>> {
        let crl = self.disk.get(url).await?;
        if let Some(crl) = &crl {
            self.memory.insert(url.to_string(), CachedCrl::new(crl.clone()));
        }
        Ok(crl)
    }
}

#[async_trait]
impl CrlCache for MemoryAndDiskCrlCache {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>> {
        let fresh = self
            .memory
            .get(url)
            .filter(|entry| !entry.is_expired(self.memory_ttl))
            .map(|entry| entry.crl.clone());

        match fresh {
            Some(crl) => Ok(Some(crl)),
            None => self.read_through(url).await,
        }
    }

    async fn set(&self, url: &str, crl: Option<Crl>) -> ValidationResult<()> {
        self.disk.set(url, crl).await
    }

    async fn urls(&self) -> ValidationResult<HashSet<String>> {
        self.disk.urls().await
    }
}
