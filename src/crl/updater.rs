use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};

use super::cache::{CrlCache, MemoryCrlCache};
use super::fetcher::CrlDownloader;
use super::types::Crl;
use crate::config::CrlConfig;
use crate::error::ValidationResult;

/// Default interval for asynchronous cache refresh is 15 minutes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Default delay before the first refresh cycle after `start()`
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(30);

/// A CRL cache that refreshes its entries in the background. It can be
/// started and stopped.
#[async_trait]
pub trait AsyncCrlCache: CrlCache {
    /// Starts the background refresh worker.
    ///
    /// There is no re-entrancy guard: calling `start()` twice spawns two
    /// workers racing on the same cache.
    fn start(&self);

    /// Signals the background worker to stop. The worker observes the signal
    /// at the top of its next cycle, so stopping may take up to one full
    /// refresh interval; an in-flight refresh is never interrupted.
    /// Idempotent.
    fn stop(&self);
}

/// In-memory CRL cache that re-downloads every known CRL at a scheduled
/// interval. `get` never fetches synchronously; it returns whatever is
/// currently cached, possibly stale or absent.
pub struct RefreshingCrlCache {
    cache: MemoryCrlCache,
    downloader: Arc<dyn CrlDownloader>,
    refresh_interval: Duration,
    initial_delay: Duration,
    running: Arc<AtomicBool>,
}

impl RefreshingCrlCache {
    pub fn new(downloader: Arc<dyn CrlDownloader>) -> Self {
        Self::with_schedule(downloader, DEFAULT_REFRESH_INTERVAL, DEFAULT_INITIAL_DELAY)
    }

    /// Cache on the configured refresh schedule.
    pub fn from_config(downloader: Arc<dyn CrlDownloader>, config: &CrlConfig) -> Self {
        Self::with_schedule(downloader, config.refresh_interval(), config.initial_delay())
    }

    pub fn with_schedule(
        downloader: Arc<dyn CrlDownloader>,
        refresh_interval: Duration,
        initial_delay: Duration,
    ) -> Self {
        Self {
            cache: MemoryCrlCache::new(),
            downloader,
            refresh_interval,
            initial_delay,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// One refresh sweep over a snapshot of the known URLs. Key changes made
    /// while the sweep runs are picked up on the next cycle. A failing URL is
    /// logged and skipped; it never blocks refresh of the others.
    async fn refresh_all(cache: &MemoryCrlCache, downloader: &dyn CrlDownloader) {
        let urls: HashSet<String> = cache.urls_snapshot();
        for url in urls {
            match downloader.download(&url).await {
                Ok(Some(crl)) => {
                    cache.insert(&url, Some(crl));
                    info!("Refreshed CRL for {}", url);
                }
                Ok(None) => warn!("No CRL available from {}", url),
                Err(e) => warn!("Failed to fetch CRL from {}: {}", url, e),
            }
        }
    }
}

#[async_trait]
impl CrlCache for RefreshingCrlCache {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>> {
        self.cache.get(url).await
    }

    async fn set(&self, url: &str, crl: Option<Crl>) -> ValidationResult<()> {
        self.cache.set(url, crl).await
    }

    async fn urls(&self) -> ValidationResult<HashSet<String>> {
        self.cache.urls().await
    }
}

#[async_trait]
impl AsyncCrlCache for RefreshingCrlCache {
    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);

        let cache = self.cache.clone();
        let downloader = Arc::clone(&self.downloader);
        let running = Arc::clone(&self.running);
        let refresh_interval = self.refresh_interval;
        let initial_delay = self.initial_delay;

        tokio::spawn(async move {
            // start slowly
            sleep(initial_delay).await;
            info!(
                "Starting CRL cache updater with interval of {:?}",
                refresh_interval
            );

            while running.load(Ordering::SeqCst) {
                Self::refresh_all(&cache, downloader.as_ref()).await;
                sleep(refresh_interval).await;
            }

            info!("Stopped CRL cache updater");
        });
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
