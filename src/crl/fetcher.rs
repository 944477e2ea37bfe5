use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::cache::CrlCache;
use super::types::Crl;
use crate::config::CrlConfig;
use crate::error::{ValidationError, ValidationResult};

/// Obtains a CRL for a distribution point URL, consulting a cache before
/// falling back to a download.
#[async_trait]
pub trait CrlFetcher: Send + Sync {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>>;
}

/// Downloads CRLs from distribution points.
///
/// Only `http` and `https` URLs are supported; any other scheme (notably
/// `ldap`) yields `Ok(None)` rather than an error.
#[mockall::automock]
#[async_trait]
pub trait CrlDownloader: Send + Sync {
    async fn download(&self, url: &str) -> ValidationResult<Option<Crl>>;
}

/// HTTP downloader with a request timeout.
#[derive(Debug, Clone)]
pub struct HttpCrlDownloader {
    client: Client,
    request_timeout: Duration,
}

impl HttpCrlDownloader {
    /// Downloader with the configured request timeout.
    pub fn from_config(config: &CrlConfig) -> ValidationResult<Self> {
        Self::new(config.http_timeout())
    }

    /// Returns an error if the HTTP client cannot be initialized
    pub fn new(request_timeout: Duration) -> ValidationResult<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            request_timeout,
        })
    }
}

impl Default for HttpCrlDownloader {
    fn default() -> Self {
        Self {
            client: Client::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl CrlDownloader for HttpCrlDownloader {
    async fn download(&self, url: &str) -> ValidationResult<Option<Crl>> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            // Retrieval over ldap and other schemes is not supported.
            debug!("Unsupported CRL distribution point scheme: {}", url);
            return Ok(None);
        }

        info!("Fetching CRL from: {}", url);
        let _ = url::Url::parse(url)?;

        let response = match timeout(self.request_timeout, self.client.get(url).send()).await {
            Ok(result) => result?,
            Err(_) => return Err(ValidationError::Timeout),
        };

        if !response.status().is_success() {
            return Err(ValidationError::Custom(format!(
                "HTTP error {}: failed to fetch CRL from {}",
                response.status(),
                url
            )));
        }

        let crl_data = response.bytes().await?.to_vec();
        let crl = Crl::from_der(crl_data)?;

        info!("Successfully fetched CRL from {}", url);
        Ok(Some(crl))
    }
}

/// Caching CRL fetcher. A cache miss, or a cached CRL whose next-update time
/// has passed, triggers an immediate download; a fresh cached CRL is served
/// without any network traffic. Download failures propagate to the caller.
pub struct CachingCrlFetcher {
    cache: Arc<dyn CrlCache>,
    downloader: Arc<dyn CrlDownloader>,
}

impl CachingCrlFetcher {
    pub fn new(cache: Arc<dyn CrlCache>, downloader: Arc<dyn CrlDownloader>) -> Self {
        Self { cache, downloader }
    }

    /// Cache consultation shared by the strict and fail-safe strategies.
    /// Returns the cached CRL if it can be served directly, otherwise the
    /// possibly-absent stale value alongside a refresh demand.
    async fn cached(&self, url: &str) -> ValidationResult<(Option<Crl>, bool)> {
        match self.cache.get(url).await? {
            None => Ok((None, true)),
            Some(crl) => {
                if crl.is_stale()? {
                    debug!("Cached CRL from {} is outdated", url);
                    Ok((Some(crl), true))
                } else {
                    debug!("Using cached CRL from {}", url);
                    Ok((Some(crl), false))
                }
            }
        }
    }

    async fn refresh(&self, url: &str) -> ValidationResult<Option<Crl>> {
        let crl = self.downloader.download(url).await?;
        if let Some(crl) = &crl {
            self.cache.set(url, Some(crl.clone())).await?;
        }
        Ok(crl)
    }
}

#[async_trait]
impl CrlFetcher for CachingCrlFetcher {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>> {
        let (cached, needs_refresh) = self.cached(url).await?;
        if needs_refresh {
            self.refresh(url).await
        } else {
            Ok(cached)
        }
    }
}

/// CRL fetcher that ignores problems with retrieving a new CRL and falls
/// back to the previously cached copy, so validation never hard-fails just
/// because a distribution point is unreachable. The trade-off is validating
/// against a possibly stale revocation list.
pub struct FailsafeCachingCrlFetcher {
    inner: CachingCrlFetcher,
}

impl FailsafeCachingCrlFetcher {
    pub fn new(cache: Arc<dyn CrlCache>, downloader: Arc<dyn CrlDownloader>) -> Self {
        Self {
            inner: CachingCrlFetcher::new(cache, downloader),
        }
    }
}

#[async_trait]
impl CrlFetcher for FailsafeCachingCrlFetcher {
    async fn get(&self, url: &str) -> ValidationResult<Option<Crl>> {
        let (cached, needs_refresh) = self.inner.cached(url).await?;
        if !needs_refresh {
            return Ok(cached);
        }

        match self.inner.refresh(url).await {
            Ok(crl) => Ok(crl),
            Err(e) => {
                error!("Failed to retrieve CRL from {}: {}", url, e);
                Ok(cached)
            }
        }
    }
}
