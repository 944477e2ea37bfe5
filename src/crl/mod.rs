//! Certificate Revocation List (CRL) caching and fetching
//!
//! # Features
//! - CRL downloads from distribution points over http/https
//! - In-memory, disk-backed and hybrid caches keyed by distribution point URL
//! - Strict and fail-safe caching fetch strategies
//! - Background refresh of all cached CRLs at a scheduled interval

mod cache;
mod fetcher;
mod types;
mod updater;

pub use cache::{
    CrlCache, DEFAULT_MEMORY_TTL, DirectoryCrlCache, MemoryAndDiskCrlCache, MemoryCrlCache,
};
pub use fetcher::{
    CachingCrlFetcher, CrlDownloader, CrlFetcher, FailsafeCachingCrlFetcher, HttpCrlDownloader,
    MockCrlDownloader,
};
pub use types::Crl;
pub use updater::{
    AsyncCrlCache, DEFAULT_INITIAL_DELAY, DEFAULT_REFRESH_INTERVAL, RefreshingCrlCache,
};
