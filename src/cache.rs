//! In-memory caching using moka
//!
//! Application-level caching for the service catalog and editorial content.
//! Catalog entries use a short TTL: the back-office edits the catalog live
//! and the storefront is only ever eventually consistent with it.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::catalog;
use crate::db::queries;
use crate::models::{PageRow, ServiceCatalog, ServiceRow};

/// Application cache holding assembled catalogs and editorial content
#[derive(Clone)]
pub struct AppCache {
    /// Assembled service catalogs (slug -> ServiceCatalog)
    pub catalogs: Cache<String, Arc<ServiceCatalog>>,
    /// Services listing (singleton)
    pub services: Cache<String, Arc<Vec<ServiceRow>>>,
    /// Published pages (slug -> PageRow)
    pub pages: Cache<String, Arc<PageRow>>,
    /// Site settings (key -> value)
    pub settings: Cache<String, Arc<serde_json::Value>>,
}

const SERVICES_KEY: &str = "services";

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Catalogs: 200 entries, 60 s TTL (admin edits must show quickly)
            catalogs: Cache::builder()
                .max_capacity(200)
                .time_to_live(Duration::from_secs(60))
                .build(),

            // Services listing: 1 entry, 60 s TTL
            services: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60))
                .build(),

            // Pages: 100 entries, 30 min TTL, 10 min idle
            pages: Cache::builder()
                .max_capacity(100)
                .time_to_live(Duration::from_secs(30 * 60))
                .time_to_idle(Duration::from_secs(10 * 60))
                .build(),

            // Settings: a handful of keys, 30 min TTL
            settings: Cache::builder()
                .max_capacity(10)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            catalogs_size: self.catalogs.entry_count(),
            services_cached: self.services.entry_count() > 0,
            pages_size: self.pages.entry_count(),
            settings_size: self.settings.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.catalogs.invalidate_all();
        self.services.invalidate_all();
        self.pages.invalidate_all();
        self.settings.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate catalog-derived entries after a service/option/choice write
    pub fn invalidate_catalogs(&self) {
        self.catalogs.invalidate_all();
        self.services.invalidate_all();
        info!("Catalog caches invalidated");
    }

    /// Invalidate one page by slug
    pub async fn invalidate_page(&self, slug: &str) {
        self.pages.invalidate(slug).await;
        info!("Cache invalidated for page: {}", slug);
    }

    /// Invalidate one setting by key
    pub async fn invalidate_setting(&self, key: &str) {
        self.settings.invalidate(key).await;
        info!("Cache invalidated for setting: {}", key);
    }

    /// Cached services listing
    pub async fn cached_services(&self, pool: &PgPool) -> crate::error::Result<Arc<Vec<ServiceRow>>> {
        if let Some(cached) = self.services.get(SERVICES_KEY).await {
            return Ok(cached);
        }
        let services = Arc::new(catalog::queries::list_services(pool).await?);
        self.services
            .insert(SERVICES_KEY.to_string(), Arc::clone(&services))
            .await;
        Ok(services)
    }

    /// Cached setting value; absent rows are not cached
    pub async fn cached_setting(
        &self,
        pool: &PgPool,
        key: &str,
    ) -> crate::error::Result<Option<Arc<serde_json::Value>>> {
        if let Some(cached) = self.settings.get(key).await {
            return Ok(Some(cached));
        }
        match queries::get_site_setting(pool, key).await? {
            Some(value) => {
                let value = Arc::new(value);
                self.settings
                    .insert(key.to_string(), Arc::clone(&value))
                    .await;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub catalogs_size: u64,
    pub services_cached: bool,
    pub pages_size: u64,
    pub settings_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh every 10 minutes
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with commonly accessed data
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    // Warm the services listing
    if let Err(e) = cache.cached_services(db).await {
        warn!("Failed to warm services cache: {}", e);
    }

    // Warm hero and navigation settings
    for key in ["hero", "navbar_config", "navbar_colors"] {
        if let Err(e) = cache.cached_setting(db, key).await {
            warn!("Failed to warm setting cache '{}': {}", key, e);
        }
    }

    // Warm the catalogs of configurable services
    match cache.cached_services(db).await {
        Ok(services) => {
            for service in services.iter().filter(|s| s.has_options) {
                if let Err(e) = catalog::load_catalog(db, cache, &service.slug).await {
                    warn!("Failed to warm catalog '{}': {}", service.slug, e);
                }
            }
        }
        Err(e) => warn!("Failed to list services for catalog warm-up: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
