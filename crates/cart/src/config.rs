//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CATALOG_API_URL` - Base URL of the catalog API (default: `http://localhost:3333`)
//! - `CATALOG_PRODUCT_CACHE_TTL_SECS` - How long product metadata is cached (default: 300)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `CART_STORAGE_KEY` - Key of the persisted cart slot (default: `@RocketShoes:cart`)
//! - `CART_ADD_STOCK_GUARD` - `legacy` or `available` (default: `legacy`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::store::StoreOptions;

/// Default key of the persisted cart slot.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_CATALOG_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Stock check applied by `add_product` before anything else.
///
/// Earlier releases only let a product be added while the catalog reported
/// *more than one* unit, so a product with a single unit left could never be
/// added. `Legacy` keeps that behavior; `Available`
/// accepts any positive stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddStockGuard {
    /// Require `stock > 1`.
    #[default]
    Legacy,
    /// Require `stock >= 1`.
    Available,
}

impl AddStockGuard {
    /// Whether a product with `stock` units may be added at all.
    #[must_use]
    pub const fn admits(self, stock: i64) -> bool {
        match self {
            Self::Legacy => stock > 1,
            Self::Available => stock >= 1,
        }
    }
}

impl std::fmt::Display for AddStockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Available => write!(f, "available"),
        }
    }
}

impl FromStr for AddStockGuard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "available" => Ok(Self::Available),
            _ => Err(format!("invalid stock guard: {s} (expected legacy or available)")),
        }
    }
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Persistent slot configuration
    pub storage: StorageConfig,
    /// Stock check applied when adding a product
    pub add_stock_guard: AddStockGuard,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it
    pub base_url: Url,
    /// TTL of cached product metadata (stock is never cached)
    pub product_cache_ttl: Duration,
}

/// Persistent slot configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per key
    pub dir: PathBuf,
    /// Key of the cart slot
    pub key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let catalog = CatalogConfig::from_vars(&vars)?;
        let storage = StorageConfig::from_vars(&vars);
        let add_stock_guard = vars
            .get_or_default("CART_ADD_STOCK_GUARD", "legacy")
            .parse::<AddStockGuard>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_ADD_STOCK_GUARD".to_string(), e))?;

        Ok(Self {
            catalog,
            storage,
            add_stock_guard,
        })
    }

    /// Options for [`crate::CartStore::open`].
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            storage_key: self.storage.key.clone(),
            add_stock_guard: self.add_stock_guard,
        }
    }
}

impl CatalogConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(vars: &Vars<F>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&vars.get_or_default("CATALOG_API_URL", DEFAULT_CATALOG_URL))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e.to_string())
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_API_URL".to_string(),
                "must be an http(s) base URL".to_string(),
            ));
        }

        let ttl_secs = vars
            .get_or_default(
                "CATALOG_PRODUCT_CACHE_TTL_SECS",
                DEFAULT_PRODUCT_CACHE_TTL_SECS,
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "CATALOG_PRODUCT_CACHE_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            base_url,
            product_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl StorageConfig {
    fn from_vars<F: Fn(&str) -> Option<String>>(vars: &Vars<F>) -> Self {
        Self {
            dir: PathBuf::from(vars.get_or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            key: vars.get_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get a variable with a default value. Blank values count as unset.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.catalog.product_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.storage.dir, PathBuf::from(".rocketshoes"));
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert_eq!(config.add_stock_guard, AddStockGuard::Legacy);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CATALOG_API_URL", "https://api.example.com/v1/"),
            ("CATALOG_PRODUCT_CACHE_TTL_SECS", "0"),
            ("CART_STORAGE_DIR", "/tmp/carts"),
            ("CART_STORAGE_KEY", "cart"),
            ("CART_ADD_STOCK_GUARD", "Available"),
        ])
        .unwrap();
        assert_eq!(config.catalog.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.catalog.product_cache_ttl, Duration::ZERO);
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.add_stock_guard, AddStockGuard::Available);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("CART_STORAGE_KEY", "  ")]).unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_invalid_url() {
        let err = config_from(&[("CATALOG_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_API_URL"));
    }

    #[test]
    fn test_invalid_ttl() {
        let err = config_from(&[("CATALOG_PRODUCT_CACHE_TTL_SECS", "-5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CATALOG_PRODUCT_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_invalid_stock_guard() {
        assert!(config_from(&[("CART_ADD_STOCK_GUARD", "strict")]).is_err());
    }

    #[test]
    fn test_stock_guard_admits() {
        assert!(!AddStockGuard::Legacy.admits(1));
        assert!(AddStockGuard::Legacy.admits(2));
        assert!(AddStockGuard::Available.admits(1));
        assert!(!AddStockGuard::Available.admits(0));
    }

    #[test]
    fn test_store_options() {
        let config = config_from(&[("CART_STORAGE_KEY", "k")]).unwrap();
        let options = config.store_options();
        assert_eq!(options.storage_key, "k");
        assert_eq!(options.add_stock_guard, AddStockGuard::Legacy);
    }
}
