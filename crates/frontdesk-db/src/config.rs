//! # Front Desk Configuration
//!
//! Which store backs the front desk and which billing rates new bookings get.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FRONTDESK_STORE_BACKEND=sqlite                                     │
//! │     FRONTDESK_DEFAULT_TAX_RATE_BPS=700                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/frontdesk/frontdesk.toml (Linux)                         │
//! │     ~/Library/Application Support/com.frontdesk.frontdesk/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     in-memory store, seeded, 5% tax, 10% service charge                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # frontdesk.toml
//! [store]
//! backend = "sqlite"          # memory | sqlite
//! database_path = "/var/lib/frontdesk/frontdesk.db"
//! seed_on_start = true
//! simulate_latency = false
//!
//! [billing]
//! default_tax_rate_bps = 500              # 5%
//! default_service_charge_rate_bps = 1000  # 10%
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use frontdesk_core::validation::validate_rate_bps;
use frontdesk_core::{
    BillingDefaults, Rate, DEFAULT_SERVICE_CHARGE_RATE_BPS, DEFAULT_TAX_RATE_BPS,
};

use crate::error::{DbError, DbResult};

// =============================================================================
// Store Backend
// =============================================================================

/// Where reservations live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process memory, lost on restart.
    #[default]
    Memory,
    /// SQLite file at `database_path`.
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "mem" => Ok(StoreBackend::Memory),
            "sqlite" | "sqlite3" => Ok(StoreBackend::Sqlite),
            _ => Err(DbError::Config(format!(
                "unknown store backend '{}', expected memory or sqlite",
                s
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Load the embedded seed dataset (memory) or insert it into an empty
    /// table (sqlite).
    #[serde(default = "default_true")]
    pub seed_on_start: bool,

    /// Apply the mock backend's fixed delays (memory only).
    #[serde(default)]
    pub simulate_latency: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            backend: StoreBackend::default(),
            database_path: None,
            seed_on_start: true,
            simulate_latency: false,
        }
    }
}

/// `[billing]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSettings {
    #[serde(default = "default_tax_rate_bps")]
    pub default_tax_rate_bps: u32,

    #[serde(default = "default_service_charge_rate_bps")]
    pub default_service_charge_rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_service_charge_rate_bps() -> u32 {
    DEFAULT_SERVICE_CHARGE_RATE_BPS
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            default_tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            default_service_charge_rate_bps: DEFAULT_SERVICE_CHARGE_RATE_BPS,
        }
    }
}

impl BillingSettings {
    pub fn defaults(&self) -> BillingDefaults {
        BillingDefaults {
            tax_rate: Rate::from_bps(self.default_tax_rate_bps),
            service_charge_rate: Rate::from_bps(self.default_service_charge_rate_bps),
        }
    }
}

// =============================================================================
// Front Desk Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontDeskConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub billing: BillingSettings,
}

impl FrontDeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (frontdesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading front desk config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load front desk config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> DbResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DbError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&contents).map_err(|e| DbError::Config(e.to_string()))
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> DbResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DbError::Config(e.to_string()))?;
        }
        let contents =
            toml::to_string_pretty(self).map_err(|e| DbError::Config(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| DbError::Config(e.to_string()))?;

        info!(?path, "Front desk config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        validate_rate_bps("default_tax_rate_bps", self.billing.default_tax_rate_bps)?;
        validate_rate_bps(
            "default_service_charge_rate_bps",
            self.billing.default_service_charge_rate_bps,
        )?;

        if self.store.backend == StoreBackend::Sqlite && self.database_path().is_none() {
            return Err(DbError::Config(
                "sqlite backend needs database_path (no platform data directory found)".into(),
            ));
        }

        Ok(())
    }

    /// Applies `FRONTDESK_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("FRONTDESK_STORE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding store backend from environment");
                    self.store.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown store backend in environment"),
            }
        }

        if let Some(path) = lookup("FRONTDESK_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.store.database_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("FRONTDESK_SEED_ON_START") {
            match parse_bool(&value) {
                Some(b) => self.store.seed_on_start = b,
                None => warn!(value = %value, "Invalid FRONTDESK_SEED_ON_START"),
            }
        }

        if let Some(value) = lookup("FRONTDESK_SIMULATE_LATENCY") {
            match parse_bool(&value) {
                Some(b) => self.store.simulate_latency = b,
                None => warn!(value = %value, "Invalid FRONTDESK_SIMULATE_LATENCY"),
            }
        }

        if let Some(value) = lookup("FRONTDESK_DEFAULT_TAX_RATE_BPS") {
            match value.parse::<u32>() {
                Ok(bps) => self.billing.default_tax_rate_bps = bps,
                Err(_) => warn!(value = %value, "Invalid FRONTDESK_DEFAULT_TAX_RATE_BPS"),
            }
        }

        if let Some(value) = lookup("FRONTDESK_DEFAULT_SERVICE_CHARGE_RATE_BPS") {
            match value.parse::<u32>() {
                Ok(bps) => self.billing.default_service_charge_rate_bps = bps,
                Err(_) => {
                    warn!(value = %value, "Invalid FRONTDESK_DEFAULT_SERVICE_CHARGE_RATE_BPS")
                }
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "frontdesk", "frontdesk")
            .map(|dirs| dirs.config_dir().join("frontdesk.toml"))
    }

    /// The SQLite path: configured, or `frontdesk.db` in the data directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.store.database_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "frontdesk", "frontdesk")
                .map(|dirs| dirs.data_dir().join("frontdesk.db"))
        })
    }

    pub fn billing_defaults(&self) -> BillingDefaults {
        self.billing.defaults()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
