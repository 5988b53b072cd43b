use nomad_shared::Accommodation;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_storage_path() -> String { "data".into() }
fn default_redis_url() -> String { "redis://127.0.0.1:6379".into() }
fn default_key_prefix() -> String { "nomad:".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            redis_url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_min_price")]
    pub min_price: u32,
    #[serde(default = "default_max_price")]
    pub max_price: u32,
    /// Fixes the simulated prices; random per process when unset.
    pub price_seed: Option<u64>,
}

fn default_catalog_path() -> String { "config/ciudades-del-mundo.json".into() }
fn default_min_price() -> u32 { 500 }
fn default_max_price() -> u32 { 2000 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            min_price: default_min_price(),
            max_price: default_max_price(),
            price_seed: None,
        }
    }
}

/// Checkout pricing, in whole euros.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BusinessRules {
    #[serde(default = "default_hostel_rate")]
    pub hostel_per_night: u32,
    #[serde(default = "default_hotel3_rate")]
    pub hotel3_per_night: u32,
    #[serde(default = "default_hotel4_rate")]
    pub hotel4_per_night: u32,
    #[serde(default = "default_hotel5_rate")]
    pub hotel5_per_night: u32,
    #[serde(default = "default_extra_traveler")]
    pub extra_traveler_per_night: u32,
    #[serde(default = "default_pet_fee")]
    pub pet_fee_per_night: u32,
    /// Used when the destination snapshot carries no price.
    #[serde(default = "default_base_price")]
    pub default_base_price: u32,
}

fn default_hostel_rate() -> u32 { 50 }
fn default_hotel3_rate() -> u32 { 80 }
fn default_hotel4_rate() -> u32 { 120 }
fn default_hotel5_rate() -> u32 { 200 }
fn default_extra_traveler() -> u32 { 50 }
fn default_pet_fee() -> u32 { 25 }
fn default_base_price() -> u32 { 500 }

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            hostel_per_night: default_hostel_rate(),
            hotel3_per_night: default_hotel3_rate(),
            hotel4_per_night: default_hotel4_rate(),
            hotel5_per_night: default_hotel5_rate(),
            extra_traveler_per_night: default_extra_traveler(),
            pet_fee_per_night: default_pet_fee(),
            default_base_price: default_base_price(),
        }
    }
}

impl BusinessRules {
    pub fn nightly_rate(&self, tier: Accommodation) -> u32 {
        match tier {
            Accommodation::Hostel => self.hostel_per_night,
            Accommodation::Hotel3 => self.hotel3_per_night,
            Accommodation::Hotel4 => self.hotel4_per_night,
            Accommodation::Hotel5 => self.hotel5_per_night,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_seed_demo_users")]
    pub seed_demo_users: bool,
}

fn default_seed_demo_users() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self { seed_demo_users: default_seed_demo_users() }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Every field has a default, so all files are optional
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `NOMAD__STORAGE__BACKEND=file`
            .add_source(config::Environment::with_prefix("NOMAD").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
