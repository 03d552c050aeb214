//! CLI configuration module

use clap::Args;

use crate::config::{observability::LoggingConfig, shop::ShopConfig, storage::StorageConfig};

pub(crate) mod observability;
pub(crate) mod shop;
pub(crate) mod storage;

pub(crate) use observability::LogFormat;

/// Settings shared by every command.
#[derive(Debug, Args)]
pub(crate) struct Config {
    /// Local storage and catalog locations.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Shop details and billing rules.
    #[command(flatten)]
    pub shop: ShopConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
