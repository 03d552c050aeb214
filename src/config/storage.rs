//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where state and the catalog live.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the cart, wishlist and order logs
    #[arg(long, env = "TROUSSEAU_STORAGE_DIR", default_value = ".trousseau", global = true)]
    pub storage_dir: PathBuf,

    /// Product catalog YAML file
    #[arg(
        long,
        env = "TROUSSEAU_CATALOG",
        default_value = "fixtures/products/catalog.yml",
        global = true
    )]
    pub catalog: PathBuf,
}
