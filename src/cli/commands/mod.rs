//! CLI command handlers for GA Analytics.
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod report;
pub mod score;
pub mod validate;

use ga_analytics::config::Config;
use ga_analytics::core::store::RecordStore;
use ga_analytics::error;

/// Load the record store named by `paths.store_file`, printing any failure
pub fn load_store(config: &Config) -> Option<RecordStore> {
    let path = config.store_path();
    match RecordStore::load(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            error!("Could not load store {}: {e}", path.display());
            eprintln!("✗ {e}");
            None
        }
    }
}
