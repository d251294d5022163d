pub mod clusters;
pub mod recommend;

use std::path::Path;

use skillsphere_engine::catalog::{load_catalog_or_sample, CatalogReaderConfig};
use skillsphere_engine::{Catalog, CatalogSource, SnapshotStore};

use crate::input::RunConfig;

/// Catalog for a command: the configured file if it can be read, the sample
/// catalog otherwise.
pub fn load_catalog(config: &RunConfig) -> Catalog {
    let path = config.catalog_path.as_deref();
    if let Some(path) = path {
        warn_on_guessed_delimiter(path, &config.engine.catalog);
    }
    let catalog = load_catalog_or_sample(path, &config.engine.catalog);

    match catalog.source() {
        CatalogSource::File(path) => log::info!("Using catalog {:?}", path),
        CatalogSource::Sample => log::info!("Using the built-in sample catalog"),
        CatalogSource::InMemory => {}
    }
    catalog.log_summary();
    catalog
}

/// Only `.tsv` selects tabs; any other extension is read as comma separated
/// unless a delimiter is configured.
fn warn_on_guessed_delimiter(path: &Path, reader: &CatalogReaderConfig) {
    if reader.delimiter.is_some() {
        return;
    }
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    if !matches!(ext.as_deref(), Some("csv") | Some("tsv")) {
        log::warn!(
            "{:?} is neither .csv nor .tsv and no delimiter is configured; reading it as comma separated",
            path
        );
    }
}

pub fn open_store(config: &RunConfig) -> SnapshotStore {
    SnapshotStore::new(load_catalog(config), config.engine.clone())
}
