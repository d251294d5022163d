use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use skillsphere_engine::config::{EngineConfig, InitMethod};

/// Everything a command needs: where the catalog lives and how the engine
/// is tuned.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RunConfig {
    pub version: String,
    pub catalog_path: Option<PathBuf>,
    #[serde(flatten)]
    pub engine: EngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            version: clap::crate_version!().to_string(),
            catalog_path: None,
            engine: EngineConfig::default(),
        }
    }

    /// Read a JSON config file. Missing or invalid fields keep their
    /// defaults and are reported as warnings.
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Config file is not valid JSON: {:?}", config_path))?;
        let mut config = RunConfig::new();

        macro_rules! load_or_default {
            ($($path:ident).+ => $key:literal) => {
                if let Some(val) = partial.get($key) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$($path).+ = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            $key, config.$($path).+
                        );
                    }
                } else {
                    log::debug!(
                        "Config Missing field '{}', using default: {:?}",
                        $key, config.$($path).+
                    );
                }
            };
        }

        load_or_default!(catalog_path => "catalog_path");
        load_or_default!(engine.n_clusters => "n_clusters");
        load_or_default!(engine.recommend_limit => "recommend_limit");
        load_or_default!(engine.kmeans => "kmeans");
        load_or_default!(engine.descriptor => "descriptor");
        load_or_default!(engine.catalog => "catalog");

        Ok(config)
    }

    /// Load the optional `--config` file, then apply command-line overrides.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match arg::<PathBuf>(matches, "config") {
            Some(path) => {
                log::info!("Using config: {:?}", path);
                RunConfig::from_file(&path)?
            }
            None => RunConfig::new(),
        };

        if let Some(catalog) = arg::<PathBuf>(matches, "catalog") {
            config.catalog_path = Some(catalog);
        }
        if let Some(limit) = arg::<usize>(matches, "limit") {
            config.engine.recommend_limit = limit;
        }
        if let Some(k) = arg::<usize>(matches, "k") {
            config.engine.n_clusters = k;
        }
        if let Some(seed) = arg::<u64>(matches, "seed") {
            config.engine.kmeans.seed = seed;
        }
        if let Some(n_init) = arg::<usize>(matches, "n_init") {
            config.engine.kmeans.n_init = n_init;
        }
        if let Some(init) = arg::<String>(matches, "init") {
            config.engine.kmeans.init = init.parse::<InitMethod>().map_err(anyhow::Error::msg)?;
        }

        Ok(config)
    }
}

/// Value of an optional argument, or `None` when the subcommand does not
/// define it or it was not given.
pub fn arg<T>(matches: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}
