//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use nearby_commerce::catalog::InMemoryCatalog;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_source: Option<PathBuf>,
    /// Catalog shared by every command.
    pub catalog: Arc<InMemoryCatalog>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_source) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };
        if let Some(ref source) = config_source {
            tracing::debug!(path = %source.display(), "loaded config");
        }

        config
            .simulation
            .validate()
            .context("Invalid [simulation] settings")?;

        let catalog = match config.catalog.path {
            Some(ref path) => {
                let base = config_dir(&cwd, config_source.as_deref());
                Self::load_catalog(&resolve(&base, path))?
            }
            None => InMemoryCatalog::seeded(),
        };

        Ok(Self {
            config,
            config_source,
            catalog: Arc::new(catalog),
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "skipping unreadable config"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Read a JSON catalog document.
    pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        InMemoryCatalog::from_json(&content)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))
    }
}

/// Directory that relative paths in the config are resolved against.
fn config_dir(cwd: &Path, config_source: Option<&Path>) -> PathBuf {
    match config_source.and_then(Path::parent) {
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    if PathBuf::from(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    }
}
