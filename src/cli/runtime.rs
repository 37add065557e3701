use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const LOCAL_ENV_PATH: &str = "config/local.env";
const LOCAL_CONFIG_PATH: &str = "config/locator-replay.yaml";

/// Export `KEY=value` lines from `config/local.env` unless already set
pub fn load_local_env_overrides() {
    let path = Path::new(LOCAL_ENV_PATH);
    if !path.exists() {
        return;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            for (key, value) in parse_env_lines(&contents) {
                if env::var(&key).is_err() {
                    env::set_var(key, value);
                }
            }
            info!(path = %path.display(), "Loaded environment overrides from local.env");
        }
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read local.env overrides");
        }
    }
}

fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            warn!(line = idx + 1, "invalid local.env entry; skipping");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        entries.push((key.to_string(), unquote(value.trim())));
    }
    entries
}

/// Install the subscriber. `RUST_LOG` wins over `--log-level`; `--debug`
/// forces DEBUG. Logs go to stderr so stdout stays machine readable.
pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

/// Where the configuration is read from (and written to by `config reset`)
pub fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        return Ok(path.clone());
    }

    // Priority: ./config/locator-replay.yaml > ~/.config/locator-replay/config.yaml
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);
    if local_config.exists() {
        return Ok(local_config);
    }

    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("locator-replay");
    path.push("config.yaml");
    Ok(path)
}

/// Read the config file, falling back to defaults when it does not exist
pub async fn read_config_file(path: &Path) -> Result<Option<Config>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = Config::from_yaml_str(&content)
        .with_context(|| format!("in {}", path.display()))?;
    Ok(Some(config))
}

/// Load the effective configuration.
///
/// `validate` is off for the `config` subcommands so an invalid file can
/// still be inspected, reported and reset.
pub async fn load_config(config_path: Option<&PathBuf>, validate: bool) -> Result<LoadedConfig> {
    let path = resolve_config_path(config_path)?;

    let mut config = match read_config_file(&path).await? {
        Some(config) => {
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => {
            info!("Config file not found, using defaults: {}", path.display());
            Config::default()
        }
    };

    config.apply_env_overrides()?;
    if validate {
        config.validate()?;
    }

    Ok(LoadedConfig { config, path })
}

fn unquote(value: &str) -> String {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let inner = &value[1..value.len() - 1];
        inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\t", "\t")
    } else {
        value.to_string()
    }
}
