use std::path::Path;

use crate::cli::context::CliContext;
use crate::cli::output::{print_json, OutputFormat};
use crate::cli::runtime::read_config_file;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value as JsonValue};
use tokio::fs;
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print one value, e.g. `executor.element_wait_ms`
    Get {
        /// Dotted configuration key
        key: String,
    },

    /// Update one value in the configuration file
    Set {
        /// Dotted configuration key
        key: String,

        /// New value (parsed as JSON, else taken as a string)
        value: String,
    },

    /// Validate the configuration file
    Validate,

    /// Write the defaults to the configuration file
    Reset,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let path = ctx.config_path();
    match args.action {
        ConfigAction::Show => match output {
            OutputFormat::Json => print_json(ctx.config())?,
            OutputFormat::Human => {
                println!("Effective configuration ({}):", path.display());
                print!("{}", serde_yaml::to_string(ctx.config())?);
            }
        },
        ConfigAction::Get { key } => {
            let json = serde_json::to_value(ctx.config())?;
            let segments = split_key(&key)?;
            let Some(value) = get_json_value(&json, &segments) else {
                bail!("{} not found in configuration", key);
            };
            match output {
                OutputFormat::Json => print_json(value)?,
                OutputFormat::Human => print!("{}", serde_yaml::to_string(value)?),
            }
        }
        ConfigAction::Set { key, value } => {
            let config = read_config_file(path).await?.unwrap_or_default();
            let mut json = serde_json::to_value(&config)?;
            let segments = split_key(&key)?;
            set_json_value(&mut json, &segments, parse_cli_value(&value))?;
            let updated: Config = serde_json::from_value(json)
                .with_context(|| format!("{} cannot be set to '{}'", key, value))?;
            updated.validate()?;
            save_config_file(path, &updated).await?;
            info!(%key, "Updated configuration key");
            println!("Saved configuration to {}", path.display());
        }
        ConfigAction::Validate => match read_config_file(path).await? {
            Some(config) => {
                config
                    .validate()
                    .with_context(|| format!("validating {}", path.display()))?;
                println!("Configuration file {} is valid", path.display());
            }
            None => {
                println!(
                    "No configuration file at {}; defaults are valid",
                    path.display()
                );
            }
        },
        ConfigAction::Reset => {
            save_config_file(path, &Config::default()).await?;
            println!(
                "Configuration reset to defaults and written to {}",
                path.display()
            );
        }
    }

    Ok(())
}

async fn save_config_file(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let serialized = serde_yaml::to_string(config)?;
    fs::write(path, serialized)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn parse_cli_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

fn split_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        bail!("configuration key cannot be empty");
    }
    Ok(segments)
}

fn set_json_value(target: &mut JsonValue, path: &[&str], value: JsonValue) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        bail!("configuration key cannot be empty");
    };
    let mut current = target;
    let mut owner = "configuration root";
    for segment in parents {
        current = ensure_object(current, owner)?
            .entry((*segment).to_string())
            .or_insert(JsonValue::Null);
        owner = segment;
    }
    ensure_object(current, owner)?.insert((*last).to_string(), value);
    Ok(())
}

fn ensure_object<'a>(
    value: &'a mut JsonValue,
    segment: &str,
) -> Result<&'a mut Map<String, JsonValue>> {
    if value.is_null() {
        *value = JsonValue::Object(Map::new());
    }
    match value {
        JsonValue::Object(map) => Ok(map),
        _ => bail!("{} is not a section; cannot assign nested keys", segment),
    }
}

fn get_json_value<'a>(value: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    path.iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}
