use std::env;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::controller::ControllerConfig;
use super::logging::LoggingConfig;
use crate::verifiers::VerifierConfig;

/// Env var naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PERSONALCHAT_CONFIG";
/// Prefix for env overrides, e.g. `PERSONALCHAT_BIND_ADDRESS`.
pub const ENV_PREFIX: &str = "PERSONALCHAT_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct ConfigV1 {
    pub verifier: VerifierConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    pub bind_address: String,
    pub logging: LoggingConfig,
}

/// Extract a `ConfigV1` out of an already assembled figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Load config from `config.yaml` (or `$PERSONALCHAT_CONFIG`), with env overrides.
pub fn load_config() -> ConfigV1 {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.yaml".to_string());
    let figment = Figment::new()
        .merge(Yaml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

    match extract_config(figment) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration from '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
