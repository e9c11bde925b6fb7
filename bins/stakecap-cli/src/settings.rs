//! Layered configuration for the `stakecap` binary.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! `STAKECAP__`-prefixed environment variables (`__` separates nested keys,
//! e.g. `STAKECAP__PARAMS__K=250`), then command-line flags applied by the
//! caller. The merged result is validated once before any command runs.

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment, File, Map};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};

use stakecap_core::error::StakecapError;
use stakecap_core::types::{
    EconomicParameters, GraphSettings, RewardsMode, SaturationMode, ZoomLevel,
};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "STAKECAP";
const ENV_SEPARATOR: &str = "__";

/// Everything a command needs besides its own arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub params: EconomicParameters,
    pub graph: GraphSettings,
    /// Viewport preset; replaces `graph` when set.
    pub zoom: Option<ZoomLevel>,
    pub saturation: SaturationMode,
    pub rewards: RewardsMode,
    /// Default pool dataset for commands that take `--pools`.
    pub pools: Option<PathBuf>,
    pub log_level: String,
    pub log_format: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            params: EconomicParameters::default(),
            graph: GraphSettings::default(),
            zoom: None,
            saturation: SaturationMode::default(),
            rewards: RewardsMode::default(),
            pools: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl CliConfig {
    /// `<config_dir>/stakecap/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stakecap").join("config.toml"))
    }

    /// Load from `path` (which must exist) or the optional default file, then
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, StakecapError> {
        Self::load_with_env(path, None)
    }

    /// Like [`CliConfig::load`], reading variables from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, StakecapError> {
        let builder = with_file(Config::builder(), path).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );
        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| StakecapError::Config(e.to_string()))
    }

    /// Effective plotting viewport.
    pub fn graph(&self) -> GraphSettings {
        self.zoom.map_or(self.graph, GraphSettings::from_zoom)
    }

    pub fn validate(&self) -> Result<(), StakecapError> {
        self.params.validate()?;
        self.graph().validate()?;
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(StakecapError::Config(format!(
                "log_format must be \"text\" or \"json\", got {:?}",
                self.log_format
            )));
        }
        Ok(())
    }
}

fn with_file(builder: ConfigBuilder<DefaultState>, path: Option<&Path>) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => match CliConfig::default_path() {
            Some(path) => builder.add_source(File::from(path).required(false)),
            None => builder,
        },
    }
}
