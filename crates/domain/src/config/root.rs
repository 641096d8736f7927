use super::{
    ClusterConfig, CompilerConfig, ConfigError, LoggingConfig, PollConfig, SandboxConfig,
    TargetedConfig,
};
use crate::validators::{validate_label, validate_subdomain};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub targeted: TargetedConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values passed on the command line take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub namespace: Option<String>,
    pub cluster_domain: Option<String>,
    pub api_server: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from `config_path` (or defaults when absent) and
    /// apply CLI overrides on top.
    pub fn load(
        config_path: Option<&str>,
        cli_overrides: CliOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(Path::new(path)).map_err(|e| ConfigError::FileRead {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(path, &content)
    }

    pub fn from_toml(origin: &str, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(namespace) = overrides.namespace {
            self.cluster.namespace = namespace;
        }
        if let Some(domain) = overrides.cluster_domain {
            self.cluster.cluster_domain = domain;
        }
        if let Some(api_server) = overrides.api_server {
            self.cluster.api_server = api_server;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let api = &self.cluster.api_server;
        if !api.starts_with("http://") && !api.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "cluster.api_server must start with http:// or https://, got '{api}'"
            )));
        }
        if self.cluster.token.is_some() && self.cluster.token_file.is_some() {
            return Err(ConfigError::Validation(
                "cluster.token and cluster.token_file are mutually exclusive".to_string(),
            ));
        }
        if self.cluster.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "cluster.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        validate_label(&self.cluster.namespace, "cluster.namespace")
            .map_err(ConfigError::Validation)?;
        validate_subdomain(
            self.cluster
                .cluster_domain
                .strip_suffix('.')
                .unwrap_or(&self.cluster.cluster_domain),
            "cluster.cluster_domain",
        )
        .map_err(ConfigError::Validation)?;

        if self.poll.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.poll.timeout_secs < self.poll.interval_secs {
            return Err(ConfigError::Validation(format!(
                "poll.timeout_secs ({}) must not be shorter than poll.interval_secs ({})",
                self.poll.timeout_secs, self.poll.interval_secs
            )));
        }

        if self.compiler.transports.is_empty() {
            return Err(ConfigError::Validation(
                "compiler.transports must name at least one transport".to_string(),
            ));
        }
        if self.compiler.iterations == 0 || self.targeted.iterations == 0 {
            return Err(ConfigError::Validation(
                "compiler.iterations and targeted.iterations must be greater than 0".to_string(),
            ));
        }

        self.validate_sandbox()?;

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level '{}' is not one of trace, debug, info, warn, error",
                self.logging.level
            )));
        }

        Ok(())
    }

    fn validate_sandbox(&self) -> Result<(), ConfigError> {
        let sandbox = &self.sandbox;
        if sandbox.ready_poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sandbox.ready_poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        let dir = &sandbox.results_dir;
        let dir_ok = dir.starts_with('/')
            && dir.len() > 1
            && !dir.ends_with('/')
            && dir
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'));
        if !dir_ok {
            return Err(ConfigError::Validation(format!(
                "sandbox.results_dir '{dir}' must be an absolute path without a trailing slash"
            )));
        }
        if sandbox.variants.is_empty() {
            return Err(ConfigError::Validation(
                "sandbox.variants must list at least one variant image".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for variant in &sandbox.variants {
            validate_label(&variant.name, "sandbox.variants.name")
                .map_err(ConfigError::Validation)?;
            if variant.image.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "sandbox variant '{}' has no image",
                    variant.name
                )));
            }
            if !seen.insert(variant.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "sandbox variant '{}' is listed twice",
                    variant.name
                )));
            }
        }
        Ok(())
    }
}
