// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SwitchboardConfigLayer;
use crate::sections::{
	ApplicationConfigLayer, CacheConfigLayer, DefaultMode, ProvisioningConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SwitchboardConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SwitchboardConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SwitchboardConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/switchboard/switchboard.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SwitchboardConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SwitchboardConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SwitchboardConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: SWITCHBOARD_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SwitchboardConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(SwitchboardConfigLayer {
			cache: Some(load_cache_from_env()?),
			provisioning: Some(load_provisioning_from_env()?),
			application: Some(load_application_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parsed<T>(name: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
{
	match env_var(name) {
		Some(v) => parse_value(name, &v).map(Some),
		None => Ok(None),
	}
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
	value.trim().parse().map_err(|_| ConfigError::InvalidValue {
		key: name.to_string(),
		message: format!(
			"invalid {} value '{value}'",
			std::any::type_name::<T>()
		),
	})
}

fn load_cache_from_env() -> Result<CacheConfigLayer, ConfigError> {
	Ok(CacheConfigLayer {
		enabled: env_bool("SWITCHBOARD_CACHE_ENABLED"),
		local_ttl_secs: env_parsed("SWITCHBOARD_CACHE_LOCAL_TTL_SECS")?,
		local_capacity: env_parsed("SWITCHBOARD_CACHE_LOCAL_CAPACITY")?,
		distributed_enabled: env_bool("SWITCHBOARD_CACHE_DISTRIBUTED_ENABLED"),
		distributed_ttl_secs: env_parsed("SWITCHBOARD_CACHE_DISTRIBUTED_TTL_SECS")?,
	})
}

fn load_provisioning_from_env() -> Result<ProvisioningConfigLayer, ConfigError> {
	Ok(ProvisioningConfigLayer {
		enabled: env_bool("SWITCHBOARD_PROVISIONING_ENABLED"),
		default_mode: env_parsed::<DefaultMode>("SWITCHBOARD_PROVISIONING_DEFAULT_MODE")?,
	})
}

fn load_application_from_env() -> ApplicationConfigLayer {
	ApplicationConfigLayer {
		name: env_var("SWITCHBOARD_APPLICATION_NAME"),
		version: env_var("SWITCHBOARD_APPLICATION_VERSION"),
	}
}
