// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Switchboard flag client.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`SWITCHBOARD_*`)
//!
//! # Usage
//!
//! ```ignore
//! use switchboard_config::load_config;
//!
//! let config = load_config()?;
//! println!("local cache ttl: {}s", config.cache.local_ttl_secs);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::SwitchboardConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved Switchboard configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchboardConfig {
	pub cache: CacheConfig,
	pub provisioning: ProvisioningConfig,
	pub application: Option<ApplicationConfig>,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`SWITCHBOARD_*`)
/// 2. Config file (`/etc/switchboard/switchboard.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<SwitchboardConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<SwitchboardConfig, ConfigError> {
	let mut merged = SwitchboardConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<SwitchboardConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<SwitchboardConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SwitchboardConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: SwitchboardConfigLayer) -> Result<SwitchboardConfig, ConfigError> {
	let cache = layer.cache.unwrap_or_default().finalize();
	let provisioning = layer.provisioning.unwrap_or_default().finalize();
	let application = layer.application.and_then(|l| l.finalize());

	cache.validate()?;
	validate_config(&cache)?;

	info!(
		cache_enabled = cache.enabled,
		local_ttl_secs = cache.local_ttl_secs,
		local_capacity = cache.local_capacity,
		distributed_enabled = cache.distributed_enabled,
		provisioning_enabled = provisioning.enabled,
		default_mode = %provisioning.default_mode,
		application = application.as_ref().map(|a| a.name.as_str()).unwrap_or("<global>"),
		"Switchboard configuration loaded"
	);

	Ok(SwitchboardConfig {
		cache,
		provisioning,
		application,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(cache: &CacheConfig) -> Result<(), ConfigError> {
	if cache.distributed_enabled && !cache.enabled {
		return Err(ConfigError::Validation(
			"cache.distributed_enabled is set while cache.enabled is false. \
			 The distributed tier only runs behind the local cache; enable the cache \
			 or unset cache.distributed_enabled."
				.to_string(),
		));
	}

	Ok(())
}
