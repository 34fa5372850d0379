// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The flag evaluation entry point.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use switchboard_config::{DefaultMode, SwitchboardConfig};
use switchboard_core::{
	EvaluationContext, EvaluationMode, EvaluationResult, FlagConfiguration, FlagIdentifier,
	FlagsError,
};
use switchboard_engine::EvaluationManager;
use tracing::{debug, info, instrument, warn};

use crate::cache::{FlagCache, MemoryFlagCache, NullFlagCache, SharedFlagCache, TieredFlagCache};
use crate::error::{Result, SwitchboardError};
use crate::hook::{EvaluationHook, FlagEvaluated, NoOpEvaluationHook, SharedEvaluationHook};
use crate::repository::FlagConfigurationRepository;
use crate::variation::decode_variation;

const PROVISIONED_DESCRIPTION: &str = "Created automatically on first evaluation";

/// Settings the builder resolves before constructing caches.
#[derive(Debug, Clone)]
struct EvaluatorSettings {
	cache_enabled: bool,
	local_ttl: Duration,
	local_capacity: usize,
	distributed_enabled: bool,
	distributed_ttl: Duration,
	auto_provision: bool,
	default_mode: EvaluationMode,
	application: Option<(String, Option<String>)>,
}

impl Default for EvaluatorSettings {
	fn default() -> Self {
		Self::from_config(&SwitchboardConfig::default())
	}
}

impl EvaluatorSettings {
	fn from_config(config: &SwitchboardConfig) -> Self {
		Self {
			cache_enabled: config.cache.enabled,
			local_ttl: config.cache.local_ttl(),
			local_capacity: config.cache.local_capacity,
			distributed_enabled: config.cache.distributed_enabled,
			distributed_ttl: config.cache.distributed_ttl(),
			auto_provision: config.provisioning.enabled,
			default_mode: match config.provisioning.default_mode {
				DefaultMode::Disabled => EvaluationMode::Disabled,
				DefaultMode::Enabled => EvaluationMode::Enabled,
			},
			application: config
				.application
				.as_ref()
				.map(|app| (app.name.clone(), app.version.clone())),
		}
	}
}

/// Builder for constructing a [`FlagEvaluator`].
pub struct FlagEvaluatorBuilder {
	repository: Option<Arc<dyn FlagConfigurationRepository>>,
	cache: Option<SharedFlagCache>,
	distributed_cache: Option<SharedFlagCache>,
	manager: Option<EvaluationManager>,
	hook: Option<SharedEvaluationHook>,
	settings: EvaluatorSettings,
}

impl FlagEvaluatorBuilder {
	pub fn new() -> Self {
		Self {
			repository: None,
			cache: None,
			distributed_cache: None,
			manager: None,
			hook: None,
			settings: EvaluatorSettings::default(),
		}
	}

	/// Applies a loaded [`SwitchboardConfig`]. Later builder calls override it.
	pub fn config(mut self, config: &SwitchboardConfig) -> Self {
		self.settings = EvaluatorSettings::from_config(config);
		self
	}

	/// Sets the system of record for flag configurations. Required.
	pub fn repository<R: FlagConfigurationRepository + 'static>(mut self, repository: R) -> Self {
		self.repository = Some(Arc::new(repository));
		self
	}

	pub fn shared_repository(mut self, repository: Arc<dyn FlagConfigurationRepository>) -> Self {
		self.repository = Some(repository);
		self
	}

	/// Replaces the cache built from configuration.
	pub fn cache<C: FlagCache + 'static>(mut self, cache: C) -> Self {
		self.cache = Some(Arc::new(cache));
		self
	}

	/// Adds a shared cache behind the process-local one.
	///
	/// Ignored when [`cache`](Self::cache) supplies the cache directly.
	pub fn distributed_cache<C: FlagCache + 'static>(mut self, cache: C) -> Self {
		self.distributed_cache = Some(Arc::new(cache));
		self.settings.distributed_enabled = true;
		self
	}

	/// TTL for entries in the process-local cache.
	///
	/// With a distributed cache this caps the local tier only; entries are
	/// written through with [`distributed_cache_ttl`](Self::distributed_cache_ttl).
	pub fn cache_ttl(mut self, ttl: Duration) -> Self {
		self.settings.local_ttl = ttl;
		self
	}

	/// TTL for entries written to the distributed cache.
	pub fn distributed_cache_ttl(mut self, ttl: Duration) -> Self {
		self.settings.distributed_ttl = ttl;
		self
	}

	/// Disables caching entirely.
	pub fn without_cache(mut self) -> Self {
		self.settings.cache_enabled = false;
		self
	}

	/// Whether unknown flags are created in the repository on first evaluation.
	pub fn auto_provision(mut self, enabled: bool) -> Self {
		self.settings.auto_provision = enabled;
		self
	}

	/// Initial state for flags this evaluator provisions; `Disabled` or `Enabled`.
	pub fn default_mode(mut self, mode: EvaluationMode) -> Self {
		self.settings.default_mode = mode;
		self
	}

	/// Scopes flag keys to an application, optionally to one version.
	pub fn application(mut self, name: impl Into<String>, version: Option<String>) -> Self {
		self.settings.application = Some((name.into(), version));
		self
	}

	pub fn evaluation_manager(mut self, manager: EvaluationManager) -> Self {
		self.manager = Some(manager);
		self
	}

	/// Sets a hook notified after every evaluation.
	pub fn evaluation_hook<H: EvaluationHook>(mut self, hook: H) -> Self {
		self.hook = Some(Arc::new(hook));
		self
	}

	pub fn build(self) -> Result<FlagEvaluator> {
		let repository = self.repository.ok_or_else(|| {
			SwitchboardError::InvalidConfig("a flag configuration repository is required".to_string())
		})?;

		let settings = self.settings;
		if !settings.default_mode.is_terminal() {
			return Err(SwitchboardError::InvalidConfig(format!(
				"default mode must be disabled or enabled, got {}",
				settings.default_mode
			)));
		}
		if let Some((name, _)) = &settings.application {
			if name.trim().is_empty() {
				return Err(SwitchboardError::InvalidConfig(
					"application name must not be empty".to_string(),
				));
			}
		}

		let (cache, cache_ttl) = match self.cache {
			Some(cache) => (cache, settings.local_ttl),
			None if !settings.cache_enabled => {
				let null: SharedFlagCache = Arc::new(NullFlagCache);
				(null, settings.local_ttl)
			}
			None => {
				let local: SharedFlagCache = Arc::new(MemoryFlagCache::new(settings.local_capacity));
				match self.distributed_cache {
					Some(distributed) if settings.distributed_enabled => {
						let tiered: SharedFlagCache =
							Arc::new(TieredFlagCache::new(local, distributed, settings.local_ttl));
						(tiered, settings.distributed_ttl)
					}
					_ => (local, settings.local_ttl),
				}
			}
		};

		debug!(
			auto_provision = settings.auto_provision,
			default_mode = %settings.default_mode,
			cache_ttl_secs = cache_ttl.as_secs(),
			"flag evaluator built"
		);

		Ok(FlagEvaluator {
			repository,
			cache,
			cache_ttl,
			manager: Arc::new(self.manager.unwrap_or_default()),
			hook: self.hook.unwrap_or_else(|| Arc::new(NoOpEvaluationHook)),
			auto_provision: settings.auto_provision,
			default_mode: settings.default_mode,
			application: settings.application,
		})
	}
}

impl Default for FlagEvaluatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Evaluates flags by key.
///
/// Configurations are read through the cache, falling back to the repository.
/// Unknown flags resolve to the default mode and, when auto-provisioning is
/// on, are created in the repository. Repository and cache failures never
/// fail an evaluation; only precondition violations are returned as errors.
#[derive(Clone)]
pub struct FlagEvaluator {
	repository: Arc<dyn FlagConfigurationRepository>,
	cache: SharedFlagCache,
	cache_ttl: Duration,
	manager: Arc<EvaluationManager>,
	hook: SharedEvaluationHook,
	auto_provision: bool,
	default_mode: EvaluationMode,
	application: Option<(String, Option<String>)>,
}

impl FlagEvaluator {
	pub fn builder() -> FlagEvaluatorBuilder {
		FlagEvaluatorBuilder::new()
	}

	/// Builds the identifier for `key` in this evaluator's scope.
	pub fn identifier(&self, key: &str) -> Result<FlagIdentifier> {
		let identifier = match &self.application {
			Some((name, version)) => FlagIdentifier::application(key, name.as_str(), version.clone())?,
			None => FlagIdentifier::global(key)?,
		};
		Ok(identifier)
	}

	/// Evaluates `key`, provisioning it with the configured default mode if unknown.
	#[instrument(skip(self, ctx), fields(flag_key = %key))]
	pub async fn evaluate(&self, key: &str, ctx: &EvaluationContext) -> Result<EvaluationResult> {
		self.evaluate_with_default(key, self.default_mode, ctx).await
	}

	/// Evaluates `key`; an unknown flag is provisioned in `default_mode`.
	#[instrument(skip(self, ctx), fields(flag_key = %key))]
	pub async fn evaluate_with_default(
		&self,
		key: &str,
		default_mode: EvaluationMode,
		ctx: &EvaluationContext,
	) -> Result<EvaluationResult> {
		let identifier = self.identifier(key)?;
		let (result, _) = self.evaluate_inner(&identifier, default_mode, ctx).await?;
		Ok(result)
	}

	/// Evaluates an explicitly scoped identifier, ignoring the configured application.
	#[instrument(skip(self, ctx), fields(flag_key = %identifier.key()))]
	pub async fn evaluate_identifier(
		&self,
		identifier: &FlagIdentifier,
		ctx: &EvaluationContext,
	) -> Result<EvaluationResult> {
		identifier.validate()?;
		let (result, _) = self
			.evaluate_inner(identifier, self.default_mode, ctx)
			.await?;
		Ok(result)
	}

	pub async fn is_enabled(&self, key: &str, ctx: &EvaluationContext) -> Result<bool> {
		Ok(self.evaluate(key, ctx).await?.is_enabled())
	}

	/// Returns the value of the selected variation, or `default`.
	///
	/// `default` is returned when the flag is disabled, its variation has no
	/// value, the value cannot be decoded into `T`, or evaluation fails.
	#[instrument(skip(self, default, ctx), fields(flag_key = %key))]
	pub async fn get_variation<T: DeserializeOwned>(
		&self,
		key: &str,
		default: T,
		ctx: &EvaluationContext,
	) -> T {
		let identifier = match self.identifier(key) {
			Ok(identifier) => identifier,
			Err(e) => {
				warn!(error = %e, "invalid flag key, using default");
				return default;
			}
		};

		let (result, config) = match self.evaluate_inner(&identifier, self.default_mode, ctx).await
		{
			Ok(evaluated) => evaluated,
			Err(e) => {
				warn!(error = %e, "flag evaluation failed, using default");
				return default;
			}
		};

		if !result.is_enabled() {
			return default;
		}

		let Some(value) = config.variations.get(result.variation()) else {
			warn!(
				variation = %result.variation(),
				"variation has no value, using default"
			);
			return default;
		};

		match decode_variation(value) {
			Ok(decoded) => decoded,
			Err(e) => {
				warn!(
					variation = %result.variation(),
					error = %e,
					"failed to decode variation value, using default"
				);
				default
			}
		}
	}

	/// Drops the cached configuration for `key`.
	pub async fn invalidate(&self, key: &str) -> Result<()> {
		let identifier = self.identifier(key)?;
		self.cache.remove(&identifier.cache_key()).await
	}

	/// Drops every cached configuration.
	pub async fn invalidate_all(&self) -> Result<()> {
		self.cache.clear().await
	}

	async fn evaluate_inner(
		&self,
		identifier: &FlagIdentifier,
		default_mode: EvaluationMode,
		ctx: &EvaluationContext,
	) -> Result<(EvaluationResult, FlagConfiguration)> {
		if !default_mode.is_terminal() {
			return Err(FlagsError::InvalidModeSet(format!(
				"default mode must be disabled or enabled, got {}",
				default_mode
			))
			.into());
		}

		let cache_key = identifier.cache_key();
		let found = match self.cache.get(&cache_key).await {
			Ok(Some(config)) => {
				debug!(cache_key = %cache_key, "flag cache hit");
				Some(config)
			}
			Ok(None) => self.load(identifier, &cache_key).await,
			Err(e) => {
				warn!(cache_key = %cache_key, error = %e, "flag cache read failed");
				self.load(identifier, &cache_key).await
			}
		};

		let (result, config) = match found {
			Some(config) => (self.manager.evaluate(&config, ctx)?, config),
			None => {
				let config = self.provision(identifier, default_mode, &cache_key).await;
				let result = self
					.manager
					.evaluate(&config, ctx)?
					.with_reason(format!("flag not found, provisioned as {}", default_mode))
					.with_metadata("provisioned", json!(true));
				(result, config)
			}
		};

		self.hook
			.on_flag_evaluated(FlagEvaluated::new(identifier, ctx, &result))
			.await;
		Ok((result, config))
	}

	/// Repository read. Failures are logged and read as not found.
	async fn load(&self, identifier: &FlagIdentifier, cache_key: &str) -> Option<FlagConfiguration> {
		match self.repository.get(identifier).await {
			Ok(Some(config)) => {
				if let Err(e) = self
					.cache
					.set(cache_key, config.clone(), self.cache_ttl)
					.await
				{
					warn!(cache_key = %cache_key, error = %e, "failed to cache flag configuration");
				}
				Some(config)
			}
			Ok(None) => None,
			Err(e) => {
				warn!(flag = %identifier, error = %e, "flag repository read failed, treating as not found");
				None
			}
		}
	}

	/// Returns the configuration this call evaluates for an unknown flag.
	///
	/// The repository write is best effort: a failure is logged and the next
	/// miss tries again.
	async fn provision(
		&self,
		identifier: &FlagIdentifier,
		default_mode: EvaluationMode,
		cache_key: &str,
	) -> FlagConfiguration {
		let name = identifier.key();
		let local = FlagConfiguration::provisioned(
			identifier.clone(),
			default_mode,
			name,
			PROVISIONED_DESCRIPTION,
		);

		if !self.auto_provision {
			debug!(flag = %identifier, "flag not found, auto-provisioning disabled");
			return local;
		}

		match self
			.repository
			.create(identifier, default_mode, name, PROVISIONED_DESCRIPTION)
			.await
		{
			Ok(created) => {
				info!(flag = %identifier, mode = %default_mode, "auto-provisioned flag");
				if let Err(e) = self.cache.set(cache_key, created, self.cache_ttl).await {
					warn!(cache_key = %cache_key, error = %e, "failed to cache provisioned flag");
				}
			}
			Err(e) => {
				warn!(flag = %identifier, error = %e, "failed to auto-provision flag");
			}
		}
		local
	}
}
