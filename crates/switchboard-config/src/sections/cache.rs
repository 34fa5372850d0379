// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag cache configuration section.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_LOCAL_TTL_SECS: u64 = 300;
pub const DEFAULT_LOCAL_CAPACITY: usize = 1000;
pub const DEFAULT_DISTRIBUTED_TTL_SECS: u64 = 3600;

/// Allowed process-local TTL, 1 to 10 minutes.
pub const LOCAL_TTL_RANGE_SECS: RangeInclusive<u64> = 60..=600;
/// Allowed distributed TTL, 30 to 180 minutes.
pub const DISTRIBUTED_TTL_RANGE_SECS: RangeInclusive<u64> = 1800..=10800;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheConfigLayer {
	pub enabled: Option<bool>,
	pub local_ttl_secs: Option<u64>,
	pub local_capacity: Option<usize>,
	pub distributed_enabled: Option<bool>,
	pub distributed_ttl_secs: Option<u64>,
}

impl CacheConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.local_ttl_secs.is_some() {
			self.local_ttl_secs = other.local_ttl_secs;
		}
		if other.local_capacity.is_some() {
			self.local_capacity = other.local_capacity;
		}
		if other.distributed_enabled.is_some() {
			self.distributed_enabled = other.distributed_enabled;
		}
		if other.distributed_ttl_secs.is_some() {
			self.distributed_ttl_secs = other.distributed_ttl_secs;
		}
	}

	pub fn finalize(self) -> CacheConfig {
		CacheConfig {
			enabled: self.enabled.unwrap_or(true),
			local_ttl_secs: self.local_ttl_secs.unwrap_or(DEFAULT_LOCAL_TTL_SECS),
			local_capacity: self.local_capacity.unwrap_or(DEFAULT_LOCAL_CAPACITY),
			distributed_enabled: self.distributed_enabled.unwrap_or(false),
			distributed_ttl_secs: self
				.distributed_ttl_secs
				.unwrap_or(DEFAULT_DISTRIBUTED_TTL_SECS),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
	pub enabled: bool,
	pub local_ttl_secs: u64,
	pub local_capacity: usize,
	pub distributed_enabled: bool,
	pub distributed_ttl_secs: u64,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			local_ttl_secs: DEFAULT_LOCAL_TTL_SECS,
			local_capacity: DEFAULT_LOCAL_CAPACITY,
			distributed_enabled: false,
			distributed_ttl_secs: DEFAULT_DISTRIBUTED_TTL_SECS,
		}
	}
}

impl CacheConfig {
	pub fn local_ttl(&self) -> Duration {
		Duration::from_secs(self.local_ttl_secs)
	}

	pub fn distributed_ttl(&self) -> Duration {
		Duration::from_secs(self.distributed_ttl_secs)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if !LOCAL_TTL_RANGE_SECS.contains(&self.local_ttl_secs) {
			return Err(ConfigError::InvalidValue {
				key: "cache.local_ttl_secs".to_string(),
				message: format!(
					"{} is outside {}..={}",
					self.local_ttl_secs,
					LOCAL_TTL_RANGE_SECS.start(),
					LOCAL_TTL_RANGE_SECS.end()
				),
			});
		}
		if self.local_capacity == 0 {
			return Err(ConfigError::InvalidValue {
				key: "cache.local_capacity".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}
		if self.distributed_enabled && !DISTRIBUTED_TTL_RANGE_SECS.contains(&self.distributed_ttl_secs)
		{
			return Err(ConfigError::InvalidValue {
				key: "cache.distributed_ttl_secs".to_string(),
				message: format!(
					"{} is outside {}..={}",
					self.distributed_ttl_secs,
					DISTRIBUTED_TTL_RANGE_SECS.start(),
					DISTRIBUTED_TTL_RANGE_SECS.end()
				),
			});
		}
		Ok(())
	}
}
