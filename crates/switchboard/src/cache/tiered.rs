// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Two-level cache: a short-lived local cache in front of a shared one.

use std::time::Duration;

use async_trait::async_trait;
use switchboard_core::FlagConfiguration;
use tracing::{trace, warn};

use super::{FlagCache, SharedFlagCache};
use crate::error::Result;

/// Reads check `local` then `distributed`; a distributed hit is copied into
/// `local`. Writes go to `distributed` first, then `local` with a TTL capped
/// at `local_ttl`.
///
/// Distributed failures on the read path are logged and treated as a miss.
pub struct TieredFlagCache {
	local: SharedFlagCache,
	distributed: SharedFlagCache,
	local_ttl: Duration,
}

impl TieredFlagCache {
	pub fn new(local: SharedFlagCache, distributed: SharedFlagCache, local_ttl: Duration) -> Self {
		Self {
			local,
			distributed,
			local_ttl,
		}
	}

	pub fn local_ttl(&self) -> Duration {
		self.local_ttl
	}
}

#[async_trait]
impl FlagCache for TieredFlagCache {
	async fn get(&self, key: &str) -> Result<Option<FlagConfiguration>> {
		match self.local.get(key).await {
			Ok(Some(config)) => {
				trace!(cache_key = %key, "local cache hit");
				return Ok(Some(config));
			}
			Ok(None) => {}
			Err(e) => warn!(cache_key = %key, error = %e, "local cache read failed"),
		}

		match self.distributed.get(key).await {
			Ok(Some(config)) => {
				trace!(cache_key = %key, "distributed cache hit");
				if let Err(e) = self.local.set(key, config.clone(), self.local_ttl).await {
					warn!(cache_key = %key, error = %e, "failed to populate local cache");
				}
				Ok(Some(config))
			}
			Ok(None) => Ok(None),
			Err(e) => {
				warn!(cache_key = %key, error = %e, "distributed cache read failed");
				Ok(None)
			}
		}
	}

	async fn set(&self, key: &str, config: FlagConfiguration, ttl: Duration) -> Result<()> {
		let distributed = self.distributed.set(key, config.clone(), ttl).await;
		self.local.set(key, config, ttl.min(self.local_ttl)).await?;
		distributed
	}

	async fn remove(&self, key: &str) -> Result<()> {
		let distributed = self.distributed.remove(key).await;
		self.local.remove(key).await?;
		distributed
	}

	async fn clear(&self) -> Result<()> {
		let distributed = self.distributed.clear().await;
		self.local.clear().await?;
		distributed
	}
}
