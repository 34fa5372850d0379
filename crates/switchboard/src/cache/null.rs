// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use async_trait::async_trait;
use switchboard_core::FlagConfiguration;

use super::FlagCache;
use crate::error::Result;

/// A cache that stores nothing. Every lookup goes to the repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFlagCache;

#[async_trait]
impl FlagCache for NullFlagCache {
	async fn get(&self, _key: &str) -> Result<Option<FlagConfiguration>> {
		Ok(None)
	}

	async fn set(&self, _key: &str, _config: FlagConfiguration, _ttl: Duration) -> Result<()> {
		Ok(())
	}

	async fn remove(&self, _key: &str) -> Result<()> {
		Ok(())
	}

	async fn clear(&self) -> Result<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use switchboard_core::{EvaluationModeSet, FlagIdentifier};

	#[tokio::test]
	async fn test_never_stores() {
		let cache = NullFlagCache;
		let config = FlagConfiguration::new(
			FlagIdentifier::global("f").unwrap(),
			EvaluationModeSet::enabled(),
		);
		cache
			.set("ff:f", config, Duration::from_secs(60))
			.await
			.unwrap();
		assert!(cache.get("ff:f").await.unwrap().is_none());
	}

	#[test]
	fn test_remove_and_clear_succeed() {
		let cache = NullFlagCache;
		tokio_test::block_on(async {
			cache.remove("ff:missing").await.unwrap();
			cache.clear().await.unwrap();
		});
	}
}
