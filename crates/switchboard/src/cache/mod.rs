// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag configuration caches.
//!
//! Keys come from [`FlagIdentifier::cache_key`](switchboard_core::FlagIdentifier::cache_key)
//! and are namespaced under `ff:`. Entries go stale for at most their TTL;
//! nothing here pushes invalidations between processes.

mod memory;
mod null;
mod tiered;

pub use memory::MemoryFlagCache;
pub use null::NullFlagCache;
pub use tiered::TieredFlagCache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use switchboard_core::FlagConfiguration;

use crate::error::Result;

#[async_trait]
pub trait FlagCache: Send + Sync {
	async fn get(&self, key: &str) -> Result<Option<FlagConfiguration>>;

	async fn set(&self, key: &str, config: FlagConfiguration, ttl: Duration) -> Result<()>;

	async fn remove(&self, key: &str) -> Result<()>;

	async fn clear(&self) -> Result<()>;
}

/// Type alias for a shared flag cache.
pub type SharedFlagCache = Arc<dyn FlagCache>;
