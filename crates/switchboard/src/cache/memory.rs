// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-local flag cache with TTL and bounded size.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use switchboard_core::FlagConfiguration;
use tokio::time::Instant;
use tracing::trace;

use super::FlagCache;
use crate::error::Result;

#[derive(Debug, Clone)]
struct CacheEntry {
	config: FlagConfiguration,
	expires_at: Instant,
}

impl CacheEntry {
	fn is_expired(&self, now: Instant) -> bool {
		now >= self.expires_at
	}
}

/// Bounded in-memory cache over a sharded concurrent map.
///
/// Lookups and writes lock a single shard. When a new key arrives at
/// capacity, expired entries are dropped first, then the entry closest to
/// expiry. Concurrent inserts may overshoot the capacity briefly. Clones
/// share storage.
#[derive(Debug, Clone)]
pub struct MemoryFlagCache {
	entries: Arc<DashMap<String, CacheEntry>>,
	capacity: usize,
}

impl MemoryFlagCache {
	pub fn new(capacity: usize) -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
			capacity: capacity.max(1),
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Number of stored entries, including expired ones not yet purged.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn make_room(&self, now: Instant) {
		self.entries.retain(|_, entry| !entry.is_expired(now));
		if self.entries.len() < self.capacity {
			return;
		}

		let soonest = self
			.entries
			.iter()
			.min_by_key(|entry| entry.value().expires_at)
			.map(|entry| entry.key().clone());
		if let Some(key) = soonest {
			trace!(cache_key = %key, "evicting flag closest to expiry");
			self.entries.remove(&key);
		}
	}
}

impl Default for MemoryFlagCache {
	fn default() -> Self {
		Self::new(1000)
	}
}

#[async_trait]
impl FlagCache for MemoryFlagCache {
	async fn get(&self, key: &str) -> Result<Option<FlagConfiguration>> {
		let now = Instant::now();
		let cached = self.entries.get(key).map(|entry| entry.value().clone());
		match cached {
			Some(entry) if !entry.is_expired(now) => Ok(Some(entry.config)),
			Some(_) => {
				self.entries
					.remove_if(key, |_, entry| entry.is_expired(now));
				Ok(None)
			}
			None => Ok(None),
		}
	}

	async fn set(&self, key: &str, config: FlagConfiguration, ttl: Duration) -> Result<()> {
		if ttl.is_zero() {
			return Ok(());
		}

		let now = Instant::now();
		if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
			self.make_room(now);
		}

		self.entries.insert(
			key.to_string(),
			CacheEntry {
				config,
				expires_at: now + ttl,
			},
		);
		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<()> {
		self.entries.remove(key);
		Ok(())
	}

	async fn clear(&self) -> Result<()> {
		self.entries.clear();
		Ok(())
	}
}
