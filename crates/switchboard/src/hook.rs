// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hooks notified after each flag evaluation.
//!
//! Use an [`EvaluationHook`] to record exposures for experiment analysis or
//! to audit which rule decided a flag. The `context_hash` on
//! [`FlagEvaluated`] is stable for identical contexts, so sinks can
//! deduplicate repeated exposures.
//!
//! # Example
//!
//! ```ignore
//! use switchboard::{EvaluationHook, FlagEvaluated, FlagEvaluator};
//! use async_trait::async_trait;
//!
//! struct ExposureLog;
//!
//! #[async_trait]
//! impl EvaluationHook for ExposureLog {
//!     async fn on_flag_evaluated(&self, event: FlagEvaluated) {
//!         println!("{} -> {} ({})", event.flag_key, event.variation, event.reason);
//!     }
//! }
//!
//! let evaluator = FlagEvaluator::builder()
//!     .repository(my_repository)
//!     .evaluation_hook(ExposureLog)
//!     .build()?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::{EvaluationContext, EvaluationResult, FlagIdentifier};

/// Data captured when a flag is evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagEvaluated {
	pub flag_key: String,
	/// Application the flag is scoped to, `None` for global flags.
	pub application: Option<String>,
	pub is_enabled: bool,
	pub variation: String,
	pub reason: String,
	pub user_id: Option<String>,
	pub tenant_id: Option<String>,
	/// Hex SHA-256 of the flag key and context, for deduplication.
	pub context_hash: String,
	pub timestamp: DateTime<Utc>,
}

impl FlagEvaluated {
	pub fn new(
		identifier: &FlagIdentifier,
		ctx: &EvaluationContext,
		result: &EvaluationResult,
	) -> Self {
		Self {
			flag_key: identifier.key().to_string(),
			application: identifier.application_name().map(str::to_string),
			is_enabled: result.is_enabled(),
			variation: result.variation().to_string(),
			reason: result.reason().to_string(),
			user_id: ctx.user().map(str::to_string),
			tenant_id: ctx.tenant().map(str::to_string),
			context_hash: ctx.fingerprint(identifier.key()),
			timestamp: Utc::now(),
		}
	}
}

/// Receives an event after each successful evaluation.
///
/// Called on the evaluation path; implementations should queue work rather
/// than perform slow I/O inline.
#[async_trait]
pub trait EvaluationHook: Send + Sync + 'static {
	async fn on_flag_evaluated(&self, event: FlagEvaluated);
}

/// Type alias for a shared evaluation hook.
pub type SharedEvaluationHook = Arc<dyn EvaluationHook>;

/// Discards all events. Used when no hook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEvaluationHook;

#[async_trait]
impl EvaluationHook for NoOpEvaluationHook {
	async fn on_flag_evaluated(&self, _event: FlagEvaluated) {}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct CountingHook {
		count: AtomicUsize,
	}

	#[async_trait]
	impl EvaluationHook for CountingHook {
		async fn on_flag_evaluated(&self, _event: FlagEvaluated) {
			self.count.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[test]
	fn test_event_from_result() {
		let id = FlagIdentifier::application("checkout-version", "storefront", None).unwrap();
		let ctx = EvaluationContext::new()
			.with_user_id("u1")
			.with_attribute("tier", json!("gold"));
		let result = EvaluationResult::enabled("v2", "matched targeting rule 0 on attribute 'tier'");

		let event = FlagEvaluated::new(&id, &ctx, &result);
		assert_eq!(event.flag_key, "checkout-version");
		assert_eq!(event.application.as_deref(), Some("storefront"));
		assert!(event.is_enabled);
		assert_eq!(event.variation, "v2");
		assert_eq!(event.user_id.as_deref(), Some("u1"));
		assert!(event.tenant_id.is_none());
		assert_eq!(event.context_hash, ctx.fingerprint("checkout-version"));
	}

	#[tokio::test]
	async fn test_hooks_are_shareable() {
		let hook = Arc::new(CountingHook {
			count: AtomicUsize::new(0),
		});
		let shared: SharedEvaluationHook = hook.clone();

		let id = FlagIdentifier::global("f").unwrap();
		let ctx = EvaluationContext::new();
		let result = EvaluationResult::disabled("off", "flag is disabled");
		shared
			.on_flag_evaluated(FlagEvaluated::new(&id, &ctx, &result))
			.await;
		NoOpEvaluationHook
			.on_flag_evaluated(FlagEvaluated::new(&id, &ctx, &result))
			.await;

		assert_eq!(hook.count.load(Ordering::SeqCst), 1);
	}
}
