// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subject id used for variation selection when the context has no user or tenant.
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

/// Request context a flag is evaluated against. Never mutated by evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationContext {
	pub user_id: Option<String>,
	pub tenant_id: Option<String>,
	#[serde(default)]
	pub attributes: HashMap<String, Value>,
	/// Instant to evaluate at; `None` means now.
	#[serde(default)]
	pub evaluation_time: Option<DateTime<Utc>>,
	/// Zone operational windows are checked in; overrides the window's own zone.
	#[serde(default)]
	pub time_zone: Option<String>,
}

impl EvaluationContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
		self.user_id = Some(user_id.into());
		self
	}

	pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
		self.tenant_id = Some(tenant_id.into());
		self
	}

	pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
		self.attributes.insert(key.into(), value);
		self
	}

	pub fn at(mut self, instant: DateTime<Utc>) -> Self {
		self.evaluation_time = Some(instant);
		self
	}

	pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
		self.time_zone = Some(time_zone.into());
		self
	}

	pub fn evaluation_time(&self) -> DateTime<Utc> {
		self.evaluation_time.unwrap_or_else(Utc::now)
	}

	/// User id, treating blank strings as absent.
	pub fn user(&self) -> Option<&str> {
		non_blank(self.user_id.as_deref())
	}

	/// Tenant id, treating blank strings as absent.
	pub fn tenant(&self) -> Option<&str> {
		non_blank(self.tenant_id.as_deref())
	}

	/// Tenant, else user, else [`ANONYMOUS_SUBJECT`].
	pub fn subject_id(&self) -> &str {
		self.tenant().or(self.user()).unwrap_or(ANONYMOUS_SUBJECT)
	}

	/// Computes a deterministic hash of the context for deduplicating exposure records.
	///
	/// Covers the flag key, user, tenant and all attributes (sorted by key).
	/// Returns a hex-encoded SHA-256 hash.
	pub fn fingerprint(&self, flag_key: &str) -> String {
		use sha2::{Digest, Sha256};

		let mut hasher = Sha256::new();

		hasher.update(flag_key.as_bytes());
		hasher.update(b"|");

		if let Some(user_id) = self.user() {
			hasher.update(user_id.as_bytes());
		}
		hasher.update(b"|");

		if let Some(tenant_id) = self.tenant() {
			hasher.update(tenant_id.as_bytes());
		}
		hasher.update(b"|");

		let mut keys: Vec<_> = self.attributes.keys().collect();
		keys.sort();
		for key in keys {
			hasher.update(key.as_bytes());
			hasher.update(b"=");
			if let Some(value) = self.attributes.get(key) {
				hasher.update(value.to_string().as_bytes());
			}
			hasher.update(b",");
		}

		hex::encode(hasher.finalize())
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.trim().is_empty())
}

/// Outcome of evaluating a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
	is_enabled: bool,
	variation: String,
	reason: String,
	#[serde(default)]
	metadata: HashMap<String, Value>,
}

impl EvaluationResult {
	pub fn new(is_enabled: bool, variation: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			is_enabled,
			variation: variation.into(),
			reason: reason.into(),
			metadata: HashMap::new(),
		}
	}

	pub fn enabled(variation: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::new(true, variation, reason)
	}

	pub fn disabled(variation: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::new(false, variation, reason)
	}

	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = reason.into();
		self
	}

	pub fn with_variation(mut self, variation: impl Into<String>) -> Self {
		self.variation = variation.into();
		self
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
		self.metadata.insert(key.into(), value);
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.is_enabled
	}

	pub fn variation(&self) -> &str {
		&self.variation
	}

	pub fn reason(&self) -> &str {
		&self.reason
	}

	pub fn metadata(&self) -> &HashMap<String, Value> {
		&self.metadata
	}
}
