// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FlagsError, Result};

/// Prefix shared by every flag cache key.
pub const CACHE_KEY_PREFIX: &str = "ff";

/// Whether a flag configuration applies everywhere or to one application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FlagScope {
	Global,
	Application {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		version: Option<String>,
	},
}

/// Identity of a flag configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagIdentifier {
	key: String,
	#[serde(flatten)]
	scope: FlagScope,
}

impl FlagIdentifier {
	/// A globally scoped identifier.
	pub fn global(key: impl Into<String>) -> Result<Self> {
		let key = key.into();
		validate_key(&key)?;
		Ok(Self {
			key,
			scope: FlagScope::Global,
		})
	}

	/// An identifier scoped to an application, optionally pinned to one version.
	pub fn application(
		key: impl Into<String>,
		name: impl Into<String>,
		version: Option<String>,
	) -> Result<Self> {
		let key = key.into();
		validate_key(&key)?;
		let name = name.into();
		if name.trim().is_empty() {
			return Err(FlagsError::InvalidIdentifier(format!(
				"application-scoped flag '{}' requires an application name",
				key
			)));
		}
		let version = version.filter(|v| !v.trim().is_empty());
		Ok(Self {
			key,
			scope: FlagScope::Application { name, version },
		})
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn scope(&self) -> &FlagScope {
		&self.scope
	}

	pub fn application_name(&self) -> Option<&str> {
		match &self.scope {
			FlagScope::Global => None,
			FlagScope::Application { name, .. } => Some(name),
		}
	}

	pub fn application_version(&self) -> Option<&str> {
		match &self.scope {
			FlagScope::Global => None,
			FlagScope::Application { version, .. } => version.as_deref(),
		}
	}

	/// Namespaced cache key: `ff:{key}`, `ff:{app}:{key}` or `ff:{app}:{version}:{key}`.
	pub fn cache_key(&self) -> String {
		match &self.scope {
			FlagScope::Global => format!("{}:{}", CACHE_KEY_PREFIX, self.key),
			FlagScope::Application {
				name,
				version: None,
			} => format!("{}:{}:{}", CACHE_KEY_PREFIX, name, self.key),
			FlagScope::Application {
				name,
				version: Some(version),
			} => format!("{}:{}:{}:{}", CACHE_KEY_PREFIX, name, version, self.key),
		}
	}

	/// Re-checks invariants; used for identifiers that arrived through deserialization.
	pub fn validate(&self) -> Result<()> {
		validate_key(&self.key)?;
		if let FlagScope::Application { name, .. } = &self.scope {
			if name.trim().is_empty() {
				return Err(FlagsError::InvalidIdentifier(format!(
					"application-scoped flag '{}' requires an application name",
					self.key
				)));
			}
		}
		Ok(())
	}
}

impl fmt::Display for FlagIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.scope {
			FlagScope::Global => write!(f, "{}", self.key),
			FlagScope::Application {
				name,
				version: None,
			} => write!(f, "{}/{}", name, self.key),
			FlagScope::Application {
				name,
				version: Some(version),
			} => write!(f, "{}@{}/{}", name, version, self.key),
		}
	}
}

fn validate_key(key: &str) -> Result<()> {
	if key.is_empty() {
		return Err(FlagsError::InvalidIdentifier(
			"flag key must not be empty".to_string(),
		));
	}
	if key.chars().any(char::is_whitespace) {
		return Err(FlagsError::InvalidIdentifier(format!(
			"flag key '{}' must not contain whitespace",
			key
		)));
	}
	Ok(())
}
