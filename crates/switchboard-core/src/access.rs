// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{FlagsError, Result};
use crate::hash::{rollout_bucket, SubjectKind};

/// Allow/deny lists plus a percentage rollout for one subject kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
	#[serde(default)]
	pub allowed: BTreeSet<String>,
	#[serde(default)]
	pub blocked: BTreeSet<String>,
	#[serde(default)]
	pub rollout_percentage: u8,
}

/// How a subject was resolved against an [`AccessControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
	Blocked,
	Allowed,
	InRollout { bucket: u32 },
	OutOfRollout { bucket: u32 },
}

impl AccessDecision {
	pub fn is_enabled(&self) -> bool {
		matches!(self, AccessDecision::Allowed | AccessDecision::InRollout { .. })
	}

	pub fn bucket(&self) -> Option<u32> {
		match self {
			AccessDecision::InRollout { bucket } | AccessDecision::OutOfRollout { bucket } => {
				Some(*bucket)
			}
			_ => None,
		}
	}
}

impl AccessControl {
	pub fn new(rollout_percentage: u8) -> Result<Self> {
		if rollout_percentage > 100 {
			return Err(FlagsError::InvalidPercentage(rollout_percentage));
		}
		Ok(Self {
			rollout_percentage,
			..Default::default()
		})
	}

	pub fn allow(mut self, id: impl Into<String>) -> Self {
		self.allowed.insert(id.into());
		self
	}

	pub fn block(mut self, id: impl Into<String>) -> Self {
		self.blocked.insert(id.into());
		self
	}

	/// True when either list is populated or the rollout is partial.
	pub fn has_restrictions(&self) -> bool {
		!self.allowed.is_empty()
			|| !self.blocked.is_empty()
			|| (self.rollout_percentage > 0 && self.rollout_percentage < 100)
	}

	pub fn validate(&self) -> Result<()> {
		if self.rollout_percentage > 100 {
			return Err(FlagsError::InvalidPercentage(self.rollout_percentage));
		}
		Ok(())
	}

	/// Blocked beats allowed; the rollout bucket is only consulted for subjects in neither list.
	pub fn evaluate(&self, flag_key: &str, kind: SubjectKind, subject_id: &str) -> AccessDecision {
		if self.blocked.contains(subject_id) {
			return AccessDecision::Blocked;
		}
		if self.allowed.contains(subject_id) {
			return AccessDecision::Allowed;
		}
		let bucket = rollout_bucket(flag_key, kind, subject_id);
		if bucket < u32::from(self.rollout_percentage.min(100)) {
			AccessDecision::InRollout { bucket }
		} else {
			AccessDecision::OutOfRollout { bucket }
		}
	}
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn blocked_always_disables(id in "[a-z0-9]{1,20}", pct in 0u8..=100, also_allowed: bool) {
			let mut access = AccessControl::new(pct).unwrap().block(id.clone());
			if also_allowed {
				access = access.allow(id.clone());
			}
			prop_assert_eq!(access.evaluate("flag", SubjectKind::User, &id), AccessDecision::Blocked);
		}

		#[test]
		fn allowed_always_enables(id in "[a-z0-9]{1,20}", pct in 0u8..=100) {
			let access = AccessControl::new(pct).unwrap().allow(id.clone());
			prop_assert!(access.evaluate("flag", SubjectKind::User, &id).is_enabled());
		}

		#[test]
		fn rollout_never_shrinks(id in "[a-z0-9]{1,20}", p in 0u8..=100) {
			let lower = AccessControl::new(p).unwrap();
			let upper = AccessControl::new(100).unwrap();
			if lower.evaluate("flag", SubjectKind::Tenant, &id).is_enabled() {
				prop_assert!(upper.evaluate("flag", SubjectKind::Tenant, &id).is_enabled());
			}
		}
	}
}
