// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FlagsError, Result};

/// Outcome of a pure time-based gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
	pub active: bool,
	pub reason: String,
}

impl GateDecision {
	pub fn open(reason: impl Into<String>) -> Self {
		Self {
			active: true,
			reason: reason.into(),
		}
	}

	pub fn closed(reason: impl Into<String>) -> Self {
		Self {
			active: false,
			reason: reason.into(),
		}
	}
}

/// Calendar activation for a flag: active in `[enable_on, disable_on)`.
///
/// A missing bound is unbounded on that side. Both missing means unscheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationSchedule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enable_on: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub disable_on: Option<DateTime<Utc>>,
}

impl ActivationSchedule {
	pub fn new(enable_on: Option<DateTime<Utc>>, disable_on: Option<DateTime<Utc>>) -> Result<Self> {
		let schedule = Self {
			enable_on,
			disable_on,
		};
		schedule.validate()?;
		Ok(schedule)
	}

	pub fn unscheduled() -> Self {
		Self::default()
	}

	pub fn is_unscheduled(&self) -> bool {
		self.enable_on.is_none() && self.disable_on.is_none()
	}

	pub fn validate(&self) -> Result<()> {
		if let (Some(enable_on), Some(disable_on)) = (self.enable_on, self.disable_on) {
			if enable_on > disable_on {
				return Err(FlagsError::InvalidSchedule {
					enable_on,
					disable_on,
				});
			}
		}
		Ok(())
	}

	pub fn is_active_at(&self, instant: DateTime<Utc>) -> GateDecision {
		if self.is_unscheduled() {
			return GateDecision::open("no activation schedule configured");
		}

		if let Some(enable_on) = self.enable_on {
			if instant < enable_on {
				return GateDecision::closed(format!(
					"scheduled to enable at {}",
					enable_on.to_rfc3339()
				));
			}
		}

		if let Some(disable_on) = self.disable_on {
			if instant >= disable_on {
				return GateDecision::closed(format!(
					"schedule ended at {}",
					disable_on.to_rfc3339()
				));
			}
		}

		match self.disable_on {
			Some(disable_on) => GateDecision::open(format!(
				"within activation schedule until {}",
				disable_on.to_rfc3339()
			)),
			None => GateDecision::open("within activation schedule"),
		}
	}
}
