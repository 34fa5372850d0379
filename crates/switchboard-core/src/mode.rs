// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FlagsError;

/// A single evaluation mode a flag can have active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
	Disabled,
	Enabled,
	Scheduled,
	TimeWindow,
	UserRolloutPercentage,
	UserTargeted,
	TenantRolloutPercentage,
	TenantTargeted,
	TargetingRules,
}

impl EvaluationMode {
	/// `Disabled` and `Enabled` cannot be combined with any other mode.
	pub fn is_terminal(&self) -> bool {
		matches!(self, EvaluationMode::Disabled | EvaluationMode::Enabled)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			EvaluationMode::Disabled => "disabled",
			EvaluationMode::Enabled => "enabled",
			EvaluationMode::Scheduled => "scheduled",
			EvaluationMode::TimeWindow => "time_window",
			EvaluationMode::UserRolloutPercentage => "user_rollout_percentage",
			EvaluationMode::UserTargeted => "user_targeted",
			EvaluationMode::TenantRolloutPercentage => "tenant_rollout_percentage",
			EvaluationMode::TenantTargeted => "tenant_targeted",
			EvaluationMode::TargetingRules => "targeting_rules",
		}
	}
}

impl fmt::Display for EvaluationMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The set of modes active on a flag.
///
/// A terminal mode (`Disabled` or `Enabled`) is always alone in the set:
/// inserting one replaces the set, inserting any other mode drops it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<EvaluationMode>", into = "Vec<EvaluationMode>")]
pub struct EvaluationModeSet {
	modes: BTreeSet<EvaluationMode>,
}

impl EvaluationModeSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn disabled() -> Self {
		Self::single(EvaluationMode::Disabled)
	}

	pub fn enabled() -> Self {
		Self::single(EvaluationMode::Enabled)
	}

	pub fn single(mode: EvaluationMode) -> Self {
		let mut set = Self::new();
		set.insert(mode);
		set
	}

	pub fn insert(&mut self, mode: EvaluationMode) {
		if mode.is_terminal() {
			self.modes.clear();
		} else {
			self.modes.retain(|m| !m.is_terminal());
		}
		self.modes.insert(mode);
	}

	pub fn with(mut self, mode: EvaluationMode) -> Self {
		self.insert(mode);
		self
	}

	pub fn remove(&mut self, mode: EvaluationMode) -> bool {
		self.modes.remove(&mode)
	}

	pub fn contains(&self, mode: EvaluationMode) -> bool {
		self.modes.contains(&mode)
	}

	pub fn contains_any(&self, modes: &[EvaluationMode]) -> bool {
		modes.iter().any(|m| self.modes.contains(m))
	}

	/// True iff the set is exactly `{Disabled}` or `{Enabled}`.
	pub fn is_terminal(&self) -> bool {
		self.modes.len() == 1 && self.modes.iter().all(EvaluationMode::is_terminal)
	}

	/// True iff the set is exactly `{Disabled}`.
	pub fn is_disabled(&self) -> bool {
		self.is_terminal() && self.contains(EvaluationMode::Disabled)
	}

	pub fn is_empty(&self) -> bool {
		self.modes.is_empty()
	}

	pub fn len(&self) -> usize {
		self.modes.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = EvaluationMode> + '_ {
		self.modes.iter().copied()
	}

	/// Rejects a terminal mode sharing the set with any other mode.
	pub fn validate(&self) -> Result<(), FlagsError> {
		if self.modes.len() > 1 && self.modes.iter().any(EvaluationMode::is_terminal) {
			let listed: Vec<&str> = self.modes.iter().map(EvaluationMode::as_str).collect();
			return Err(FlagsError::InvalidModeSet(format!(
				"terminal modes cannot be combined with other modes: [{}]",
				listed.join(", ")
			)));
		}
		Ok(())
	}

	/// Builds a set as given, skipping the insert rules.
	#[cfg(test)]
	pub(crate) fn unchecked(modes: impl IntoIterator<Item = EvaluationMode>) -> Self {
		Self {
			modes: modes.into_iter().collect(),
		}
	}
}

impl TryFrom<Vec<EvaluationMode>> for EvaluationModeSet {
	type Error = FlagsError;

	fn try_from(modes: Vec<EvaluationMode>) -> Result<Self, Self::Error> {
		let set = Self {
			modes: modes.into_iter().collect(),
		};
		set.validate()?;
		Ok(set)
	}
}

impl From<EvaluationModeSet> for Vec<EvaluationMode> {
	fn from(set: EvaluationModeSet) -> Self {
		set.modes.into_iter().collect()
	}
}

impl FromIterator<EvaluationMode> for EvaluationModeSet {
	fn from_iter<I: IntoIterator<Item = EvaluationMode>>(iter: I) -> Self {
		let mut set = Self::new();
		for mode in iter {
			set.insert(mode);
		}
		set
	}
}
