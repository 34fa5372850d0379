// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::AccessControl;
use crate::error::Result;
use crate::identifier::FlagIdentifier;
use crate::mode::{EvaluationMode, EvaluationModeSet};
use crate::schedule::ActivationSchedule;
use crate::targeting::TargetingRule;
use crate::variation::Variations;
use crate::window::OperationalWindow;

/// Unique identifier for a stored flag configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagConfigId(pub Uuid);

impl FlagConfigId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for FlagConfigId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for FlagConfigId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for FlagConfigId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// A resolved flag configuration, read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagConfiguration {
	pub id: FlagConfigId,
	pub identifier: FlagIdentifier,
	pub name: String,
	#[serde(default)]
	pub description: String,
	pub modes: EvaluationModeSet,
	#[serde(default)]
	pub schedule: ActivationSchedule,
	#[serde(default)]
	pub window: OperationalWindow,
	#[serde(default)]
	pub user_access: AccessControl,
	#[serde(default)]
	pub tenant_access: AccessControl,
	#[serde(default)]
	pub targeting_rules: Vec<TargetingRule>,
	#[serde(default)]
	pub variations: Variations,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl FlagConfiguration {
	pub fn new(identifier: FlagIdentifier, modes: EvaluationModeSet) -> Self {
		let now = Utc::now();
		Self {
			id: FlagConfigId::new(),
			name: identifier.key().to_string(),
			identifier,
			description: String::new(),
			modes,
			schedule: ActivationSchedule::default(),
			window: OperationalWindow::default(),
			user_access: AccessControl::default(),
			tenant_access: AccessControl::default(),
			targeting_rules: Vec::new(),
			variations: Variations::default(),
			created_at: now,
			updated_at: now,
		}
	}

	/// The default configuration created for a flag evaluated before anyone configured it.
	pub fn provisioned(
		identifier: FlagIdentifier,
		mode: EvaluationMode,
		name: impl Into<String>,
		description: impl Into<String>,
	) -> Self {
		let mut flag = Self::new(identifier, EvaluationModeSet::single(mode));
		flag.name = name.into();
		flag.description = description.into();
		flag
	}

	pub fn key(&self) -> &str {
		self.identifier.key()
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
		self.modes.insert(mode);
		self
	}

	pub fn with_schedule(mut self, schedule: ActivationSchedule) -> Self {
		self.schedule = schedule;
		self
	}

	pub fn with_window(mut self, window: OperationalWindow) -> Self {
		self.window = window;
		self
	}

	pub fn with_user_access(mut self, access: AccessControl) -> Self {
		self.user_access = access;
		self
	}

	pub fn with_tenant_access(mut self, access: AccessControl) -> Self {
		self.tenant_access = access;
		self
	}

	pub fn with_targeting_rule(mut self, rule: TargetingRule) -> Self {
		self.targeting_rules.push(rule);
		self
	}

	pub fn with_variations(mut self, variations: Variations) -> Self {
		self.variations = variations;
		self
	}

	/// Checks every nested invariant; repositories call this before persisting.
	pub fn validate(&self) -> Result<()> {
		self.identifier.validate()?;
		self.modes.validate()?;
		self.schedule.validate()?;
		self.window.validate()?;
		self.user_access.validate()?;
		self.tenant_access.validate()?;
		self.variations.validate()?;
		Ok(())
	}
}
