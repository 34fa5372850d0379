// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Auto-provisioning configuration section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Initial state of a flag created on first evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultMode {
	#[default]
	Disabled,
	Enabled,
}

impl fmt::Display for DefaultMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DefaultMode::Disabled => write!(f, "disabled"),
			DefaultMode::Enabled => write!(f, "enabled"),
		}
	}
}

impl FromStr for DefaultMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"disabled" | "off" => Ok(DefaultMode::Disabled),
			"enabled" | "on" => Ok(DefaultMode::Enabled),
			other => Err(format!("unknown default mode '{other}'")),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProvisioningConfigLayer {
	pub enabled: Option<bool>,
	pub default_mode: Option<DefaultMode>,
}

impl ProvisioningConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.default_mode.is_some() {
			self.default_mode = other.default_mode;
		}
	}

	pub fn finalize(self) -> ProvisioningConfig {
		ProvisioningConfig {
			enabled: self.enabled.unwrap_or(true),
			default_mode: self.default_mode.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvisioningConfig {
	pub enabled: bool,
	pub default_mode: DefaultMode,
}

impl Default for ProvisioningConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			default_mode: DefaultMode::Disabled,
		}
	}
}
