// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application scope configuration section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicationConfigLayer {
	pub name: Option<String>,
	pub version: Option<String>,
}

impl ApplicationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.name.is_some() {
			self.name = other.name;
		}
		if other.version.is_some() {
			self.version = other.version;
		}
	}

	/// `None` unless an application name is configured.
	pub fn finalize(self) -> Option<ApplicationConfig> {
		let version = self.version.filter(|v| !v.trim().is_empty());
		self
			.name
			.filter(|n| !n.trim().is_empty())
			.map(|name| ApplicationConfig { name, version })
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationConfig {
	pub name: String,
	pub version: Option<String>,
}
