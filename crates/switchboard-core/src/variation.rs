// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlagsError, Result};
use crate::hash::hash;

pub const VARIATION_ON: &str = "on";
pub const VARIATION_OFF: &str = "off";

/// Named variation values for a flag plus the name served by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variations {
	pub values: BTreeMap<String, Value>,
	pub default_variation: String,
}

impl Default for Variations {
	/// Boolean `on`/`off` variations defaulting to `off`.
	fn default() -> Self {
		let mut values = BTreeMap::new();
		values.insert(VARIATION_ON.to_string(), Value::Bool(true));
		values.insert(VARIATION_OFF.to_string(), Value::Bool(false));
		Self {
			values,
			default_variation: VARIATION_OFF.to_string(),
		}
	}
}

impl Variations {
	pub fn new(default_variation: impl Into<String>) -> Self {
		Self {
			values: BTreeMap::new(),
			default_variation: default_variation.into(),
		}
	}

	pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
		self.values.insert(name.into(), value);
		self
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn default_value(&self) -> Option<&Value> {
		self.values.get(&self.default_variation)
	}

	pub fn validate(&self) -> Result<()> {
		if !self.values.contains_key(&self.default_variation) {
			return Err(FlagsError::DefaultVariationMissing(
				self.default_variation.clone(),
			));
		}
		Ok(())
	}

	/// Deterministically picks a variation name for `subject_id`.
	///
	/// Candidates are the declared names other than the default. With none the
	/// default is returned, with one it is always chosen, otherwise the sorted
	/// candidates are indexed by `hash("{flag_key}:{subject_id}")`.
	pub fn select_variation_for(&self, flag_key: &str, subject_id: &str) -> String {
		let candidates: Vec<&String> = self
			.values
			.keys()
			.filter(|name| **name != self.default_variation)
			.collect();

		match candidates.len() {
			0 => self.default_variation.clone(),
			1 => candidates[0].clone(),
			n => {
				let index = hash(&format!("{}:{}", flag_key, subject_id)) as usize % n;
				candidates[index].clone()
			}
		}
	}
}
