// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{ApplicationConfigLayer, CacheConfigLayer, ProvisioningConfigLayer};

/// Switchboard configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwitchboardConfigLayer {
	#[serde(default)]
	pub cache: Option<CacheConfigLayer>,
	#[serde(default)]
	pub provisioning: Option<ProvisioningConfigLayer>,
	#[serde(default)]
	pub application: Option<ApplicationConfigLayer>,
}

impl SwitchboardConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: SwitchboardConfigLayer) {
		merge_option(&mut self.cache, other.cache, CacheConfigLayer::merge);
		merge_option(
			&mut self.provisioning,
			other.provisioning,
			ProvisioningConfigLayer::merge,
		);
		merge_option(
			&mut self.application,
			other.application,
			ApplicationConfigLayer::merge,
		);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
