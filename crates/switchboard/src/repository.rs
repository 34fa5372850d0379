// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Port to the system of record for flag configurations.

use async_trait::async_trait;
use switchboard_core::{EvaluationMode, FlagConfiguration, FlagIdentifier};

use crate::error::Result;

/// Lookup and default-creation of flag configurations.
///
/// Implementations must be safe to call concurrently. `create` must be
/// idempotent: creating a flag that already exists returns the stored
/// configuration instead of failing.
#[async_trait]
pub trait FlagConfigurationRepository: Send + Sync {
	async fn get(&self, identifier: &FlagIdentifier) -> Result<Option<FlagConfiguration>>;

	async fn create(
		&self,
		identifier: &FlagIdentifier,
		default_mode: EvaluationMode,
		name: &str,
		description: &str,
	) -> Result<FlagConfiguration>;
}
