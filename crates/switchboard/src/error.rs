// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the flag evaluation facade.

use switchboard_core::FlagsError;
use thiserror::Error;

/// Result type alias for the facade.
pub type Result<T> = std::result::Result<T, SwitchboardError>;

#[derive(Error, Debug)]
pub enum SwitchboardError {
	/// Error from the flag model or an evaluator.
	#[error(transparent)]
	Flags(#[from] FlagsError),

	/// The configuration repository failed.
	#[error("Repository error: {0}")]
	Repository(String),

	/// A flag cache failed.
	#[error("Cache error: {0}")]
	Cache(String),

	/// The evaluator was built with invalid settings.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

impl SwitchboardError {
	/// Returns true if this error signals a caller bug, such as a rollout
	/// flag evaluated without the subject id it needs.
	pub fn is_precondition(&self) -> bool {
		match self {
			SwitchboardError::Flags(e) => e.is_precondition(),
			_ => false,
		}
	}
}
