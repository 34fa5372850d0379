// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::SubjectKind;

/// Errors that can occur while building or evaluating flag configurations.
#[derive(Debug, Error)]
pub enum FlagsError {
	/// A rollout evaluator was selected but the context carries no subject id.
	#[error("{evaluator} requires a {subject} id but the evaluation context has none")]
	MissingSubject {
		evaluator: &'static str,
		subject: SubjectKind,
	},

	#[error("invalid flag identifier: {0}")]
	InvalidIdentifier(String),

	#[error("invalid activation schedule: enable_on {enable_on} is after disable_on {disable_on}")]
	InvalidSchedule {
		enable_on: DateTime<Utc>,
		disable_on: DateTime<Utc>,
	},

	#[error("invalid operational window: {0}")]
	InvalidWindow(String),

	#[error("invalid rollout percentage: {0} (expected 0-100)")]
	InvalidPercentage(u8),

	#[error("invalid evaluation mode set: {0}")]
	InvalidModeSet(String),

	#[error("unknown time zone: {0}")]
	UnknownTimeZone(String),

	#[error("default variation must exist in variations list: {0}")]
	DefaultVariationMissing(String),
}

impl FlagsError {
	/// Returns true if this error signals a caller/integration bug rather than bad data.
	pub fn is_precondition(&self) -> bool {
		matches!(self, FlagsError::MissingSubject { .. })
	}
}

pub type Result<T> = std::result::Result<T, FlagsError>;
