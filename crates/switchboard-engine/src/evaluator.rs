// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use switchboard_core::{EvaluationContext, EvaluationResult, FlagConfiguration, Result};

/// Fixed priority of an evaluator; lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvaluationOrder {
	TenantRollout = 1,
	UserRollout = 2,
	ActivationSchedule = 3,
	OperationalWindow = 4,
	CustomTargeting = 5,
	Terminal = 99,
}

impl EvaluationOrder {
	pub fn as_str(&self) -> &'static str {
		match self {
			EvaluationOrder::TenantRollout => "TenantRollout",
			EvaluationOrder::UserRollout => "UserRollout",
			EvaluationOrder::ActivationSchedule => "ActivationSchedule",
			EvaluationOrder::OperationalWindow => "OperationalWindow",
			EvaluationOrder::CustomTargeting => "CustomTargeting",
			EvaluationOrder::Terminal => "Terminal",
		}
	}
}

impl fmt::Display for EvaluationOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Interprets one concern of a flag configuration against a context.
///
/// Implementations hold no per-request state and are shared across threads.
pub trait Evaluator: Send + Sync {
	fn order(&self) -> EvaluationOrder;

	fn name(&self) -> &'static str {
		self.order().as_str()
	}

	/// Whether this evaluator applies to `flag` at all.
	fn can_process(&self, flag: &FlagConfiguration, ctx: &EvaluationContext) -> bool;

	/// `Ok(None)` means inconclusive and defers to the remaining evaluators.
	fn process(
		&self,
		flag: &FlagConfiguration,
		ctx: &EvaluationContext,
	) -> Result<Option<EvaluationResult>>;
}
