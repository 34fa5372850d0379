// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde_json::json;
use switchboard_core::{
	EvaluationContext, EvaluationMode, EvaluationResult, FlagConfiguration, Result,
};

use crate::evaluator::{EvaluationOrder, Evaluator};

#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationScheduleEvaluator;

impl Evaluator for ActivationScheduleEvaluator {
	fn order(&self) -> EvaluationOrder {
		EvaluationOrder::ActivationSchedule
	}

	fn can_process(&self, flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
		flag.modes.contains(EvaluationMode::Scheduled)
	}

	fn process(
		&self,
		flag: &FlagConfiguration,
		ctx: &EvaluationContext,
	) -> Result<Option<EvaluationResult>> {
		let decision = flag.schedule.is_active_at(ctx.evaluation_time());
		Ok(Some(
			EvaluationResult::new(
				decision.active,
				flag.variations.default_variation.clone(),
				decision.reason,
			)
			.with_metadata("evaluator", json!(self.name())),
		))
	}
}
