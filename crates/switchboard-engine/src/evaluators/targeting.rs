// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde_json::json;
use switchboard_core::{
	EvaluationContext, EvaluationMode, EvaluationResult, FlagConfiguration, Result,
};

use crate::evaluator::{EvaluationOrder, Evaluator};

/// Attribute targeting rules. The first matching rule picks the variation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomTargetingEvaluator;

impl Evaluator for CustomTargetingEvaluator {
	fn order(&self) -> EvaluationOrder {
		EvaluationOrder::CustomTargeting
	}

	fn can_process(&self, flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
		!flag.modes.is_terminal()
			&& (flag.modes.contains(EvaluationMode::TargetingRules)
				|| !flag.targeting_rules.is_empty())
	}

	fn process(
		&self,
		flag: &FlagConfiguration,
		ctx: &EvaluationContext,
	) -> Result<Option<EvaluationResult>> {
		let matched = flag
			.targeting_rules
			.iter()
			.enumerate()
			.find(|(_, rule)| rule.matches(&ctx.attributes));

		let result = match matched {
			Some((index, rule)) => EvaluationResult::enabled(
				rule.variation(),
				format!(
					"matched targeting rule {} on attribute '{}'",
					index,
					rule.attribute()
				),
			)
			.with_metadata("rule_index", json!(index))
			.with_metadata("rule_variation", json!(rule.variation())),
			None => EvaluationResult::disabled(
				flag.variations.default_variation.clone(),
				"no targeting rule matched",
			),
		};
		Ok(Some(result.with_metadata("evaluator", json!(self.name()))))
	}
}
