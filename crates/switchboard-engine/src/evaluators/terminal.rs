// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde_json::json;
use switchboard_core::{
	EvaluationContext, EvaluationMode, EvaluationResult, FlagConfiguration, Result,
};

use crate::evaluator::{EvaluationOrder, Evaluator};

/// Flags that are plainly on or off.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalEvaluator;

impl Evaluator for TerminalEvaluator {
	fn order(&self) -> EvaluationOrder {
		EvaluationOrder::Terminal
	}

	fn can_process(&self, flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
		flag.modes.is_terminal()
	}

	fn process(
		&self,
		flag: &FlagConfiguration,
		_ctx: &EvaluationContext,
	) -> Result<Option<EvaluationResult>> {
		let default_variation = flag.variations.default_variation.clone();
		let result = if flag.modes.contains(EvaluationMode::Enabled) {
			EvaluationResult::enabled(default_variation, "flag is enabled")
		} else {
			EvaluationResult::disabled(default_variation, "flag is disabled")
		};
		Ok(Some(result.with_metadata("evaluator", json!(self.name()))))
	}
}
