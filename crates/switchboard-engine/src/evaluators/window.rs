// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde_json::json;
use switchboard_core::{
	EvaluationContext, EvaluationMode, EvaluationResult, FlagConfiguration, Result,
};

use crate::evaluator::{EvaluationOrder, Evaluator};

#[derive(Debug, Clone, Copy, Default)]
pub struct OperationalWindowEvaluator;

impl Evaluator for OperationalWindowEvaluator {
	fn order(&self) -> EvaluationOrder {
		EvaluationOrder::OperationalWindow
	}

	fn can_process(&self, flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
		flag.modes.contains(EvaluationMode::TimeWindow)
	}

	fn process(
		&self,
		flag: &FlagConfiguration,
		ctx: &EvaluationContext,
	) -> Result<Option<EvaluationResult>> {
		let decision = flag
			.window
			.is_active_at(ctx.evaluation_time(), ctx.time_zone.as_deref());
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

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{NaiveTime, TimeZone, Utc, Weekday};
	use switchboard_core::{EvaluationModeSet, FlagIdentifier, OperationalWindow};

	fn night_shift() -> FlagConfiguration {
		let window = OperationalWindow::new(
			NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
			NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
			None,
			vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
		)
		.unwrap();
		FlagConfiguration::new(
			FlagIdentifier::global("batch-jobs").unwrap(),
			EvaluationModeSet::single(EvaluationMode::TimeWindow),
		)
		.with_window(window)
	}

	#[test]
	fn test_context_zone_applies_when_window_has_none() {
		let flag = night_shift();
		// Wednesday 2025-03-05 23:00 UTC is Thursday 08:00 in Tokyo
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 23, 0, 0).unwrap();

		let utc = EvaluationContext::new().at(instant);
		assert!(OperationalWindowEvaluator
			.process(&flag, &utc)
			.unwrap()
			.unwrap()
			.is_enabled());

		let tokyo = EvaluationContext::new().at(instant).with_time_zone("Asia/Tokyo");
		assert!(!OperationalWindowEvaluator
			.process(&flag, &tokyo)
			.unwrap()
			.unwrap()
			.is_enabled());
	}

	#[test]
	fn test_context_zone_overrides_window_zone() {
		let window = OperationalWindow::new(
			NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
			NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
			Some("America/New_York".to_string()),
			vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
		)
		.unwrap();
		let flag = FlagConfiguration::new(
			FlagIdentifier::global("support-chat").unwrap(),
			EvaluationModeSet::single(EvaluationMode::TimeWindow),
		)
		.with_window(window);
		// Wednesday 10:00 in New York, Thursday 00:00 in Tokyo
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap();

		let new_york = EvaluationContext::new().at(instant);
		assert!(OperationalWindowEvaluator
			.process(&flag, &new_york)
			.unwrap()
			.unwrap()
			.is_enabled());

		let tokyo = EvaluationContext::new().at(instant).with_time_zone("Asia/Tokyo");
		let result = OperationalWindowEvaluator
			.process(&flag, &tokyo)
			.unwrap()
			.unwrap();
		assert!(!result.is_enabled(), "{}", result.reason());
	}

	#[test]
	fn test_only_applies_with_time_window_mode() {
		let flag = FlagConfiguration::new(
			FlagIdentifier::global("f").unwrap(),
			EvaluationModeSet::enabled(),
		);
		assert!(!OperationalWindowEvaluator.can_process(&flag, &EvaluationContext::new()));
	}
}
