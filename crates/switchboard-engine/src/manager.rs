// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runs the ordered evaluator set against a flag configuration.

use serde_json::json;
use switchboard_core::{EvaluationContext, EvaluationResult, FlagConfiguration, Result};
use tracing::debug;

use crate::evaluator::Evaluator;
use crate::evaluators::standard_evaluators;

pub const NO_MODES_REASON: &str = "no evaluation modes configured";

/// Combines evaluators in ascending [`EvaluationOrder`](crate::EvaluationOrder).
///
/// Every applicable evaluator must agree for a flag to be enabled: the first
/// disabled result ends evaluation and is returned as is. The evaluator list
/// is sorted once at construction.
pub struct EvaluationManager {
	evaluators: Vec<Box<dyn Evaluator>>,
}

impl Default for EvaluationManager {
	fn default() -> Self {
		Self::new(standard_evaluators())
	}
}

impl std::fmt::Debug for EvaluationManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let names: Vec<&str> = self.evaluators.iter().map(|e| e.name()).collect();
		f.debug_struct("EvaluationManager")
			.field("evaluators", &names)
			.finish()
	}
}

impl EvaluationManager {
	pub fn new(mut evaluators: Vec<Box<dyn Evaluator>>) -> Self {
		evaluators.sort_by_key(|e| e.order());
		Self { evaluators }
	}

	pub fn evaluators(&self) -> impl Iterator<Item = &dyn Evaluator> {
		self.evaluators.iter().map(|e| e.as_ref())
	}

	/// Evaluates `flag` for `ctx`.
	///
	/// Only precondition failures (a rollout evaluator without its subject id)
	/// return `Err`.
	pub fn evaluate(
		&self,
		flag: &FlagConfiguration,
		ctx: &EvaluationContext,
	) -> Result<EvaluationResult> {
		let applicable: Vec<&dyn Evaluator> = self
			.evaluators()
			.filter(|e| e.can_process(flag, ctx))
			.collect();

		if applicable.is_empty() {
			debug!(flag_key = %flag.key(), "no applicable evaluators");
			return Ok(EvaluationResult::disabled(
				flag.variations.default_variation.clone(),
				NO_MODES_REASON,
			));
		}

		let mut last = None;
		for evaluator in &applicable {
			match evaluator.process(flag, ctx)? {
				Some(result) if !result.is_enabled() => {
					debug!(
						flag_key = %flag.key(),
						evaluator = evaluator.name(),
						reason = %result.reason(),
						"flag disabled"
					);
					return Ok(result);
				}
				Some(result) => last = Some(result),
				None => {}
			}
		}

		let variation = flag
			.variations
			.select_variation_for(flag.key(), ctx.subject_id());

		let result = if let [only] = applicable.as_slice() {
			match last {
				Some(result) => result.with_variation(variation),
				None => EvaluationResult::enabled(
					variation,
					format!("{} had no objection", only.name()),
				)
				.with_metadata("evaluator", json!(only.name())),
			}
		} else {
			let names: Vec<&str> = applicable.iter().map(|e| e.name()).collect();
			EvaluationResult::enabled(
				variation,
				format!("All conditions met: {}", names.join(", ")),
			)
			.with_metadata("evaluated_by", json!(names))
		};

		debug!(
			flag_key = %flag.key(),
			variation = %result.variation(),
			"flag enabled"
		);
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::evaluator::EvaluationOrder;
	use chrono::{NaiveTime, TimeZone, Utc, Weekday};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;
	use switchboard_core::{
		AccessControl, ActivationSchedule, EvaluationMode, EvaluationModeSet, FlagIdentifier,
		FlagsError, OperationalWindow, StringOperator, TargetingRule, Variations,
	};

	struct FixedEvaluator {
		order: EvaluationOrder,
		result: Option<EvaluationResult>,
	}

	impl Evaluator for FixedEvaluator {
		fn order(&self) -> EvaluationOrder {
			self.order
		}

		fn can_process(&self, _flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
			true
		}

		fn process(
			&self,
			_flag: &FlagConfiguration,
			_ctx: &EvaluationContext,
		) -> Result<Option<EvaluationResult>> {
			Ok(self.result.clone())
		}
	}

	struct SpyEvaluator {
		order: EvaluationOrder,
		calls: Arc<AtomicUsize>,
	}

	impl Evaluator for SpyEvaluator {
		fn order(&self) -> EvaluationOrder {
			self.order
		}

		fn can_process(&self, _flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
			true
		}

		fn process(
			&self,
			_flag: &FlagConfiguration,
			_ctx: &EvaluationContext,
		) -> Result<Option<EvaluationResult>> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(Some(EvaluationResult::enabled("on", "spy")))
		}
	}

	fn flag(modes: EvaluationModeSet) -> FlagConfiguration {
		FlagConfiguration::new(FlagIdentifier::global("checkout-version").unwrap(), modes)
	}

	#[test]
	fn test_evaluators_sorted_at_construction() {
		let manager = EvaluationManager::new(vec![
			Box::new(crate::TerminalEvaluator),
			Box::new(crate::RolloutEvaluator::user()),
			Box::new(crate::RolloutEvaluator::tenant()),
		]);
		let names: Vec<&str> = manager.evaluators().map(|e| e.name()).collect();
		assert_eq!(names, vec!["TenantRollout", "UserRollout", "Terminal"]);
	}

	#[test]
	fn test_short_circuit_skips_later_evaluators() {
		let calls = Arc::new(AtomicUsize::new(0));
		let manager = EvaluationManager::new(vec![
			Box::new(SpyEvaluator {
				order: EvaluationOrder::ActivationSchedule,
				calls: calls.clone(),
			}),
			Box::new(SpyEvaluator {
				order: EvaluationOrder::Terminal,
				calls: calls.clone(),
			}),
			Box::new(crate::RolloutEvaluator::tenant()),
		]);

		let f = flag(EvaluationModeSet::single(EvaluationMode::TenantTargeted))
			.with_tenant_access(AccessControl::default().block("acme"));
		let ctx = EvaluationContext::new().with_tenant_id("acme");

		let result = manager.evaluate(&f, &ctx).unwrap();
		assert!(!result.is_enabled());
		assert_eq!(result.reason(), "tenant 'acme' is blocked");
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_no_applicable_evaluators_is_disabled() {
		let manager = EvaluationManager::default();
		let result = manager
			.evaluate(&flag(EvaluationModeSet::new()), &EvaluationContext::new())
			.unwrap();
		assert!(!result.is_enabled());
		assert_eq!(result.reason(), NO_MODES_REASON);
	}

	#[test]
	fn test_single_evaluator_reason_preserved() {
		let manager = EvaluationManager::default();
		let result = manager
			.evaluate(&flag(EvaluationModeSet::enabled()), &EvaluationContext::new())
			.unwrap();
		assert!(result.is_enabled());
		assert_eq!(result.reason(), "flag is enabled");
		assert_eq!(result.variation(), "on");
	}

	#[test]
	fn test_inconclusive_evaluators_enable() {
		let manager = EvaluationManager::new(vec![
			Box::new(FixedEvaluator {
				order: EvaluationOrder::UserRollout,
				result: None,
			}),
			Box::new(FixedEvaluator {
				order: EvaluationOrder::Terminal,
				result: None,
			}),
		]);
		let result = manager
			.evaluate(&flag(EvaluationModeSet::new()), &EvaluationContext::new())
			.unwrap();
		assert!(result.is_enabled());
		assert_eq!(result.reason(), "All conditions met: UserRollout, Terminal");
	}

	#[test]
	fn test_aggregate_reason_and_variation_recomputed() {
		let variations = Variations::new("control")
			.with_value("control", json!("a"))
			.with_value("treatment-1", json!("b"))
			.with_value("treatment-2", json!("c"));
		let f = flag(
			EvaluationModeSet::new()
				.with(EvaluationMode::Scheduled)
				.with(EvaluationMode::UserRolloutPercentage),
		)
		.with_user_access(AccessControl::new(100).unwrap())
		.with_variations(variations.clone());
		let ctx = EvaluationContext::new().with_user_id("u-7");

		let result = EvaluationManager::default().evaluate(&f, &ctx).unwrap();
		assert!(result.is_enabled());
		assert_eq!(
			result.reason(),
			"All conditions met: UserRollout, ActivationSchedule"
		);
		assert_eq!(
			result.variation(),
			variations.select_variation_for("checkout-version", "u-7")
		);
		assert_eq!(
			result.metadata()["evaluated_by"],
			json!(["UserRollout", "ActivationSchedule"])
		);
	}

	#[test]
	fn test_variation_subject_prefers_tenant() {
		let variations = Variations::new("control")
			.with_value("control", json!(0))
			.with_value("a", json!(1))
			.with_value("b", json!(2));
		let f = flag(EvaluationModeSet::enabled()).with_variations(variations.clone());
		let ctx = EvaluationContext::new().with_user_id("u1").with_tenant_id("t1");
		let result = EvaluationManager::default().evaluate(&f, &ctx).unwrap();
		assert_eq!(
			result.variation(),
			variations.select_variation_for("checkout-version", "t1")
		);
	}

	#[test]
	fn test_targeting_match_still_uses_hashed_variation() {
		let variations = Variations::new("v1")
			.with_value("v1", json!("classic"))
			.with_value("v2", json!("modern"))
			.with_value("v3", json!("experimental"));
		let f = flag(
			EvaluationModeSet::new()
				.with(EvaluationMode::TargetingRules)
				.with(EvaluationMode::Scheduled),
		)
		.with_targeting_rule(TargetingRule::string("tier", StringOperator::In, ["gold"], "v2"))
		.with_variations(variations.clone());
		let ctx = EvaluationContext::new().with_attribute("tier", json!("gold"));

		let result = EvaluationManager::default().evaluate(&f, &ctx).unwrap();
		assert!(result.is_enabled());
		// "checkout-version:anonymous" hashes to the second candidate
		assert_eq!(result.variation(), "v3");
		assert_eq!(
			result.variation(),
			variations.select_variation_for("checkout-version", "anonymous")
		);
	}

	#[test]
	fn test_single_targeting_evaluator_records_rule_variation() {
		let variations = Variations::new("v1")
			.with_value("v1", json!("classic"))
			.with_value("v2", json!("modern"))
			.with_value("v3", json!("experimental"));
		let f = flag(EvaluationModeSet::single(EvaluationMode::TargetingRules))
			.with_targeting_rule(TargetingRule::string("tier", StringOperator::In, ["gold"], "v2"))
			.with_variations(variations);
		let ctx = EvaluationContext::new().with_attribute("tier", json!("gold"));

		let result = EvaluationManager::default().evaluate(&f, &ctx).unwrap();
		assert_eq!(result.variation(), "v3");
		assert_eq!(result.metadata()["rule_variation"], json!("v2"));
		assert_eq!(result.reason(), "matched targeting rule 0 on attribute 'tier'");
	}

	#[test]
	fn test_checkout_version_example() {
		let f = flag(EvaluationModeSet::single(EvaluationMode::TargetingRules))
			.with_targeting_rule(TargetingRule::string("tier", StringOperator::In, ["gold"], "v2"))
			.with_variations(
				Variations::new("v1")
					.with_value("v1", json!("classic"))
					.with_value("v2", json!("modern")),
			);
		let manager = EvaluationManager::default();

		let gold = manager
			.evaluate(&f, &EvaluationContext::new().with_attribute("tier", json!("gold")))
			.unwrap();
		assert!(gold.is_enabled());
		assert_eq!(gold.variation(), "v2");

		let silver = manager
			.evaluate(&f, &EvaluationContext::new().with_attribute("tier", json!("silver")))
			.unwrap();
		assert!(!silver.is_enabled());
		assert_eq!(silver.variation(), "v1");
	}

	#[test]
	fn test_schedule_vetoes_targeting() {
		let future = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
		let f = flag(
			EvaluationModeSet::new()
				.with(EvaluationMode::Scheduled)
				.with(EvaluationMode::TargetingRules),
		)
		.with_schedule(ActivationSchedule::new(Some(future), None).unwrap())
		.with_targeting_rule(TargetingRule::string("tier", StringOperator::In, ["gold"], "on"));
		let ctx = EvaluationContext::new()
			.with_attribute("tier", json!("gold"))
			.at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

		let result = EvaluationManager::default().evaluate(&f, &ctx).unwrap();
		assert!(!result.is_enabled());
		assert!(result.reason().starts_with("scheduled to enable at"));
	}

	#[test]
	fn test_window_and_user_rollout_combined() {
		let window = OperationalWindow::new(
			NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
			NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
			Some("America/New_York".to_string()),
			vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
		)
		.unwrap();
		let f = flag(
			EvaluationModeSet::new()
				.with(EvaluationMode::TimeWindow)
				.with(EvaluationMode::UserTargeted),
		)
		.with_window(window)
		.with_user_access(AccessControl::default().allow("ops"));

		let saturday = Utc.with_ymd_and_hms(2025, 3, 1, 14, 30, 0).unwrap();
		let wednesday = Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap();
		let manager = EvaluationManager::default();

		let ctx = EvaluationContext::new().with_user_id("ops");
		assert!(!manager.evaluate(&f, &ctx.clone().at(saturday)).unwrap().is_enabled());
		assert!(manager.evaluate(&f, &ctx.at(wednesday)).unwrap().is_enabled());

		let outsider = EvaluationContext::new().with_user_id("guest").at(wednesday);
		assert!(!manager.evaluate(&f, &outsider).unwrap().is_enabled());
	}

	#[test]
	fn test_missing_user_id_surfaces_error() {
		let f = flag(EvaluationModeSet::single(EvaluationMode::UserRolloutPercentage))
			.with_user_access(AccessControl::new(50).unwrap());
		let err = EvaluationManager::default()
			.evaluate(&f, &EvaluationContext::new())
			.unwrap_err();
		assert!(matches!(err, FlagsError::MissingSubject { .. }));
	}
}
