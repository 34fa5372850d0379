// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde_json::json;
use switchboard_core::{
	AccessControl, AccessDecision, EvaluationContext, EvaluationMode, EvaluationResult,
	FlagConfiguration, FlagsError, Result, SubjectKind,
};

use crate::evaluator::{EvaluationOrder, Evaluator};

/// Allow/deny lists and percentage rollout for one subject kind.
///
/// The tenant and user evaluators share this implementation; they differ in
/// which id, which [`AccessControl`] and which modes they read.
#[derive(Debug, Clone, Copy)]
pub struct RolloutEvaluator {
	kind: SubjectKind,
}

impl RolloutEvaluator {
	pub fn tenant() -> Self {
		Self {
			kind: SubjectKind::Tenant,
		}
	}

	pub fn user() -> Self {
		Self {
			kind: SubjectKind::User,
		}
	}

	pub fn kind(&self) -> SubjectKind {
		self.kind
	}

	fn modes(&self) -> [EvaluationMode; 2] {
		match self.kind {
			SubjectKind::Tenant => [
				EvaluationMode::TenantRolloutPercentage,
				EvaluationMode::TenantTargeted,
			],
			SubjectKind::User => [
				EvaluationMode::UserRolloutPercentage,
				EvaluationMode::UserTargeted,
			],
		}
	}

	fn access<'a>(&self, flag: &'a FlagConfiguration) -> &'a AccessControl {
		match self.kind {
			SubjectKind::Tenant => &flag.tenant_access,
			SubjectKind::User => &flag.user_access,
		}
	}

	fn subject<'a>(&self, ctx: &'a EvaluationContext) -> Option<&'a str> {
		match self.kind {
			SubjectKind::Tenant => ctx.tenant(),
			SubjectKind::User => ctx.user(),
		}
	}
}

impl Evaluator for RolloutEvaluator {
	fn order(&self) -> EvaluationOrder {
		match self.kind {
			SubjectKind::Tenant => EvaluationOrder::TenantRollout,
			SubjectKind::User => EvaluationOrder::UserRollout,
		}
	}

	fn can_process(&self, flag: &FlagConfiguration, _ctx: &EvaluationContext) -> bool {
		!flag.modes.is_terminal()
			&& (flag.modes.contains_any(&self.modes()) || self.access(flag).has_restrictions())
	}

	fn process(
		&self,
		flag: &FlagConfiguration,
		ctx: &EvaluationContext,
	) -> Result<Option<EvaluationResult>> {
		let subject_id = self.subject(ctx).ok_or(FlagsError::MissingSubject {
			evaluator: self.name(),
			subject: self.kind,
		})?;

		let access = self.access(flag);
		let decision = access.evaluate(flag.key(), self.kind, subject_id);
		let reason = match decision {
			AccessDecision::Blocked => format!("{} '{}' is blocked", self.kind, subject_id),
			AccessDecision::Allowed => {
				format!("{} '{}' is explicitly allowed", self.kind, subject_id)
			}
			AccessDecision::InRollout { bucket } => format!(
				"{} '{}' is within {}% rollout (bucket {})",
				self.kind, subject_id, access.rollout_percentage, bucket
			),
			AccessDecision::OutOfRollout { bucket } => format!(
				"{} '{}' is outside {}% rollout (bucket {})",
				self.kind, subject_id, access.rollout_percentage, bucket
			),
		};

		let mut result = EvaluationResult::new(
			decision.is_enabled(),
			flag.variations.default_variation.clone(),
			reason,
		)
		.with_metadata("evaluator", json!(self.name()))
		.with_metadata("subject", json!(subject_id));
		if let Some(bucket) = decision.bucket() {
			result = result.with_metadata("bucket", json!(bucket));
		}
		Ok(Some(result))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use switchboard_core::{EvaluationModeSet, FlagIdentifier};

	fn flag(modes: EvaluationModeSet) -> FlagConfiguration {
		FlagConfiguration::new(FlagIdentifier::global("rollout-flag").unwrap(), modes)
	}

	#[test]
	fn test_applies_for_mode_or_restrictions() {
		let ctx = EvaluationContext::new();
		let tenant = RolloutEvaluator::tenant();

		let by_mode = flag(EvaluationModeSet::single(EvaluationMode::TenantTargeted));
		assert!(tenant.can_process(&by_mode, &ctx));
		assert!(!RolloutEvaluator::user().can_process(&by_mode, &ctx));

		let by_restriction = flag(EvaluationModeSet::single(EvaluationMode::Scheduled))
			.with_tenant_access(AccessControl::default().block("acme"));
		assert!(tenant.can_process(&by_restriction, &ctx));

		let unrestricted = flag(EvaluationModeSet::single(EvaluationMode::Scheduled));
		assert!(!tenant.can_process(&unrestricted, &ctx));
	}

	#[test]
	fn test_never_applies_to_terminal_modes() {
		let ctx = EvaluationContext::new();
		let disabled = flag(EvaluationModeSet::disabled())
			.with_user_access(AccessControl::default().allow("u1"));
		assert!(!RolloutEvaluator::user().can_process(&disabled, &ctx));
	}

	#[test]
	fn test_missing_subject_is_precondition_error() {
		let f = flag(EvaluationModeSet::single(EvaluationMode::TenantRolloutPercentage));
		let ctx = EvaluationContext::new().with_user_id("u1");
		let err = RolloutEvaluator::tenant().process(&f, &ctx).unwrap_err();
		assert!(err.is_precondition());
		assert!(matches!(
			err,
			FlagsError::MissingSubject {
				evaluator: "TenantRollout",
				subject: SubjectKind::Tenant
			}
		));
	}

	#[test]
	fn test_blocked_user_disabled() {
		let f = flag(EvaluationModeSet::single(EvaluationMode::UserTargeted))
			.with_user_access(AccessControl::new(100).unwrap().block("mallory"));
		let ctx = EvaluationContext::new().with_user_id("mallory");
		let result = RolloutEvaluator::user().process(&f, &ctx).unwrap().unwrap();
		assert!(!result.is_enabled());
		assert_eq!(result.reason(), "user 'mallory' is blocked");
		assert_eq!(result.metadata()["evaluator"], json!("UserRollout"));
	}

	#[test]
	fn test_rollout_reports_bucket() {
		let f = flag(EvaluationModeSet::single(EvaluationMode::TenantRolloutPercentage))
			.with_tenant_access(AccessControl::new(100).unwrap());
		let ctx = EvaluationContext::new().with_tenant_id("acme");
		let result = RolloutEvaluator::tenant().process(&f, &ctx).unwrap().unwrap();
		assert!(result.is_enabled());
		let expected = switchboard_core::rollout_bucket("rollout-flag", SubjectKind::Tenant, "acme");
		assert_eq!(result.metadata()["bucket"], json!(expected));
		assert_eq!(result.metadata()["subject"], json!("acme"));
	}
}
