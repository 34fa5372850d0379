// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Switchboard feature flag engine.
//!
//! This crate provides the data model shared by the evaluation engine and the
//! client facade:
//!
//! - **Hasher**: SHA-256 based sticky bucketing for rollouts and variations
//! - **FlagIdentifier**: key plus global or application scope
//! - **EvaluationModeSet**: the modes active on a flag
//! - **ActivationSchedule / OperationalWindow**: pure time-based gates
//! - **AccessControl**: allow/deny lists and percentage rollout per subject kind
//! - **TargetingRule**: attribute rules evaluated in order, first match wins
//! - **Variations**: named variation values and deterministic selection
//! - **EvaluationContext / EvaluationResult**: evaluation input and output
//!
//! Nothing here performs I/O.

pub mod access;
pub mod error;
pub mod evaluation;
pub mod flag;
pub mod hash;
pub mod identifier;
pub mod mode;
pub mod schedule;
pub mod targeting;
pub mod variation;
pub mod window;

pub use access::{AccessControl, AccessDecision};
pub use error::{FlagsError, Result};
pub use evaluation::{EvaluationContext, EvaluationResult, ANONYMOUS_SUBJECT};
pub use flag::{FlagConfigId, FlagConfiguration};
pub use hash::{hash, in_rollout, rollout_bucket, rollout_key, SubjectKind, BUCKET_COUNT};
pub use identifier::{FlagIdentifier, FlagScope, CACHE_KEY_PREFIX};
pub use mode::{EvaluationMode, EvaluationModeSet};
pub use schedule::{ActivationSchedule, GateDecision};
pub use targeting::{
	first_match, NumericOperator, NumericRule, StringOperator, StringRule, TargetingRule,
};
pub use variation::{Variations, VARIATION_OFF, VARIATION_ON};
pub use window::{resolve_time_zone, OperationalWindow};
