// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag evaluation engine for Switchboard.
//!
//! Six evaluators each own one concern of a flag configuration and run in a
//! fixed order:
//!
//! 1. `TenantRollout` - tenant allow/deny lists and percentage rollout
//! 2. `UserRollout` - the same for users
//! 3. `ActivationSchedule` - calendar enable/disable instants
//! 4. `OperationalWindow` - recurring time-of-day and day-of-week window
//! 5. `CustomTargeting` - attribute rules, first match wins
//! 6. `Terminal` - flags that are simply on or off
//!
//! [`EvaluationManager`] runs the applicable evaluators and stops at the first
//! disabled result. An enabled flag always gets its variation from
//! `Variations::select_variation_for`. Evaluation is synchronous and performs no I/O.

pub mod evaluator;
pub mod evaluators;
pub mod manager;

pub use evaluator::{EvaluationOrder, Evaluator};
pub use evaluators::{
	standard_evaluators, ActivationScheduleEvaluator, CustomTargetingEvaluator,
	OperationalWindowEvaluator, RolloutEvaluator, TerminalEvaluator,
};
pub use manager::{EvaluationManager, NO_MODES_REASON};
