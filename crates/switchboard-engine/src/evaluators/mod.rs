// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod rollout;
mod schedule;
mod targeting;
mod terminal;
mod window;

pub use rollout::RolloutEvaluator;
pub use schedule::ActivationScheduleEvaluator;
pub use targeting::CustomTargetingEvaluator;
pub use terminal::TerminalEvaluator;
pub use window::OperationalWindowEvaluator;

use crate::evaluator::Evaluator;

/// The six built-in evaluators.
pub fn standard_evaluators() -> Vec<Box<dyn Evaluator>> {
	vec![
		Box::new(RolloutEvaluator::tenant()),
		Box::new(RolloutEvaluator::user()),
		Box::new(ActivationScheduleEvaluator),
		Box::new(OperationalWindowEvaluator),
		Box::new(CustomTargetingEvaluator),
		Box::new(TerminalEvaluator),
	]
}
