// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Switchboard feature flag client.
//!
//! [`FlagEvaluator`] is the entry point. It reads flag configurations through
//! a [`FlagCache`], falls back to a [`FlagConfigurationRepository`] on a miss,
//! and auto-provisions flags it has never seen.
//!
//! # Example
//!
//! ```ignore
//! use switchboard::{EvaluationContext, FlagEvaluator};
//!
//! let evaluator = FlagEvaluator::builder()
//!     .config(&switchboard::load_config()?)
//!     .repository(my_repository)
//!     .build()?;
//!
//! let ctx = EvaluationContext::new().with_user_id("user-123");
//! if evaluator.is_enabled("new-checkout", &ctx).await? {
//!     // ...
//! }
//!
//! let theme: String = evaluator.get_variation("theme", "light".to_string(), &ctx).await;
//! ```
//!
//! The embedding application installs the `tracing` subscriber.

pub mod cache;
pub mod error;
pub mod evaluator;
pub mod hook;
pub mod repository;
pub mod variation;

pub use cache::{FlagCache, MemoryFlagCache, NullFlagCache, SharedFlagCache, TieredFlagCache};
pub use error::{Result, SwitchboardError};
pub use evaluator::{FlagEvaluator, FlagEvaluatorBuilder};
pub use hook::{EvaluationHook, FlagEvaluated, NoOpEvaluationHook, SharedEvaluationHook};
pub use repository::FlagConfigurationRepository;
pub use variation::decode_variation;

pub use switchboard_config::{load_config, load_config_with_file, SwitchboardConfig};
pub use switchboard_core::{
	AccessControl, ActivationSchedule, EvaluationContext, EvaluationMode, EvaluationModeSet,
	EvaluationResult, FlagConfigId, FlagConfiguration, FlagIdentifier, FlagScope, FlagsError,
	NumericOperator, OperationalWindow, StringOperator, SubjectKind, TargetingRule, Variations,
};
pub use switchboard_engine::{EvaluationManager, Evaluator};
