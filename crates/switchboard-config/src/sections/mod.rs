// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod application;
mod cache;
mod provisioning;

pub use application::{ApplicationConfig, ApplicationConfigLayer};
pub use cache::{
	CacheConfig, CacheConfigLayer, DEFAULT_DISTRIBUTED_TTL_SECS, DEFAULT_LOCAL_CAPACITY,
	DEFAULT_LOCAL_TTL_SECS, DISTRIBUTED_TTL_RANGE_SECS, LOCAL_TTL_RANGE_SECS,
};
pub use provisioning::{DefaultMode, ProvisioningConfig, ProvisioningConfigLayer};
