// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Consistent hashing used for sticky bucketing.
//!
//! Every bucketing decision in the engine goes through [`hash`]: the first
//! 32 bits (big-endian) of the SHA-256 digest of the UTF-8 input. SHA-256 is
//! stable across platforms, processes and releases, so a subject keeps its
//! bucket for as long as the flag key and subject id stay the same.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of rollout buckets.
pub const BUCKET_COUNT: u32 = 100;

/// The kind of subject a rollout decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
	User,
	Tenant,
}

impl SubjectKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			SubjectKind::User => "user",
			SubjectKind::Tenant => "tenant",
		}
	}
}

impl fmt::Display for SubjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Hashes `input` to a `u32` taken from the leading bytes of its SHA-256 digest.
pub fn hash(input: &str) -> u32 {
	let digest = Sha256::digest(input.as_bytes());
	u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Builds the hash input for a subject's rollout bucket: `"{flag_key}:{kind}:{subject_id}"`.
pub fn rollout_key(flag_key: &str, kind: SubjectKind, subject_id: &str) -> String {
	format!("{}:{}:{}", flag_key, kind, subject_id)
}

/// Returns the rollout bucket (`0..100`) for a subject of a flag.
pub fn rollout_bucket(flag_key: &str, kind: SubjectKind, subject_id: &str) -> u32 {
	hash(&rollout_key(flag_key, kind, subject_id)) % BUCKET_COUNT
}

/// Returns true if the subject falls inside a `percentage` rollout.
///
/// Inclusion is monotonic in `percentage`: a subject included at `p` is
/// included at every `q >= p`.
pub fn in_rollout(flag_key: &str, kind: SubjectKind, subject_id: &str, percentage: u8) -> bool {
	rollout_bucket(flag_key, kind, subject_id) < u32::from(percentage)
}
