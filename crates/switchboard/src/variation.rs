// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decoding of stored variation values into caller types.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a variation value into `T`.
///
/// Tries, in order: the value as is, a string holding JSON, and a number or
/// boolean read as its string form. The error from the direct attempt is
/// returned if every shape fails.
pub fn decode_variation<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
	let direct = match serde_json::from_value::<T>(value.clone()) {
		Ok(decoded) => return Ok(decoded),
		Err(e) => e,
	};

	let fallback = match value {
		Value::String(raw) => serde_json::from_str::<T>(raw),
		Value::Number(n) => serde_json::from_value::<T>(Value::String(n.to_string())),
		Value::Bool(b) => serde_json::from_value::<T>(Value::String(b.to_string())),
		_ => return Err(direct),
	};
	fallback.map_err(|_| direct)
}
