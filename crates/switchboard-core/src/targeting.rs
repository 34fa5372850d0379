// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based targeting rules.
//!
//! Rules are evaluated in declaration order against the context attributes;
//! the first rule that matches decides the variation. A rule whose attribute
//! is missing from the context never matches, including the negated
//! operators.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operators shared by string and numeric rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringOperator {
	Equals,
	NotEquals,
	Contains,
	NotContains,
	In,
	NotIn,
}

impl StringOperator {
	/// Case-insensitive comparison of `actual` against the rule values.
	pub fn matches(&self, actual: &str, values: &[String]) -> bool {
		let actual = actual.to_lowercase();
		let any_equal = || values.iter().any(|v| v.to_lowercase() == actual);
		let any_contained = || values.iter().any(|v| actual.contains(&v.to_lowercase()));
		match self {
			StringOperator::Equals | StringOperator::In => any_equal(),
			StringOperator::NotEquals | StringOperator::NotIn => !any_equal(),
			StringOperator::Contains => any_contained(),
			StringOperator::NotContains => !any_contained(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericOperator {
	Equals,
	NotEquals,
	Contains,
	NotContains,
	In,
	NotIn,
	GreaterThan,
	LessThan,
}

impl NumericOperator {
	fn as_string_operator(&self) -> Option<StringOperator> {
		match self {
			NumericOperator::Equals => Some(StringOperator::Equals),
			NumericOperator::NotEquals => Some(StringOperator::NotEquals),
			NumericOperator::Contains => Some(StringOperator::Contains),
			NumericOperator::NotContains => Some(StringOperator::NotContains),
			NumericOperator::In => Some(StringOperator::In),
			NumericOperator::NotIn => Some(StringOperator::NotIn),
			NumericOperator::GreaterThan | NumericOperator::LessThan => None,
		}
	}

	pub fn matches(&self, actual: f64, values: &[f64]) -> bool {
		match self {
			NumericOperator::GreaterThan => values.first().is_some_and(|v| actual > *v),
			NumericOperator::LessThan => values.first().is_some_and(|v| actual < *v),
			_ => match self.as_string_operator() {
				Some(op) => {
					let values: Vec<String> = values.iter().map(|v| canonical_number(*v)).collect();
					op.matches(&canonical_number(actual), &values)
				}
				None => false,
			},
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringRule {
	pub attribute: String,
	pub operator: StringOperator,
	pub values: Vec<String>,
	pub variation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRule {
	pub attribute: String,
	pub operator: NumericOperator,
	pub values: Vec<f64>,
	pub variation: String,
}

/// A single targeting rule, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetingRule {
	String(StringRule),
	Numeric(NumericRule),
}

impl TargetingRule {
	pub fn string(
		attribute: impl Into<String>,
		operator: StringOperator,
		values: impl IntoIterator<Item = impl Into<String>>,
		variation: impl Into<String>,
	) -> Self {
		TargetingRule::String(StringRule {
			attribute: attribute.into(),
			operator,
			values: values.into_iter().map(Into::into).collect(),
			variation: variation.into(),
		})
	}

	pub fn numeric(
		attribute: impl Into<String>,
		operator: NumericOperator,
		values: impl IntoIterator<Item = f64>,
		variation: impl Into<String>,
	) -> Self {
		TargetingRule::Numeric(NumericRule {
			attribute: attribute.into(),
			operator,
			values: values.into_iter().collect(),
			variation: variation.into(),
		})
	}

	pub fn attribute(&self) -> &str {
		match self {
			TargetingRule::String(rule) => &rule.attribute,
			TargetingRule::Numeric(rule) => &rule.attribute,
		}
	}

	pub fn variation(&self) -> &str {
		match self {
			TargetingRule::String(rule) => &rule.variation,
			TargetingRule::Numeric(rule) => &rule.variation,
		}
	}

	pub fn matches(&self, attributes: &HashMap<String, Value>) -> bool {
		let Some(actual) = attributes.get(self.attribute()) else {
			return false;
		};
		match self {
			TargetingRule::String(rule) => match attribute_as_string(actual) {
				Some(actual) => rule.operator.matches(&actual, &rule.values),
				None => false,
			},
			TargetingRule::Numeric(rule) => match attribute_as_number(actual) {
				Some(actual) => rule.operator.matches(actual, &rule.values),
				None => false,
			},
		}
	}
}

/// Returns the first rule matching `attributes`.
pub fn first_match<'a>(
	rules: &'a [TargetingRule],
	attributes: &HashMap<String, Value>,
) -> Option<&'a TargetingRule> {
	rules.iter().find(|rule| rule.matches(attributes))
}

fn attribute_as_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.as_f64().map_or_else(|| n.to_string(), canonical_number)),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn attribute_as_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
		_ => None,
	}
}

/// `5.0` renders as `"5"`, `5.25` as `"5.25"`.
fn canonical_number(value: f64) -> String {
	if value.fract() == 0.0 && value.abs() < 1e15 {
		format!("{}", value as i64)
	} else {
		format!("{}", value)
	}
}
