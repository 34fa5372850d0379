// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recurring time-of-day / day-of-week windows.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FlagsError, Result};
use crate::schedule::GateDecision;

const ALL_DAYS: [Weekday; 7] = [
	Weekday::Mon,
	Weekday::Tue,
	Weekday::Wed,
	Weekday::Thu,
	Weekday::Fri,
	Weekday::Sat,
	Weekday::Sun,
];

/// Windows zone ids that show up in existing flag data, mapped to IANA.
const WINDOWS_ZONES: &[(&str, &str)] = &[
	("UTC", "UTC"),
	("Eastern Standard Time", "America/New_York"),
	("Central Standard Time", "America/Chicago"),
	("Mountain Standard Time", "America/Denver"),
	("Pacific Standard Time", "America/Los_Angeles"),
	("GMT Standard Time", "Europe/London"),
	("W. Europe Standard Time", "Europe/Berlin"),
	("Romance Standard Time", "Europe/Paris"),
	("Central European Standard Time", "Europe/Warsaw"),
	("Tokyo Standard Time", "Asia/Tokyo"),
	("China Standard Time", "Asia/Shanghai"),
	("India Standard Time", "Asia/Kolkata"),
	("AUS Eastern Standard Time", "Australia/Sydney"),
];

/// Resolves an IANA or Windows time zone id.
pub fn resolve_time_zone(id: &str) -> Result<Tz> {
	let id = id.trim();
	if let Ok(tz) = id.parse::<Tz>() {
		return Ok(tz);
	}
	WINDOWS_ZONES
		.iter()
		.find(|(windows, _)| windows.eq_ignore_ascii_case(id))
		.and_then(|(_, iana)| iana.parse::<Tz>().ok())
		.ok_or_else(|| FlagsError::UnknownTimeZone(id.to_string()))
}

fn all_days() -> Vec<Weekday> {
	ALL_DAYS.to_vec()
}

/// A recurring window, `[start_on, stop_on)` on each day in `days_active`.
///
/// `start_on == stop_on` covers the whole day. `start_on > stop_on` wraps past
/// midnight and the early-morning part counts toward the previous day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalWindow {
	pub start_on: NaiveTime,
	pub stop_on: NaiveTime,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub time_zone: Option<String>,
	#[serde(default = "all_days")]
	pub days_active: Vec<Weekday>,
}

impl Default for OperationalWindow {
	fn default() -> Self {
		Self::always_open()
	}
}

impl OperationalWindow {
	pub fn new(
		start_on: NaiveTime,
		stop_on: NaiveTime,
		time_zone: Option<String>,
		days_active: Vec<Weekday>,
	) -> Result<Self> {
		let window = Self {
			start_on,
			stop_on,
			time_zone,
			days_active,
		};
		window.validate()?;
		Ok(window)
	}

	/// All seven days, full 24 hours.
	pub fn always_open() -> Self {
		Self {
			start_on: NaiveTime::MIN,
			stop_on: NaiveTime::MIN,
			time_zone: None,
			days_active: all_days(),
		}
	}

	pub fn is_always_open(&self) -> bool {
		self.start_on == self.stop_on && ALL_DAYS.iter().all(|d| self.days_active.contains(d))
	}

	pub fn validate(&self) -> Result<()> {
		if self.days_active.is_empty() {
			return Err(FlagsError::InvalidWindow(
				"at least one active day is required".to_string(),
			));
		}
		if let Some(zone) = &self.time_zone {
			resolve_time_zone(zone)?;
		}
		Ok(())
	}

	/// Checks `instant` against the window.
	///
	/// The caller's `context_zone` wins over the window's own zone; with
	/// neither set the check runs in UTC. An unresolvable zone closes the
	/// window.
	pub fn is_active_at(&self, instant: DateTime<Utc>, context_zone: Option<&str>) -> GateDecision {
		let zone_id = context_zone
			.filter(|zone| !zone.trim().is_empty())
			.or(self.time_zone.as_deref());
		let tz = match zone_id {
			Some(id) => match resolve_time_zone(id) {
				Ok(tz) => tz,
				Err(_) => return GateDecision::closed(format!("unknown time zone '{}'", id)),
			},
			None => Tz::UTC,
		};

		let local = instant.with_timezone(&tz);
		let time = local.time();
		let today = local.weekday();

		// Which calendar day the matching window opened on, if any.
		let window_day = if self.start_on == self.stop_on {
			Some(today)
		} else if self.start_on < self.stop_on {
			(time >= self.start_on && time < self.stop_on).then_some(today)
		} else if time >= self.start_on {
			Some(today)
		} else if time < self.stop_on {
			Some(today.pred())
		} else {
			None
		};

		let window_label = format!(
			"{}-{} {}",
			self.start_on.format("%H:%M"),
			self.stop_on.format("%H:%M"),
			tz.name()
		);

		match window_day {
			None => GateDecision::closed(format!(
				"{} is outside operational window {}",
				time.format("%H:%M"),
				window_label
			)),
			Some(day) if !self.days_active.contains(&day) => GateDecision::closed(format!(
				"{} is not an active day for operational window {}",
				day, window_label
			)),
			Some(day) => GateDecision::open(format!(
				"within operational window {} on {}",
				window_label, day
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn hm(h: u32, m: u32) -> NaiveTime {
		NaiveTime::from_hms_opt(h, m, 0).unwrap()
	}

	fn business_hours_ny() -> OperationalWindow {
		OperationalWindow::new(
			hm(9, 0),
			hm(17, 0),
			Some("America/New_York".to_string()),
			vec![
				Weekday::Mon,
				Weekday::Tue,
				Weekday::Wed,
				Weekday::Thu,
				Weekday::Fri,
			],
		)
		.unwrap()
	}

	#[test]
	fn test_new_york_saturday_morning_is_closed() {
		// 2025-03-01 is a Saturday; 14:30 UTC = 09:30 EST
		let instant = Utc.with_ymd_and_hms(2025, 3, 1, 14, 30, 0).unwrap();
		let decision = business_hours_ny().is_active_at(instant, None);
		assert!(!decision.active, "{}", decision.reason);
	}

	#[test]
	fn test_new_york_wednesday_morning_is_open() {
		// 2025-03-05 is a Wednesday; 15:00 UTC = 10:00 EST
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap();
		let decision = business_hours_ny().is_active_at(instant, None);
		assert!(decision.active, "{}", decision.reason);
	}

	#[test]
	fn test_day_check_uses_target_zone() {
		// Friday 23:00 in New York is already Saturday in UTC.
		let window = OperationalWindow::new(
			hm(0, 0),
			hm(0, 0),
			Some("America/New_York".to_string()),
			vec![Weekday::Fri],
		)
		.unwrap();
		let instant = Utc.with_ymd_and_hms(2025, 3, 8, 4, 0, 0).unwrap();
		assert!(window.is_active_at(instant, None).active);
	}

	#[test]
	fn test_half_open_time_range() {
		let window = OperationalWindow::new(hm(9, 0), hm(17, 0), None, ALL_DAYS.to_vec()).unwrap();
		let day = |h, m| Utc.with_ymd_and_hms(2025, 3, 5, h, m, 0).unwrap();
		assert!(!window.is_active_at(day(8, 59), None).active);
		assert!(window.is_active_at(day(9, 0), None).active);
		assert!(window.is_active_at(day(16, 59), None).active);
		assert!(!window.is_active_at(day(17, 0), None).active);
	}

	#[test]
	fn test_wrapping_window_counts_toward_previous_day() {
		// 22:00-02:00 Friday only
		let window = OperationalWindow::new(hm(22, 0), hm(2, 0), None, vec![Weekday::Fri]).unwrap();
		// Friday 23:00
		assert!(window
			.is_active_at(Utc.with_ymd_and_hms(2025, 3, 7, 23, 0, 0).unwrap(), None)
			.active);
		// Saturday 01:00 belongs to Friday's window
		assert!(window
			.is_active_at(Utc.with_ymd_and_hms(2025, 3, 8, 1, 0, 0).unwrap(), None)
			.active);
		// Saturday 23:00 is Saturday's window, not active
		assert!(!window
			.is_active_at(Utc.with_ymd_and_hms(2025, 3, 8, 23, 0, 0).unwrap(), None)
			.active);
		// Friday 01:00 belongs to Thursday's window
		assert!(!window
			.is_active_at(Utc.with_ymd_and_hms(2025, 3, 7, 1, 0, 0).unwrap(), None)
			.active);
		// Friday 12:00 is between the two halves
		assert!(!window
			.is_active_at(Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap(), None)
			.active);
	}

	#[test]
	fn test_context_zone_used_when_window_has_none() {
		let window = OperationalWindow::new(hm(9, 0), hm(17, 0), None, ALL_DAYS.to_vec()).unwrap();
		// 14:30 UTC = 23:30 in Tokyo
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 14, 30, 0).unwrap();
		assert!(window.is_active_at(instant, None).active);
		assert!(!window.is_active_at(instant, Some("Asia/Tokyo")).active);
	}

	#[test]
	fn test_context_zone_wins_over_window_zone() {
		// Wednesday 15:00 UTC: 10:00 in New York, Thursday 00:00 in Tokyo
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap();
		let window = business_hours_ny();
		assert!(window.is_active_at(instant, None).active);

		let decision = window.is_active_at(instant, Some("Asia/Tokyo"));
		assert!(!decision.active, "{}", decision.reason);
		assert!(decision.reason.contains("Asia/Tokyo"));
	}

	#[test]
	fn test_blank_context_zone_is_ignored() {
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap();
		assert!(business_hours_ny().is_active_at(instant, Some("  ")).active);
	}

	#[test]
	fn test_unknown_context_zone_closes_window() {
		let instant = Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap();
		let decision = business_hours_ny().is_active_at(instant, Some("Mars/Base"));
		assert!(!decision.active);
		assert!(decision.reason.contains("unknown time zone"));
	}

	#[test]
	fn test_unknown_zone_closes_window() {
		let window = OperationalWindow {
			time_zone: Some("Mars/Olympus_Mons".to_string()),
			..OperationalWindow::always_open()
		};
		let decision = window.is_active_at(Utc::now(), None);
		assert!(!decision.active);
		assert!(decision.reason.contains("unknown time zone"));
	}

	#[test]
	fn test_windows_zone_ids_resolve() {
		assert_eq!(
			resolve_time_zone("Eastern Standard Time").unwrap(),
			chrono_tz::America::New_York
		);
		assert_eq!(resolve_time_zone("Tokyo Standard Time").unwrap(), chrono_tz::Asia::Tokyo);
		assert!(resolve_time_zone("Nowhere Standard Time").is_err());
	}

	#[test]
	fn test_always_open() {
		let window = OperationalWindow::always_open();
		assert!(window.is_always_open());
		assert!(window.is_active_at(Utc::now(), None).active);
	}

	#[test]
	fn test_validate_rejects_empty_days_and_bad_zone() {
		assert!(OperationalWindow::new(hm(9, 0), hm(17, 0), None, vec![]).is_err());
		assert!(matches!(
			OperationalWindow::new(hm(9, 0), hm(17, 0), Some("Bogus/Zone".to_string()), vec![Weekday::Mon]),
			Err(FlagsError::UnknownTimeZone(_))
		));
	}

	#[test]
	fn test_days_active_defaults_to_all_days() {
		let window: OperationalWindow =
			serde_json::from_str(r#"{"start_on":"09:00:00","stop_on":"17:00:00"}"#).unwrap();
		assert_eq!(window.days_active.len(), 7);
	}
}
