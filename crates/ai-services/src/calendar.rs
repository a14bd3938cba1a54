// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Natural-language date-window filtering
//!
//! Calendar queries ("tomorrow", "this week") are resolved with plain date
//! arithmetic against a caller-supplied current time, never a model call.
//! Windows are half-open: an event is in the window when
//! `start <= starts_at < end`.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use community_types::Event;
use regex::Regex;

/// Matches "in 3 days", "next 10 days"
#[allow(clippy::unwrap_used)]
static RELATIVE_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:in|next)\s+(\d{1,3})\s+days?").unwrap());

/// A half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// Inclusive start of the window
    pub start: DateTime<Utc>,
    /// Exclusive end of the window
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Whether an instant falls inside the window
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Window covering one whole UTC calendar day
fn day_window(day_start: DateTime<Utc>) -> DateWindow {
    DateWindow {
        start: day_start,
        end: day_start + Duration::days(1),
    }
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Parse a natural-language time reference into a window relative to `now`
///
/// Recognized phrases: "today", "tomorrow", "this week" (now to now+7d),
/// "next week" (now+7d to now+14d), "this weekend" (the upcoming Saturday
/// and Sunday), "this month", and "in N days" / "next N days". Returns
/// `None` when the query carries no recognized time reference.
pub fn parse_time_phrase(query: &str, now: DateTime<Utc>) -> Option<DateWindow> {
    let normalized = query.to_lowercase();
    let today = start_of_day(now);

    if normalized.contains("tomorrow") {
        return Some(day_window(today + Duration::days(1)));
    }
    if normalized.contains("today") || normalized.contains("tonight") {
        return Some(day_window(today));
    }
    if normalized.contains("next week") {
        return Some(DateWindow {
            start: now + Duration::days(7),
            end: now + Duration::days(14),
        });
    }
    if normalized.contains("this week") {
        return Some(DateWindow {
            start: now,
            end: now + Duration::days(7),
        });
    }
    if normalized.contains("weekend") {
        // Days until the upcoming Saturday; a query made on Saturday or
        // Sunday refers to the weekend already in progress.
        let days_until_saturday = match now.weekday() {
            Weekday::Sun => -1,
            weekday => 5 - i64::from(weekday.num_days_from_monday()),
        };
        let saturday = today + Duration::days(days_until_saturday);
        return Some(DateWindow {
            start: saturday,
            end: saturday + Duration::days(2),
        });
    }
    if normalized.contains("this month") {
        return Some(DateWindow {
            start: now,
            end: now + Duration::days(30),
        });
    }

    if let Some(captures) = RELATIVE_DAYS.captures(&normalized) {
        if let Some(days) = captures.get(1).and_then(|m| m.as_str().parse::<i64>().ok()) {
            return Some(DateWindow {
                start: now,
                end: now + Duration::days(days),
            });
        }
    }

    None
}

/// Filter a caller-supplied event list by the query's time reference
///
/// A query with no recognized time reference defaults to the next 30 days.
/// Results are sorted by start time.
pub fn filter_events(query: &str, events: &[Event], now: DateTime<Utc>) -> Vec<Event> {
    let window = parse_time_phrase(query, now).unwrap_or(DateWindow {
        start: now,
        end: now + Duration::days(30),
    });

    let mut matched: Vec<Event> = events
        .iter()
        .filter(|event| window.contains(event.starts_at))
        .cloned()
        .collect();
    matched.sort_by_key(|event| event.starts_at);
    matched
}
