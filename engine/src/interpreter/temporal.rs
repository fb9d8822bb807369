//! Temporal qualifier extraction
//!
//! Turns date wording into a half-open UTC window. Candidates are collected
//! with their byte spans so that a bare year inside "March 2023" or inside an
//! ISO date is not double-counted. Overlapping windows intersect; disjoint
//! windows make the question ambiguous.
//!
//! All relative phrases resolve against a caller-supplied "now", which keeps
//! the rule deterministic and testable.

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc};
use regex::Regex;
use sdk::errors::ExplorerError;
use std::ops::Range;

/// Half-open `[start, end)` UTC window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

const MONTHS: [(&str, u32); 12] = [
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Extracts a time window from a lowercased question.
pub struct TemporalRule {
    iso_range: Regex,
    month_year: Regex,
    month_alone: Regex,
    bare_year: Regex,
    relative_count: Regex,
    relative_single: Regex,
}

impl TemporalRule {
    pub fn new() -> anyhow::Result<Self> {
        let month_names = MONTHS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            iso_range: Regex::new(
                r"(\d{4}-\d{2}-\d{2})\s*(?:to|through|until|and|–)\s*(\d{4}-\d{2}-\d{2})",
            )?,
            month_year: Regex::new(&format!(r"\b({month_names})\s+(?:of\s+)?(\d{{4}})\b"))?,
            month_alone: Regex::new(&format!(r"\b({month_names})\b"))?,
            bare_year: Regex::new(r"\b((?:19|20)\d{2})\b")?,
            relative_count: Regex::new(r"\b(?:last|past)\s+(\d+)\s+(day|week|month)s?\b")?,
            relative_single: Regex::new(r"\b(?:last|past)\s+(day|week|month|year)\b")?,
        })
    }

    /// Extract a time window from `text` (already lowercased).
    ///
    /// Returns `Ok(None)` when no temporal qualifier is present, and
    /// `AmbiguousQuery` when two qualifiers denote disjoint windows.
    pub fn extract(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TimeWindow>, ExplorerError> {
        // (span, window, wording) in priority order; lower-priority matches
        // whose span overlaps a claimed one are duplicates, not new clauses.
        let mut claimed: Vec<Range<usize>> = Vec::new();
        let mut candidates: Vec<(TimeWindow, String)> = Vec::new();

        let push = |span: Range<usize>,
                        window: Option<TimeWindow>,
                        wording: &str,
                        claimed: &mut Vec<Range<usize>>,
                        candidates: &mut Vec<(TimeWindow, String)>| {
            if claimed.iter().any(|c| spans_overlap(c, &span)) {
                return;
            }
            if let Some(window) = window {
                claimed.push(span);
                candidates.push((window, wording.to_string()));
            }
        };

        for caps in self.iso_range.captures_iter(text) {
            let all = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let window = iso_day_range(&caps[1], &caps[2]);
            push(all, window, &caps[0], &mut claimed, &mut candidates);
        }

        for caps in self.month_year.captures_iter(text) {
            let all = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let year: i32 = caps[2].parse().unwrap_or(0);
            let window = month_number(&caps[1]).and_then(|m| month_window(year, m));
            push(all, window, &caps[0], &mut claimed, &mut candidates);
        }

        for caps in self.relative_count.captures_iter(text) {
            let all = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let count: i64 = caps[1].parse().unwrap_or(0);
            let window = trailing_window(now, count, &caps[2]);
            push(all, window, &caps[0], &mut claimed, &mut candidates);
        }

        for caps in self.relative_single.captures_iter(text) {
            let all = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let window = trailing_window(now, 1, &caps[1]);
            push(all, window, &caps[0], &mut claimed, &mut candidates);
        }

        for caps in self.month_alone.captures_iter(text) {
            let all = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let window = month_number(&caps[1]).and_then(|m| recent_month_window(now, m));
            push(all, window, &caps[0], &mut claimed, &mut candidates);
        }

        for caps in self.bare_year.captures_iter(text) {
            let all = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let year: i32 = caps[1].parse().unwrap_or(0);
            let window = year_window(year);
            push(all, window, &caps[0], &mut claimed, &mut candidates);
        }

        let mut iter = candidates.into_iter();
        let Some((mut acc, mut acc_name)) = iter.next() else {
            return Ok(None);
        };

        for (window, name) in iter {
            match acc.intersect(&window) {
                Some(merged) => {
                    acc = merged;
                    acc_name = format!("{acc_name} and {name}");
                }
                None => {
                    return Err(ExplorerError::AmbiguousQuery(format!(
                        "the time windows \"{acc_name}\" and \"{name}\" do not overlap"
                    )));
                }
            }
        }

        Ok(Some(acc))
    }
}

fn spans_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, number)| *number)
}

fn utc_day(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// Inclusive ISO day range -> half-open window.
fn iso_day_range(start: &str, end: &str) -> Option<TimeWindow> {
    let start: DateTime<Utc> = format!("{start}T00:00:00Z").parse().ok()?;
    let end_day: DateTime<Utc> = format!("{end}T00:00:00Z").parse().ok()?;
    let end = end_day + Duration::days(1);
    (start < end).then_some(TimeWindow { start, end })
}

fn month_window(year: i32, month: u32) -> Option<TimeWindow> {
    let start = utc_day(year, month, 1)?;
    let end = start.checked_add_months(Months::new(1))?;
    Some(TimeWindow { start, end })
}

/// A bare month name means the most recent occurrence of that month whose
/// start is not in the future.
fn recent_month_window(now: DateTime<Utc>, month: u32) -> Option<TimeWindow> {
    let window = month_window(now.year(), month)?;
    if window.start <= now {
        Some(window)
    } else {
        month_window(now.year() - 1, month)
    }
}

fn year_window(year: i32) -> Option<TimeWindow> {
    let start = utc_day(year, 1, 1)?;
    let end = utc_day(year + 1, 1, 1)?;
    Some(TimeWindow { start, end })
}

/// "last N days/weeks/months" or "last year" as a rolling window ending now.
fn trailing_window(now: DateTime<Utc>, count: i64, unit: &str) -> Option<TimeWindow> {
    if count <= 0 {
        return None;
    }
    let start = match unit {
        "day" => now - Duration::days(count),
        "week" => now - Duration::weeks(count),
        "month" => now.checked_sub_months(Months::new(count.min(1200) as u32))?,
        "year" => now.checked_sub_months(Months::new((count.min(100) * 12) as u32))?,
        _ => return None,
    };
    Some(TimeWindow { start, end: now })
}
