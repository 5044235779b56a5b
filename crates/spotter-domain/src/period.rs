//! Period module - the (year, month) buckets sightings are grouped under

use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English name of a month, 1-12
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

/// Composite grouping key: capture year and month
///
/// Keys order chronologically by (year, month). The string form is
/// `YYYY-MM` with a zero-padded month, e.g. `2026-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// Capture year
    pub year: i32,
    /// Capture month
    pub month: u32,
}

impl PeriodKey {
    /// Create a key
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Parse a key from its `YYYY-MM` form
    ///
    /// Returns `None` unless the input has exactly two numeric parts. The
    /// month is not range-checked here.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('-');
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = parts.next()?.parse::<u32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { year, month })
    }

    /// Display label, e.g. "January 2026"
    ///
    /// A month outside 1-12 has no name; the raw key is returned instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use spotter_domain::PeriodKey;
    ///
    /// assert_eq!(PeriodKey::new(2026, 1).label(), "January 2026");
    /// assert_eq!(PeriodKey::new(2026, 13).label(), "2026-13");
    /// ```
    pub fn label(&self) -> String {
        match month_name(self.month) {
            Some(name) => format!("{} {}", name, self.year),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Label for a raw `YYYY-MM` key
///
/// Malformed keys (not two parts, non-numeric) and out-of-range months fall
/// back to the raw key unchanged.
pub fn period_label(raw: &str) -> String {
    match PeriodKey::parse(raw) {
        Some(key) if month_name(key.month).is_some() => key.label(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_zero_pads_month() {
        assert_eq!(PeriodKey::new(2026, 1).to_string(), "2026-01");
        assert_eq!(PeriodKey::new(2025, 12).to_string(), "2025-12");
    }

    #[test]
    fn test_key_ordering_is_chronological() {
        assert!(PeriodKey::new(2026, 1) > PeriodKey::new(2025, 12));
        assert!(PeriodKey::new(2025, 2) > PeriodKey::new(2025, 1));
        assert!(PeriodKey::new(2025, 10) > PeriodKey::new(2025, 9));
    }

    #[test]
    fn test_parse() {
        assert_eq!(PeriodKey::parse("2026-01"), Some(PeriodKey::new(2026, 1)));
        assert_eq!(PeriodKey::parse("2026-7"), Some(PeriodKey::new(2026, 7)));
        assert_eq!(PeriodKey::parse("2026"), None);
        assert_eq!(PeriodKey::parse("2026-01-03"), None);
        assert_eq!(PeriodKey::parse("abcd-01"), None);
        assert_eq!(PeriodKey::parse(""), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(period_label("2026-01"), "January 2026");
        assert_eq!(period_label("2025-12"), "December 2025");
    }

    #[test]
    fn test_label_fallback_to_raw_key() {
        assert_eq!(period_label("2026-00"), "2026-00");
        assert_eq!(period_label("2026-13"), "2026-13");
        assert_eq!(period_label("garbage"), "garbage");
        assert_eq!(period_label("2026-xx"), "2026-xx");
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
