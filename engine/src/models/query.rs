use chrono::{DateTime, Datelike, Utc};
use shared::ist::ReportingZone;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Reporting period of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// 0-based month. Filtered as `start <= t < end`.
    Month { month: i32, year: i32 },
    /// `YYYY-MM-DD` calendar days, both inclusive. A missing side is not filtered.
    Range { start: Option<String>, end: Option<String> },
}

impl Period {
    /// The month `now` falls in, on the zone's wall clock.
    pub fn current_month(zone: ReportingZone, now: DateTime<Utc>) -> Period {
        let (month, year) = wall_month(zone, now);
        Period::Month { month, year }
    }

    pub fn label(&self) -> String {
        match self {
            Period::Month { month, year } => month_label(*month, *year),
            Period::Range { start, end } => format!(
                "{} to {}",
                start.as_deref().unwrap_or("beginning"),
                end.as_deref().unwrap_or("latest")
            ),
        }
    }
}

/// 0-based month and year of `now` on the zone's wall clock.
pub fn wall_month(zone: ReportingZone, now: DateTime<Utc>) -> (i32, i32) {
    let wall = zone.utc_to_wall_clock(now).unwrap_or_else(|| now.naive_utc());
    (wall.month0() as i32, wall.year())
}

/// `January 2026`; out-of-range months roll over like the period itself.
pub fn month_label(month: i32, year: i32) -> String {
    let total = i64::from(year) * 12 + i64::from(month);
    let index = total.rem_euclid(12) as usize;
    format!("{} {}", MONTH_NAMES[index], total.div_euclid(12))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillQuery {
    pub period: Period,
    /// When set, replaces the period filter.
    pub search: Option<String>,
}

impl BillQuery {
    pub fn for_period(period: Period) -> Self {
        BillQuery { period, search: None }
    }

    pub fn search(term: impl Into<String>, period: Period) -> Self {
        BillQuery {
            period,
            search: Some(term.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_current_month_uses_zone_wall_clock() {
        // 31 Jan 19:00 UTC is already 1 Feb in IST.
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 19, 0, 0).unwrap();
        assert_eq!(Period::current_month(ReportingZone::IST, now), Period::Month { month: 1, year: 2026 });
        assert_eq!(
            Period::current_month(ReportingZone::from_offset_minutes(0), now),
            Period::Month { month: 0, year: 2026 }
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(month_label(0, 2026), "January 2026");
        assert_eq!(month_label(12, 2025), "January 2026");
        assert_eq!(month_label(-1, 2026), "December 2025");
        let range = Period::Range { start: Some("2026-01-10".into()), end: None };
        assert_eq!(range.label(), "2026-01-10 to latest");
    }
}
