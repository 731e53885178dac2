// Reporting periods in India Standard Time.
//
// A period is described as an IST wall-clock value (a month, or a calendar day)
// and converted to UTC instants by building the wall-clock value as if it were
// UTC and subtracting the fixed offset. IST has no daylight saving, so the
// offset never changes.
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::ops::Bound;

/// UTC+5:30.
pub const IST_OFFSET_MINUTES: i32 = 5 * 60 + 30;

/// Display pattern for stored instants: `15 Jan 2026, 03:30 pm`.
pub const DISPLAY_FORMAT: &str = "%d %b %Y, %I:%M %P";

/// Placeholder shown when a timestamp is missing or unreadable.
pub const MISSING_TIMESTAMP: &str = "N/A";

/// A fixed-offset zone in which reporting periods are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingZone {
    offset_minutes: i32,
}

/// First instant of a month and first instant of the following month.
/// Used as `start <= t < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthRange {
    pub fn start_iso(&self) -> String {
        to_iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        to_iso(self.end)
    }
}

impl ReportingZone {
    pub const IST: ReportingZone = ReportingZone {
        offset_minutes: IST_OFFSET_MINUTES,
    };

    pub const fn from_offset_minutes(offset_minutes: i32) -> Self {
        ReportingZone { offset_minutes }
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    pub fn offset(&self) -> Duration {
        Duration::minutes(i64::from(self.offset_minutes))
    }

    /// `month` is 0-based. Values outside 0..=11 roll into neighbouring years.
    /// Returns `None` only for years the calendar cannot represent.
    pub fn month_range(&self, month: i32, year: i32) -> Option<MonthRange> {
        let start = first_of_month(year, i64::from(month))?;
        let end = first_of_month(year, i64::from(month) + 1)?;
        Some(MonthRange {
            start: self.wall_clock_to_utc(start.and_hms_opt(0, 0, 0)?)?,
            end: self.wall_clock_to_utc(end.and_hms_opt(0, 0, 0)?)?,
        })
    }

    /// Converts a `YYYY-MM-DD` calendar day into the UTC instant of its first
    /// millisecond, or its last one when `end_of_day` is set. Blank or
    /// malformed input yields `None`, meaning no bound should be applied.
    pub fn date_bound(&self, date: Option<&str>, end_of_day: bool) -> Option<DateTime<Utc>> {
        let day = parse_calendar_day(date?)?;
        let wall = if end_of_day {
            day.and_hms_milli_opt(23, 59, 59, 999)?
        } else {
            day.and_hms_milli_opt(0, 0, 0, 0)?
        };
        self.wall_clock_to_utc(wall)
    }

    pub fn wall_clock_to_utc(&self, wall: NaiveDateTime) -> Option<DateTime<Utc>> {
        let as_if_utc = DateTime::<Utc>::from_naive_utc_and_offset(wall, Utc);
        as_if_utc.checked_sub_signed(self.offset())
    }

    pub fn utc_to_wall_clock(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        instant.naive_utc().checked_add_signed(self.offset())
    }

    /// Renders an instant in this zone's wall-clock time.
    pub fn format_instant(&self, instant: DateTime<Utc>) -> String {
        match self.utc_to_wall_clock(instant) {
            Some(wall) => wall.format(DISPLAY_FORMAT).to_string(),
            None => MISSING_TIMESTAMP.to_string(),
        }
    }

    /// Parses a stored timestamp (see [`parse_timestamp`]) and renders it.
    pub fn format_timestamp(&self, timestamp: &str) -> String {
        match parse_timestamp(timestamp) {
            Some(instant) => self.format_instant(instant),
            None => MISSING_TIMESTAMP.to_string(),
        }
    }
}

impl Default for ReportingZone {
    fn default() -> Self {
        Self::IST
    }
}

/// Half-open month window in IST.
pub fn ist_month_range(month: i32, year: i32) -> Option<MonthRange> {
    ReportingZone::IST.month_range(month, year)
}

/// IST day boundary as an ISO-8601 UTC string, or `None` when no date is given.
pub fn ist_date_bound(date: Option<&str>, end_of_day: bool) -> Option<String> {
    ReportingZone::IST.date_bound(date, end_of_day).map(to_iso)
}

/// Human-readable IST rendering of a stored UTC timestamp.
pub fn format_ist(timestamp: &str) -> String {
    ReportingZone::IST.format_timestamp(timestamp)
}

/// `2025-12-31T18:30:00.000Z`
pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reads a stored timestamp. Values carrying an offset (`Z`, `+05:30`, `+00`)
/// are honoured; zone-less values such as `2026-01-15 10:00:00` are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Database form with a short offset, e.g. `2026-01-15 10:00:00.123+00`.
    if let Ok(parsed) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(parsed.with_timezone(&Utc));
    }
    if trimmed.ends_with('Z') || trimmed.contains('+') {
        return None;
    }
    let normalized = format!("{}Z", trimmed.replacen(' ', "T", 1));
    DateTime::parse_from_rfc3339(&normalized)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Inclusive/exclusive bounds on a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub lower: Bound<DateTime<Utc>>,
    pub upper: Bound<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        TimeWindow {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    /// `start <= t < end`
    pub fn half_open(range: MonthRange) -> Self {
        TimeWindow {
            lower: Bound::Included(range.start),
            upper: Bound::Excluded(range.end),
        }
    }

    /// `start <= t <= end`, dropping whichever side is absent.
    pub fn closed(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        TimeWindow {
            lower: start.map_or(Bound::Unbounded, Bound::Included),
            upper: end.map_or(Bound::Unbounded, Bound::Included),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let above = match self.lower {
            Bound::Included(start) => instant >= start,
            Bound::Excluded(start) => instant > start,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Included(end) => instant <= end,
            Bound::Excluded(end) => instant < end,
            Bound::Unbounded => true,
        };
        above && below
    }
}

fn first_of_month(year: i32, month0: i64) -> Option<NaiveDate> {
    let total = i64::from(year) * 12 + month0;
    let normalized_year = i32::try_from(total.div_euclid(12)).ok()?;
    let normalized_month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(normalized_year, normalized_month, 1)
}

// `y-m-d` with 1-based month; month and day overflow roll forward like a
// native date constructor would (`2026-02-30` is 2 March).
fn parse_calendar_day(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().split('-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: i64 = parts.next()?.trim().parse().ok()?;
    let day: i64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some()
        || !(-100_000..=100_000).contains(&month)
        || !(-1_000_000..=1_000_000).contains(&day)
    {
        return None;
    }
    first_of_month(year, month - 1)?.checked_add_signed(Duration::days(day - 1))
}
