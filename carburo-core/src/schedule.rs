//! Weekly opening-hours strings such as `L-V: 08:00-22:00;S: 09:00-14:00`.
//!
//! Day tokens are Spanish initials (`L M X J V S D`, Monday to Sunday). Days are
//! numbered from Sunday = 0 to Saturday = 6 and times are minutes since midnight.
//! Both day and time ranges may wrap: `S-L` runs Saturday through Monday and
//! `22:00-06:00` runs overnight. Bounds are inclusive at both ends.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};

/// Sentinel meaning "every day, around the clock".
pub const ALWAYS_OPEN: &str = "L-D: 24H";

const FULL_DAY_MARKER: &str = "24H";
const DAYS_PER_WEEK: u8 = 7;
const MINUTES_PER_DAY: u16 = 1440;
const LAST_MINUTE: u16 = MINUTES_PER_DAY - 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons a schedule string cannot be understood.
pub enum ScheduleParseError {
    /// The schedule contains no clauses at all.
    #[error("Empty schedule")]
    Empty,
    /// A clause lacks the `": "` separating days from hours.
    #[error("Missing ': ' separator in clause {0:?}")]
    MissingSeparator(String),
    /// A day token is not one of `L M X J V S D`.
    #[error("Unknown day token {0:?}")]
    UnknownDay(String),
    /// The day part is not `D` or `D-D`.
    #[error("Malformed day range {0:?}")]
    DayRange(String),
    /// The hours part is not `HH:MM-HH:MM` or `24H`.
    #[error("Malformed time range {0:?}")]
    TimeRange(String),
    /// A time is not `HH:MM`.
    #[error("Malformed time {0:?}")]
    Time(String),
    /// A time is outside `00:00..=24:00`.
    #[error("Time out of range {0:?}")]
    TimeOutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A moment within the week: day index (Sunday = 0) and minute of the day.
pub struct WeekInstant {
    day: u8,
    minute: u16,
}

impl WeekInstant {
    /// Build from raw indices; both are reduced modulo their cycle length.
    #[must_use]
    pub const fn new(day: u8, minute: u16) -> Self {
        Self {
            day: day % DAYS_PER_WEEK,
            minute: minute % MINUTES_PER_DAY,
        }
    }

    /// Build from a weekday and a wall-clock time.
    ///
    /// Hours past 23 and minutes past 59 are clamped, so the result never spills into the
    /// next day.
    #[must_use]
    pub fn at(weekday: Weekday, hour: u8, minute: u8) -> Self {
        let day = u8::try_from(weekday.num_days_from_sunday()).unwrap_or(0);
        Self::new(day, u16::from(hour.min(23)) * 60 + u16::from(minute.min(59)))
    }

    /// Project a timestamp onto the week, in its own time zone.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        let day = u8::try_from(datetime.weekday().num_days_from_sunday()).unwrap_or(0);
        let minute = u16::try_from(datetime.hour() * 60 + datetime.minute()).unwrap_or(0);
        Self::new(day, minute)
    }

    /// The current moment on the local clock.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Day index, Sunday = 0.
    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minute(self) -> u16 {
        self.minute
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Inclusive range of week days; wraps past Saturday when `end < start`.
pub struct DayRange {
    /// First day, Sunday = 0.
    pub start: u8,
    /// Last day, Sunday = 0.
    pub end: u8,
}

impl DayRange {
    /// Whether `day` lies within the range.
    #[must_use]
    pub fn contains(self, day: u8) -> bool {
        cyclic_contains(self.start, self.end, day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Inclusive range of minutes; runs overnight when `end < start`.
pub struct TimeRange {
    /// First minute.
    pub start: u16,
    /// Last minute.
    pub end: u16,
}

impl TimeRange {
    /// The whole day, `00:00-23:59`.
    pub const FULL_DAY: Self = Self {
        start: 0,
        end: LAST_MINUTE,
    };

    /// Whether `minute` lies within the range.
    #[must_use]
    pub fn contains(self, minute: u16) -> bool {
        cyclic_contains(self.start, self.end, minute)
    }
}

fn cyclic_contains<T: PartialOrd>(start: T, end: T, value: T) -> bool {
    if start <= end {
        start <= value && value <= end
    } else {
        value >= start || value <= end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One `days: hours` segment of a schedule.
pub struct Clause {
    /// Days the clause applies to.
    pub days: DayRange,
    /// Opening hours on those days.
    pub hours: TimeRange,
}

impl Clause {
    /// Whether the clause covers the given instant.
    #[must_use]
    pub fn contains(&self, at: WeekInstant) -> bool {
        self.days.contains(at.day()) && self.hours.contains(at.minute())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed schedule, ready to be evaluated repeatedly.
pub enum Schedule {
    /// The `L-D: 24H` sentinel.
    AlwaysOpen,
    /// Open whenever any clause matches.
    Clauses(Vec<Clause>),
}

impl Schedule {
    /// Parse a schedule string.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleParseError`] when the string is empty or any clause is
    /// malformed. One bad clause rejects the whole schedule.
    pub fn parse(raw: &str) -> Result<Self, ScheduleParseError> {
        if raw.contains(ALWAYS_OPEN) {
            return Ok(Self::AlwaysOpen);
        }

        let clauses = raw
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(parse_clause)
            .collect::<Result<Vec<_>, _>>()?;

        if clauses.is_empty() {
            return Err(ScheduleParseError::Empty);
        }

        Ok(Self::Clauses(clauses))
    }

    /// Whether the schedule is open at the given instant.
    #[must_use]
    pub fn is_open(&self, at: WeekInstant) -> bool {
        match self {
            Self::AlwaysOpen => true,
            Self::Clauses(clauses) => clauses.iter().any(|clause| clause.contains(at)),
        }
    }
}

impl FromStr for Schedule {
    type Err = ScheduleParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// Parse `schedule` and evaluate it at `at` in one go.
///
/// # Errors
///
/// Returns a [`ScheduleParseError`] when the schedule is malformed.
pub fn is_open(schedule: &str, at: WeekInstant) -> Result<bool, ScheduleParseError> {
    Schedule::parse(schedule).map(|parsed| parsed.is_open(at))
}

fn parse_clause(clause: &str) -> Result<Clause, ScheduleParseError> {
    let (days, hours) = clause
        .split_once(": ")
        .ok_or_else(|| ScheduleParseError::MissingSeparator(clause.to_owned()))?;

    Ok(Clause {
        days: parse_day_range(days.trim())?,
        hours: parse_time_range(hours.trim())?,
    })
}

fn parse_day_range(days: &str) -> Result<DayRange, ScheduleParseError> {
    let Some((start, end)) = days.split_once('-') else {
        let day = parse_day(days)?;
        return Ok(DayRange {
            start: day,
            end: day,
        });
    };

    if end.contains('-') {
        return Err(ScheduleParseError::DayRange(days.to_owned()));
    }

    Ok(DayRange {
        start: parse_day(start.trim())?,
        end: parse_day(end.trim())?,
    })
}

fn parse_day(token: &str) -> Result<u8, ScheduleParseError> {
    match token {
        "D" => Ok(0),
        "L" => Ok(1),
        "M" => Ok(2),
        "X" => Ok(3),
        "J" => Ok(4),
        "V" => Ok(5),
        "S" => Ok(6),
        _ => Err(ScheduleParseError::UnknownDay(token.to_owned())),
    }
}

fn parse_time_range(hours: &str) -> Result<TimeRange, ScheduleParseError> {
    if hours.eq_ignore_ascii_case(FULL_DAY_MARKER) {
        return Ok(TimeRange::FULL_DAY);
    }

    let (start, end) = hours
        .split_once('-')
        .ok_or_else(|| ScheduleParseError::TimeRange(hours.to_owned()))?;

    Ok(TimeRange {
        start: parse_time(start.trim())?,
        end: parse_time(end.trim())?,
    })
}

fn parse_time(time: &str) -> Result<u16, ScheduleParseError> {
    let malformed = || ScheduleParseError::Time(time.to_owned());

    let (hours, minutes) = time.split_once(':').ok_or_else(malformed)?;
    let hours = parse_digits(hours).ok_or_else(malformed)?;
    let minutes = parse_digits(minutes).ok_or_else(malformed)?;

    match (hours, minutes) {
        // 24:00 closes the day.
        (24, 0) => Ok(LAST_MINUTE),
        (0..=23, 0..=59) => Ok(hours * 60 + minutes),
        _ => Err(ScheduleParseError::TimeOutOfRange(time.to_owned())),
    }
}

fn parse_digits(digits: &str) -> Option<u16> {
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use chrono::Weekday::{Fri, Mon, Sat, Sun, Thu, Tue, Wed};

    use super::*;

    fn open(schedule: &str, at: WeekInstant) -> bool {
        is_open(schedule, at).expect("schedule should parse")
    }

    #[test]
    fn always_open_sentinel() {
        for day in 0..7 {
            for minute in [0, 1, 719, 1380, 1439] {
                assert!(
                    open("L-D: 24H", WeekInstant::new(day, minute)),
                    "open on day {day} minute {minute}"
                );
            }
        }
    }

    #[test]
    fn sentinel_wins_anywhere_in_the_string() {
        let schedule = Schedule::parse("L-V: 08:00-09:00;L-D: 24H").expect("parses");
        assert_eq!(schedule, Schedule::AlwaysOpen, "sentinel short-circuits parsing");
    }

    #[test]
    fn weekday_clause_is_inclusive_at_both_ends() {
        let schedule = "L-V: 08:00-22:00";
        assert!(open(schedule, WeekInstant::at(Mon, 8, 0)), "opening minute");
        assert!(open(schedule, WeekInstant::at(Wed, 13, 30)), "midweek");
        assert!(open(schedule, WeekInstant::at(Fri, 22, 0)), "closing minute");
        assert!(!open(schedule, WeekInstant::at(Sat, 12, 0)), "weekend");
        assert!(!open(schedule, WeekInstant::at(Mon, 7, 59)), "before opening");
        assert!(!open(schedule, WeekInstant::at(Fri, 22, 1)), "after closing");
    }

    #[test]
    fn day_range_wraps_over_the_weekend() {
        // M is Tuesday, so the range runs Saturday through Tuesday.
        let schedule = "S-M: 00:00-23:59";
        assert!(open(schedule, WeekInstant::at(Sun, 10, 0)), "sunday");
        assert!(open(schedule, WeekInstant::at(Sat, 10, 0)), "saturday");
        assert!(open(schedule, WeekInstant::at(Mon, 10, 0)), "monday");
        assert!(open(schedule, WeekInstant::at(Tue, 10, 0)), "tuesday");
        assert!(!open(schedule, WeekInstant::at(Wed, 10, 0)), "wednesday");
        assert!(!open(schedule, WeekInstant::at(Fri, 10, 0)), "friday");
    }

    #[test]
    fn overnight_hours_wrap_past_midnight() {
        let schedule = "L-D: 22:00-06:00";
        for weekday in [Sun, Mon, Wed, Sat] {
            assert!(open(schedule, WeekInstant::at(weekday, 23, 0)), "late evening");
            assert!(open(schedule, WeekInstant::at(weekday, 5, 0)), "early morning");
            assert!(!open(schedule, WeekInstant::at(weekday, 12, 0)), "midday");
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let schedule = "L-V: 09:00-17:00;S: 10:00-13:00";
        let at = WeekInstant::at(Thu, 16, 0);
        assert_eq!(is_open(schedule, at), is_open(schedule, at), "same inputs, same answer");

        let parsed = Schedule::parse(schedule).expect("parses");
        assert_eq!(parsed.is_open(at), parsed.is_open(at), "parsed form is pure too");
    }

    #[test]
    fn multi_clause_schedule() {
        let schedule = "L-V: 09:00-17:00;S: 10:00-13:00";
        assert!(open(schedule, WeekInstant::at(Sat, 11, 0)), "saturday clause");
        assert!(!open(schedule, WeekInstant::at(Sun, 11, 0)), "sunday closed");
        assert!(open(schedule, WeekInstant::at(Wed, 16, 59)), "weekday before close");
        assert!(!open(schedule, WeekInstant::at(Wed, 17, 1)), "weekday after close");
    }

    #[test]
    fn zero_width_window_matches_a_single_minute() {
        let schedule = "L: 12:00-12:00";
        assert!(open(schedule, WeekInstant::at(Mon, 12, 0)), "the minute itself");
        assert!(!open(schedule, WeekInstant::at(Mon, 12, 1)), "one minute later");
        assert!(!open(schedule, WeekInstant::at(Mon, 11, 59)), "one minute earlier");
    }

    #[test]
    fn full_day_marker_in_a_regular_clause() {
        let schedule = "L-S: 24H;D: 08:00-14:00";
        assert!(open(schedule, WeekInstant::at(Thu, 3, 0)), "weekday night");
        assert!(open(schedule, WeekInstant::at(Sun, 9, 0)), "sunday morning");
        assert!(!open(schedule, WeekInstant::at(Sun, 15, 0)), "sunday afternoon");
    }

    #[test]
    fn tolerates_spaces_and_trailing_separator() {
        let schedule = " L-V: 07:00-21:00 ;  S : 08:00 - 14:00 ;";
        assert!(open(schedule, WeekInstant::at(Tue, 7, 0)), "weekday");
        assert!(open(schedule, WeekInstant::at(Sat, 9, 0)), "saturday");
        assert!(!open(schedule, WeekInstant::at(Sun, 9, 0)), "sunday");
    }

    #[test]
    fn midnight_end_means_end_of_day() {
        let schedule = "L-D: 06:00-24:00";
        assert!(open(schedule, WeekInstant::at(Fri, 23, 59)), "last minute");
        assert!(!open(schedule, WeekInstant::at(Fri, 5, 59)), "before opening");
    }

    #[test]
    fn malformed_schedules_are_errors() {
        let at = WeekInstant::at(Mon, 10, 0);
        assert_eq!(is_open("", at), Err(ScheduleParseError::Empty), "empty");
        assert_eq!(is_open(" ; ", at), Err(ScheduleParseError::Empty), "only separators");
        assert_eq!(
            is_open("L-V 08:00-22:00", at),
            Err(ScheduleParseError::MissingSeparator("L-V 08:00-22:00".to_owned())),
            "missing separator"
        );
        assert_eq!(
            is_open("L-Z: 08:00-22:00", at),
            Err(ScheduleParseError::UnknownDay("Z".to_owned())),
            "unknown day"
        );
        assert_eq!(
            is_open("L-M-X: 08:00-22:00", at),
            Err(ScheduleParseError::DayRange("L-M-X".to_owned())),
            "three day tokens"
        );
        assert_eq!(
            is_open("L: 0800", at),
            Err(ScheduleParseError::TimeRange("0800".to_owned())),
            "no time range dash"
        );
        assert_eq!(
            is_open("L: 8h-22:00", at),
            Err(ScheduleParseError::Time("8h".to_owned())),
            "bad time"
        );
        assert_eq!(
            is_open("L: 08:00-25:00", at),
            Err(ScheduleParseError::TimeOutOfRange("25:00".to_owned())),
            "hour out of range"
        );
        assert_eq!(
            is_open("L: 08:60-22:00", at),
            Err(ScheduleParseError::TimeOutOfRange("08:60".to_owned())),
            "minute out of range"
        );
    }

    #[test]
    fn one_bad_clause_rejects_the_whole_schedule() {
        // The first clause alone would match, but the schedule as a whole is rejected.
        let at = WeekInstant::at(Mon, 10, 0);
        assert!(
            matches!(
                is_open("L-V: 08:00-22:00;Q: 10:00-12:00", at),
                Err(ScheduleParseError::UnknownDay(_))
            ),
            "bad trailing clause"
        );
    }

    #[test]
    fn instants_wrap_their_inputs() {
        let at = WeekInstant::new(8, 1440 + 5);
        assert_eq!(at.day(), 1, "day modulo 7");
        assert_eq!(at.minute(), 5, "minute modulo 1440");
    }

    #[test]
    fn clock_time_is_clamped_to_the_same_day() {
        let at = WeekInstant::at(Mon, 25, 70);
        assert_eq!(at.day(), 1, "still monday");
        assert_eq!(at.minute(), 23 * 60 + 59, "last minute of the day");
        assert_eq!(WeekInstant::at(Fri, 23, 59), WeekInstant::at(Fri, 24, 0), "24:00 is 23:59");
    }

    #[test]
    fn instant_from_datetime() {
        use chrono::NaiveDate;

        let datetime = NaiveDate::from_ymd_opt(2024, 3, 2)
            .and_then(|date| date.and_hms_opt(18, 45, 0))
            .expect("valid date")
            .and_utc();
        let at = WeekInstant::from_datetime(&datetime);
        assert_eq!(at, WeekInstant::at(Sat, 18, 45), "2024-03-02 is a Saturday");
    }
}
