//! Natural-language time-expression resolution.
//!
//! Resolves phrases like "tomorrow 3pm", "next friday", "in 2 hours",
//! or "2026-09-01 14:00" into absolute UTC instants. Resolution happens
//! in a reference timezone: the date words and clock times are
//! interpreted as local wall time in that zone, then converted to UTC.
//!
//! Supported forms:
//! - "now", "in N minutes|hours|days|weeks"
//! - "today", "tonight", "tomorrow", "yesterday"
//! - weekday names (optionally with "this" or "next"), "next week",
//!   "next month"
//! - ISO dates (`2026-09-01`) and month-name dates ("september 1")
//! - clock times: "3pm", "3:30 pm", "15:00", "noon", "midnight",
//!   "morning", "afternoon", "evening"
//!
//! A date without a time defaults to 09:00; a time without a date means
//! the next occurrence of that wall-clock time. Anything else is a hard
//! [`TimeParseError`], never a silent default.

use crate::command::TimeWindow;
use crate::error::TimeParseError;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;

/// Fallback wall-clock time for expressions that name only a date.
const DEFAULT_TIME: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Resolves a time expression plus a duration into an absolute window.
///
/// # Errors
///
/// Returns an error if the expression is unresolvable or the duration
/// is not positive.
pub fn resolve_window(
    expression: &str,
    duration_minutes: i64,
    now: DateTime<Utc>,
    zone: Tz,
) -> Result<TimeWindow, TimeParseError> {
    if duration_minutes <= 0 {
        return Err(TimeParseError::InvalidDuration {
            minutes: duration_minutes,
        });
    }
    let start = resolve_instant(expression, now, zone)?;
    Ok(TimeWindow::new(
        start,
        start + Duration::minutes(duration_minutes),
    ))
}

/// Resolves a time expression into an absolute UTC instant.
///
/// # Errors
///
/// Returns an error if the expression does not match a supported form.
pub fn resolve_instant(
    expression: &str,
    now: DateTime<Utc>,
    zone: Tz,
) -> Result<DateTime<Utc>, TimeParseError> {
    let expr = expression.trim().to_lowercase();
    if expr.is_empty() {
        return Err(TimeParseError::Unrecognized {
            expression: expression.to_string(),
        });
    }
    if expr == "now" {
        return Ok(now);
    }
    if let Some(rest) = expr.strip_prefix("in ") {
        return resolve_relative(rest, &expr, now);
    }

    let local_now = now.with_timezone(&zone);
    let today = local_now.date_naive();

    let mut date: Option<NaiveDate> = None;
    let mut time: Option<NaiveTime> = None;

    let tokens: Vec<&str> = expr
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();
    let unrecognized = || TimeParseError::Unrecognized {
        expression: expression.to_string(),
    };

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        match token {
            "at" | "on" | "the" => {}
            "today" => date = Some(today),
            "tonight" => {
                date = Some(today);
                time.get_or_insert(NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(DEFAULT_TIME));
            }
            "tomorrow" => date = Some(today + Duration::days(1)),
            "yesterday" => date = Some(today - Duration::days(1)),
            "noon" => time = Some(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(DEFAULT_TIME)),
            "midnight" => time = Some(NaiveTime::from_hms_opt(0, 0, 0).unwrap_or(DEFAULT_TIME)),
            "morning" => time = Some(DEFAULT_TIME),
            "afternoon" => time = Some(NaiveTime::from_hms_opt(15, 0, 0).unwrap_or(DEFAULT_TIME)),
            "evening" => time = Some(NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(DEFAULT_TIME)),
            "next" => {
                let target = tokens.get(i + 1).ok_or_else(unrecognized)?;
                i += 1;
                date = Some(match *target {
                    "week" => today + Duration::days(7),
                    "month" => today
                        .checked_add_months(Months::new(1))
                        .ok_or_else(unrecognized)?,
                    other => {
                        let weekday = parse_weekday(other).ok_or_else(unrecognized)?;
                        // First occurrence after today; same weekday rolls a week.
                        let ahead = days_until(today.weekday(), weekday);
                        today + Duration::days(if ahead == 0 { 7 } else { ahead })
                    }
                });
            }
            "this" => {
                let target = tokens.get(i + 1).ok_or_else(unrecognized)?;
                i += 1;
                let weekday = parse_weekday(target).ok_or_else(unrecognized)?;
                date = Some(today + Duration::days(days_until(today.weekday(), weekday)));
            }
            _ => {
                if let Some(weekday) = parse_weekday(token) {
                    date = Some(today + Duration::days(days_until(today.weekday(), weekday)));
                } else if let Ok(iso) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
                    date = Some(iso);
                } else if let Some(month) = parse_month(token) {
                    let day_token = tokens.get(i + 1).ok_or_else(unrecognized)?;
                    i += 1;
                    let day = parse_day_of_month(day_token).ok_or_else(unrecognized)?;
                    let year = tokens
                        .get(i + 1)
                        .and_then(|t| t.parse::<i32>().ok())
                        .filter(|y| *y >= 1970);
                    if year.is_some() {
                        i += 1;
                    }
                    let resolved = resolve_month_day(month, day, year, today)?;
                    date = Some(resolved);
                } else if let Some(parsed) = parse_clock(token, tokens.get(i + 1).copied())? {
                    if parsed.consumed_next {
                        i += 1;
                    }
                    time = Some(parsed.time);
                } else {
                    return Err(unrecognized());
                }
            }
        }
        i += 1;
    }

    if date.is_none() && time.is_none() {
        return Err(unrecognized());
    }

    let time_given = time.is_some();
    let mut day = date.unwrap_or(today);
    let wall = time.unwrap_or(DEFAULT_TIME);

    let mut instant = localize(day, wall, zone, expression)?;
    // A bare clock time means its next occurrence.
    if date.is_none() && time_given && instant <= now {
        day += Duration::days(1);
        instant = localize(day, wall, zone, expression)?;
    }
    Ok(instant)
}

/// Resolves "in N units" relative to `now`.
fn resolve_relative(
    rest: &str,
    expr: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TimeParseError> {
    let unrecognized = || TimeParseError::Unrecognized {
        expression: expr.to_string(),
    };
    let mut parts = rest.split_whitespace();
    let amount: i64 = parts
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(unrecognized)?;
    let unit = parts.next().ok_or_else(unrecognized)?;
    if parts.next().is_some() || amount < 0 {
        return Err(unrecognized());
    }
    let offset = match unit {
        "minute" | "minutes" | "min" | "mins" => Duration::minutes(amount),
        "hour" | "hours" | "hr" | "hrs" => Duration::hours(amount),
        "day" | "days" => Duration::days(amount),
        "week" | "weeks" => Duration::weeks(amount),
        _ => return Err(unrecognized()),
    };
    Ok(now + offset)
}

/// Converts local wall time in `zone` to UTC.
fn localize(
    day: NaiveDate,
    wall: NaiveTime,
    zone: Tz,
    expression: &str,
) -> Result<DateTime<Utc>, TimeParseError> {
    match zone.from_local_datetime(&day.and_time(wall)) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        // DST fold: take the earlier instant.
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => Err(TimeParseError::NonexistentLocalTime {
            expression: expression.to_string(),
            zone: zone.name().to_string(),
        }),
    }
}

/// Days from `from` until the upcoming `to`, with today counting as 0.
fn days_until(from: Weekday, to: Weekday) -> i64 {
    let from = i64::from(from.num_days_from_monday());
    let to = i64::from(to.num_days_from_monday());
    (to - from).rem_euclid(7)
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(token: &str) -> Option<u32> {
    match token {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Parses a day-of-month token, tolerating ordinal suffixes ("26th").
fn parse_day_of_month(token: &str) -> Option<u32> {
    let digits = token
        .strip_suffix("st")
        .or_else(|| token.strip_suffix("nd"))
        .or_else(|| token.strip_suffix("rd"))
        .or_else(|| token.strip_suffix("th"))
        .unwrap_or(token);
    digits.parse().ok().filter(|d| (1..=31).contains(d))
}

/// Resolves a month-name date; without a year, the next occurrence on
/// or after today.
fn resolve_month_day(
    month: u32,
    day: u32,
    year: Option<i32>,
    today: NaiveDate,
) -> Result<NaiveDate, TimeParseError> {
    let invalid = || TimeParseError::Unrecognized {
        expression: format!("{month}-{day}"),
    };
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid);
    }
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day).ok_or_else(invalid)?;
    if this_year >= today {
        Ok(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day).ok_or_else(invalid)
    }
}

struct ParsedClock {
    time: NaiveTime,
    /// True if the meridiem lived in the following token ("3 pm").
    consumed_next: bool,
}

/// Parses a clock-time token, optionally consuming a detached meridiem.
///
/// Returns `Ok(None)` when the token is not a clock time at all, so the
/// caller can report the whole expression as unrecognized.
fn parse_clock(token: &str, next: Option<&str>) -> Result<Option<ParsedClock>, TimeParseError> {
    let (body, meridiem, consumed_next) =
        if let Some(stripped) = token.strip_suffix("am") {
            (stripped, Some(false), false)
        } else if let Some(stripped) = token.strip_suffix("pm") {
            (stripped, Some(true), false)
        } else if matches!(next, Some("am")) {
            (token, Some(false), true)
        } else if matches!(next, Some("pm")) {
            (token, Some(true), true)
        } else {
            (token, None, false)
        };

    // Without a meridiem, only H:MM forms count as times; a bare number
    // is too ambiguous against day-of-month tokens.
    if meridiem.is_none() && !body.contains(':') {
        return Ok(None);
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return Ok(None);
    }

    let (hour_str, minute_str) = match body.split_once(':') {
        Some((h, m)) => (h, m),
        None => (body, "0"),
    };
    let invalid = || TimeParseError::InvalidClockTime {
        fragment: token.to_string(),
    };
    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            match (pm, hour) {
                (false, 12) => 0,
                (true, h) if h < 12 => h + 12,
                (_, h) => h,
            }
        }
        None => hour,
    };
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;
    Ok(Some(ParsedClock {
        time,
        consumed_next,
    }))
}
