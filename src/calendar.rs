use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{CashFlowError, Result};

/// full-day load
pub const HOURS_PER_DAY: u32 = 24;

const DATE_KEY_FORMAT: &str = "%d.%m.%Y";

/// format a date as `DD.MM.YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// parse a `DD.MM.YYYY` key back into a date
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).map_err(|e| CashFlowError::InvalidDate {
        message: format!("'{}': {}", key, e),
    })
}

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\s*-\s*(\d+)").expect("static pattern compiles"))
}

/// delivery hours per day from a load-type descriptor.
/// base load keywords give 24, a `"<start> - <end>"` block gives
/// `end - start + 1`, anything else falls back to 24
pub fn parse_load_type(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    if ["base", "full", "базове"].iter().any(|k| lowered.contains(k)) {
        return HOURS_PER_DAY;
    }

    let Some(caps) = block_pattern().captures(&lowered) else {
        return HOURS_PER_DAY;
    };
    let start = caps[1].parse::<i64>();
    let end = caps[2].parse::<i64>();
    match (start, end) {
        (Ok(start), Ok(end)) => {
            let hours = end - start + 1;
            if (1..=HOURS_PER_DAY as i64).contains(&hours) {
                hours as u32
            } else {
                HOURS_PER_DAY
            }
        }
        _ => HOURS_PER_DAY,
    }
}

/// shift by a signed number of days, saturating at the calendar bounds
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    match Duration::try_days(days) {
        Some(delta) => date.checked_add_signed(delta).unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        }),
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

/// every day from `start` to `end` inclusive; empty when `end < start`
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// inclusive day count, zero when `end < start`
pub fn count_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// move forward to the next weekday unless weekend payments are allowed
pub fn adjust_to_business_day(date: NaiveDate, allow_weekends: bool) -> NaiveDate {
    if allow_weekends {
        return date;
    }
    let mut adjusted = date;
    while is_weekend(adjusted) {
        adjusted = shift_days(adjusted, 1);
    }
    adjusted
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// one of the three settlement periods of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecadePeriod {
    pub start_day: u32,
    pub end_day: u32,
    /// 1, 2 or 3
    pub decade: u8,
    pub pay_day: u32,
}

impl DecadePeriod {
    fn new(start_day: u32, end_day: u32, decade: u8) -> Self {
        Self {
            start_day,
            end_day,
            decade,
            pay_day: end_day,
        }
    }
}

/// three decades of a month (1-based), paid on their last day.
/// 28-day february splits 1-9 / 10-18 / 19-28, other months 1-10 / 11-20 / 21-end
pub fn decade_periods(year: i32, month: u32) -> [DecadePeriod; 3] {
    let last = days_in_month(year, month);
    if last == 28 {
        [
            DecadePeriod::new(1, 9, 1),
            DecadePeriod::new(10, 18, 2),
            DecadePeriod::new(19, 28, 3),
        ]
    } else {
        [
            DecadePeriod::new(1, 10, 1),
            DecadePeriod::new(11, 20, 2),
            DecadePeriod::new(21, last, 3),
        ]
    }
}

/// first day of the month following `date`
pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
