//! ISO-8601 rendering for calendar values.
//!
//! Output follows the conventional `isoformat` shape: fractional seconds are
//! written as six microsecond digits and only when non-zero.

use bigdecimal::BigDecimal;
use time::error::Format;
use time::macros::format_description;
use time::{Date, Duration, PrimitiveDateTime, Time};

pub fn isoformat_date(date: Date) -> Result<String, Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}

pub fn isoformat_time(time: Time) -> Result<String, Format> {
    if time.microsecond() == 0 {
        time.format(format_description!("[hour]:[minute]:[second]"))
    } else {
        time.format(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:6]"
        ))
    }
}

/// Renders a datetime with `sep` between the date and time parts
/// (`'T'` for the wire, `' '` for display).
pub fn isoformat_datetime(datetime: PrimitiveDateTime, sep: char) -> Result<String, Format> {
    Ok(format!(
        "{}{}{}",
        isoformat_date(datetime.date())?,
        sep,
        isoformat_time(datetime.time())?
    ))
}

/// Exact total seconds of a duration.
pub fn total_seconds(duration: Duration) -> BigDecimal {
    if duration.subsec_nanoseconds() == 0 {
        BigDecimal::from(duration.whole_seconds())
    } else {
        BigDecimal::new(duration.whole_nanoseconds().into(), 9).normalized()
    }
}

pub fn total_seconds_f64(duration: Duration) -> f64 {
    duration.as_seconds_f64()
}

/// Human-readable duration: `[D day[s], ]H:MM:SS[.ffffff]`.
pub fn duration_text(duration: Duration) -> String {
    let sign = if duration.is_negative() { "-" } else { "" };
    let duration = duration.abs();
    let days = duration.whole_days();
    let hours = duration.whole_hours() % 24;
    let minutes = duration.whole_minutes() % 60;
    let seconds = duration.whole_seconds() % 60;
    let micros = duration.subsec_microseconds();

    let mut out = String::from(sign);
    if days != 0 {
        let unit = if days == 1 { "day" } else { "days" };
        out.push_str(&format!("{} {}, ", days, unit));
    }
    out.push_str(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}
