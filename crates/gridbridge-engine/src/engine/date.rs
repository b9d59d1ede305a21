//! OLE Automation date codec.
//!
//! A date travels the wire as a 64-bit float: the integral part counts days
//! since 1899-12-30 and the fractional part is the time of day as a fraction
//! of 86 400 seconds. For serials before the epoch the fraction still moves
//! forward in time, so `-1.25` is 1899-12-29 06:00.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const MS_PER_DAY: i64 = 86_400_000;

/// Smallest serial accepted on decode (exclusive), year 0100.
pub const MIN_SERIAL: f64 = -657_435.0;
/// Largest serial accepted on decode (exclusive), year 10000.
pub const MAX_SERIAL: f64 = 2_958_466.0;

/// 1899-12-30 00:00, serial `0.0`.
pub fn ole_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .expect("1899-12-30 must be a valid date")
        .and_time(NaiveTime::MIN)
}

/// Decode a serial into a date-time, rounded to the millisecond.
/// Returns None for NaN or serials outside the supported range.
pub fn from_oa_date(serial: f64) -> Option<NaiveDateTime> {
    if !(serial > MIN_SERIAL && serial < MAX_SERIAL) {
        return None;
    }
    let half = if serial >= 0.0 { 0.5 } else { -0.5 };
    let mut millis = (serial * MS_PER_DAY as f64 + half) as i64;
    if millis < 0 {
        millis -= (millis % MS_PER_DAY) * 2;
    }
    ole_epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Encode a date-time as a serial.
pub fn to_oa_date(dt: NaiveDateTime) -> f64 {
    let mut millis = dt.signed_duration_since(ole_epoch()).num_milliseconds();
    if millis < 0 {
        let frac = millis % MS_PER_DAY;
        if frac != 0 {
            millis -= (MS_PER_DAY + frac) * 2;
        }
    }
    millis as f64 / MS_PER_DAY as f64
}
