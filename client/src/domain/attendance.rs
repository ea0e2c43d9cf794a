//! Attendance duration computation and record lifecycle.

use chrono::{DateTime, NaiveDateTime};
use shared::{Attendance, ManualAttendanceRequest};
use thiserror::Error;

/// Clock-out not strictly after clock-in. Covers backfill entry mistakes and
/// clock skew between devices; the user corrects the input and retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("clock-out must be after clock-in")]
pub struct InvalidIntervalError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttendanceError {
    #[error("could not parse timestamp `{0}`")]
    BadTimestamp(String),
    #[error(transparent)]
    Interval(#[from] InvalidIntervalError),
    #[error("attendance record `{0}` is already closed")]
    AlreadyClosed(String),
}

// The ledger service has emitted timestamps both with and without seconds,
// and occasionally with an explicit offset.
const CLOCK_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a clock timestamp as received from the ledger service or entered in
/// a backfill form.
pub fn parse_clock(value: &str) -> Result<NaiveDateTime, AttendanceError> {
    let value = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.naive_local());
    }
    for format in CLOCK_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    Err(AttendanceError::BadTimestamp(value.to_string()))
}

/// Worked hours between two clock events, rounded to two decimals. Pure: no
/// hidden clock reads, so the same inputs always give the same result.
pub fn compute_hours(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
) -> Result<f64, InvalidIntervalError> {
    if clock_out <= clock_in {
        return Err(InvalidIntervalError);
    }

    let seconds = (clock_out - clock_in).num_seconds() as f64;
    Ok(round_hours(seconds / 3600.0))
}

/// String-level variant for raw timestamps straight off the wire or a form.
pub fn compute_hours_between(clock_in: &str, clock_out: &str) -> Result<f64, AttendanceError> {
    let clock_in = parse_clock(clock_in)?;
    let clock_out = parse_clock(clock_out)?;
    Ok(compute_hours(clock_in, clock_out)?)
}

/// Validate a manual backfill before submission. Manual entries bypass the
/// "currently clocked in" state check but chronology is enforced the same
/// way; returns the hours the record will be closed with.
pub fn validate_manual(request: &ManualAttendanceRequest) -> Result<f64, AttendanceError> {
    compute_hours_between(&request.clock_in, &request.clock_out)
}

/// Close an open record: stamps `clock_out` and the computed `hours`, which
/// are immutable from then on.
pub fn close(record: &mut Attendance, clock_out: &str) -> Result<f64, AttendanceError> {
    if !record.is_open() {
        return Err(AttendanceError::AlreadyClosed(record.id.clone()));
    }

    let hours = compute_hours_between(&record.clock_in, clock_out)?;
    record.clock_out = Some(clock_out.trim().to_string());
    record.hours = Some(hours);
    Ok(hours)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
