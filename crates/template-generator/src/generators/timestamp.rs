//! Timestamp value generators.
//!
//! Ranges accept RFC 3339 timestamps (absolute) and `YYYY-MM-DD` dates or
//! `YYYY-MM-DDTHH:MM:SS` local times, which are read in the call's time
//! zone. Output is rendered in that time zone too.

use super::ArgReader;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use rand::Rng;
use serde_json::Value;

/// Range used when a `date` directive gives no bounds.
const DEFAULT_START: &str = "2000-01-01";
const DEFAULT_END: &str = "2030-12-31";

/// Generate a random timestamp in the given range (second resolution).
pub fn generate_timestamp_range<R: Rng>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    let start_ts = start.timestamp();
    let end_ts = end.timestamp();

    if start_ts >= end_ts {
        return start;
    }
    let random_ts = rng.gen_range(start_ts..=end_ts);
    DateTime::from_timestamp(random_ts, 0).unwrap_or(start)
}

/// Parse a timestamp string in various formats.
pub fn parse_timestamp(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Local date-time, read in the active zone
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
    }

    // Try common date-only format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return tz
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
    }

    None
}

/// Render an instant in `tz`, with a strftime `format` or as RFC 3339.
pub fn render(dt: DateTime<Utc>, tz: Tz, format: Option<&str>) -> Result<String, String> {
    let local = dt.with_timezone(&tz);
    match format {
        None => Ok(local.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Some(format) => {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(format!("invalid date format '{format}'"));
            }
            Ok(local.format(format).to_string())
        }
    }
}

/// `date(start, end, format)`.
pub(crate) fn generate(
    args: &ArgReader<'_>,
    ctx: &mut GenerationContext,
) -> Result<Value, GenerationError> {
    let tz = ctx.time_zone();
    let bound = |name: &str, position: usize, default: &str| -> Result<DateTime<Utc>, GenerationError> {
        let raw = args.str(name, position)?.unwrap_or(default);
        parse_timestamp(raw, tz).ok_or_else(|| args.error(format!("cannot parse {name} '{raw}'")))
    };
    let start = bound("start", 0, DEFAULT_START)?;
    let end = bound("end", 1, DEFAULT_END)?;
    if start > end {
        return Err(args.error("start is after end"));
    }
    let format = args.str("format", 2)?;

    let dt = generate_timestamp_range(ctx.rng(), start, end);
    render(dt, tz, format)
        .map(Value::String)
        .map_err(|msg| args.error(msg))
}
