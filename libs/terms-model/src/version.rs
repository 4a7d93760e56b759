//! Date-based version tags.
//!
//! Concept scheme versions are tagged `yyyyMMdd`, optionally followed by
//! `-<digits>` for same-day sub-versions (e.g. `20210401-144905`). The ordinal
//! of a tag is the UTC midnight timestamp of its date, in milliseconds, plus
//! the numeric suffix.

use crate::error::{ModelError, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{8})(?:-(\d+))?$").expect("valid version tag pattern"));

/// Parse a version tag into a comparable ordinal.
pub fn version_ordinal(version_tag: &str) -> Result<i64> {
    let malformed = || ModelError::MalformedVersionTag(version_tag.to_string());

    let captures = VERSION_TAG.captures(version_tag).ok_or_else(malformed)?;
    let date = NaiveDate::parse_from_str(&captures[1], "%Y%m%d").map_err(|_| malformed())?;
    let day = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(malformed)?
        .and_utc()
        .timestamp_millis();

    let offset = match captures.get(2) {
        Some(suffix) => suffix.as_str().parse::<i64>().map_err(|_| malformed())?,
        None => 0,
    };

    day.checked_add(offset).ok_or_else(malformed)
}

/// The calendar date of a version tag, when it has one.
pub fn version_date(version_tag: &str) -> Option<NaiveDate> {
    let captures = VERSION_TAG.captures(version_tag)?;
    NaiveDate::parse_from_str(&captures[1], "%Y%m%d").ok()
}
