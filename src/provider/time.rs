use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{RawTimestamp, TimeParseError};

/// Zone-aware formats tried after RFC 3339 and RFC 2822.
const ZONED_FORMATS: &[&str] = &[
    // Twitter-style `Wed Oct 10 20:19:24 +0000 2018`
    "%a %b %d %H:%M:%S %z %Y",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Zone-less formats, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Converts a provider timestamp into a UTC instant.
///
/// Numbers, and text made only of a number, are seconds since the Unix epoch.
/// Other text is tried as RFC 3339, RFC 2822, then a fixed list of common
/// calendar layouts. Zone-less layouts are taken as UTC and a bare date means
/// midnight.
///
/// # Errors
/// Returns [`TimeParseError`] when the value matches none of the above or
/// falls outside the representable range.
pub fn parse_created(raw: &RawTimestamp) -> Result<DateTime<Utc>, TimeParseError> {
    match raw {
        RawTimestamp::Epoch(secs) => from_epoch(*secs).ok_or_else(|| out_of_range(*secs)),
        RawTimestamp::Text(text) => parse_text(text.trim())
            .ok_or_else(|| TimeParseError(text.clone())),
    }
}

/// Like [`parse_created`] but never fails: unparseable values become the
/// Unix epoch, which sorts them last.
pub fn normalize_created(raw: &RawTimestamp) -> (DateTime<Utc>, Option<TimeParseError>) {
    match parse_created(raw) {
        Ok(created) => (created, None),
        Err(err) => (DateTime::UNIX_EPOCH, Some(err)),
    }
}

fn from_epoch(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn out_of_range(secs: i64) -> TimeParseError {
    TimeParseError(secs.to_string().into())
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(secs) = text.parse::<i64>() {
        return from_epoch(secs);
    }
    if let Ok(secs) = text.parse::<f64>() {
        if secs.is_finite() {
            return from_epoch(secs.trunc() as i64);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|ndt| ndt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|ndt| ndt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANT: i64 = 1_700_000_000;

    fn expected() -> DateTime<Utc> {
        DateTime::from_timestamp(INSTANT, 0).unwrap()
    }

    #[test]
    fn test_numeric_and_text_agree() {
        let forms = [
            RawTimestamp::Epoch(INSTANT),
            RawTimestamp::from("1700000000"),
            RawTimestamp::from(" 1700000000 "),
            RawTimestamp::from("1700000000.75"),
            RawTimestamp::from("2023-11-14T22:13:20Z"),
            RawTimestamp::from("2023-11-14T22:13:20.000Z"),
            RawTimestamp::from("2023-11-15T01:13:20+03:00"),
            RawTimestamp::from("Tue, 14 Nov 2023 22:13:20 +0000"),
            RawTimestamp::from("Tue Nov 14 22:13:20 +0000 2023"),
            RawTimestamp::from("2023-11-14 22:13:20"),
            RawTimestamp::from("2023-11-14T22:13:20"),
        ];
        for form in forms {
            assert_eq!(parse_created(&form), Ok(expected()), "{form:?}");
        }
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let parsed = parse_created(&RawTimestamp::from("2023-11-14")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2023-11-14T00:00:00+00:00");
    }

    #[test]
    fn test_unparseable_text_is_an_error() {
        for text in ["", "   ", "yesterday-ish", "2023-13-45", "NaN"] {
            let raw = RawTimestamp::from(text);
            assert!(parse_created(&raw).is_err(), "{text:?}");
        }
    }

    #[test]
    fn test_out_of_range_epoch_is_an_error() {
        assert!(parse_created(&RawTimestamp::Epoch(i64::MAX)).is_err());
    }

    #[test]
    fn test_normalize_falls_back_to_epoch() {
        let (created, err) = normalize_created(&RawTimestamp::from("not a date"));
        assert_eq!(created, DateTime::UNIX_EPOCH);
        assert_eq!(err, Some(TimeParseError("not a date".into())));

        let (created, err) = normalize_created(&RawTimestamp::Epoch(INSTANT));
        assert_eq!(created, expected());
        assert!(err.is_none());
    }
}
