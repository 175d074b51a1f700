use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::EngagementError;
use crate::models::{PostRecord, RawPost};

/// Offset-less layouts; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Postgres-style text output, e.g. `2024-06-10 12:00:00.123+00`
const OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(s, OFFSET_FORMAT) {
        return Some(ts);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Validate a batch of raw posts.
///
/// The first unparseable timestamp rejects the whole batch, so a bad row can
/// never skew the date ordering the streak walk depends on.
pub fn parse_records(raw: &[RawPost]) -> Result<Vec<PostRecord>, EngagementError> {
    raw.iter()
        .enumerate()
        .map(|(index, post)| {
            parse_timestamp(&post.created_at)
                .map(|timestamp| PostRecord { timestamp })
                .ok_or_else(|| EngagementError::InvalidRecord {
                    index,
                    value: post.created_at.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rfc3339_variants() {
        let utc = parse_timestamp("2024-06-10T12:00:00Z").unwrap();
        let offset = parse_timestamp("2024-06-10T09:00:00-03:00").unwrap();
        let fractional = parse_timestamp("2024-06-10T12:00:00.123456+00:00").unwrap();
        assert_eq!(utc, offset);
        assert_eq!(utc.timestamp(), fractional.timestamp());

        // Postgres text output: space separator, hour-only offset
        let postgres = parse_timestamp("2024-06-10 12:00:00.123+00").unwrap();
        let postgres_local = parse_timestamp("2024-06-10 09:00:00-03").unwrap();
        assert_eq!(postgres.timestamp(), utc.timestamp());
        assert_eq!(postgres.timestamp_subsec_millis(), 123);
        assert_eq!(postgres_local, utc);
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let sqlite = parse_timestamp("2024-06-10 12:00:00").unwrap();
        let iso = parse_timestamp("2024-06-10T12:00:00.5").unwrap();
        assert_eq!(sqlite.offset().local_minus_utc(), 0);
        assert_eq!(sqlite, parse_timestamp("2024-06-10T12:00:00Z").unwrap());
        assert_eq!(iso.timestamp(), sqlite.timestamp());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-40T00:00:00Z").is_none());
    }

    #[test]
    fn test_batch_rejected_on_first_bad_record() {
        let raw = vec![
            RawPost::new("2024-06-10T12:00:00Z"),
            RawPost::new("not a date"),
            RawPost::new("also bad"),
        ];
        assert_eq!(
            parse_records(&raw),
            Err(EngagementError::InvalidRecord {
                index: 1,
                value: "not a date".to_string()
            })
        );
    }

    #[test]
    fn test_batch_keeps_order_and_length() {
        let raw = vec![
            RawPost::new("2024-06-09T12:00:00Z"),
            RawPost::new("2024-06-10 08:00:00"),
        ];
        let records = parse_records(&raw).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].timestamp < records[1].timestamp);
        assert!(parse_records(&[]).unwrap().is_empty());
    }
}
