use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

const COMMON_DATE_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S",    // Common format without timezone
  "%Y-%m-%d %H:%M:%S %z", // Common format with timezone
  "%Y-%m-%d",             // Date only
];

/// Lenient timestamp parsing for the date strings found in the wild.
/// Feeds routinely mix RFC3339, RFC2822 and ad-hoc formats; a date we
/// cannot make sense of becomes None rather than an error.
pub fn parse_date(date_str: impl AsRef<str>) -> Option<DateTime<FixedOffset>> {
  let date_str = date_str.as_ref().trim();
  if date_str.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(date_str) {
    return Some(parsed);
  }

  if let Ok(parsed) = DateTime::parse_from_rfc2822(date_str) {
    return Some(parsed);
  }

  for fmt in COMMON_DATE_FORMATS {
    if let Ok(parsed) = DateTime::parse_from_str(date_str, fmt) {
      return Some(parsed);
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_str, fmt) {
      // no zone information in the string, assume UTC
      return Some(parsed.and_utc().fixed_offset());
    }
  }

  None
}

#[allow(unused)]
pub fn now() -> DateTime<FixedOffset> {
  Utc::now().fixed_offset()
}
