use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HoverError;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time zone used when showing bucket x bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DisplayTimeZone {
    #[default]
    Utc,
    /// Whatever the local machine is set to.
    Browser,
    Fixed(FixedOffset),
}

impl FromStr for DisplayTimeZone {
    type Err = HoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        match raw.to_ascii_lowercase().as_str() {
            "" | "utc" | "z" => return Ok(Self::Utc),
            "browser" | "local" => return Ok(Self::Browser),
            _ => {}
        }
        parse_offset(raw)
            .map(Self::Fixed)
            .ok_or_else(|| HoverError::InvalidTimeZone(s.to_string()))
    }
}

impl TryFrom<String> for DisplayTimeZone {
    type Error = HoverError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DisplayTimeZone> for String {
    fn from(value: DisplayTimeZone) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DisplayTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::Browser => write!(f, "browser"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// `+HH:MM`, `-HHMM` or `+HH`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Format an epoch-milliseconds value in the given zone.
///
/// Values that are not a representable instant fall back to the plain number.
pub fn format_time(epoch_ms: f64, zone: &DisplayTimeZone) -> String {
    if !epoch_ms.is_finite() {
        return format_number(epoch_ms);
    }
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(epoch_ms.round() as i64) else {
        return format_number(epoch_ms);
    };
    match zone {
        DisplayTimeZone::Utc => utc.format(TIME_FORMAT).to_string(),
        DisplayTimeZone::Browser => utc.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        DisplayTimeZone::Fixed(offset) => utc.with_timezone(offset).format(TIME_FORMAT).to_string(),
    }
}

/// Compact number formatting for hover cells: whole numbers lose the `.0`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_zones() {
        assert_eq!("UTC".parse::<DisplayTimeZone>().unwrap(), DisplayTimeZone::Utc);
        assert_eq!("browser".parse::<DisplayTimeZone>().unwrap(), DisplayTimeZone::Browser);
        assert_eq!(
            "+02:00".parse::<DisplayTimeZone>().unwrap(),
            DisplayTimeZone::Fixed(FixedOffset::east_opt(7200).unwrap())
        );
        assert_eq!(
            "-0530".parse::<DisplayTimeZone>().unwrap(),
            DisplayTimeZone::Fixed(FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert!("Mars/Olympus".parse::<DisplayTimeZone>().is_err());
        assert!("+02:75".parse::<DisplayTimeZone>().is_err());
    }

    #[test]
    fn test_format_time_utc_and_offset() {
        // 2021-01-01T00:00:00Z
        let ms = 1_609_459_200_000.0;
        assert_eq!(format_time(ms, &DisplayTimeZone::Utc), "2021-01-01 00:00:00");
        let plus_two = DisplayTimeZone::Fixed(FixedOffset::east_opt(7200).unwrap());
        assert_eq!(format_time(ms, &plus_two), "2021-01-01 02:00:00");
    }

    #[test]
    fn test_format_time_non_finite() {
        assert_eq!(format_time(f64::NAN, &DisplayTimeZone::Utc), "NaN");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_zone_serde_roundtrip() {
        let zone: DisplayTimeZone = serde_json::from_str("\"+01:00\"").unwrap();
        assert_eq!(serde_json::to_string(&zone).unwrap(), "\"+01:00\"");
    }
}
