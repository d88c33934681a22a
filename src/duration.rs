//! Elapsed time is carried as whole seconds and only turned into
//! `HH:MM:SS` text at the edges (stored values and API responses).

pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parses `H:MM:SS`-like text. Hours may exceed two digits.
pub fn parse_hms(value: &str) -> Option<u64> {
    let mut parts = value.trim().split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)
}

pub fn to_minutes(total_secs: u64) -> f64 {
    total_secs as f64 / 60.0
}

/// Renders minutes as `Xh Ym`.
pub fn format_minutes(minutes: f64) -> String {
    let whole = minutes.max(0.0).floor() as u64;
    format!("{}h {}m", whole / 60, whole % 60)
}

/// Serde adapter storing seconds as `HH:MM:SS`.
pub mod hms {
    use super::{format_hms, parse_hms};
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hms(*secs))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(parse_hms(&raw).unwrap_or_else(|| {
            warn!("malformed duration {raw:?} in stored data, reading as zero");
            0
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(5), "00:00:05");
        assert_eq!(format_hms(3_725), "01:02:05");
        assert_eq!(format_hms(360_000), "100:00:00");
    }

    #[test]
    fn parses_loose_hours() {
        assert_eq!(parse_hms("1:02:05"), Some(3_725));
        assert_eq!(parse_hms("00:00:00"), Some(0));
        assert_eq!(parse_hms("125:00:01"), Some(450_001));
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(parse_hms(""), None);
        assert_eq!(parse_hms("NaN:NaN:NaN"), None);
        assert_eq!(parse_hms("00:61:00"), None);
        assert_eq!(parse_hms("1:2:3:4"), None);
        assert_eq!(parse_hms("12:30"), None);
        assert_eq!(parse_hms("6000000000000000:00:00"), None);
        assert_eq!(parse_hms(&format!("{}:59:59", u64::MAX / 3600)), None);
    }

    #[test]
    fn minutes_render_as_hours_and_minutes() {
        assert_eq!(format_minutes(to_minutes(0)), "0h 0m");
        assert_eq!(format_minutes(to_minutes(5_430)), "1h 30m");
        assert_eq!(format_minutes(59.9), "0h 59m");
    }

    #[test]
    fn malformed_stored_duration_reads_as_zero() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(with = "hms")]
            time: u64,
        }
        let row: Row = serde_json::from_str(r#"{"time":"bogus"}"#).unwrap();
        assert_eq!(row.time, 0);
        let row: Row = serde_json::from_str(r#"{"time":"6000000000000000:00:00"}"#).unwrap();
        assert_eq!(row.time, 0);
        let row: Row = serde_json::from_str(r#"{"time":"00:01:40"}"#).unwrap();
        assert_eq!(row.time, 100);
    }
}
