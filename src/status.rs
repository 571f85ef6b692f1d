//! Status data structures and uptime formatting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNKNOWN: &str = "unknown";

/// Subset of the `/api/v3/system/status` body we care about.
///
/// A field of an unexpected JSON type does not reject the body: scalars are
/// kept in their text form, anything else reads as missing.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Outcome of checking one target once
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CheckResult {
    pub up: bool,
    pub version: Option<String>,
    pub start_time: Option<String>,
    pub uptime: Option<String>,
}

impl CheckResult {
    pub fn down() -> Self {
        Self {
            up: false,
            version: None,
            start_time: None,
            uptime: None,
        }
    }

    /// Reachable, but the status body could not be read
    pub fn up_unknown() -> Self {
        Self {
            up: true,
            version: Some(UNKNOWN.to_string()),
            start_time: None,
            uptime: Some(UNKNOWN.to_string()),
        }
    }

    pub fn from_status(status: SystemStatus, now: DateTime<Utc>) -> Self {
        let uptime = status
            .start_time
            .as_deref()
            .and_then(|start| uptime_since(start, now))
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            up: true,
            version: Some(status.version.unwrap_or_else(|| UNKNOWN.to_string())),
            start_time: status.start_time,
            uptime: Some(uptime),
        }
    }
}

/// Results of one pass over every configured target
#[derive(Clone, Debug, Default)]
pub struct CycleReport {
    pub results: Vec<(String, CheckResult)>,
}

impl CycleReport {
    pub fn all_up(&self) -> bool {
        self.results.iter().all(|(_, result)| result.up)
    }

    pub fn down_count(&self) -> usize {
        self.results.iter().filter(|(_, result)| !result.up).count()
    }
}

/// Parse an ISO-8601 start time and format the time elapsed until `now`
pub fn uptime_since(start_time: &str, now: DateTime<Utc>) -> Option<String> {
    let start = DateTime::parse_from_rfc3339(start_time).ok()?;
    Some(format_uptime(start.with_timezone(&Utc), now))
}

/// `"{days} days, HH:MM"` or `"HH:MM"` when less than a day has passed
pub fn format_uptime(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - start).num_seconds().max(0);
    let days = elapsed / 86_400;
    let hours = (elapsed % 86_400) / 3_600;
    let minutes = (elapsed % 3_600) / 60;

    if days > 0 {
        format!("{} days, {:02}:{:02}", days, hours, minutes)
    } else {
        format!("{:02}:{:02}", hours, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_format_uptime_under_a_day() {
        let start = now() - Duration::minutes(3 * 60 + 7);
        assert_eq!(format_uptime(start, now()), "03:07");
    }

    #[test]
    fn test_format_uptime_with_days() {
        let start = now() - Duration::days(2) - Duration::hours(5) - Duration::minutes(9);
        assert_eq!(format_uptime(start, now()), "2 days, 05:09");
    }

    #[test]
    fn test_format_uptime_future_start_clamps() {
        let start = now() + Duration::hours(1);
        assert_eq!(format_uptime(start, now()), "00:00");
    }

    #[test]
    fn test_uptime_since_parses_fractional_seconds() {
        assert_eq!(
            uptime_since("2024-06-14T12:00:00.123456Z", now()).as_deref(),
            Some("1 days, 00:29")
        );
        assert_eq!(uptime_since("2024-06-15T12:00:00Z", now()).as_deref(), Some("00:30"));
        assert!(uptime_since("yesterday", now()).is_none());
    }

    #[test]
    fn test_status_deserialization() {
        let status: SystemStatus = serde_json::from_str(
            r#"{"appName":"Radarr","version":"5.2.6.8376","startTime":"2024-06-15T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(status.version.as_deref(), Some("5.2.6.8376"));
        assert_eq!(status.start_time.as_deref(), Some("2024-06-15T10:00:00Z"));
    }

    #[test]
    fn test_status_keeps_readable_fields() {
        let status: SystemStatus = serde_json::from_str(
            r#"{"version":5,"startTime":"2024-06-15T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(status.version.as_deref(), Some("5"));
        assert_eq!(status.start_time.as_deref(), Some("2024-06-15T10:00:00Z"));

        let status: SystemStatus =
            serde_json::from_str(r#"{"version":"4.0.0","startTime":{"at":1}}"#).unwrap();
        assert_eq!(status.version.as_deref(), Some("4.0.0"));
        assert!(status.start_time.is_none());

        let result = CheckResult::from_status(status, now());
        assert_eq!(result.version.as_deref(), Some("4.0.0"));
        assert_eq!(result.uptime.as_deref(), Some(UNKNOWN));

        let status: SystemStatus = serde_json::from_str(r#"{"version":null}"#).unwrap();
        assert_eq!(status, SystemStatus::default());
    }

    #[test]
    fn test_from_status_defaults() {
        let result = CheckResult::from_status(SystemStatus::default(), now());
        assert!(result.up);
        assert_eq!(result.version.as_deref(), Some(UNKNOWN));
        assert_eq!(result.uptime.as_deref(), Some(UNKNOWN));
        assert!(result.start_time.is_none());

        let result = CheckResult::from_status(
            SystemStatus {
                version: Some("4.0.0".to_string()),
                start_time: Some("garbage".to_string()),
            },
            now(),
        );
        assert_eq!(result.uptime.as_deref(), Some(UNKNOWN));
        assert_eq!(result.start_time.as_deref(), Some("garbage"));
    }

    #[test]
    fn test_cycle_report_all_up() {
        let mut report = CycleReport::default();
        assert!(report.all_up());

        report.results.push(("Radarr".to_string(), CheckResult::up_unknown()));
        assert!(report.all_up());

        report.results.push(("Sonarr".to_string(), CheckResult::down()));
        assert!(!report.all_up());
        assert_eq!(report.down_count(), 1);
    }
}
