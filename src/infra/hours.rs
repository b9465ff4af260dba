//! Business-hours gate evaluated once before a run

use crate::infra::config::Config;
use anyhow::{anyhow, bail};
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

/// Local opening window `[open_hour, close_hour)` in a named time zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusinessHours {
    tz: Tz,
    open_hour: u32,
    close_hour: u32,
}

impl BusinessHours {
    pub fn new(timezone: &str, open_hour: u32, close_hour: u32) -> anyhow::Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|e| anyhow!("unknown timezone {timezone:?}: {e}"))?;
        if close_hour > 24 || open_hour >= close_hour {
            bail!("invalid business hours {open_hour}..{close_hour}");
        }
        Ok(Self { tz, open_hour, close_hour })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.timezone(), config.open_hour(), config.close_hour())
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local hour of `now` in the configured zone
    pub fn local_hour(&self, now: DateTime<Utc>) -> u32 {
        now.with_timezone(&self.tz).hour()
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        let hour = self.local_hour(now);
        hour >= self.open_hour && hour < self.close_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn adelaide() -> BusinessHours {
        BusinessHours::new("Australia/Adelaide", 8, 20).unwrap()
    }

    #[test]
    fn test_open_during_standard_time() {
        // ACST is UTC+9:30: 00:00Z is 09:30 local
        let hours = adelaide();
        assert!(hours.is_open_at(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()));
        // 10:30Z is 20:00 local, closing hour is exclusive
        assert!(!hours.is_open_at(Utc.with_ymd_and_hms(2024, 7, 1, 10, 30, 0).unwrap()));
        // 22:29Z is 07:59 local
        assert!(!hours.is_open_at(Utc.with_ymd_and_hms(2024, 6, 30, 22, 29, 0).unwrap()));
        // 22:30Z is 08:00 local
        assert!(hours.is_open_at(Utc.with_ymd_and_hms(2024, 6, 30, 22, 30, 0).unwrap()));
    }

    #[test]
    fn test_open_during_daylight_time() {
        // ACDT is UTC+10:30: 21:30Z is 08:00 local the next day
        let hours = adelaide();
        assert!(hours.is_open_at(Utc.with_ymd_and_hms(2024, 1, 15, 21, 30, 0).unwrap()));
        assert!(!hours.is_open_at(Utc.with_ymd_and_hms(2024, 1, 15, 21, 0, 0).unwrap()));
        assert_eq!(hours.local_hour(Utc.with_ymd_and_hms(2024, 1, 15, 21, 0, 0).unwrap()), 7);
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        assert!(BusinessHours::new("Mars/Olympus_Mons", 8, 20).is_err());
    }

    #[test]
    fn test_invalid_window_rejected() {
        assert!(BusinessHours::new("UTC", 20, 8).is_err());
        assert!(BusinessHours::new("UTC", 8, 8).is_err());
        assert!(BusinessHours::new("UTC", 0, 25).is_err());
        assert!(BusinessHours::new("UTC", 0, 24).is_ok());
    }

    #[test]
    fn test_from_default_config() {
        let hours = BusinessHours::from_config(&Config::default()).unwrap();
        assert_eq!(hours.timezone(), chrono_tz::Australia::Adelaide);
    }
}
