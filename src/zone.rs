//! Clock and zone resolution.
//!
//! The bar consumes exactly one thing from here: "the current time in a
//! named zone". Resolution failures surface at bar construction, never
//! later.
//!
//! Commonly used zone identifiers: `UTC`, `Asia/Shanghai`,
//! `America/New_York`, `Europe/London`, `Asia/Tokyo`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{BarError, BarResult};

/// Resolve an IANA zone name, e.g. `"Asia/Tokyo"`.
pub fn resolve(name: &str) -> BarResult<Tz> {
    Tz::from_str(name).map_err(|_| BarError::UnknownTimeZone {
        name: name.to_string(),
    })
}

/// Current instant in the given zone.
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Current time rendered with a chrono format string in a named zone.
///
/// `%Y-%m-%d` gives a date, `%Y-%m-%d %H:%M:%S` a full timestamp.
pub fn now_string(format: &str, zone: &str) -> BarResult<String> {
    Ok(now_in(resolve(zone)?).format(format).to_string())
}

/// Every zone name bundled with the crate, the equivalent of walking the
/// system zoneinfo directory.
pub fn available_zones() -> impl Iterator<Item = &'static str> {
    chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_zones() {
        assert!(resolve("UTC").is_ok());
        assert!(resolve("Asia/Shanghai").is_ok());
        assert!(resolve("America/New_York").is_ok());
    }

    #[test]
    fn rejects_unknown_zones() {
        let err = resolve("Mars/Olympus").unwrap_err();
        assert!(matches!(err, BarError::UnknownTimeZone { name } if name == "Mars/Olympus"));
    }

    #[test]
    fn now_string_formats_dates() {
        let date = now_string("%Y-%m-%d", "UTC").unwrap();
        assert_eq!(date.len(), 10);
        assert!(now_string("%Y-%m-%d", "Nowhere/Nothing").is_err());
    }

    #[test]
    fn zone_listing_contains_the_defaults() {
        let zones: Vec<_> = available_zones().collect();
        assert!(zones.contains(&"UTC"));
        assert!(zones.contains(&"Asia/Shanghai"));
        assert!(zones.contains(&"Asia/Tokyo"));
    }
}
