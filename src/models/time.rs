//! Time-of-day formatting shared by the graph mapping and the HTTP API.
//!
//! Times are written as zero-padded `HH:MM`. Reading is lenient: `H:M`,
//! `HH:MM` and `HH:MM:SS` are all accepted, seconds are dropped.

use chrono::NaiveTime;

/// Formats a time as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses `H:M`, `HH:MM` or `HH:MM:SS` into a minute-granularity time.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let invalid = || format!("Invalid time '{}'. Expected HH:MM", s);

    let parts: Vec<&str> = s.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *field = part.parse().map_err(|_| invalid())?;
    }

    let [hour, minute, second] = fields;
    if second >= 60 {
        return Err(invalid());
    }
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Serde adapter for a single `HH:MM` time.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for an ordered list of `HH:MM` times.
pub mod hhmm_seq {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        times: &[NaiveTime],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(times.iter().map(|t| super::format_time(*t)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<NaiveTime>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|raw| super::parse_time(raw).map_err(de::Error::custom))
            .collect()
    }
}
