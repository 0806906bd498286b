//! Field rules applied to routes before they are written.

use chrono::NaiveTime;

use crate::error::AppError;

/// Station names must be non-blank and must not name the same station.
///
/// Names are compared trimmed and case-insensitively.
pub fn validate_stations(origin: &str, destination: &str) -> Result<(), AppError> {
    let origin = origin.trim();
    let destination = destination.trim();

    if origin.is_empty() {
        return Err(AppError::Validation(
            "Origin station must not be empty".to_string(),
        ));
    }
    if destination.is_empty() {
        return Err(AppError::Validation(
            "Destination station must not be empty".to_string(),
        ));
    }
    if origin.to_lowercase() == destination.to_lowercase() {
        return Err(AppError::Validation(format!(
            "Origin and destination must differ (both are '{}')",
            origin
        )));
    }
    Ok(())
}

/// Departure must come strictly before arrival, and every interlude must
/// fall strictly between them.
pub fn validate_schedule(
    departure: NaiveTime,
    arrival: NaiveTime,
    interludes: &[NaiveTime],
) -> Result<(), AppError> {
    if departure >= arrival {
        return Err(AppError::Validation(format!(
            "Departure time {} must be before arrival time {}",
            departure.format("%H:%M"),
            arrival.format("%H:%M")
        )));
    }
    if let Some(outside) = interludes
        .iter()
        .find(|t| **t <= departure || **t >= arrival)
    {
        return Err(AppError::Validation(format!(
            "Interlude time {} must lie between {} and {}",
            outside.format("%H:%M"),
            departure.format("%H:%M"),
            arrival.format("%H:%M")
        )));
    }
    Ok(())
}

/// True when two station names refer to the same stored station.
///
/// Stations are stored and matched by their exact trimmed name, so case
/// counts here even though `validate_stations` ignores it.
pub fn same_station(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_valid_stations() {
        assert!(validate_stations("Central", "Harbor").is_ok());
    }

    #[test]
    fn test_blank_station_rejected() {
        assert!(matches!(
            validate_stations("  ", "Harbor"),
            Err(AppError::Validation(_))
        ));
        assert!(validate_stations("Central", "").is_err());
    }

    #[test]
    fn test_identical_stations_rejected() {
        assert!(validate_stations("Central", " central ").is_err());
    }

    #[test]
    fn test_departure_must_precede_arrival() {
        assert!(validate_schedule(t(8, 0), t(8, 30), &[]).is_ok());
        assert!(validate_schedule(t(8, 30), t(8, 30), &[]).is_err());
        assert!(validate_schedule(t(9, 0), t(8, 30), &[]).is_err());
    }

    #[test]
    fn test_interludes_inside_window() {
        assert!(validate_schedule(t(10, 0), t(11, 0), &[t(10, 15), t(10, 45)]).is_ok());
        assert!(validate_schedule(t(10, 0), t(11, 0), &[t(10, 0)]).is_err());
        assert!(validate_schedule(t(10, 0), t(11, 0), &[t(11, 30)]).is_err());
    }

    #[test]
    fn test_same_station() {
        assert!(same_station("Harbor", " Harbor "));
        assert!(!same_station("Harbor", "HARBOR"));
        assert!(!same_station("Harbor", "Central"));
    }
}
