//! Route model and its identifier.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{hhmm, hhmm_seq};

/// Opaque, globally unique route identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(Uuid);

impl RouteId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RouteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A scheduled trip between two named stations.
///
/// `is_active = false` marks the route as soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteId,
    pub origin_station: String,
    pub destination_station: String,
    #[serde(with = "hhmm")]
    pub departure_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub arrival_time: NaiveTime,
    /// Intermediate stop times, in travel order.
    #[serde(with = "hhmm_seq", default)]
    pub interlude_times: Vec<NaiveTime>,
    pub is_active: bool,
}

impl Route {
    /// Creates an active route with a fresh identifier.
    pub fn new(
        origin_station: impl Into<String>,
        destination_station: impl Into<String>,
        departure_time: NaiveTime,
        arrival_time: NaiveTime,
        interlude_times: Vec<NaiveTime>,
    ) -> Self {
        Self {
            id: RouteId::new(),
            origin_station: origin_station.into(),
            destination_station: destination_station.into(),
            departure_time,
            arrival_time,
            interlude_times,
            is_active: true,
        }
    }
}
