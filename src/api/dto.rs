//! Request bodies for the route endpoints.

use chrono::NaiveTime;
use serde::Deserialize;

use crate::models::time::{hhmm, hhmm_seq};
use crate::services::{CreateRouteInput, UpdateRouteInput};

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub origin_station: String,
    pub destination_station: String,
    #[serde(with = "hhmm")]
    pub departure_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub arrival_time: NaiveTime,
    #[serde(with = "hhmm_seq", default)]
    pub interlude_times: Vec<NaiveTime>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<CreateRouteRequest> for CreateRouteInput {
    fn from(req: CreateRouteRequest) -> Self {
        Self {
            origin_station: req.origin_station,
            destination_station: req.destination_station,
            departure_time: req.departure_time,
            arrival_time: req.arrival_time,
            interlude_times: req.interlude_times,
            is_active: req.is_active,
        }
    }
}

/// Same as [`CreateRouteRequest`] minus the active flag, which an update
/// never changes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    pub origin_station: String,
    pub destination_station: String,
    #[serde(with = "hhmm")]
    pub departure_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub arrival_time: NaiveTime,
    #[serde(with = "hhmm_seq", default)]
    pub interlude_times: Vec<NaiveTime>,
}

impl From<UpdateRouteRequest> for UpdateRouteInput {
    fn from(req: UpdateRouteRequest) -> Self {
        Self {
            origin_station: req.origin_station,
            destination_station: req.destination_station,
            departure_time: req.departure_time,
            arrival_time: req.arrival_time,
            interlude_times: req.interlude_times,
        }
    }
}
