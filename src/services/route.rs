//! Route service: validation and collision rules around the repository.

use chrono::NaiveTime;

use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;
use crate::graph::backends::neo4j::Neo4jClient;
use crate::graph::GraphClient;
use crate::models::{Route, RouteId};
use crate::repositories::{CreateOutcome, RouteRepository, RouteSchema};
use crate::services::validation::{same_station, validate_schedule, validate_stations};

// ============================================================================
// Service Types
// ============================================================================

/// Parameters for creating a route.
#[derive(Debug, Clone)]
pub struct CreateRouteInput {
    pub origin_station: String,
    pub destination_station: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub interlude_times: Vec<NaiveTime>,
    pub is_active: bool,
}

/// Parameters for updating a route. Identity and active flag are kept.
#[derive(Debug, Clone)]
pub struct UpdateRouteInput {
    pub origin_station: String,
    pub destination_station: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub interlude_times: Vec<NaiveTime>,
}

// ============================================================================
// Service
// ============================================================================

#[derive(FromContext)]
#[from_context(Context = "Context<C>")]
pub struct RouteService<C: GraphClient = Neo4jClient> {
    routes: RouteRepository<C>,
}

impl<C: GraphClient> Clone for RouteService<C> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

impl<C: GraphClient> RouteService<C> {
    pub fn new(routes: RouteRepository<C>) -> Self {
        Self { routes }
    }

    /// Every stored route, soft-deleted ones included.
    pub async fn list(&self) -> Result<Vec<Route>, AppError> {
        self.routes.get_all().await
    }

    /// The active route with `id`.
    pub async fn get(&self, id: RouteId) -> Result<Route, AppError> {
        self.routes
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::RouteNotFound(id.to_string()))
    }

    pub async fn create(&self, input: CreateRouteInput) -> Result<Route, AppError> {
        validate_stations(&input.origin_station, &input.destination_station)?;
        validate_schedule(
            input.departure_time,
            input.arrival_time,
            &input.interlude_times,
        )?;

        let origin = input.origin_station.trim().to_string();
        let destination = input.destination_station.trim().to_string();
        self.check_collision(&origin, &destination, None).await?;

        let mut route = Route::new(
            origin,
            destination,
            input.departure_time,
            input.arrival_time,
            input.interlude_times,
        );
        route.is_active = input.is_active;

        match self.routes.create(&route).await? {
            CreateOutcome::Inserted => {
                tracing::info!(id = %route.id, "Route created");
                Ok(route)
            }
            CreateOutcome::AlreadyExists => Err(AppError::Internal(format!(
                "Generated route id {} is already taken",
                route.id
            ))),
        }
    }

    /// Replace the schedule and endpoints of an active route.
    pub async fn update(&self, id: RouteId, input: UpdateRouteInput) -> Result<Route, AppError> {
        let existing = self.get(id).await?;

        validate_stations(&input.origin_station, &input.destination_station)?;
        validate_schedule(
            input.departure_time,
            input.arrival_time,
            &input.interlude_times,
        )?;

        let origin = input.origin_station.trim().to_string();
        let destination = input.destination_station.trim().to_string();
        self.check_collision(&origin, &destination, Some(&existing))
            .await?;

        let updated = Route {
            id: existing.id,
            origin_station: origin,
            destination_station: destination,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
            interlude_times: input.interlude_times,
            is_active: existing.is_active,
        };

        if !self.routes.update(&updated).await? {
            return Err(AppError::RouteNotFound(id.to_string()));
        }
        tracing::info!(%id, "Route updated");
        Ok(updated)
    }

    /// Soft delete.
    pub async fn delete(&self, id: RouteId) -> Result<(), AppError> {
        if !self.routes.delete(id).await? {
            return Err(AppError::RouteNotFound(id.to_string()));
        }
        tracing::info!(%id, "Route deactivated");
        Ok(())
    }

    /// Rejects endpoints already taken by another route.
    ///
    /// Relational storage forbids a second route between the same pair of
    /// stations; flat storage forbids reusing either station. Endpoints the
    /// route being updated already uses are not checked.
    async fn check_collision(
        &self,
        origin: &str,
        destination: &str,
        current: Option<&Route>,
    ) -> Result<(), AppError> {
        match self.routes.schema() {
            RouteSchema::Relational => {
                let unchanged = current.is_some_and(|r| {
                    same_station(&r.origin_station, origin)
                        && same_station(&r.destination_station, destination)
                });
                if !unchanged && self.routes.exists_route(origin, destination).await? {
                    return Err(AppError::Validation(format!(
                        "A route from '{}' to '{}' already exists",
                        origin, destination
                    )));
                }
            }
            RouteSchema::Flat => {
                for station in [origin, destination] {
                    let owned = current.is_some_and(|r| {
                        same_station(&r.origin_station, station)
                            || same_station(&r.destination_station, station)
                    });
                    if !owned && self.routes.exists_station(station).await? {
                        return Err(AppError::Validation(format!(
                            "Station '{}' is already used by another route",
                            station
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
