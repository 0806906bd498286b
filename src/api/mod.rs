//! HTTP API for routes.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/api/route` | 200, every route |
//! | POST | `/api/route` | 201, created route |
//! | GET | `/api/route/{id}` | 200, active route |
//! | PUT | `/api/route/{id}` | 200, updated route |
//! | DELETE | `/api/route/{id}` | 204 |
//!
//! Failures use the [`AppError`] JSON body. Any origin, method and header
//! is allowed cross-origin.

mod dto;

pub use dto::{CreateRouteRequest, UpdateRouteRequest};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::graph::GraphClient;
use crate::models::{Route, RouteId};
use crate::services::RouteService;

/// Builds the route API around `service`.
pub fn router<C: GraphClient + 'static>(service: RouteService<C>) -> Router {
    Router::new()
        .route("/api/route", get(list_routes::<C>).post(create_route::<C>))
        .route(
            "/api/route/{id}",
            get(get_route::<C>)
                .put(update_route::<C>)
                .delete(delete_route::<C>),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn list_routes<C: GraphClient + 'static>(
    State(service): State<RouteService<C>>,
) -> Result<Json<Vec<Route>>, AppError> {
    Ok(Json(service.list().await?))
}

async fn create_route<C: GraphClient + 'static>(
    State(service): State<RouteService<C>>,
    body: Result<Json<CreateRouteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    let Json(req) = body.map_err(invalid_body)?;
    let route = service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

async fn get_route<C: GraphClient + 'static>(
    State(service): State<RouteService<C>>,
    Path(id): Path<String>,
) -> Result<Json<Route>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(service.get(id).await?))
}

async fn update_route<C: GraphClient + 'static>(
    State(service): State<RouteService<C>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateRouteRequest>, JsonRejection>,
) -> Result<Json<Route>, AppError> {
    let id = parse_id(&id)?;
    let Json(req) = body.map_err(invalid_body)?;
    Ok(Json(service.update(id, req.into()).await?))
}

async fn delete_route<C: GraphClient + 'static>(
    State(service): State<RouteService<C>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<RouteId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid route id '{}'", raw)))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}
