//! Business logic services for metro routes.
//!
//! Services apply validation and collision rules around repositories,
//! using the `FromContext` derive macro for dependency injection.

mod route;
pub mod validation;

pub use route::{CreateRouteInput, RouteService, UpdateRouteInput};
