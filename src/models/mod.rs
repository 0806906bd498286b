//! Domain models for metro routes.

mod route;
pub mod time;

pub use route::{Route, RouteId};
