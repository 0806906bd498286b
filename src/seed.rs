//! Synthetic route generation for empty stores.

use chrono::{Duration, NaiveTime};
use rand::seq::index::sample;
use rand::Rng;

use crate::error::AppError;
use crate::graph::GraphClient;
use crate::models::Route;
use crate::repositories::{CreateOutcome, RouteRepository, RouteSchema};

const STATIONS: &[&str] = &[
    "Central",
    "Harbor",
    "University",
    "Airport",
    "Old Town",
    "Riverside",
    "Stadium",
    "Market",
    "North Gate",
    "South Park",
    "Hospital",
    "Civic Center",
    "Lakeside",
    "Industrial",
    "Museum",
    "Bayview",
];

/// Builds up to `count` valid routes with random stations and schedules.
///
/// Endpoints never repeat within a batch: the relational layout gets
/// distinct origin and destination pairs, the flat layout never reuses a
/// station. `count` is capped at what the station list allows.
///
/// Departures fall between 05:00 and 21:59 and every trip lasts 10 to 120
/// minutes, so arrival never wraps past midnight.
pub fn generate_routes<R: Rng + ?Sized>(
    count: usize,
    schema: RouteSchema,
    rng: &mut R,
) -> Vec<Route> {
    let pairs = station_pairs(count, schema, rng);
    if pairs.len() < count {
        tracing::warn!(
            requested = count,
            generated = pairs.len(),
            ?schema,
            "Not enough stations for the requested routes"
        );
    }
    pairs
        .into_iter()
        .map(|(origin, destination)| generate_route(origin, destination, rng))
        .collect()
}

/// Picks station index pairs without replacement.
fn station_pairs<R: Rng + ?Sized>(
    count: usize,
    schema: RouteSchema,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let stations = STATIONS.len();
    match schema {
        RouteSchema::Relational => {
            // Index i encodes origin i / (n - 1) and the i % (n - 1)th other station
            let total = stations * (stations - 1);
            sample(rng, total, count.min(total))
                .into_iter()
                .map(|i| {
                    let origin = i / (stations - 1);
                    let mut destination = i % (stations - 1);
                    if destination >= origin {
                        destination += 1;
                    }
                    (origin, destination)
                })
                .collect()
        }
        RouteSchema::Flat => {
            let routes = count.min(stations / 2);
            let picked = sample(rng, stations, routes * 2).into_vec();
            picked.chunks_exact(2).map(|p| (p[0], p[1])).collect()
        }
    }
}

fn generate_route<R: Rng + ?Sized>(origin: usize, destination: usize, rng: &mut R) -> Route {
    let departure = NaiveTime::MIN + Duration::minutes(rng.gen_range(5 * 60..22 * 60));
    let trip = rng.gen_range(10..=120usize);
    let arrival = departure + Duration::minutes(trip as i64);

    // Distinct minute offsets strictly inside (departure, arrival)
    let stops = rng.gen_range(0..=3);
    let mut offsets: Vec<usize> = sample(rng, trip - 1, stops)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    offsets.sort_unstable();
    let interludes = offsets
        .into_iter()
        .map(|m| departure + Duration::minutes(m as i64))
        .collect();

    let mut route = Route::new(
        STATIONS[origin],
        STATIONS[destination],
        departure,
        arrival,
        interludes,
    );
    route.is_active = rng.gen_bool(0.5);
    route
}

/// Generates and stores `count` routes. Returns how many were inserted.
///
/// Routes whose endpoints are already taken in the store are skipped.
pub async fn seed_routes<C: GraphClient>(
    routes: &RouteRepository<C>,
    count: usize,
) -> Result<usize, AppError> {
    // ThreadRng is not Send; finish generating before the first await.
    let generated = generate_routes(count, routes.schema(), &mut rand::thread_rng());

    let mut inserted = 0;
    for route in &generated {
        if endpoints_taken(routes, route).await? {
            tracing::debug!(
                origin = %route.origin_station,
                destination = %route.destination_station,
                "Skipping seed route with taken endpoints"
            );
            continue;
        }
        if routes.create(route).await? == CreateOutcome::Inserted {
            inserted += 1;
        }
    }

    tracing::info!(requested = count, inserted, "Seeded routes");
    Ok(inserted)
}

async fn endpoints_taken<C: GraphClient>(
    routes: &RouteRepository<C>,
    route: &Route,
) -> Result<bool, AppError> {
    match routes.schema() {
        RouteSchema::Relational => {
            routes
                .exists_route(&route.origin_station, &route.destination_station)
                .await
        }
        RouteSchema::Flat => Ok(routes.exists_station(&route.origin_station).await?
            || routes.exists_station(&route.destination_station).await?),
    }
}
