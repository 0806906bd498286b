//! Storage layouts for routes in the graph.
//!
//! Both layouts expose the same row shape to the repository: every read
//! returns the columns `id`, `origin`, `destination`, `departure`,
//! `arrival`, `interludes` and `active`, and every write binds the
//! parameters `$id`, `$origin`, `$destination`, `$departure`, `$arrival`,
//! `$interludes` and `$active`.

use serde::{Deserialize, Serialize};

/// How a route is laid out in the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSchema {
    /// One `:Route` node carrying every field as a property.
    Flat,
    /// `(:Station {Name})-[:Route {..}]->(:Station {Name})`, stations merged by name.
    #[default]
    Relational,
}

impl std::fmt::Display for RouteSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteSchema::Flat => write!(f, "flat"),
            RouteSchema::Relational => write!(f, "relational"),
        }
    }
}

impl std::str::FromStr for RouteSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(RouteSchema::Flat),
            "relational" => Ok(RouteSchema::Relational),
            _ => Err(format!(
                "Invalid route schema '{}'. Valid values: flat, relational",
                s
            )),
        }
    }
}

impl RouteSchema {
    /// Idempotent uniqueness constraint on the route identifier.
    pub fn constraint(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "CREATE CONSTRAINT route_id_unique IF NOT EXISTS
                 FOR (r:Route) REQUIRE r.Id IS UNIQUE"
            }
            RouteSchema::Relational => {
                "CREATE CONSTRAINT route_relationship_id_unique IF NOT EXISTS
                 FOR ()-[r:Route]-() REQUIRE r.Id IS UNIQUE"
            }
        }
    }

    pub(crate) fn create(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "CREATE (r:Route {
                     Id: $id,
                     OriginStation: $origin,
                     DestinationStation: $destination,
                     DepartureTime: $departure,
                     ArrivalTime: $arrival,
                     InterludeTimes: $interludes,
                     IsActive: $active
                 })"
            }
            RouteSchema::Relational => {
                "MERGE (o:Station {Name: $origin})
                 MERGE (d:Station {Name: $destination})
                 CREATE (o)-[:Route {
                     Id: $id,
                     DepartureTime: $departure,
                     ArrivalTime: $arrival,
                     InterludeTimes: $interludes,
                     IsActive: $active
                 }]->(d)"
            }
        }
    }

    pub(crate) fn get_all(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "MATCH (r:Route)
                 RETURN r.Id AS id, r.OriginStation AS origin,
                        r.DestinationStation AS destination,
                        r.DepartureTime AS departure, r.ArrivalTime AS arrival,
                        r.InterludeTimes AS interludes, r.IsActive AS active"
            }
            RouteSchema::Relational => {
                "MATCH (o:Station)-[r:Route]->(d:Station)
                 RETURN r.Id AS id, o.Name AS origin, d.Name AS destination,
                        r.DepartureTime AS departure, r.ArrivalTime AS arrival,
                        r.InterludeTimes AS interludes, r.IsActive AS active"
            }
        }
    }

    pub(crate) fn get_by_id(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "MATCH (r:Route {Id: $id})
                 RETURN r.Id AS id, r.OriginStation AS origin,
                        r.DestinationStation AS destination,
                        r.DepartureTime AS departure, r.ArrivalTime AS arrival,
                        r.InterludeTimes AS interludes, r.IsActive AS active"
            }
            RouteSchema::Relational => {
                "MATCH (o:Station)-[r:Route {Id: $id}]->(d:Station)
                 RETURN r.Id AS id, o.Name AS origin, d.Name AS destination,
                        r.DepartureTime AS departure, r.ArrivalTime AS arrival,
                        r.InterludeTimes AS interludes, r.IsActive AS active"
            }
        }
    }

    /// Replaces the mutable fields. Never touches `Id` or `IsActive`.
    ///
    /// The relational form writes the new edge before removing the old one
    /// and only then attaches the original identifier, all in one statement.
    pub(crate) fn update(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "MATCH (r:Route {Id: $id})
                 SET r.OriginStation = $origin,
                     r.DestinationStation = $destination,
                     r.DepartureTime = $departure,
                     r.ArrivalTime = $arrival,
                     r.InterludeTimes = $interludes
                 RETURN count(r) AS matched"
            }
            RouteSchema::Relational => {
                "MATCH (:Station)-[old:Route {Id: $id}]->(:Station)
                 MERGE (o:Station {Name: $origin})
                 MERGE (d:Station {Name: $destination})
                 CREATE (o)-[replacement:Route {
                     DepartureTime: $departure,
                     ArrivalTime: $arrival,
                     InterludeTimes: $interludes,
                     IsActive: coalesce(old.IsActive, true)
                 }]->(d)
                 DELETE old
                 SET replacement.Id = $id
                 RETURN count(replacement) AS matched"
            }
        }
    }

    pub(crate) fn soft_delete(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "MATCH (r:Route {Id: $id})
                 SET r.IsActive = false
                 RETURN count(r) AS matched"
            }
            RouteSchema::Relational => {
                "MATCH (:Station)-[r:Route {Id: $id}]->(:Station)
                 SET r.IsActive = false
                 RETURN count(r) AS matched"
            }
        }
    }

    pub(crate) fn exists_station(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "MATCH (r:Route)
                 WHERE r.OriginStation = $name OR r.DestinationStation = $name
                 RETURN count(r) > 0 AS found"
            }
            RouteSchema::Relational => {
                "OPTIONAL MATCH (s:Station {Name: $name})-[r:Route]-()
                 RETURN count(r) > 0 AS found"
            }
        }
    }

    pub(crate) fn exists_route(&self) -> &'static str {
        match self {
            RouteSchema::Flat => {
                "MATCH (r:Route {OriginStation: $origin, DestinationStation: $destination})
                 RETURN count(r) > 0 AS found"
            }
            RouteSchema::Relational => {
                "OPTIONAL MATCH (:Station {Name: $origin})-[r:Route]->(:Station {Name: $destination})
                 RETURN count(r) > 0 AS found"
            }
        }
    }
}
