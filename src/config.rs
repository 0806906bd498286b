//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/metro-routes/config.toml` (XDG) or platform config dir
//! 3. Project config: `.metro-routes.toml`
//! 4. Legacy variables: `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`
//! 5. Environment variables: `METRO_*`, nested with `__` (e.g. `METRO_SERVER__PORT`)
//!
//! # Example
//!
//! ```toml
//! [neo4j]
//! uri = "neo4j://localhost:7687"
//! user = "neo4j"
//! password = "secret"
//!
//! [server]
//! port = 5000
//!
//! [routes]
//! schema = "relational"   # or "flat"
//!
//! [seed]
//! enabled = true
//! count = 100
//! ```

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::repositories::RouteSchema;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".metro-routes.toml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub neo4j: Neo4jConfig,
    pub server: ServerConfig,
    pub routes: RoutesConfig,
    pub seed: SeedConfig,
}

/// Neo4j connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database; the server default when unset.
    pub database: Option<String>,
    /// Upper bound of the driver connection pool.
    pub max_connections: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "neo4j://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: None,
            max_connections: 16,
        }
    }
}

impl std::fmt::Debug for Neo4jConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Replaces host and port with command-line values where given.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Route storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub schema: RouteSchema,
}

/// Startup seeding of an empty store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 100,
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// The layered provider stack, before extraction.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(PROJECT_CONFIG_FILE))
            // Layer 3: Legacy NEO4J_* variables
            .merge(legacy_env())
            // Layer 4: Environment variables (highest priority)
            .merge(Env::prefixed("METRO_").split("__"))
    }

    /// User config path: ~/.config/metro-routes/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("metro-routes")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("metro-routes").join("config.toml"))
            .unwrap_or_default()
    }
}

/// Unprefixed connection variables understood by earlier deployments.
fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        let mapped = match key.as_str().to_ascii_uppercase().as_str() {
            "NEO4J_URI" => "neo4j.uri",
            "NEO4J_USER" => "neo4j.user",
            "NEO4J_PASSWORD" => "neo4j.password",
            _ => return None,
        };
        Some(mapped.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn isolated(jail: &mut Jail) {
        let home = jail.directory().display().to_string();
        jail.set_env("HOME", &home);
        jail.set_env("XDG_CONFIG_HOME", format!("{}/.config", home));
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            isolated(jail);
            let config: Config = Config::figment().extract()?;

            assert_eq!(config.neo4j.uri, "neo4j://localhost:7687");
            assert_eq!(config.neo4j.user, "neo4j");
            assert_eq!(config.neo4j.max_connections, 16);
            assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
            assert_eq!(config.routes.schema, RouteSchema::Relational);
            assert!(config.seed.enabled);
            assert_eq!(config.seed.count, 100);
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            isolated(jail);
            jail.create_file(
                PROJECT_CONFIG_FILE,
                r#"
                [routes]
                schema = "flat"

                [seed]
                enabled = false
                "#,
            )?;

            let config: Config = Config::figment().extract()?;

            assert_eq!(config.routes.schema, RouteSchema::Flat);
            assert!(!config.seed.enabled);
            assert_eq!(config.seed.count, 100);
            Ok(())
        });
    }

    #[test]
    fn test_server_overrides() {
        let server = ServerConfig::default();

        assert_eq!(
            server.clone().with_overrides(None, Some(8080)).bind_address(),
            "0.0.0.0:8080"
        );
        assert_eq!(
            server
                .with_overrides(Some("127.0.0.1".to_string()), None)
                .bind_address(),
            "127.0.0.1:5000"
        );
    }

    #[test]
    fn test_legacy_variables() {
        Jail::expect_with(|jail| {
            isolated(jail);
            jail.set_env("NEO4J_URI", "bolt://graph:7687");
            jail.set_env("NEO4J_PASSWORD", "hunter2");

            let config: Config = Config::figment().extract()?;

            assert_eq!(config.neo4j.uri, "bolt://graph:7687");
            assert_eq!(config.neo4j.password, "hunter2");
            assert_eq!(config.neo4j.user, "neo4j");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_variables_win() {
        Jail::expect_with(|jail| {
            isolated(jail);
            jail.set_env("NEO4J_URI", "bolt://legacy:7687");
            jail.set_env("METRO_NEO4J__URI", "bolt://preferred:7687");
            jail.set_env("METRO_SERVER__PORT", "8080");

            let config: Config = Config::figment().extract()?;

            assert_eq!(config.neo4j.uri, "bolt://preferred:7687");
            assert_eq!(config.server.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Neo4jConfig {
            password: "hunter2".to_string(),
            ..Neo4jConfig::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
