//! Application configuration loaded from environment variables.

use reservation::{InventoryConfig, Section};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `"text"` or `"json"` (default: `"text"`)
/// - `SEAT_SECTIONS`: comma-separated section letters (default: `"A,B"`)
/// - `SEATS_PER_SECTION`: seats in each section (default: `20`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub json_logs: bool,
    pub inventory: InventoryConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            inventory: parse_inventory(
                lookup("SEAT_SECTIONS").as_deref(),
                lookup("SEATS_PER_SECTION").as_deref(),
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            json_logs: false,
            inventory: InventoryConfig::default(),
        }
    }
}

/// Builds the inventory shape, keeping the default on any bad value.
fn parse_inventory(sections: Option<&str>, seats_per_section: Option<&str>) -> InventoryConfig {
    let defaults = InventoryConfig::default();
    if sections.is_none() && seats_per_section.is_none() {
        return defaults;
    }

    let sections = match sections {
        Some(raw) => match raw
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Section>)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "invalid SEAT_SECTIONS, using default inventory");
                return defaults;
            }
        },
        None => defaults.sections().to_vec(),
    };

    let seats_per_section = match seats_per_section {
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "invalid SEATS_PER_SECTION, using default inventory");
                return defaults;
            }
        },
        None => defaults.seats_per_section(),
    };

    InventoryConfig::new(sections, seats_per_section).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid inventory shape, using default");
        defaults
    })
}
