//! `RecFinder` - Toronto recreation programs, centres and schedules
//!
//! Client-side logic for browsing the city's drop-in and registered
//! recreation programs: API access, program classification, filtering,
//! deduplication and the map/sidebar state behind the finder views.

pub mod adapter;
pub mod api;
pub mod classify;
pub mod config;
pub mod details;
pub mod error;
pub mod filter;
pub mod geolocation;
pub mod logging;
pub mod map;
pub mod models;
pub mod render;
pub mod schedule;
pub mod selection;
pub mod sidebar;
pub mod taxonomy;

// Re-export core types for public API
pub use api::{CentreQuery, CentreSource, NearbyQuery, ProgramType, RecreationApiClient, SearchQuery};
pub use config::RecFinderConfig;
pub use details::{CentreDetailsLoader, CentreProgramView};
pub use error::{GeolocationFailure, RecFinderError, Result};
pub use filter::AgeBracket;
pub use models::{DropInProgram, Identifier, RegisteredProgram};
pub use selection::{DropinSelection, RegisteredSelection};
pub use taxonomy::CategoryTag;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
