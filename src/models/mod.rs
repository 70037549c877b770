//! Data models for the RecFinder client
//!
//! This module contains the wire and domain models organized by concern:
//! - Program: drop-in sessions, registered courses and their raw row shapes
//! - Centre: centre facts and facility inventory
//! - Geo: ward and centre feature collections
//! - Options: filter option enumerations
//! - Search: cross-centre search results and counts

pub mod centre;
pub mod geo;
pub mod ids;
pub mod options;
pub mod program;
pub mod search;

// Re-export all public types for convenient access
pub use centre::{CentreDetail, CentreDetails, CentreFacility, CentrePrograms};
pub use geo::{
    CentreFeature, CentreFeatureCollection, CentreProperties, PointGeometry, WardFeature,
    WardFeatureCollection,
};
pub use ids::{Identifier, LooseValue};
pub use options::{ActivityOption, DistrictOption, FacilityTypeOption, FilterOptions};
pub use program::{DropInProgram, RegisteredCsvRow, RegisteredProgram, RegisteredRecord};
pub use search::{NearbyCentre, ProgramSearchResult, SearchCount, SearchStats};
