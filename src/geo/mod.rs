//! Italian administrative geography for lead location filters.
//!
//! Provides province canonicalisation over a built-in reference table,
//! region listings, autocomplete, and fuzzy comune matching.

pub mod comune;
pub mod dataset;
pub mod filter;
pub mod registry;
pub mod types;

pub use comune::{match_municipality, normalize_municipality};
pub use filter::{LeadLocation, Located, LocationFilter, LocationQuery};
pub use registry::{global, GeoRegistry, SEARCH_LIMIT};
pub use types::{GeoError, ProvinceRecord, ProvinceSummary, Result};
