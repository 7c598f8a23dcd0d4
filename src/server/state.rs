use crate::geo::GeoRegistry;

/// Shared by every handler. The registry is read-only, so no lock.
pub struct AppState {
    pub registry: GeoRegistry,
}
