//! Runtime configuration: where the province dataset comes from.
//!
//! Precedence: `--data` / `ITALIA_GEO_DATA` → ~/.italia-geo/provinces.json (if present) → embedded table.

use crate::geo::{self, GeoRegistry};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an alternate dataset file.
pub const DATA_ENV: &str = "ITALIA_GEO_DATA";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3080;

/// Where the registry is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Builtin,
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "built-in table"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl DataSource {
    /// Pick the source: explicit path, then the per-user file, then built-in.
    pub fn select(explicit: Option<PathBuf>) -> Self {
        Self::select_with_default(explicit, &default_data_path())
    }

    fn select_with_default(explicit: Option<PathBuf>, fallback: &Path) -> Self {
        match explicit {
            Some(path) => Self::File(path),
            None if fallback.is_file() => Self::File(fallback.to_path_buf()),
            None => Self::Builtin,
        }
    }

    /// Build the registry. The built-in source borrows the process-wide one.
    pub fn load(&self) -> geo::Result<Cow<'static, GeoRegistry>> {
        let registry = match self {
            Self::Builtin => Cow::Borrowed(geo::global()),
            Self::File(path) => Cow::Owned(GeoRegistry::from_path(path)?),
        };
        info!(source = %self, provinces = registry.len(), "province registry ready");
        Ok(registry)
    }
}

/// ~/.italia-geo/provinces.json
pub fn default_data_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".italia-geo")
        .join("provinces.json")
}
