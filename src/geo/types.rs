//! Core types for the geography subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One Italian province as shipped in the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceRecord {
    /// Two-letter official abbreviation (e.g. "MI").
    pub code: String,
    /// Official province name (e.g. "Milano").
    pub name: String,
    /// Capoluogo; may equal `name`.
    pub seat: String,
    pub region: String,
    /// Historical, foreign or split names that also resolve to this record.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ProvinceRecord {
    pub fn new(code: &str, name: &str, seat: &str, region: &str, aliases: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            seat: seat.to_string(),
            region: region.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Short one-line label, e.g. "Milano (MI) — Lombardia".
    pub fn label(&self) -> String {
        format!("{} ({}) \u{2014} {}", self.name, self.code, self.region)
    }

    pub fn summary(&self) -> ProvinceSummary {
        ProvinceSummary {
            code: self.code.clone(),
            name: self.name.clone(),
            region: self.region.clone(),
        }
    }
}

impl fmt::Display for ProvinceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Compact view used in listings and API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvinceSummary {
    pub code: String,
    pub name: String,
    pub region: String,
}

/// Errors raised while building a registry, loading a dataset or compiling a filter.
///
/// Queries against a built registry never fail: an unresolved province is `None`.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("duplicate province code '{code}'")]
    DuplicateCode { code: String },

    #[error("token '{token}' is claimed by both {first} and {second}")]
    DuplicateToken {
        token: String,
        first: String,
        second: String,
    },

    #[error("invalid province code '{code}': expected two ASCII letters")]
    InvalidCode { code: String },

    #[error("unknown province: '{0}'")]
    UnknownProvince(String),

    #[error("unknown region: '{0}'")]
    UnknownRegion(String),

    #[error("cannot read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_and_display() {
        let rec = ProvinceRecord::new("MI", "Milano", "Milano", "Lombardia", &[]);
        assert_eq!(rec.to_string(), "Milano (MI)");
        assert!(rec.label().starts_with("Milano (MI)"));
        assert!(rec.label().ends_with("Lombardia"));
    }

    #[test]
    fn test_aliases_default_when_missing() {
        let json = r#"{"code":"AO","name":"Aosta","seat":"Aosta","region":"Valle d'Aosta"}"#;
        let rec: ProvinceRecord = serde_json::from_str(json).unwrap();
        assert!(rec.aliases.is_empty());
        assert_eq!(rec.summary().code, "AO");
    }

    #[test]
    fn test_error_messages() {
        let e = GeoError::DuplicateToken {
            token: "MASSA".into(),
            first: "MS".into(),
            second: "XX".into(),
        };
        assert_eq!(e.to_string(), "token 'MASSA' is claimed by both MS and XX");
        assert_eq!(
            GeoError::UnknownProvince("Atlantide".into()).to_string(),
            "unknown province: 'Atlantide'"
        );
    }
}
