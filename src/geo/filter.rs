//! Location predicates for lead search.
//!
//! A [`LocationQuery`] of free-text province / region / comune criteria is
//! compiled once against a registry and then tested against many leads.

use super::comune::match_municipality;
use super::registry::GeoRegistry;
use super::types::{GeoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// User-supplied location criteria. Blank fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub comune: Option<String>,
}

/// Location fields as stored on a lead: raw text, never normalised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadLocation {
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub comune: Option<String>,
}

/// Anything carrying a lead location.
pub trait Located {
    fn province(&self) -> Option<&str>;
    fn comune(&self) -> Option<&str>;
}

impl Located for LeadLocation {
    fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    fn comune(&self) -> Option<&str> {
        self.comune.as_deref()
    }
}

/// A compiled location predicate.
#[derive(Debug, Clone)]
pub struct LocationFilter<'r> {
    registry: &'r GeoRegistry,
    /// Accepted province codes; `None` means any province.
    codes: Option<BTreeSet<&'r str>>,
    comune: Option<String>,
}

impl<'r> LocationFilter<'r> {
    /// Compile criteria against `registry`.
    ///
    /// An unresolvable province or a region with no provinces is an error.
    /// Province and region together accept the intersection.
    pub fn compile(registry: &'r GeoRegistry, query: &LocationQuery) -> Result<Self> {
        let mut codes: Option<BTreeSet<&'r str>> = None;

        if let Some(province) = present(&query.province) {
            let code = registry
                .canonicalize_province(province)
                .ok_or_else(|| GeoError::UnknownProvince(province.to_string()))?;
            codes = Some(BTreeSet::from([code]));
        }

        if let Some(region) = present(&query.region) {
            let in_region: BTreeSet<&'r str> = registry
                .find_provinces_in_region(region)
                .into_iter()
                .map(|r| r.code.as_str())
                .collect();
            if in_region.is_empty() {
                return Err(GeoError::UnknownRegion(region.to_string()));
            }
            codes = Some(match codes {
                Some(existing) => existing.intersection(&in_region).copied().collect(),
                None => in_region,
            });
        }

        if codes.as_ref().is_some_and(|c| c.is_empty()) {
            debug!(?query, "province and region criteria do not overlap");
        }

        Ok(Self {
            registry,
            codes,
            comune: present(&query.comune).map(str::to_string),
        })
    }

    /// True when no criterion is set and every lead passes.
    pub fn is_unrestricted(&self) -> bool {
        self.codes.is_none() && self.comune.is_none()
    }

    /// Accepted province codes, sorted; `None` when any province passes.
    pub fn province_codes(&self) -> Option<Vec<&'r str>> {
        self.codes.as_ref().map(|c| c.iter().copied().collect())
    }

    pub fn matches<L: Located + ?Sized>(&self, lead: &L) -> bool {
        if let Some(codes) = &self.codes {
            let code = lead
                .province()
                .and_then(|p| self.registry.canonicalize_province(p));
            match code {
                Some(code) if codes.contains(code) => {}
                _ => return false,
            }
        }

        if let Some(wanted) = &self.comune {
            match lead.comune() {
                Some(comune) if match_municipality(comune, wanted) => {}
                _ => return false,
            }
        }

        true
    }

    /// Matching leads, in input order.
    pub fn apply<'l, L: Located>(&self, leads: &'l [L]) -> Vec<&'l L> {
        leads.iter().filter(|lead| self.matches(*lead)).collect()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
