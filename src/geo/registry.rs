//! The province registry: immutable records plus the derived lookup index.
//!
//! Lookup flow:  uppercase input → index → strip "PROVINCIA [DI] " / "PROV. [DI] " → index → None

use super::comune::strip_diacritics;
use super::dataset;
use super::types::{GeoError, ProvinceRecord, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Inputs with fewer non-whitespace characters never resolve.
const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of autocomplete suggestions.
pub const SEARCH_LIMIT: usize = 10;

/// Administrative prefixes indexed in front of every token.
const INDEX_PREFIXES: &[&str] = &["PROVINCIA DI ", "PROV. ", "PROV. DI "];

fn admin_prefix_regex() -> &'static Regex {
    static ADMIN_PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    ADMIN_PREFIX_RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:PROVINCIA|PROV\.)\s+(?:DI\s+)?")
            .expect("admin prefix regex should compile")
    })
}

/// Read-only catalog of provinces. Safe to share across threads as-is.
#[derive(Debug, Clone)]
pub struct GeoRegistry {
    records: Vec<ProvinceRecord>,
    /// Normalised uppercase token → position in `records`.
    index: HashMap<String, usize>,
}

impl GeoRegistry {
    /// Build a registry from records, validating codes and token uniqueness.
    ///
    /// Codes are stored uppercase. Parts of hyphenated names are appended to
    /// the aliases ("Massa-Carrara" gains "Massa" and "Carrara").
    pub fn build(mut records: Vec<ProvinceRecord>) -> Result<Self> {
        let mut seen_codes = BTreeSet::new();
        for rec in records.iter_mut() {
            let code = rec.code.trim().to_uppercase();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(GeoError::InvalidCode { code: rec.code.clone() });
            }
            if !seen_codes.insert(code.clone()) {
                return Err(GeoError::DuplicateCode { code });
            }
            rec.code = code;

            for part in hyphen_parts(&rec.name) {
                if !rec.aliases.contains(&part) {
                    rec.aliases.push(part);
                }
            }
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        for (pos, rec) in records.iter().enumerate() {
            for token in index_tokens(rec) {
                match index.get(&token) {
                    Some(&other) if other != pos => {
                        return Err(GeoError::DuplicateToken {
                            token,
                            first: records[other].code.clone(),
                            second: rec.code.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        index.insert(token, pos);
                    }
                }
            }
        }

        debug!(records = records.len(), tokens = index.len(), "built province registry");
        Ok(Self { records, index })
    }

    /// Registry over the embedded 107-province table.
    pub fn builtin() -> Result<Self> {
        Self::build(dataset::builtin_records())
    }

    /// Registry over a JSON dataset file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::build(dataset::load_from_path(path)?)
    }

    /// Map free text (code, name, seat, alias, optionally prefixed) to its code.
    pub fn canonicalize_province(&self, input: &str) -> Option<&str> {
        self.lookup(input).map(|pos| self.records[pos].code.as_str())
    }

    /// Like [`canonicalize_province`](Self::canonicalize_province), returning the whole record.
    pub fn resolve_province(&self, input: &str) -> Option<&ProvinceRecord> {
        self.lookup(input).map(|pos| &self.records[pos])
    }

    fn lookup(&self, input: &str) -> Option<usize> {
        let trimmed = input.trim();
        if trimmed.chars().filter(|c| !c.is_whitespace()).count() < MIN_QUERY_CHARS {
            return None;
        }

        let upper = trimmed.to_uppercase();
        if let Some(pos) = self.find_token(&upper) {
            return Some(pos);
        }

        let stripped = admin_prefix_regex().replace(&upper, "");
        if stripped.len() == upper.len() {
            return None;
        }
        self.find_token(&stripped)
    }

    /// Exact token, then its accent-folded form. Folding also catches
    /// decomposed input ("FORLI\u{300}") that no indexed key spells.
    fn find_token(&self, token: &str) -> Option<usize> {
        self.index
            .get(token)
            .or_else(|| self.index.get(&strip_diacritics(token)))
            .copied()
    }

    /// Exact, case-insensitive lookup by two-letter code.
    pub fn get(&self, code: &str) -> Option<&ProvinceRecord> {
        let code = code.trim();
        self.records.iter().find(|r| r.code.eq_ignore_ascii_case(code))
    }

    /// Provinces whose region equals `region_name` ignoring case, in table order.
    ///
    /// Region names are matched exactly; there is no fuzzy fallback.
    pub fn find_provinces_in_region(&self, region_name: &str) -> Vec<&ProvinceRecord> {
        let needle = region_name.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.region.to_lowercase() == needle)
            .collect()
    }

    /// Autocomplete: first [`SEARCH_LIMIT`] records whose code, name, seat or
    /// any alias contains the query, ignoring case. Not ranked.
    pub fn search_provinces(&self, query: &str) -> Vec<&ProvinceRecord> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| {
                std::iter::once(&r.code)
                    .chain(std::iter::once(&r.name))
                    .chain(std::iter::once(&r.seat))
                    .chain(r.aliases.iter())
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(SEARCH_LIMIT)
            .collect()
    }

    /// All records in table order.
    pub fn provinces(&self) -> &[ProvinceRecord] {
        &self.records
    }

    /// Distinct region names in first-seen order.
    pub fn regions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for rec in &self.records {
            if !out.contains(&rec.region.as_str()) {
                out.push(rec.region.as_str());
            }
        }
        out
    }

    /// Every (token, code) pair of the lookup index, unordered.
    pub fn tokens(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.index
            .iter()
            .map(|(token, &pos)| (token.as_str(), self.records[pos].code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Process-wide registry over the embedded table, built on first use.
pub fn global() -> &'static GeoRegistry {
    static REGISTRY: OnceLock<GeoRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        GeoRegistry::builtin().expect("embedded province table should be consistent")
    })
}

/// "Barletta-Andria-Trani" → ["Barletta", "Andria", "Trani"]; empty for plain names.
fn hyphen_parts(name: &str) -> Vec<String> {
    if !name.contains('-') {
        return Vec::new();
    }
    name.split('-')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// All index keys for a record: each base name uppercased, its accent-folded
/// variant, and both again behind every administrative prefix.
fn index_tokens(rec: &ProvinceRecord) -> BTreeSet<String> {
    let bases = [&rec.code, &rec.name, &rec.seat]
        .into_iter()
        .chain(rec.aliases.iter());

    let mut tokens = BTreeSet::new();
    for base in bases {
        let upper = base.trim().to_uppercase();
        if upper.is_empty() {
            continue;
        }
        let folded = strip_diacritics(&upper);
        for variant in [upper, folded] {
            for prefix in INDEX_PREFIXES {
                tokens.insert(format!("{}{}", prefix, variant));
            }
            tokens.insert(variant);
        }
    }
    tokens
}
