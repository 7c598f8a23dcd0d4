use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::geo::{
    match_municipality, normalize_municipality, LeadLocation, Located, LocationFilter,
    LocationQuery, ProvinceRecord,
};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET /api/provinces ──────────────────────────────────────────

pub async fn list_provinces(State(state): State<Arc<AppState>>) -> Json<Vec<ProvinceRecord>> {
    let start = Instant::now();
    let provinces = state.registry.provinces().to_vec();
    info!(hits = provinces.len(), elapsed_ms = elapsed_ms(start), "GET /api/provinces");
    Json(provinces)
}

// ─── GET /api/provinces/resolve ──────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub input: String,
    pub code: String,
    pub name: String,
    pub seat: String,
    pub region: String,
    pub label: String,
}

pub async fn resolve_province(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let start = Instant::now();

    let query = params.query.as_deref().unwrap_or("").trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter"));
    }

    let Some(record) = state.registry.resolve_province(query) else {
        info!(query, elapsed_ms = elapsed_ms(start), "GET /api/provinces/resolve -> not found");
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Province not found: '{}'", query),
        ));
    };

    info!(query, code = %record.code, elapsed_ms = elapsed_ms(start), "GET /api/provinces/resolve");

    Ok(Json(ResolveResponse {
        input: query.to_string(),
        code: record.code.clone(),
        name: record.name.clone(),
        seat: record.seat.clone(),
        region: record.region.clone(),
        label: record.label(),
    }))
}

// ─── GET /api/provinces/search ───────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_provinces(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<ProvinceRecord>> {
    let start = Instant::now();
    let q = params.q.as_deref().unwrap_or("");
    let hits: Vec<ProvinceRecord> = state
        .registry
        .search_provinces(q)
        .into_iter()
        .cloned()
        .collect();

    info!(q, hits = hits.len(), elapsed_ms = elapsed_ms(start), "GET /api/provinces/search");
    Json(hits)
}

// ─── GET /api/regions ────────────────────────────────────────────

pub async fn list_regions(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let start = Instant::now();
    let regions: Vec<String> = state.registry.regions().into_iter().map(str::to_string).collect();
    info!(hits = regions.len(), elapsed_ms = elapsed_ms(start), "GET /api/regions");
    Json(regions)
}

// ─── GET /api/regions/provinces ──────────────────────────────────

#[derive(Deserialize)]
pub struct RegionQuery {
    pub name: Option<String>,
}

pub async fn region_provinces(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegionQuery>,
) -> Json<Vec<ProvinceRecord>> {
    let start = Instant::now();
    let name = params.name.as_deref().unwrap_or("");
    let provinces: Vec<ProvinceRecord> = state
        .registry
        .find_provinces_in_region(name)
        .into_iter()
        .cloned()
        .collect();

    info!(region = name, hits = provinces.len(), elapsed_ms = elapsed_ms(start), "GET /api/regions/provinces");
    Json(provinces)
}

// ─── GET /api/comuni/normalize ───────────────────────────────────

#[derive(Deserialize)]
pub struct NormalizeQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub input: String,
    pub normalized: String,
}

pub async fn normalize_comune(Query(params): Query<NormalizeQuery>) -> Json<NormalizeResponse> {
    let start = Instant::now();
    let input = params.name.unwrap_or_default();
    let normalized = normalize_municipality(&input);
    info!(name = %input, normalized = %normalized, elapsed_ms = elapsed_ms(start), "GET /api/comuni/normalize");
    Json(NormalizeResponse { input, normalized })
}

// ─── GET /api/comuni/match ───────────────────────────────────────

#[derive(Deserialize)]
pub struct MatchQuery {
    pub a: Option<String>,
    pub b: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub a: String,
    pub b: String,
    pub matched: bool,
}

pub async fn match_comuni(Query(params): Query<MatchQuery>) -> Json<MatchResponse> {
    let start = Instant::now();
    let a = params.a.unwrap_or_default();
    let b = params.b.unwrap_or_default();
    let matched = match_municipality(&a, &b);
    info!(a = %a, b = %b, matched, elapsed_ms = elapsed_ms(start), "GET /api/comuni/match");
    Json(MatchResponse { a, b, matched })
}

// ─── POST /api/leads/filter ──────────────────────────────────────

/// A lead as submitted for filtering; only the location is inspected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub location: LeadLocation,
}

impl Located for LeadRecord {
    fn province(&self) -> Option<&str> {
        self.location.province()
    }

    fn comune(&self) -> Option<&str> {
        self.location.comune()
    }
}

#[derive(Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filter: LocationQuery,
    #[serde(default)]
    pub leads: Vec<LeadRecord>,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub total: usize,
    pub matched: usize,
    /// Accepted province codes; absent when no province/region criterion was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_codes: Option<Vec<String>>,
    pub leads: Vec<LeadRecord>,
}

pub async fn filter_leads(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> Result<Json<FilterResponse>, ApiError> {
    let start = Instant::now();

    let filter = LocationFilter::compile(&state.registry, &req.filter)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let leads: Vec<LeadRecord> = filter.apply(&req.leads).into_iter().cloned().collect();

    info!(
        total = req.leads.len(),
        matched = leads.len(),
        elapsed_ms = elapsed_ms(start),
        "POST /api/leads/filter"
    );

    Ok(Json(FilterResponse {
        total: req.leads.len(),
        matched: leads.len(),
        province_codes: filter
            .province_codes()
            .map(|codes| codes.into_iter().map(str::to_string).collect()),
        leads,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoRegistry;
    use tracing_test::traced_test;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            registry: GeoRegistry::builtin().unwrap(),
        }))
    }

    fn lead(id: &str, province: &str, comune: &str) -> LeadRecord {
        LeadRecord {
            id: Some(id.to_string()),
            name: None,
            location: LeadLocation {
                province: Some(province.to_string()),
                comune: Some(comune.to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let params = ResolveQuery { query: Some("Provincia di Torino".into()) };
        let Json(resp) = resolve_province(state(), Query(params)).await.unwrap();
        assert_eq!(resp.code, "TO");
        assert_eq!(resp.region, "Piemonte");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let params = ResolveQuery { query: Some("Atlantide".into()) };
        let err = resolve_province(state(), Query(params)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resolve_missing_query() {
        let err = resolve_province(state(), Query(ResolveQuery { query: None })).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_capped() {
        let Json(hits) = search_provinces(state(), Query(SearchQuery { q: Some("ia".into()) })).await;
        assert_eq!(hits.len(), 10);
        let Json(none) = search_provinces(state(), Query(SearchQuery { q: Some("a".into()) })).await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_regions() {
        let Json(regions) = list_regions(state()).await;
        assert_eq!(regions.len(), 20);
        assert_eq!(regions[0], "Piemonte");

        let Json(provinces) = region_provinces(state(), Query(RegionQuery { name: Some("Umbria".into()) })).await;
        let codes: Vec<&str> = provinces.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["PG", "TR"]);
    }

    #[tokio::test]
    async fn test_comune_endpoints() {
        let Json(norm) = normalize_comune(Query(NormalizeQuery { name: Some("L'Aquila".into()) })).await;
        assert_eq!(norm.normalized, "aquila");

        let Json(m) = match_comuni(Query(MatchQuery { a: Some("Roma".into()), b: Some("Roma Capitale".into()) })).await;
        assert!(!m.matched);
        let Json(m) = match_comuni(Query(MatchQuery { a: None, b: None })).await;
        assert!(!m.matched);
    }

    #[tokio::test]
    async fn test_filter_leads() {
        let req = FilterRequest {
            filter: LocationQuery {
                province: None,
                region: Some("Toscana".into()),
                comune: None,
            },
            leads: vec![
                lead("1", "FI", "Firenze"),
                lead("2", "Milano", "Milano"),
                lead("3", "Prov. di Siena", "Montalcino"),
            ],
        };
        let Json(resp) = filter_leads(state(), Json(req)).await.unwrap();
        assert_eq!(resp.total, 3);
        assert_eq!(resp.matched, 2);
        let ids: Vec<&str> = resp.leads.iter().filter_map(|l| l.id.as_deref()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(resp.province_codes.map(|c| c.len()), Some(10));
    }

    #[tokio::test]
    async fn test_filter_leads_unknown_province() {
        let req = FilterRequest {
            filter: LocationQuery {
                province: Some("Atlantide".into()),
                region: None,
                comune: None,
            },
            leads: vec![],
        };
        let err = filter_leads(state(), Json(req)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_every_route_logs_request() {
        list_provinces(state()).await;
        list_regions(state()).await;
        normalize_comune(Query(NormalizeQuery { name: Some("Città".into()) })).await;
        match_comuni(Query(MatchQuery { a: Some("Bari".into()), b: Some("bari".into()) })).await;
        search_provinces(state(), Query(SearchQuery { q: Some("mi".into()) })).await;
        region_provinces(state(), Query(RegionQuery { name: Some("Lazio".into()) })).await;
        let _ = resolve_province(state(), Query(ResolveQuery { query: Some("RM".into()) })).await;

        for route in [
            "GET /api/provinces",
            "GET /api/regions",
            "GET /api/comuni/normalize",
            "GET /api/comuni/match",
            "GET /api/provinces/search",
            "GET /api/regions/provinces",
            "GET /api/provinces/resolve",
        ] {
            assert!(logs_contain(route), "no log line for {}", route);
        }
        assert!(logs_contain("elapsed_ms"));
    }

    #[test]
    fn test_lead_record_json_shape() {
        let rec: LeadRecord =
            serde_json::from_str(r#"{"id": "7", "province": "BO", "comune": "Imola"}"#).unwrap();
        assert_eq!(rec.province(), Some("BO"));
        assert_eq!(rec.comune(), Some("Imola"));
        let back = serde_json::to_value(&rec).unwrap();
        assert_eq!(back["comune"], "Imola");
        assert!(back.get("name").is_none());
    }
}
