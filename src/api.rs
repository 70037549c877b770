//! Recreation API client
//!
//! Thin async wrappers over the backend's JSON endpoints. A non-2xx answer is
//! a hard failure carrying the status code and its canonical text. There is
//! no retry; the only fallback is the registered-programs source of
//! [`RecreationApiClient::registered_for_centre`].

use std::fmt::Display;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Weekday;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::adapter::adapt_records;
use crate::config::{ApiConfig, DefaultsConfig};
use crate::error::{RecFinderError, Result};
use crate::filter::AgeBracket;
use crate::models::{
    ActivityOption, CentreDetail, CentreDetails, CentreFacility, CentreFeatureCollection,
    CentrePrograms, DistrictOption, FacilityTypeOption, FilterOptions, Identifier, NearbyCentre,
    ProgramSearchResult, RegisteredProgram, RegisteredRecord, SearchStats, WardFeatureCollection,
};

/// Query string builder that leaves out empty parameters
#[derive(Debug, Default)]
struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    fn push<V: Display>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.pairs.push((key, value));
            }
        }
        self
    }

    /// `path?k=v&...`, or just `path` when nothing was set
    fn append_to(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let query: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        format!("{path}?{}", query.join("&"))
    }
}

/// Backend weekday parameter: `0` = Monday .. `6` = Sunday
fn weekday_param(weekday: Option<Weekday>) -> Option<u32> {
    weekday.map(|d| d.num_days_from_monday())
}

/// Filters for the centre map layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CentreQuery {
    pub activity: Option<String>,
    pub district: Option<String>,
    pub weekday: Option<Weekday>,
    pub facility_type: Option<String>,
}

impl CentreQuery {
    fn to_path(&self) -> String {
        QueryString::default()
            .push("activity", self.activity.as_deref())
            .push("district", self.district.as_deref())
            .push("weekday", weekday_param(self.weekday))
            .push("facility_type", self.facility_type.as_deref())
            .append_to("/api/centres/geojson")
    }
}

/// Which program family a search covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    #[default]
    Dropin,
    Registered,
}

impl ProgramType {
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            ProgramType::Dropin => "dropin",
            ProgramType::Registered => "registered",
        }
    }
}

impl std::str::FromStr for ProgramType {
    type Err = RecFinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dropin" | "drop-in" => Ok(ProgramType::Dropin),
            "registered" => Ok(ProgramType::Registered),
            other => Err(RecFinderError::validation(format!(
                "Unknown program type '{other}'. Expected dropin or registered"
            ))),
        }
    }
}

/// Cross-centre program search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchQuery {
    pub activity: Option<String>,
    pub age: Option<AgeBracket>,
    pub weekday: Option<Weekday>,
    pub district: Option<String>,
    pub program_type: ProgramType,
    pub limit: Option<u32>,
}

impl SearchQuery {
    fn facets(&self) -> QueryString {
        let mut query = QueryString::default();
        query
            .push("activity", self.activity.as_deref())
            .push("age", self.age.map(AgeBracket::as_param))
            .push("weekday", weekday_param(self.weekday))
            .push("district", self.district.as_deref());
        query
    }

    fn to_path(&self) -> String {
        let mut query = self.facets();
        query
            .push("program_type", Some(self.program_type.as_param()))
            .push("limit", self.limit);
        query.append_to("/api/programs/search")
    }

    fn to_stats_path(&self) -> String {
        self.facets().append_to("/api/programs/search/stats")
    }
}

/// Centres around a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
    pub limit: Option<u32>,
}

impl NearbyQuery {
    fn to_path(&self) -> String {
        QueryString::default()
            .push("lat", Some(self.lat))
            .push("lon", Some(self.lon))
            .push("radius_km", Some(self.radius_km))
            .push("limit", self.limit)
            .append_to("/api/centres/nearby")
    }
}

/// Source of per-centre details
#[async_trait]
pub trait CentreSource: Send + Sync {
    /// Detail, programs and facilities for one centre
    async fn centre_details(&self, id: &Identifier) -> Result<CentreDetails>;
}

/// Client for the Toronto recreation backend
#[derive(Debug, Clone)]
pub struct RecreationApiClient {
    client: Client,
    base_url: String,
    activities_limit: u32,
}

impl RecreationApiClient {
    /// Create a client from the `[api]` and `[defaults]` configuration
    pub fn new(api: &ApiConfig, defaults: &DefaultsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .user_agent(api.user_agent.as_str())
            .build()
            .map_err(|e| RecFinderError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            activities_limit: defaults.activities_limit,
        })
    }

    /// Client with default settings against `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let api = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&api, &DefaultsConfig::default())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn centre_path(id: &Identifier, suffix: &str) -> String {
        format!(
            "/api/centres/{}{suffix}",
            urlencoding::encode(&id.to_string())
        )
    }

    /// GET `path` and decode the JSON body
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        debug!("GET {}", url);
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RecFinderError::network(format!("GET {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} answered {}", path, status);
            return Err(RecFinderError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                path,
            ));
        }

        let body = response.bytes().await?;
        let decoded = serde_json::from_slice(&body)
            .map_err(|e| RecFinderError::decode(format!("{path}: {e}")))?;

        debug!(
            "GET {} completed in {:.3}s ({} bytes)",
            path,
            start.elapsed().as_secs_f64(),
            body.len()
        );
        Ok(decoded)
    }

    /// Ward boundary polygons
    #[instrument(skip(self))]
    pub async fn wards(&self) -> Result<WardFeatureCollection> {
        let wards: WardFeatureCollection = self.get("/api/wards/geojson").await?;
        info!("Loaded {} ward features", wards.features.len());
        Ok(wards)
    }

    /// Centre points matching the filters
    #[instrument(skip(self))]
    pub async fn centres(&self, query: &CentreQuery) -> Result<CentreFeatureCollection> {
        let centres: CentreFeatureCollection = self.get(&query.to_path()).await?;
        info!("Loaded {} centres", centres.features.len());
        Ok(centres)
    }

    pub async fn activities(&self) -> Result<Vec<ActivityOption>> {
        self.get(&format!("/api/activities?limit={}", self.activities_limit))
            .await
    }

    pub async fn districts(&self) -> Result<Vec<DistrictOption>> {
        self.get("/api/districts").await
    }

    pub async fn facility_types(&self) -> Result<Vec<FacilityTypeOption>> {
        self.get("/api/facility-types").await
    }

    /// All filter-panel options, requested concurrently
    #[instrument(skip(self))]
    pub async fn filter_options(&self) -> Result<FilterOptions> {
        let start = Instant::now();
        let (activities, districts, facility_types) =
            tokio::try_join!(self.activities(), self.districts(), self.facility_types())?;
        info!(
            "Loaded filter options in {:.3}s: {} activities, {} districts, {} facility types",
            start.elapsed().as_secs_f64(),
            activities.len(),
            districts.len(),
            facility_types.len()
        );
        Ok(FilterOptions {
            activities,
            districts,
            facility_types,
        })
    }

    pub async fn centre_detail(&self, id: &Identifier) -> Result<CentreDetail> {
        self.get(&Self::centre_path(id, "")).await
    }

    pub async fn centre_programs(&self, id: &Identifier) -> Result<CentrePrograms> {
        self.get(&Self::centre_path(id, "/programs")).await
    }

    pub async fn centre_facilities(&self, id: &Identifier) -> Result<Vec<CentreFacility>> {
        self.get(&Self::centre_path(id, "/facilities")).await
    }

    /// Registered programs of a centre, normalized
    ///
    /// Tries the dedicated `/registered` endpoint first. On any failure, or
    /// when it yields nothing, falls back to the `registered` part of the
    /// centre's `/programs` payload.
    #[instrument(skip(self), fields(centre = %id))]
    pub async fn registered_for_centre(&self, id: &Identifier) -> Result<Vec<RegisteredProgram>> {
        match self
            .get::<Vec<RegisteredRecord>>(&Self::centre_path(id, "/registered"))
            .await
        {
            Ok(records) if !records.is_empty() => {
                info!("Loaded {} registered programs", records.len());
                return Ok(adapt_records(&records));
            }
            Ok(_) => debug!("Dedicated registered source is empty, using programs payload"),
            Err(e) => warn!("Dedicated registered source failed ({}), using programs payload", e),
        }

        let programs = self.centre_programs(id).await?;
        info!(
            "Loaded {} registered programs from programs payload",
            programs.registered.len()
        );
        Ok(adapt_records(&programs.registered))
    }

    /// Aggregated program search across centres
    #[instrument(skip(self))]
    pub async fn search_programs(&self, query: &SearchQuery) -> Result<ProgramSearchResult> {
        let start = Instant::now();
        let result: ProgramSearchResult = self.get(&query.to_path()).await?;
        info!(
            "Search returned {} programs in {:.3}s",
            result.total(),
            start.elapsed().as_secs_f64()
        );
        Ok(result)
    }

    /// Program and centre counts for the search facets
    #[instrument(skip(self))]
    pub async fn search_stats(&self, query: &SearchQuery) -> Result<SearchStats> {
        self.get(&query.to_stats_path()).await
    }

    /// Centres within a radius, nearest first
    #[instrument(skip(self))]
    pub async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyCentre>> {
        let centres: Vec<NearbyCentre> = self.get(&query.to_path()).await?;
        info!(
            "Found {} centres within {}km",
            centres.len(),
            query.radius_km
        );
        Ok(centres)
    }
}

#[async_trait]
impl CentreSource for RecreationApiClient {
    #[instrument(skip(self), fields(centre = %id))]
    async fn centre_details(&self, id: &Identifier) -> Result<CentreDetails> {
        let start = Instant::now();
        let (detail, programs, facilities) = tokio::try_join!(
            self.centre_detail(id),
            self.centre_programs(id),
            self.centre_facilities(id)
        )?;
        info!(
            "Loaded centre {} in {:.3}s: {} drop-in, {} registered, {} facilities",
            id,
            start.elapsed().as_secs_f64(),
            programs.dropin.len(),
            programs.registered.len(),
            facilities.len()
        );
        Ok(CentreDetails {
            detail,
            programs,
            facilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parameters_are_omitted() {
        assert_eq!(CentreQuery::default().to_path(), "/api/centres/geojson");

        let query = CentreQuery {
            activity: Some("Lane Swim".to_string()),
            district: Some("  ".to_string()),
            weekday: Some(Weekday::Mon),
            facility_type: None,
        };
        assert_eq!(
            query.to_path(),
            "/api/centres/geojson?activity=Lane%20Swim&weekday=0"
        );
    }

    #[test]
    fn test_search_paths() {
        let query = SearchQuery {
            activity: Some("Badminton".to_string()),
            age: Some(AgeBracket::Teen),
            weekday: Some(Weekday::Sun),
            program_type: ProgramType::Registered,
            limit: Some(50),
            ..SearchQuery::default()
        };
        assert_eq!(
            query.to_path(),
            "/api/programs/search?activity=Badminton&age=teen&weekday=6&program_type=registered&limit=50"
        );
        assert_eq!(
            query.to_stats_path(),
            "/api/programs/search/stats?activity=Badminton&age=teen&weekday=6"
        );
    }

    #[test]
    fn test_nearby_path() {
        let query = NearbyQuery {
            lat: 43.65,
            lon: -79.38,
            radius_km: 2.5,
            limit: None,
        };
        assert_eq!(
            query.to_path(),
            "/api/centres/nearby?lat=43.65&lon=-79.38&radius_km=2.5"
        );
    }

    #[test]
    fn test_centre_path_encodes_identifier() {
        assert_eq!(
            RecreationApiClient::centre_path(&Identifier::from("A 1"), "/programs"),
            "/api/centres/A%201/programs"
        );
        assert_eq!(
            RecreationApiClient::centre_path(&Identifier::Number(42), ""),
            "/api/centres/42"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RecreationApiClient::with_base_url("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_program_type_parse() {
        assert_eq!("drop-in".parse::<ProgramType>().unwrap(), ProgramType::Dropin);
        assert!("camps".parse::<ProgramType>().is_err());
    }
}
