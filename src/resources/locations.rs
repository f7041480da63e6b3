use crate::cache::token::TokenRecord;
use crate::error::{GatewayError, GatewayResult};
use crate::resources::client::ResourceClient;
use crate::resources::models::Location;

const LOCATIONS_API: &str = "locations";
pub const DEFAULT_RADIUS_MILES: u32 = 10;
pub const DEFAULT_LOCATION_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct LocationQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_miles: u32,
    pub limit: u32,
}

impl LocationQuery {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            radius_miles: DEFAULT_RADIUS_MILES,
            limit: DEFAULT_LOCATION_LIMIT,
        }
    }

    pub fn validate(&self) -> GatewayResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(GatewayError::validation(format!("lat {} must be within [-90, 90]", self.lat)));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(GatewayError::validation(format!("lon {} must be within [-180, 180]", self.lon)));
        }
        if !(1..=100).contains(&self.radius_miles) {
            return Err(GatewayError::validation(format!("radius {} must be within 1..=100 miles", self.radius_miles)));
        }
        if !(1..=200).contains(&self.limit) {
            return Err(GatewayError::validation(format!("limit {} must be within 1..=200", self.limit)));
        }
        Ok(())
    }

    fn filters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("filter.lat.near", self.lat.to_string()),
            ("filter.lon.near", self.lon.to_string()),
            ("filter.radiusInMiles", self.radius_miles.to_string()),
            ("filter.limit", self.limit.to_string()),
        ]
    }
}

impl ResourceClient {
    /// Stores near a coordinate. Requires a client-credentials token.
    pub async fn search_locations(&self, token: &TokenRecord, query: &LocationQuery) -> GatewayResult<Vec<Location>> {
        query.validate()?;
        self.get_data(LOCATIONS_API, token, "/v1/locations", &query.filters()).await
    }

    pub async fn get_location(&self, token: &TokenRecord, location_id: &str) -> GatewayResult<Location> {
        let location_id = require_id("location id", location_id)?;
        self.get_data(LOCATIONS_API, token, &format!("/v1/locations/{}", location_id), &[]).await
    }
}

/// Ids are interpolated into the path, so only plain tokens are accepted.
/// Surrounding whitespace is rejected rather than trimmed.
pub(crate) fn require_id<'a>(what: &str, id: &'a str) -> GatewayResult<&'a str> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(GatewayError::validation(format!("{} '{}' is invalid", what, id)));
    }
    Ok(id)
}
