use crate::cache::token::TokenRecord;
use crate::error::{GatewayError, GatewayResult};
use crate::resources::client::ResourceClient;
use crate::resources::locations::require_id;
use crate::resources::models::Product;

const PRODUCTS_API: &str = "products";
pub const DEFAULT_PRODUCT_LIMIT: u32 = 10;

/// Product search filters. `location_id` plus at least one of term, brand
/// or product id; when several are set the first one in that order is used.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub location_id: String,
    pub term: Option<String>,
    pub brand: Option<String>,
    pub product_id: Option<String>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

impl ProductQuery {
    pub fn by_term(location_id: &str, term: &str) -> Self {
        Self {
            location_id: location_id.to_owned(),
            term: Some(term.to_owned()),
            ..Default::default()
        }
    }

    /// Check the filters without sending anything.
    pub fn validate(&self) -> GatewayResult<()> {
        self.filters().map(|_| ())
    }

    fn criterion(&self) -> Option<(&'static str, &str)> {
        present(&self.term)
            .map(|term| ("filter.term", term))
            .or_else(|| present(&self.brand).map(|brand| ("filter.brand", brand)))
            .or_else(|| present(&self.product_id).map(|id| ("filter.productId", id)))
    }

    fn filters(&self) -> GatewayResult<Vec<(&'static str, String)>> {
        let location_id = require_id("location_id", &self.location_id)?;
        let (criterion, value) = self.criterion().ok_or_else(|| {
            GatewayError::validation("at least one search criteria (term, brand, or product_id) is required")
        })?;
        let limit = self.limit.unwrap_or(DEFAULT_PRODUCT_LIMIT);
        if !(1..=50).contains(&limit) {
            return Err(GatewayError::validation(format!("limit {} must be within 1..=50", limit)));
        }

        Ok(vec![
            ("filter.locationId", location_id.to_owned()),
            (criterion, value.to_owned()),
            ("filter.limit", limit.to_string()),
            ("filter.start", self.start.unwrap_or(0).to_string()),
        ])
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ResourceClient {
    /// Products stocked at a location. Requires a client-credentials token.
    pub async fn search_products(&self, token: &TokenRecord, query: &ProductQuery) -> GatewayResult<Vec<Product>> {
        let filters = query.filters()?;
        self.get_data(PRODUCTS_API, token, "/v1/products", &filters).await
    }

    pub async fn get_product(&self, token: &TokenRecord, product_id: &str, location_id: &str) -> GatewayResult<Product> {
        let product_id = require_id("product id", product_id)?;
        let location_id = require_id("location_id", location_id)?;
        self.get_data(
            PRODUCTS_API,
            token,
            &format!("/v1/products/{}", product_id),
            &[("filter.locationId", location_id.to_owned())],
        )
        .await
    }
}
