use serde_json::json;

use crate::cache::token::TokenRecord;
use crate::error::{GatewayError, GatewayResult};
use crate::resources::client::ResourceClient;
use crate::resources::models::CartItem;

const CART_API: &str = "cart";

pub fn validate_cart_items(items: &[CartItem]) -> GatewayResult<()> {
    if items.is_empty() {
        return Err(GatewayError::validation("No items provided"));
    }
    for (index, item) in items.iter().enumerate() {
        if item.upc.trim().is_empty() {
            return Err(GatewayError::validation(format!("items[{}].upc is required", index)));
        }
        if item.quantity == 0 {
            return Err(GatewayError::validation(format!("items[{}].quantity must be at least 1", index)));
        }
    }
    Ok(())
}

impl ResourceClient {
    /// Add items to the user's cart. Requires a user token.
    /// The provider answers 204 with no body on success.
    pub async fn add_to_cart(&self, token: &TokenRecord, items: &[CartItem]) -> GatewayResult<()> {
        validate_cart_items(items)?;
        let request = self
            .authorized(self.put("/v1/cart/add"), token)
            .json(&json!({ "items": items }));
        self.send(CART_API, request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::models::Modality;
    use http::StatusCode;
    use httpmock::Method::PUT;
    use httpmock::MockServer;
    use reqwest::Client;

    fn user_token() -> TokenRecord {
        TokenRecord::new("user-token".into(), Some("r".into()), 0, i64::MAX / 2, "cart.basic:write".into(), "bearer".into())
    }

    fn item(upc: &str, quantity: u32) -> CartItem {
        CartItem { upc: upc.into(), quantity, modality: Some(Modality::Pickup) }
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_network() {
        // nothing listens on port 9; a request would surface as a transport error
        let client = ResourceClient::new("http://127.0.0.1:9", Client::new());
        let err = client.add_to_cart(&user_token(), &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));

        let err = client.add_to_cart(&user_token(), &[item("0001111041700", 0)]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));

        let err = client.add_to_cart(&user_token(), &[item(" ", 1)]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn no_content_response_is_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/v1/cart/add")
                    .header("authorization", "Bearer user-token")
                    .json_body(serde_json::json!({
                        "items": [{"upc": "0001111041700", "quantity": 2, "modality": "PICKUP"}]
                    }));
                then.status(204);
            })
            .await;

        let client = ResourceClient::new(&server.base_url(), Client::new());
        client.add_to_cart(&user_token(), &[item("0001111041700", 2)]).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_token_is_reported_as_401() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/v1/cart/add");
                then.status(401).json_body(serde_json::json!({"error": "invalid_token"}));
            })
            .await;

        let client = ResourceClient::new(&server.base_url(), Client::new());
        let err = client.add_to_cart(&user_token(), &[item("1", 1)]).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
