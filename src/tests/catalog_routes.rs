
// Catalog routes run on the client-credentials token. Validation failures
// are checked against an unreachable provider: a 400 there proves the
// request was rejected before any token or resource call was attempted.

#[cfg(test)]
mod tests {

    use http::header::COOKIE;
    use http::StatusCode;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::{json, Value};

    use crate::tests::common::{build_reqwest_client, spawn_gateway, NO_PROVIDER};

    async fn mock_client_token<'a>(provider: &'a MockServer, access_token: &'static str) -> httpmock::Mock<'a> {
        provider
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/connect/oauth2/token")
                    .form_urlencoded_tuple("grant_type", "client_credentials")
                    .form_urlencoded_tuple("scope", "product.compact");
                then.status(200).json_body(json!({
                    "access_token": access_token,
                    "expires_in": 1800,
                    "token_type": "bearer",
                    "scope": "product.compact"
                }));
            })
            .await
    }

    #[tokio::test]
    async fn initialize_describes_token_without_exposing_it() {
        let provider = MockServer::start_async().await;
        let token = mock_client_token(&provider, "app-token-secret").await;
        let (_gateway_h, gateway) = spawn_gateway(&provider.base_url()).await;
        let client = build_reqwest_client();

        let resp = client.post(format!("{}/api/initialize", gateway)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = resp.text().await.unwrap();
        assert!(!text.contains("app-token-secret"));

        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["token_info"]["scope"], "product.compact");
        assert_eq!(body["token_info"]["token_type"], "bearer");
        let expires_in = body["token_info"]["expires_in"].as_i64().unwrap();
        assert!(expires_in > 1700 && expires_in <= 1800);
        assert!(body["token_info"]["expires_at"].as_str().is_some());
        token.assert_async().await;

        let status: Value = client
            .get(format!("{}/api/status", gateway))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["has_client_token"], true);
        assert_eq!(status["client_id"], "my-clien...");
        assert_eq!(status["active_user_sessions"], 0);
    }

    #[tokio::test]
    async fn location_search_unwraps_data_envelope() {
        let provider = MockServer::start_async().await;
        mock_client_token(&provider, "app-token").await;
        let search = provider
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/locations")
                    .header("authorization", "Bearer app-token")
                    .query_param("filter.lat.near", "39.1")
                    .query_param("filter.lon.near", "-84.5")
                    .query_param("filter.radiusInMiles", "5")
                    .query_param("filter.limit", "10");
                then.status(200).json_body(json!({"data": [
                    {"locationId": "01400943", "name": "Kroger Downtown", "hours": {"open24": false}}
                ]}));
            })
            .await;
        let (_gateway_h, gateway) = spawn_gateway(&provider.base_url()).await;

        let resp = build_reqwest_client()
            .get(format!("{}/api/locations/search?lat=39.1&lon=-84.5&radius=5", gateway))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body[0]["locationId"], "01400943");
        assert_eq!(body[0]["hours"]["open24"], false);
        search.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_location_is_not_found() {
        let provider = MockServer::start_async().await;
        mock_client_token(&provider, "app-token").await;
        provider
            .mock_async(|when, then| {
                when.method(GET).path("/v1/locations/missing");
                then.status(404).json_body(json!({"errors": {"reason": "Location not found"}}));
            })
            .await;
        let (_gateway_h, gateway) = spawn_gateway(&provider.base_url()).await;

        let resp = build_reqwest_client()
            .get(format!("{}/api/locations/missing", gateway))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["kind"], "upstream");
        assert_eq!(body["upstream"]["status"], 404);
    }

    #[tokio::test]
    async fn product_by_id_forwards_location_filter() {
        let provider = MockServer::start_async().await;
        mock_client_token(&provider, "app-token").await;
        let product = provider
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/products/0001111041700")
                    .query_param("filter.locationId", "01400943");
                then.status(200).json_body(json!({"data": {
                    "productId": "0001111041700",
                    "description": "Kroger 2% Milk",
                    "items": [{"size": "1 gal"}]
                }}));
            })
            .await;
        let (_gateway_h, gateway) = spawn_gateway(&provider.base_url()).await;

        let resp = build_reqwest_client()
            .get(format!("{}/api/products/0001111041700?location_id=01400943", gateway))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["description"], "Kroger 2% Milk");
        assert_eq!(body["items"][0]["size"], "1 gal");
        product.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_client_token_is_renewed_and_call_retried() {
        let provider = MockServer::start_async().await;
        let first_token = mock_client_token(&provider, "app-token-1").await;
        let rejected = provider
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/locations/01400943")
                    .header("authorization", "Bearer app-token-1");
                then.status(401).json_body(json!({"error": "invalid_token"}));
            })
            .await;
        let accepted = provider
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/locations/01400943")
                    .header("authorization", "Bearer app-token-2");
                then.status(200).json_body(json!({"data": {"locationId": "01400943", "name": "Kroger Downtown"}}));
            })
            .await;
        let (_gateway_h, gateway) = spawn_gateway(&provider.base_url()).await;
        let client = build_reqwest_client();

        // cache app-token-1, then let the token endpoint hand out app-token-2
        let resp = client.post(format!("{}/api/initialize", gateway)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        first_token.assert_async().await;
        first_token.delete_async().await;
        let second_token = mock_client_token(&provider, "app-token-2").await;

        let resp = client
            .get(format!("{}/api/locations/01400943", gateway))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["name"], "Kroger Downtown");
        rejected.assert_async().await;
        second_token.assert_async().await;
        accepted.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_any_network_call() {
        let (_gateway_h, gateway) = spawn_gateway(NO_PROVIDER).await;
        let client = build_reqwest_client();

        for path in [
            "/api/locations/search?lat=200&lon=-84.5",
            "/api/locations/search?lat=39.1&lon=-84.5&radius=0",
            "/api/locations/search?lon=-84.5",
            "/api/products/search?term=milk",
            "/api/products/search?location_id=01400943",
            "/api/products/search?location_id=01400943&term=milk&limit=51",
            "/api/products/0001111041700",
        ] {
            let resp = client.get(format!("{}{}", gateway, path)).send().await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["kind"], "validation", "{}", path);
        }

        let resp = client
            .post(format!("{}/api/cart/add", gateway))
            .json(&json!({"items": []}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("No items provided"));
    }

    #[tokio::test]
    async fn unreachable_provider_is_bad_gateway() {
        let (_gateway_h, gateway) = spawn_gateway(NO_PROVIDER).await;

        let resp = build_reqwest_client()
            .post(format!("{}/api/initialize", gateway))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["kind"], "upstream");
    }

    #[tokio::test]
    async fn user_endpoints_require_a_session() {
        let (_gateway_h, gateway) = spawn_gateway(NO_PROVIDER).await;
        let client = build_reqwest_client();

        let resp = client.get(format!("{}/api/profile", gateway)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = client
            .post(format!("{}/api/cart/add", gateway))
            .json(&json!({"items": [{"upc": "0001111041700", "quantity": 1}]}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // a forged cookie is not a session
        let resp = client
            .get(format!("{}/api/profile", gateway))
            .header(COOKIE, "session_id=not-signed")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn index_and_metrics_are_served() {
        let (_gateway_h, gateway) = spawn_gateway(NO_PROVIDER).await;
        let client = build_reqwest_client();

        let resp = client.get(format!("{}/", gateway)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.text().await.unwrap().contains("Kroger API gateway"));

        let resp = client.get(format!("{}/metrics", gateway)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.text().await.unwrap().contains("krogergateway_up"));
    }
}
