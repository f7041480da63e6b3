use crate::cache::token::TokenRecord;
use crate::error::GatewayResult;
use crate::resources::client::ResourceClient;
use crate::resources::models::Profile;

impl ResourceClient {
    /// Profile of the signed-in user. Requires a user token.
    pub async fn get_profile(&self, token: &TokenRecord) -> GatewayResult<Profile> {
        self.get_data("identity", token, "/v1/identity/profile", &[]).await
    }
}
