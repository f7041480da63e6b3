//! OAuth2 grants against the provider's token endpoint.

use std::future::Future;

use crate::cache::token::TokenRecord;
use crate::error::GatewayResult;

pub mod client;
pub mod grant;

/// Issues new tokens; implemented by [`client::CredentialClient`] and by fakes in tests.
pub trait TokenIssuer: Send + Sync {
    fn client_credentials(
        &self,
        scope: &str,
    ) -> impl Future<Output = GatewayResult<TokenRecord>> + Send;

    fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> impl Future<Output = GatewayResult<TokenRecord>> + Send;

    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = GatewayResult<TokenRecord>> + Send;
}
