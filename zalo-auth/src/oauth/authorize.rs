//! Construction of the provider's authorization URL.

use url::Url;

use super::config::StrategyConfig;
use super::pkce::PkceChallenge;

/// Build the URL the browser is redirected to for user consent.
///
/// Carries `app_id`, `redirect_uri`, `code_challenge` and, when configured,
/// `state`. The verifier never appears here.
pub fn authorization_url(
    auth_endpoint: &Url,
    config: &StrategyConfig,
    challenge: &PkceChallenge,
) -> Url {
    let mut url = auth_endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("app_id", config.app_id())
            .append_pair("redirect_uri", config.callback_url().as_str())
            .append_pair("code_challenge", challenge.as_str());
        if let Some(state) = config.state() {
            query.append_pair("state", state);
        }
    }
    url
}
