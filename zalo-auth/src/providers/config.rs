//! Pre-configured provider endpoints.

/// Default profile fields requested from the Zalo Graph API.
pub const DEFAULT_FIELDS: [&str; 5] = ["id", "birthday", "name", "gender", "picture"];

/// Zalo's authorization (consent) page.
pub const ZALO_AUTH_URL: &str = "https://oauth.zaloapp.com/v4/permission";
/// Zalo's code-for-token endpoint.
pub const ZALO_TOKEN_URL: &str = "https://oauth.zaloapp.com/v4/access_token";
/// Zalo Graph API profile endpoint.
pub const ZALO_PROFILE_URL: &str = "https://graph.zalo.me/v2.0/me";

/// OAuth and Graph API endpoints of an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUrls {
    /// Authorization (consent) page the browser is redirected to.
    pub auth_url: String,
    /// Endpoint exchanging an authorization code for tokens.
    pub token_url: String,
    /// Endpoint returning the user's profile.
    pub profile_url: String,
}

/// Get the Zalo endpoints.
pub fn zalo_urls() -> ProviderUrls {
    ProviderUrls {
        auth_url: ZALO_AUTH_URL.to_string(),
        token_url: ZALO_TOKEN_URL.to_string(),
        profile_url: ZALO_PROFILE_URL.to_string(),
    }
}

/// Get endpoints rooted at `base_url`, using Zalo's paths.
///
/// Mostly useful to point the strategy at a mock server.
pub fn urls_with_base(base_url: &str) -> ProviderUrls {
    let base_url = base_url.trim_end_matches('/');
    ProviderUrls {
        auth_url: format!("{}/v4/permission", base_url),
        token_url: format!("{}/v4/access_token", base_url),
        profile_url: format!("{}/v2.0/me", base_url),
    }
}

impl Default for ProviderUrls {
    fn default() -> Self {
        zalo_urls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zalo_urls() {
        let urls = zalo_urls();
        assert_eq!(urls.auth_url, "https://oauth.zaloapp.com/v4/permission");
        assert_eq!(urls.token_url, "https://oauth.zaloapp.com/v4/access_token");
        assert_eq!(urls.profile_url, "https://graph.zalo.me/v2.0/me");
    }

    #[test]
    fn test_urls_with_base_trims_slash() {
        let urls = urls_with_base("http://127.0.0.1:1234/");
        assert_eq!(urls.auth_url, "http://127.0.0.1:1234/v4/permission");
        assert_eq!(urls.token_url, "http://127.0.0.1:1234/v4/access_token");
        assert_eq!(urls.profile_url, "http://127.0.0.1:1234/v2.0/me");
    }
}
