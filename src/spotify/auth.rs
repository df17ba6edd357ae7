//! Authorization-code flow helpers.

use chrono::Utc;

use super::models::TokenResponse;

pub const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

/// Scopes requested at login.
pub const LOGIN_SCOPES: &str = "user-read-private user-top-read user-read-recently-played playlist-modify-public playlist-modify-private";

/// Fully populated application credentials, needed for the token exchange.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// URL of the accounts service consent page.
pub fn authorize_url(accounts_base_url: &str, client_id: &str, redirect_uri: &str) -> String {
    format!(
        "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
        accounts_base_url.trim_end_matches('/'),
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(LOGIN_SCOPES),
    )
}

/// Absolute expiry in milliseconds since the epoch, saturating on
/// out-of-range upstream values.
pub fn expires_at_millis(now_millis: i64, expires_in_secs: i64) -> i64 {
    now_millis.saturating_add(expires_in_secs.saturating_mul(1000))
}

/// Location the browser is sent to after a successful exchange. Tokens travel
/// as query parameters so the single page app can pick them up.
pub fn post_login_location(tokens: &TokenResponse) -> String {
    post_login_location_at(tokens, Utc::now().timestamp_millis())
}

fn post_login_location_at(tokens: &TokenResponse, now_millis: i64) -> String {
    let mut location = format!(
        "/?access_token={}&expires_at={}",
        urlencoding::encode(&tokens.access_token),
        expires_at_millis(now_millis, tokens.expires_in)
    );
    if let Some(refresh_token) = &tokens.refresh_token {
        location.push_str("&refresh_token=");
        location.push_str(&urlencoding::encode(refresh_token));
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "BQD+abc/123".to_string(),
            token_type: Some("Bearer".to_string()),
            scope: None,
            expires_in: 3600,
            refresh_token: refresh.map(str::to_string),
        }
    }

    #[test]
    fn authorize_url_encodes_every_parameter() {
        let url = authorize_url(
            "https://accounts.example.com/",
            "client id",
            "http://localhost:3001/api/callback",
        );
        assert!(url.starts_with("https://accounts.example.com/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3001%2Fapi%2Fcallback"));
        assert!(url.contains("scope=user-read-private%20user-top-read"));
    }

    #[test]
    fn location_embeds_expiry_and_refresh_token() {
        let location = post_login_location_at(&tokens(Some("refresh-1")), 1_000);
        assert_eq!(
            location,
            "/?access_token=BQD%2Babc%2F123&expires_at=3601000&refresh_token=refresh-1"
        );
    }

    #[test]
    fn huge_expiry_saturates() {
        assert_eq!(expires_at_millis(1_000, i64::MAX), i64::MAX);
        assert_eq!(expires_at_millis(1_000, i64::MAX / 1000), i64::MAX);
        assert_eq!(expires_at_millis(0, i64::MIN), i64::MIN);
        assert_eq!(expires_at_millis(500, 2), 2_500);
    }

    #[test]
    fn location_omits_missing_refresh_token() {
        let location = post_login_location_at(&tokens(None), 0);
        assert_eq!(location, "/?access_token=BQD%2Babc%2F123&expires_at=3600000");
    }
}
