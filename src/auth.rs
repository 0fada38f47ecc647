//! OAuth2 client-credentials session for the Panopto API
use {
    crate::error::{ApiError, Result},
    reqwest::Client,
    serde::Deserialize,
    std::time::{Duration, Instant},
    tokio::sync::Mutex,
    tracing::{debug, info},
};

/// Tokens are treated as stale this long before their reported expiry, so a
/// token never dies in the middle of a request.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    bearer: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Client-credentials token provider.
///
/// The bearer token is cached in memory and reused until shortly before
/// expiry; [`OAuth2Provider::invalidate`] drops it so the next call performs
/// a fresh exchange (used when the service answers 401 anyway).
pub struct OAuth2Provider {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl OAuth2Provider {
    pub fn new(
        http: Client,
        site_base: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: format!("{site_base}/Panopto/oauth2/connect/token"),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    /// current bearer token, exchanging credentials if the cache is cold or stale
    pub async fn bearer(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh() {
                return Ok(token.bearer.clone());
            }
            debug!("cached access token is stale, re-exchanging");
        }

        let token = self.exchange().await?;
        let bearer = token.bearer.clone();
        *cached = Some(token);
        Ok(bearer)
    }

    /// drop the cached token so the next call performs a fresh exchange
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn exchange(&self) -> Result<CachedToken> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", "api")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Auth(format!(
                "token endpoint answered http {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response.json().await?;
        info!(expires_in = token.expires_in, "obtained access token");

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            bearer: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}
