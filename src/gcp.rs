use std::sync::OnceLock;

use anyhow::Context as _;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Process-wide HTTP client, built on first use.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

/// Where OAuth access tokens for Google APIs come from.
#[derive(Clone)]
pub enum AccessTokenSource {
    /// The instance metadata server (Cloud Run / GCE service account).
    Metadata,
    /// A fixed token, e.g. from `gcloud auth print-access-token`.
    Static(String),
}

impl std::fmt::Debug for AccessTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metadata => f.write_str("Metadata"),
            Self::Static(_) => f.write_str("Static(<redacted>)"),
        }
    }
}

impl AccessTokenSource {
    pub fn from_env() -> Self {
        match std::env::var("LESSON_PROMO_ACCESS_TOKEN")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
        {
            Some(token) => Self::Static(token),
            None => Self::Metadata,
        }
    }

    pub async fn access_token(&self, client: &reqwest::Client) -> anyhow::Result<String> {
        #[derive(Debug, serde::Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        if let Self::Static(token) = self {
            return Ok(token.clone());
        }

        let resp = client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .context("request metadata access token")?;
        if !resp.status().is_success() {
            anyhow::bail!("metadata token request failed ({})", resp.status());
        }
        let token: TokenResponse = resp.json().await.context("parse metadata token json")?;
        Ok(token.access_token)
    }
}

pub fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
