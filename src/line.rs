use anyhow::Context as _;
use async_trait::async_trait;

use crate::gcp;

#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Pushes `message` to every subscriber of the channel.
    async fn broadcast(&self, message: &str) -> anyhow::Result<()>;
}

/// LINE Messaging API broadcast with a channel access token held server side.
#[derive(Clone)]
pub struct LineBroadcaster {
    client: reqwest::Client,
    base_url: String,
    channel_access_token: Option<String>,
}

impl std::fmt::Debug for LineBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineBroadcaster")
            .field("base_url", &self.base_url)
            .field("has_token", &self.channel_access_token.is_some())
            .finish()
    }
}

impl LineBroadcaster {
    pub fn new(base_url: impl Into<String>, channel_access_token: Option<String>) -> Self {
        Self {
            client: gcp::http_client().clone(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            channel_access_token,
        }
    }

    pub fn from_env() -> Self {
        let base_url = gcp::env_or("LESSON_PROMO_LINE_BASE_URL", "https://api.line.me");
        let token = std::env::var("LINE_CHANNEL_ACCESS_TOKEN")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());
        Self::new(base_url, token)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v2/bot/message/broadcast", self.base_url)
    }
}

pub fn broadcast_body(message: &str) -> serde_json::Value {
    serde_json::json!({
        "messages": [ { "type": "text", "text": message } ],
    })
}

#[async_trait]
impl Broadcaster for LineBroadcaster {
    async fn broadcast(&self, message: &str) -> anyhow::Result<()> {
        // A missing token is left for the API to reject.
        if self.channel_access_token.is_none() {
            tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN is not set");
        }
        let token = self.channel_access_token.as_deref().unwrap_or_default();
        let endpoint = self.endpoint();

        tracing::info!(chars = message.chars().count(), "line broadcast");
        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(token)
            .json(&broadcast_body(message))
            .send()
            .await
            .with_context(|| format!("POST {endpoint}"))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("LINE API error ({status}): {body}");
        }
        Ok(())
    }
}
