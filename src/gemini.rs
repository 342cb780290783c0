use anyhow::Context as _;
use async_trait::async_trait;
use serde::Deserialize;

use crate::gcp::{self, AccessTokenSource};

/// One prompt in, one block of text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's text for `prompt`. An empty string is a valid
    /// answer; only transport and API failures are errors.
    async fn generate_text(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub project: String,
    pub location: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let project = std::env::var("GOOGLE_CLOUD_PROJECT")
            .or_else(|_| std::env::var("GCLOUD_PROJECT"))
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "cooking-class-system".to_owned());
        let location = gcp::env_or("LESSON_PROMO_VERTEX_LOCATION", "us-central1");
        let base_url = gcp::env_or(
            "LESSON_PROMO_VERTEX_BASE_URL",
            &format!("https://{location}-aiplatform.googleapis.com"),
        );
        let model = gcp::env_or("LESSON_PROMO_MODEL", "gemini-2.0-flash");
        Self {
            base_url,
            project,
            location,
            model,
        }
    }

    pub fn endpoint(&self) -> String {
        generate_content_endpoint(&self.base_url, &self.project, &self.location, &self.model)
    }
}

pub fn generate_content_endpoint(
    base_url: &str,
    project: &str,
    location: &str,
    model: &str,
) -> String {
    let base_url = base_url.trim_end_matches('/');
    format!(
        "{base_url}/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent"
    )
}

/// Vertex AI Gemini over the `generateContent` REST method.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
    token_source: AccessTokenSource,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig, token_source: AccessTokenSource) -> Self {
        Self {
            client: gcp::http_client().clone(),
            config,
            token_source,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env(), AccessTokenSource::from_env())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate_text(&self, prompt: &str) -> anyhow::Result<String> {
        let access_token = self
            .token_source
            .access_token(&self.client)
            .await
            .context("get access token")?;
        let endpoint = self.config.endpoint();
        generate_content_text(&self.client, &endpoint, &access_token, prompt).await
    }
}

pub async fn generate_content_text(
    client: &reqwest::Client,
    endpoint: &str,
    access_token: &str,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = serde_json::json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
    });

    let response = client
        .post(endpoint)
        .bearer_auth(access_token)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("POST {endpoint}"))?;

    let status = response.status();
    let raw = response
        .text()
        .await
        .context("read generateContent response body")?;
    if !status.is_success() {
        let message = parse_error_message(&raw).unwrap_or_else(|| raw.clone());
        anyhow::bail!("Vertex AI API error ({status}): {message}");
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(&raw).context("parse generateContent response")?;
    Ok(first_candidate_text(parsed))
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    text: Option<String>,
}

// Only the first part of the first candidate counts; anything missing is "".
fn first_candidate_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_default()
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}
