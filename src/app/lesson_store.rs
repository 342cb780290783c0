use std::path::PathBuf;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

use crate::gcp::{self, AccessTokenSource};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const CACHE_CONTROL: &str = "public, max-age=3600";

#[async_trait]
pub trait LessonStore: Send + Sync {
    fn public_url(&self, object_path: &str) -> String;

    /// Writes `html` at `object_path`, replacing any existing object, and makes
    /// it publicly readable.
    async fn put_public_html(&self, object_path: &str, html: &str) -> anyhow::Result<()>;
}

/// Stores pages under a local directory that the app serves statically.
#[derive(Debug, Clone)]
pub struct LocalFsLessonStore {
    base_dir: PathBuf,
    public_base_url: String,
}

impl LocalFsLessonStore {
    pub fn new(base_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn object_file(&self, object_path: &str) -> PathBuf {
        self.base_dir.join(object_path)
    }
}

#[async_trait]
impl LessonStore for LocalFsLessonStore {
    fn public_url(&self, object_path: &str) -> String {
        let base = self.public_base_url.trim_end_matches('/');
        format!("{base}/{}", percent_encode_path(object_path))
    }

    async fn put_public_html(&self, object_path: &str, html: &str) -> anyhow::Result<()> {
        let path = self.object_file(object_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(&path, html)
            .await
            .with_context(|| format!("write lesson html: {}", path.display()))?;
        tracing::info!(path = %path.display(), "stored lesson page on local filesystem");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GcsLessonStore {
    bucket: String,
    base_url: String,
    client: reqwest::Client,
    token_source: AccessTokenSource,
}

impl GcsLessonStore {
    pub fn new(bucket: impl Into<String>, token_source: AccessTokenSource) -> Self {
        Self::with_base_url(bucket, "https://storage.googleapis.com", token_source)
    }

    /// Same as [`GcsLessonStore::new`] but against another GCS-compatible host.
    pub fn with_base_url(
        bucket: impl Into<String>,
        base_url: impl Into<String>,
        token_source: AccessTokenSource,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: gcp::http_client().clone(),
            token_source,
        }
    }

    pub fn from_env(bucket: impl Into<String>) -> Self {
        let base_url = gcp::env_or(
            "LESSON_PROMO_STORAGE_BASE_URL",
            "https://storage.googleapis.com",
        );
        Self::with_base_url(bucket, base_url, AccessTokenSource::from_env())
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_html(
        &self,
        access_token: &str,
        object_name: &str,
        html: &str,
    ) -> anyhow::Result<()> {
        let url = format!(
            "{base}/upload/storage/v1/b/{bucket}/o?uploadType=multipart",
            base = self.base_url,
            bucket = percent_encode_rfc3986(&self.bucket),
        );

        let metadata = serde_json::json!({
            "name": object_name,
            "contentType": HTML_CONTENT_TYPE,
            "cacheControl": CACHE_CONTROL,
            "contentDisposition": "inline",
        });
        let boundary = format!("lesson-promo-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &metadata, html);

        let resp = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .context("upload lesson html to gcs")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("gcs upload failed ({status}): {body}");
        }
        Ok(())
    }

    async fn make_public(&self, access_token: &str, object_name: &str) -> anyhow::Result<()> {
        let url = format!(
            "{base}/storage/v1/b/{bucket}/o/{object}/acl",
            base = self.base_url,
            bucket = percent_encode_rfc3986(&self.bucket),
            object = percent_encode_rfc3986(object_name),
        );
        let resp = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "entity": "allUsers", "role": "READER" }))
            .send()
            .await
            .context("grant public read on gcs object")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("gcs acl update failed ({status}): {body}");
        }
        Ok(())
    }
}

#[async_trait]
impl LessonStore for GcsLessonStore {
    fn public_url(&self, object_path: &str) -> String {
        format!(
            "https://storage.googleapis.com/{}/{}",
            self.bucket,
            percent_encode_path(object_path)
        )
    }

    async fn put_public_html(&self, object_path: &str, html: &str) -> anyhow::Result<()> {
        let access_token = self
            .token_source
            .access_token(&self.client)
            .await
            .context("get access token")?;

        tracing::info!(
            bucket = %self.bucket,
            object = %object_path,
            "uploading lesson page to gcs"
        );
        self.upload_html(&access_token, object_path, html)
            .await
            .context("upload html")?;
        self.make_public(&access_token, object_path)
            .await
            .context("make public")?;
        Ok(())
    }
}

fn multipart_related_body(boundary: &str, metadata: &serde_json::Value, content: &str) -> String {
    format!(
        "--{boundary}\r\n\
Content-Type: application/json; charset=UTF-8\r\n\
\r\n\
{metadata}\r\n\
--{boundary}\r\n\
Content-Type: {HTML_CONTENT_TYPE}\r\n\
\r\n\
{content}\r\n\
--{boundary}--\r\n"
    )
}

fn percent_encode_rfc3986(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        let is_unreserved = matches!(
            b,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~'
        );
        if is_unreserved {
            out.push(b as char);
        } else {
            out.push('%');
            out.push_str(&format!("{b:02X}"));
        }
    }
    out
}

fn percent_encode_path(path: &str) -> String {
    path.split('/')
        .map(percent_encode_rfc3986)
        .collect::<Vec<_>>()
        .join("/")
}
