#![allow(dead_code)]

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::Value;

/// How the stubbed model answers `generateContent`.
#[derive(Debug, Clone, Copy)]
pub enum ModelBehavior {
    /// Plain text for LINE, fenced JSON for email, fenced HTML for the page.
    Fenced,
    /// `{"candidates": []}` for every prompt.
    NoCandidates,
    /// HTTP 500 with a Google-style error body for the landing page prompt.
    FailHtml,
}

#[derive(Debug, Clone)]
pub struct StubConfig {
    pub model: ModelBehavior,
    pub line_token: Option<String>,
    pub storage_status: u16,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            model: ModelBehavior::Fenced,
            line_token: Some("line-token".to_owned()),
            storage_status: 200,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub const LINE_TEXT: &str = "毎日お疲れ様です🍳 一緒に作りましょう！";
pub const EMAIL_SUBJECT: &str = "【2/2開催】重ね煮レッスンのご案内";
pub const EMAIL_BODY: &str = "こんにちは。\nご参加お待ちしています。";
pub const HTML_PAGE: &str = "<!DOCTYPE html>\n<html><body><h1>重ね煮</h1></body></html>";

/// One local HTTP server standing in for Vertex AI, Cloud Storage and LINE.
pub struct GoogleStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl GoogleStub {
    pub fn spawn(config: StubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start google stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let mut body = String::new();
                if request.as_reader().read_to_string(&mut body).is_err() {
                    let _ = request.respond(
                        tiny_http::Response::from_string("invalid request body")
                            .with_status_code(400),
                    );
                    continue;
                }

                let header = |name: &str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.to_string().eq_ignore_ascii_case(name))
                        .map(|h| h.value.to_string())
                };
                let entry = RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_owned(),
                    authorization: header("Authorization"),
                    content_type: header("Content-Type"),
                    body,
                };
                recorded.lock().expect("lock requests").push(entry.clone());

                let (status, response_body) = route(&config, &entry);
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(response_body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock requests").clone()
    }

    pub fn requests_to(&self, path_fragment: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains(path_fragment))
            .collect()
    }
}

impl Drop for GoogleStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn route(config: &StubConfig, request: &RecordedRequest) -> (u16, String) {
    if request.method != "POST" {
        return (404, r#"{"error":{"message":"not found"}}"#.to_owned());
    }

    let url = request.url.as_str();
    if url.ends_with(":generateContent") {
        return generate_content(config.model, &request.body);
    }
    if url.starts_with("/upload/storage/v1/b/") {
        if config.storage_status != 200 {
            return (
                config.storage_status,
                r#"{"error":{"message":"storage denied"}}"#.to_owned(),
            );
        }
        return (200, r#"{"kind":"storage#object"}"#.to_owned());
    }
    if url.starts_with("/storage/v1/b/") && url.ends_with("/acl") {
        return (200, r#"{"kind":"storage#objectAccessControl"}"#.to_owned());
    }
    if url == "/v2/bot/message/broadcast" {
        let expected = config.line_token.as_deref().map(|t| format!("Bearer {t}"));
        if expected.is_none() || request.authorization != expected {
            return (401, r#"{"message":"Authentication failed"}"#.to_owned());
        }
        return (200, "{}".to_owned());
    }
    (404, r#"{"error":{"message":"not found"}}"#.to_owned())
}

fn generate_content(behavior: ModelBehavior, body: &str) -> (u16, String) {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return (400, r#"{"error":{"message":"invalid json"}}"#.to_owned()),
    };
    let prompt = parsed
        .pointer("/contents/0/parts/0/text")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if matches!(behavior, ModelBehavior::NoCandidates) {
        return (200, r#"{"candidates":[]}"#.to_owned());
    }

    let text = if prompt.contains("LINE告知文") {
        LINE_TEXT.to_owned()
    } else if prompt.contains("メールの件名と本文") {
        let envelope = serde_json::json!({ "subject": EMAIL_SUBJECT, "body": EMAIL_BODY });
        format!("```json\n{envelope}\n```")
    } else if prompt.contains("ランディングページ") {
        if matches!(behavior, ModelBehavior::FailHtml) {
            return (
                500,
                r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#
                    .to_owned(),
            );
        }
        format!("```html\n{HTML_PAGE}\n```")
    } else {
        return (400, r#"{"error":{"message":"unknown prompt"}}"#.to_owned());
    };

    let response = serde_json::json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [ { "text": text } ] },
                "finishReason": "STOP"
            }
        ],
        "modelVersion": "gemini-2.0-flash"
    });
    (200, response.to_string())
}
