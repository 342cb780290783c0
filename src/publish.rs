use std::sync::LazyLock;

use crate::app::lesson_store::LessonStore;
use crate::lesson::{PublishRequest, PublishedArtifact};

pub const LESSONS_PREFIX: &str = "lessons";

static DATE_PATTERN: LazyLock<regex_lite::Regex> =
    LazyLock::new(|| regex_lite::Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("HTMLと日付が必要です")]
    MissingField,

    #[error("日付は YYYY-MM-DD 形式で指定してください")]
    InvalidDate(String),

    #[error("公開に失敗しました")]
    Storage(#[source] anyhow::Error),
}

impl PublishError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField | Self::InvalidDate(_))
    }

    /// Best-effort diagnostic text for storage failures.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Storage(err) => Some(format!("{err:#}")),
            Self::MissingField | Self::InvalidDate(_) => None,
        }
    }
}

/// Object name and path for a lesson page, e.g.
/// `lesson-2025-02-02.html` and `lessons/lesson-2025-02-02.html`.
pub fn lesson_file_path(date: &str) -> (String, String) {
    let file_name = format!("lesson-{date}.html");
    let file_path = format!("{LESSONS_PREFIX}/{file_name}");
    (file_name, file_path)
}

pub fn validate(request: &PublishRequest) -> Result<(), PublishError> {
    if request.html.is_empty() || request.date.is_empty() {
        return Err(PublishError::MissingField);
    }
    if !DATE_PATTERN.is_match(&request.date) {
        return Err(PublishError::InvalidDate(request.date.clone()));
    }
    Ok(())
}

/// Validates `request`, then stores the page publicly under its date key,
/// replacing whatever was published for that date before.
pub async fn publish(
    store: &dyn LessonStore,
    request: &PublishRequest,
) -> Result<PublishedArtifact, PublishError> {
    validate(request)?;

    let (file_name, file_path) = lesson_file_path(&request.date);
    tracing::info!(path = %file_path, bytes = request.html.len(), "publish lesson page");

    store
        .put_public_html(&file_path, &request.html)
        .await
        .map_err(PublishError::Storage)?;

    Ok(PublishedArtifact {
        url: store.public_url(&file_path),
        file_name,
        file_path,
    })
}
