use anyhow::Context as _;

use crate::gemini::TextGenerator;
use crate::lesson::{ArtifactKind, GenerationRequest, GenerationResult, LessonInfo};
use crate::normalize;
use crate::prompt;

/// Generates every artifact selected by `request`.
///
/// Selected artifacts are requested concurrently. The first failure fails the
/// whole call; no partial result is returned.
pub async fn generate(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> anyhow::Result<GenerationResult> {
    let selection = request.selection;
    let lesson = &request.lesson;
    tracing::info!(selection = ?selection, "generate lesson artifacts");

    let line = async {
        if !selection.includes(ArtifactKind::Line) {
            return Ok(None);
        }
        generate_raw(generator, ArtifactKind::Line, lesson)
            .await
            .map(Some)
    };
    let email = async {
        if !selection.includes(ArtifactKind::Email) {
            return Ok(None);
        }
        let raw = generate_raw(generator, ArtifactKind::Email, lesson).await?;
        Ok::<_, anyhow::Error>(Some(normalize::normalize_email(&raw)))
    };
    let html = async {
        if !selection.includes(ArtifactKind::Html) {
            return Ok(None);
        }
        let raw = generate_raw(generator, ArtifactKind::Html, lesson).await?;
        Ok::<_, anyhow::Error>(Some(normalize::normalize_html(&raw)))
    };

    let (line_text, email, html) = tokio::try_join!(line, email, html)?;

    let (email_subject, email_body) = match email {
        Some(draft) => (Some(draft.subject), Some(draft.body)),
        None => (None, None),
    };

    Ok(GenerationResult {
        line_text,
        email_subject,
        email_body,
        html,
    })
}

async fn generate_raw(
    generator: &dyn TextGenerator,
    kind: ArtifactKind,
    lesson: &LessonInfo,
) -> anyhow::Result<String> {
    let prompt = prompt::build(kind, lesson);
    let text = generator
        .generate_text(&prompt)
        .await
        .with_context(|| format!("generate {} artifact", kind.as_str()))?;
    if text.is_empty() {
        tracing::warn!(artifact = kind.as_str(), "model returned no text");
    } else {
        tracing::debug!(
            artifact = kind.as_str(),
            chars = text.chars().count(),
            "model returned text"
        );
    }
    Ok(text)
}
