mod google_stub;

use google_stub::{
    EMAIL_BODY, EMAIL_SUBJECT, GoogleStub, HTML_PAGE, LINE_TEXT, ModelBehavior, StubConfig,
};
use lesson_promo::gcp::AccessTokenSource;
use lesson_promo::gemini::{GeminiConfig, GeminiGenerator};
use lesson_promo::lesson::{ArtifactSelection, GenerationRequest, LessonInfo};

fn generator(stub: &GoogleStub) -> GeminiGenerator {
    let config = GeminiConfig {
        base_url: stub.base_url.clone(),
        project: "cooking-class-system".to_owned(),
        location: "us-central1".to_owned(),
        model: "gemini-2.0-flash".to_owned(),
    };
    GeminiGenerator::new(config, AccessTokenSource::Static("test-token".to_owned()))
}

fn request(selection: ArtifactSelection) -> GenerationRequest {
    GenerationRequest {
        lesson: LessonInfo {
            menu: "🍴お品書き🍴\n🥔 1. ほっくり重ね煮".to_owned(),
            datetime: "2025年2月2日(日) 10:00〜".to_owned(),
            duration: "120".to_owned(),
            price: "2090".to_owned(),
            instructor: "山田花子".to_owned(),
            reserva_url: "https://example.com/reserve".to_owned(),
        },
        selection,
    }
}

#[tokio::test]
async fn all_artifacts_are_generated_and_normalized() -> anyhow::Result<()> {
    let stub = GoogleStub::spawn(StubConfig::default());

    let result =
        lesson_promo::generate::generate(&generator(&stub), &request(ArtifactSelection::All))
            .await?;

    assert_eq!(result.line_text.as_deref(), Some(LINE_TEXT));
    assert_eq!(result.email_subject.as_deref(), Some(EMAIL_SUBJECT));
    assert_eq!(result.email_body.as_deref(), Some(EMAIL_BODY));
    assert_eq!(result.html.as_deref(), Some(HTML_PAGE));

    let calls = stub.requests_to(":generateContent");
    assert_eq!(calls.len(), 3);
    for call in &calls {
        assert_eq!(
            call.url,
            "/v1/projects/cooking-class-system/locations/us-central1/publishers/google/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(call.authorization.as_deref(), Some("Bearer test-token"));
        assert!(call.body.contains("ほっくり重ね煮"));
    }
    Ok(())
}

#[tokio::test]
async fn single_selection_issues_single_request() -> anyhow::Result<()> {
    let stub = GoogleStub::spawn(StubConfig::default());

    let result =
        lesson_promo::generate::generate(&generator(&stub), &request(ArtifactSelection::Email))
            .await?;

    assert!(result.line_text.is_none());
    assert!(result.html.is_none());
    assert_eq!(result.email_subject.as_deref(), Some(EMAIL_SUBJECT));
    assert_eq!(stub.requests_to(":generateContent").len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_candidates_become_empty_fields() -> anyhow::Result<()> {
    let stub = GoogleStub::spawn(StubConfig {
        model: ModelBehavior::NoCandidates,
        ..StubConfig::default()
    });

    let result =
        lesson_promo::generate::generate(&generator(&stub), &request(ArtifactSelection::All))
            .await?;

    assert_eq!(result.line_text.as_deref(), Some(""));
    assert_eq!(result.email_subject.as_deref(), Some(""));
    assert_eq!(result.email_body.as_deref(), Some(""));
    assert_eq!(result.html.as_deref(), Some(""));
    Ok(())
}

#[tokio::test]
async fn api_error_fails_whole_generation() {
    let stub = GoogleStub::spawn(StubConfig {
        model: ModelBehavior::FailHtml,
        ..StubConfig::default()
    });

    let err = lesson_promo::generate::generate(&generator(&stub), &request(ArtifactSelection::All))
        .await
        .err()
        .map(|err| format!("{err:#}"))
        .unwrap_or_default();

    assert!(err.starts_with("generate html artifact: "), "{err}");
    assert!(err.contains("Vertex AI API error (500"), "{err}");
    assert!(err.contains("Internal error encountered."), "{err}");
}
