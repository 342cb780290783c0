//! Clean-up of raw model output before it is returned to the operator.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Returns the content of the first fenced block in `raw`, trimmed.
///
/// The opening fence must start a line; an optional `lang` tag after it is
/// dropped. The block ends at the last ```` ``` ````, so prose before the
/// opening fence and after the closing fence is discarded. Text without an
/// opening fence is only trimmed.
pub fn strip_code_fence(raw: &str, lang: &str) -> String {
    let text = raw.trim();

    let Some((open, _)) = text
        .match_indices("```")
        .find(|(at, _)| *at == 0 || text[..*at].ends_with('\n'))
    else {
        return text.to_owned();
    };

    let rest = &text[open + 3..];
    let rest = rest.strip_prefix(lang).unwrap_or(rest);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let block = match rest.rfind("```") {
        Some(close) => &rest[..close],
        None => rest,
    };

    block.trim().to_owned()
}

pub fn normalize_html(raw: &str) -> String {
    strip_code_fence(raw, "html")
}

/// Parses the `{"subject": ..., "body": ...}` envelope the email prompt asks
/// for. Anything that is not a JSON object falls back to an empty subject and
/// the cleaned text as body.
pub fn normalize_email(raw: &str) -> EmailDraft {
    let cleaned = strip_code_fence(raw, "json");

    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(serde_json::Value::Object(fields)) => {
            let field = |name: &str| {
                fields
                    .get(name)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_owned()
            };
            EmailDraft {
                subject: field("subject"),
                body: field("body"),
            }
        }
        _ => {
            tracing::warn!(
                len = cleaned.len(),
                "email output is not a JSON object; using raw text as body"
            );
            EmailDraft {
                subject: String::new(),
                body: cleaned,
            }
        }
    }
}
