use chrono::{Datelike as _, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Structured fields of one cooking lesson, as entered by the operator.
///
/// Every field is interpolated verbatim into the prompts; missing fields
/// deserialize to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonInfo {
    pub menu: String,
    pub datetime: String,
    pub duration: String,
    pub price: String,
    pub instructor: String,
    pub reserva_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Line,
    Email,
    Html,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Email => "email",
            Self::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactSelection {
    Line,
    Email,
    Html,
    #[default]
    All,
}

impl ArtifactSelection {
    pub fn includes(self, kind: ArtifactKind) -> bool {
        match self {
            Self::All => true,
            Self::Line => kind == ArtifactKind::Line,
            Self::Email => kind == ArtifactKind::Email,
            Self::Html => kind == ArtifactKind::Html,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(flatten)]
    pub lesson: LessonInfo,
    #[serde(rename = "type", default, deserialize_with = "selection_or_all")]
    pub selection: ArtifactSelection,
}

// `null` and `""` select everything, like an absent `type`.
fn selection_or_all<'de, D>(deserializer: D) -> Result<ArtifactSelection, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") | Some("all") => Ok(ArtifactSelection::All),
        Some("line") => Ok(ArtifactSelection::Line),
        Some("email") => Ok(ArtifactSelection::Email),
        Some("html") => Ok(ArtifactSelection::Html),
        Some(other) => Err(serde::de::Error::unknown_variant(
            other,
            &["line", "email", "html", "all"],
        )),
    }
}

/// Combined output of one generation request. A field is present iff its
/// artifact was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishRequest {
    pub html: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedArtifact {
    pub url: String,
    pub file_name: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastRequest {
    pub message: String,
}

const WEEKDAYS_JA: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Formats a lesson start as the display string used in announcements,
/// e.g. `2025年2月2日(日) 10:00〜`.
pub fn format_display_datetime(date: NaiveDate, time: NaiveTime) -> String {
    let weekday = WEEKDAYS_JA[date.weekday().num_days_from_sunday() as usize];
    format!(
        "{}年{}月{}日({weekday}) {}〜",
        date.year(),
        date.month(),
        date.day(),
        time.format("%H:%M")
    )
}
