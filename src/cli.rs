use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

use crate::lesson::{self, ArtifactSelection, GenerationRequest, LessonInfo};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate announcement, email and landing page for a lesson.
    Generate(GenerateArgs),
    /// Publish a landing page under `lessons/lesson-<date>.html`.
    Publish(PublishArgs),
    /// Broadcast a message to the LINE channel.
    Broadcast(BroadcastArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Menu text (may span multiple lines).
    #[arg(long)]
    pub menu: String,

    /// Pre-formatted date/time display string. Overrides --date/--time.
    #[arg(long)]
    pub datetime: Option<String>,

    /// Lesson date (YYYY-MM-DD), formatted with --time into the display string.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Start time (HH:MM).
    #[arg(long, default_value = "10:00", value_parser = parse_hh_mm)]
    pub time: NaiveTime,

    /// Duration in minutes.
    #[arg(long, default_value = "120")]
    pub duration: String,

    /// Price in yen, tax included.
    #[arg(long, default_value = "2090")]
    pub price: String,

    #[arg(long)]
    pub instructor: String,

    /// Reservation page URL (absolute).
    #[arg(long, value_parser = parse_absolute_url)]
    pub reserva_url: String,

    /// Which artifacts to generate.
    #[arg(long = "type", value_enum, default_value_t = ArtifactSelection::All)]
    pub selection: ArtifactSelection,
}

impl GenerateArgs {
    pub fn to_request(&self) -> anyhow::Result<GenerationRequest> {
        let datetime = match (&self.datetime, self.date) {
            (Some(datetime), _) => datetime.clone(),
            (None, Some(date)) => lesson::format_display_datetime(date, self.time),
            (None, None) => anyhow::bail!("either --datetime or --date is required"),
        };

        Ok(GenerationRequest {
            lesson: LessonInfo {
                menu: self.menu.clone(),
                datetime,
                duration: self.duration.clone(),
                price: self.price.clone(),
                instructor: self.instructor.clone(),
                reserva_url: self.reserva_url.clone(),
            },
            selection: self.selection,
        })
    }
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Path to the HTML document to publish.
    #[arg(long)]
    pub html: String,

    /// Lesson date (YYYY-MM-DD); determines the object key.
    #[arg(long)]
    pub date: String,

    /// GCS bucket (default: $LESSON_PROMO_BUCKET). Without one, pages are
    /// written under --data-dir.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Local store directory (used when no bucket is configured).
    #[arg(long, default_value = "workspace-app")]
    pub data_dir: String,

    /// Base URL the local store is served from.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    pub public_base_url: String,
}

#[derive(Debug, Args)]
pub struct BroadcastArgs {
    /// Message text, sent verbatim.
    #[arg(long)]
    pub message: String,
}

fn parse_hh_mm(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|err| format!("expected HH:MM: {err}"))
}

fn parse_absolute_url(raw: &str) -> Result<String, String> {
    url::Url::parse(raw).map_err(|err| format!("invalid absolute url: {err}"))?;
    Ok(raw.to_owned())
}
