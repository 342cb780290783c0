#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod gcp;
pub mod gemini;
pub mod generate;
pub mod lesson;
pub mod line;
pub mod logging;
pub mod normalize;
pub mod prompt;
pub mod publish;
