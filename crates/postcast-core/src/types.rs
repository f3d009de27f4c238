use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::video::VideoReference;

/// One transcript unit with start/end timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    pub language: String,
}

impl Transcript {
    /// Segment texts joined into the single string the analysis stages consume.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Locally materialized audio for one video, owned by the acquisition stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub video: VideoReference,
    pub path: PathBuf,
}

/// Shared record handed from the transcription pipeline to the content
/// pipeline. Fields are private so the record can only move between "empty"
/// and "completed with text" as a whole, never half-written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    completed: bool,
    full_text: String,
}

impl PipelineState {
    /// Marks a finished transcription run. An empty text keeps the state
    /// incomplete, so `completed` can never be observed alongside an empty
    /// transcript.
    pub fn complete(full_text: String) -> Self {
        if full_text.trim().is_empty() {
            Self::default()
        } else {
            Self {
                completed: true,
                full_text,
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }
}

/// Sentiment label for the transcript.
///
/// The language model is asked for one of the three labels; anything it
/// returns that matches none of them collapses to `Unknown` instead of being
/// passed through as free text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    #[default]
    Unknown,
}

impl Sentiment {
    /// Parses the collaborator's free-text label, tolerating casing and the
    /// pt/en/es word stems ("positivo", "positive", ...).
    pub fn parse(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("positiv") {
            Sentiment::Positive
        } else if label.contains("negativ") {
            Sentiment::Negative
        } else if label.contains("neutr") {
            Sentiment::Neutral
        } else {
            Sentiment::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_joins_trimmed_segments() {
        let transcript = Transcript {
            segments: vec![
                Segment {
                    start: 0.0,
                    end: 1.0,
                    text: " hello".to_string(),
                },
                Segment {
                    start: 1.0,
                    end: 2.0,
                    text: " world ".to_string(),
                },
            ],
            language: "en".to_string(),
        };
        assert_eq!(transcript.full_text(), "hello world");
    }

    #[test]
    fn state_never_completes_with_empty_text() {
        let state = PipelineState::complete("   ".to_string());
        assert!(!state.is_completed());
        assert!(state.full_text().is_empty());

        let state = PipelineState::complete("some transcript".to_string());
        assert!(state.is_completed());
        assert_eq!(state.full_text(), "some transcript");
    }

    #[test]
    fn sentiment_parses_labels_across_languages() {
        assert_eq!(Sentiment::parse("Positivo"), Sentiment::Positive);
        assert_eq!(Sentiment::parse("NEGATIVE"), Sentiment::Negative);
        assert_eq!(Sentiment::parse("neutro"), Sentiment::Neutral);
        assert_eq!(Sentiment::parse("cheerful"), Sentiment::Unknown);
    }
}
