use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{fs, process::Command};

use crate::error::{PostcastError, Result};
use crate::language::Language;
use crate::progress::ProgressReporter;
use crate::types::{AudioArtifact, Segment, Transcript};

/// External inference collaborator: audio file in, timed segments out.
///
/// Zero segments is a valid (if unusual) empty transcript, not a failure;
/// only collaborator errors map to `TranscriptionFailed`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path, language: Language) -> Result<Transcript>;
}

/// Shape of the JSON file the whisper CLI writes next to the audio.
#[derive(Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    language: String,
}

/// Transcribes through a `whisper` subprocess with deterministic decoding
/// (temperature 0) and word-level timing enabled.
pub struct WhisperCli {
    model: String,
}

impl WhisperCli {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl Default for WhisperCli {
    fn default() -> Self {
        Self::new("base")
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio_path: &Path, language: Language) -> Result<Transcript> {
        let output_dir = audio_path.parent().unwrap_or(Path::new("."));

        let output = Command::new("whisper")
            .arg(audio_path)
            .arg("--model")
            .arg(&self.model)
            .arg("--language")
            .arg(language.code())
            .arg("--temperature")
            .arg("0")
            .arg("--word_timestamps")
            .arg("True")
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(output_dir)
            .output()
            .await?;

        if !output.status.success() {
            return Err(PostcastError::TranscriptionFailed {
                audio_path: audio_path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        // Whisper names the JSON after the input file
        let json_path = audio_path.with_extension("json");
        let json_content =
            fs::read_to_string(&json_path)
                .await
                .map_err(|err| PostcastError::TranscriptionFailed {
                    audio_path: audio_path.to_path_buf(),
                    reason: format!("missing transcription output {}: {err}", json_path.display()),
                })?;
        let raw: WhisperOutput = serde_json::from_str(&json_content)?;

        let language = if raw.language.is_empty() {
            language.code().to_string()
        } else {
            raw.language
        };

        Ok(Transcript {
            segments: raw.segments,
            language,
        })
    }
}

/// Runs the inference collaborator over an acquired artifact and reports the
/// terminal progress value once it returns; the collaborator exposes no
/// partial signal.
pub struct TranscriptionStage {
    transcriber: Arc<dyn Transcriber>,
}

impl TranscriptionStage {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }

    pub async fn transcribe(
        &self,
        artifact: &AudioArtifact,
        language: Language,
        progress: &ProgressReporter,
    ) -> Result<Transcript> {
        let transcript = self.transcriber.transcribe(&artifact.path, language).await?;
        progress.finished();
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whisper_json_parses_with_extra_fields() {
        let json = r#"{
            "text": " Hello world.",
            "segments": [
                {"id": 0, "seek": 0, "start": 0.0, "end": 2.1, "text": " Hello world.", "tokens": [1, 2]}
            ],
            "language": "en"
        }"#;
        let raw: WhisperOutput = serde_json::from_str(json).unwrap();
        assert_eq!(raw.segments.len(), 1);
        assert_eq!(raw.segments[0].text, " Hello world.");
        assert_eq!(raw.language, "en");
    }

    #[test]
    fn zero_segments_is_a_valid_transcript() {
        let raw: WhisperOutput = serde_json::from_str(r#"{"language": "pt"}"#).unwrap();
        assert!(raw.segments.is_empty());
    }
}
