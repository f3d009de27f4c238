use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostcastError {
    #[error("Could not extract a video id from URL: {url}")]
    InvalidUrl { url: String },

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Transcription failed for {}: {}", .audio_path.display(), .reason)]
    TranscriptionFailed { audio_path: PathBuf, reason: String },

    #[error("Agent {agent} returned an empty response")]
    EmptyResponse { agent: String },

    #[error("Agent {agent} failed: {reason}")]
    AgentFailed { agent: String, reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("A transcription run for video {video_id} is already in flight")]
    PipelineBusy { video_id: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PostcastError>;
