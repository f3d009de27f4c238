//! Postcast Core Library
//!
//! Core functionality for downloading video audio, transcribing it with Whisper,
//! and turning the transcript into an AI-generated social media post.

pub mod acquisition;
pub mod agents;
pub mod analysis;
pub mod cache;
pub mod chain;
pub mod download;
pub mod error;
pub mod keywords;
pub mod language;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod subtitles;
pub mod transcribe;
pub mod types;
pub mod video;

// Re-export commonly used items at crate root
pub use acquisition::AcquisitionStage;
pub use agents::{AgentSpec, ChatCompletions, LanguageModel};
pub use analysis::AnalysisStage;
pub use cache::TranscriptCache;
pub use chain::{AgentChain, ChainOutput};
pub use download::{DownloadUpdate, Downloader, YtDlpDownloader};
pub use error::{PostcastError, Result};
pub use keywords::extract_topic;
pub use language::Language;
pub use pipeline::{Analysis, ContentStatus, Pipeline};
pub use progress::ProgressReporter;
pub use provider::{Provider, ProviderConfig};
pub use subtitles::{export_srt, format_timecode};
pub use transcribe::{Transcriber, TranscriptionStage, WhisperCli};
pub use types::{AudioArtifact, PipelineState, Segment, Sentiment, Transcript};
pub use video::VideoReference;
