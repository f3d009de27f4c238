use std::path::PathBuf;

use tokio::fs;

use crate::error::Result;
use crate::types::Transcript;
use crate::video::VideoReference;

/// On-disk idempotency layer keyed by [`VideoReference`].
///
/// Every video gets its own directory under the cache root holding the
/// extracted audio and the transcript JSON, so re-running a later stage never
/// repeats an expensive earlier one. Entries persist until deleted by hand;
/// existence alone is trusted, there is no staleness check.
#[derive(Debug, Clone)]
pub struct TranscriptCache {
    root: PathBuf,
}

impl TranscriptCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("postcast")
    }

    pub fn video_dir(&self, video: &VideoReference) -> PathBuf {
        self.root.join(video.id())
    }

    pub fn audio_path(&self, video: &VideoReference) -> PathBuf {
        self.video_dir(video).join("audio.wav")
    }

    pub fn transcript_path(&self, video: &VideoReference) -> PathBuf {
        self.video_dir(video).join("transcript.json")
    }

    pub fn srt_path(&self, video: &VideoReference) -> PathBuf {
        self.video_dir(video).join("subtitles.srt")
    }

    pub fn has_audio(&self, video: &VideoReference) -> bool {
        self.audio_path(video).exists()
    }

    pub fn has_transcript(&self, video: &VideoReference) -> bool {
        self.transcript_path(video).exists()
    }

    pub async fn load_transcript(&self, video: &VideoReference) -> Result<Transcript> {
        let json_content = fs::read_to_string(self.transcript_path(video)).await?;
        let transcript: Transcript = serde_json::from_str(&json_content)?;
        Ok(transcript)
    }

    pub async fn save_transcript(
        &self,
        video: &VideoReference,
        transcript: &Transcript,
    ) -> Result<()> {
        fs::create_dir_all(self.video_dir(video)).await?;
        let pretty_json = serde_json::to_string_pretty(transcript)?;
        fs::write(self.transcript_path(video), &pretty_json).await?;
        Ok(())
    }
}
