use std::sync::Arc;

use tokio::fs;
use tracing::info;

use crate::cache::TranscriptCache;
use crate::download::Downloader;
use crate::error::{PostcastError, Result};
use crate::progress::ProgressReporter;
use crate::types::AudioArtifact;
use crate::video::VideoReference;

/// Turns a video URL into a locally cached audio artifact.
///
/// The cache is consulted before the network: a hit returns the existing
/// file without invoking the download collaborator at all. Progress starts
/// at zero for every invocation and is reset to zero on failure.
pub struct AcquisitionStage {
    downloader: Arc<dyn Downloader>,
    cache: TranscriptCache,
}

impl AcquisitionStage {
    pub fn new(downloader: Arc<dyn Downloader>, cache: TranscriptCache) -> Self {
        Self { downloader, cache }
    }

    pub async fn acquire(
        &self,
        url: &str,
        force: bool,
        progress: &ProgressReporter,
    ) -> Result<AudioArtifact> {
        let video = VideoReference::parse(url)?;
        progress.reset();

        let audio_path = self.cache.audio_path(&video);
        if !force && self.cache.has_audio(&video) {
            info!(video = %video, "audio already cached, skipping download");
            return Ok(AudioArtifact {
                video,
                path: audio_path,
            });
        }

        fs::create_dir_all(self.cache.video_dir(&video)).await?;

        let on_update = |update: crate::download::DownloadUpdate| {
            progress.downloading(update.downloaded_bytes, update.best_total());
        };
        if let Err(err) = self.downloader.download(url, &audio_path, &on_update).await {
            progress.reset();
            return Err(err);
        }

        if !audio_path.exists() {
            progress.reset();
            return Err(PostcastError::DownloadFailed {
                url: url.to_string(),
                reason: format!(
                    "downloader produced no audio artifact at {}",
                    audio_path.display()
                ),
            });
        }

        Ok(AudioArtifact {
            video,
            path: audio_path,
        })
    }
}
