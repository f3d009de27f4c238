use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use tracing::{info, warn};

use crate::acquisition::AcquisitionStage;
use crate::agents::LanguageModel;
use crate::analysis::AnalysisStage;
use crate::cache::TranscriptCache;
use crate::chain::{AgentChain, ChainOutput};
use crate::download::Downloader;
use crate::error::{PostcastError, Result};
use crate::keywords::extract_topic;
use crate::language::Language;
use crate::progress::ProgressReporter;
use crate::transcribe::{Transcriber, TranscriptionStage};
use crate::types::{PipelineState, Sentiment, Transcript};
use crate::video::VideoReference;

/// Derived artifacts of the content pipeline. The topic is a suggestion the
/// user may edit before triggering post generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub summary: String,
    pub sentiment: Sentiment,
    pub topic: String,
}

/// Outcome of asking for analysis before a transcript exists: waiting is a
/// normal state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentStatus {
    Waiting,
    Ready(Analysis),
}

/// Top-level coordinator for the two user-triggered pipelines.
///
/// Holds every collaborator explicitly and owns the only state shared
/// between the pipelines: a [`PipelineState`] written as a whole by the
/// transcription run and read by the content run. Concurrent transcription
/// triggers for the same video are rejected with `PipelineBusy` rather than
/// queued or coalesced.
pub struct Pipeline {
    acquisition: AcquisitionStage,
    transcription: TranscriptionStage,
    analysis: AnalysisStage,
    chain: AgentChain,
    cache: TranscriptCache,
    state: Mutex<PipelineState>,
    in_flight: Mutex<HashSet<VideoReference>>,
}

impl Pipeline {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        transcriber: Arc<dyn Transcriber>,
        model: Arc<dyn LanguageModel>,
        cache: TranscriptCache,
    ) -> Self {
        Self {
            acquisition: AcquisitionStage::new(downloader, cache.clone()),
            transcription: TranscriptionStage::new(transcriber),
            analysis: AnalysisStage::new(model.clone()),
            chain: AgentChain::new(model),
            cache,
            state: Mutex::new(PipelineState::default()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn cache(&self) -> &TranscriptCache {
        &self.cache
    }

    /// Snapshot of the shared state record.
    pub fn state(&self) -> PipelineState {
        self.state_lock().clone()
    }

    /// Transcription pipeline: acquisition, then transcription, then an
    /// all-or-nothing state write. A cached transcript short-circuits both
    /// stages unless `force` is set. Stage failures reset the state and are
    /// surfaced typed to the caller.
    pub async fn run_transcription(
        &self,
        url: &str,
        language: Language,
        force: bool,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
    ) -> Result<Transcript> {
        let video = VideoReference::parse(url)?;
        let _guard = self.begin_run(&video)?;
        let progress = ProgressReporter::new(on_progress);

        match self.cached_or_fresh(url, &video, language, force, &progress).await {
            Ok(transcript) => {
                *self.state_lock() = PipelineState::complete(transcript.full_text());
                Ok(transcript)
            }
            Err(err) => {
                *self.state_lock() = PipelineState::default();
                Err(err)
            }
        }
    }

    async fn cached_or_fresh(
        &self,
        url: &str,
        video: &VideoReference,
        language: Language,
        force: bool,
        progress: &ProgressReporter,
    ) -> Result<Transcript> {
        if !force && self.cache.has_transcript(video) {
            let transcript = self.cache.load_transcript(video).await?;
            info!(video = %video, "transcript already cached, skipping download and inference");
            progress.finished();
            return Ok(transcript);
        }
        self.transcribe_fresh(url, video, language, force, progress).await
    }

    async fn transcribe_fresh(
        &self,
        url: &str,
        video: &VideoReference,
        language: Language,
        force: bool,
        progress: &ProgressReporter,
    ) -> Result<Transcript> {
        let artifact = self.acquisition.acquire(url, force, progress).await?;
        let transcript = self
            .transcription
            .transcribe(&artifact, language, progress)
            .await?;
        self.cache.save_transcript(video, &transcript).await?;
        Ok(transcript)
    }

    /// Content pipeline, first half: summary, sentiment and suggested topic
    /// over the completed transcript. Generative failures degrade to empty
    /// values here at the orchestrator boundary; `Waiting` is reported while
    /// no completed transcript exists.
    pub async fn analyze(&self, language: Language) -> ContentStatus {
        let state = self.state();
        if !state.is_completed() {
            return ContentStatus::Waiting;
        }
        let text = state.full_text();

        let summary = match self.analysis.summarize(text).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "summary unavailable");
                String::new()
            }
        };
        let sentiment = match self.analysis.classify_sentiment(text).await {
            Ok(sentiment) => sentiment,
            Err(err) => {
                warn!(error = %err, "sentiment unavailable");
                Sentiment::Unknown
            }
        };
        let topic = extract_topic(&summary, language, 2);

        ContentStatus::Ready(Analysis {
            summary,
            sentiment,
            topic,
        })
    }

    /// Content pipeline, second half: the explicit user trigger that runs
    /// the agent chain over the (possibly edited) topic.
    pub async fn generate_post(&self, topic: &str) -> ChainOutput {
        self.chain.run(topic, Local::now().date_naive()).await
    }

    fn begin_run(&self, video: &VideoReference) -> Result<InFlightGuard<'_>> {
        let mut in_flight = self.in_flight_lock();
        if !in_flight.insert(video.clone()) {
            return Err(PostcastError::PipelineBusy {
                video_id: video.id().to_string(),
            });
        }
        Ok(InFlightGuard {
            pipeline: self,
            video: video.clone(),
        })
    }

    fn state_lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn in_flight_lock(&self) -> MutexGuard<'_, HashSet<VideoReference>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Single-flight marker, removed when the run finishes on any path.
struct InFlightGuard<'a> {
    pipeline: &'a Pipeline,
    video: VideoReference,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.pipeline.in_flight_lock().remove(&self.video);
    }
}
