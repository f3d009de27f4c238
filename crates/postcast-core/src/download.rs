use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::error::{PostcastError, Result};

/// One progress event from the download collaborator. yt-dlp reports either
/// an exact total or an estimate, sometimes neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadUpdate {
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
    pub total_bytes_estimate: Option<u64>,
}

impl DownloadUpdate {
    /// Best available denominator for a progress percentage.
    pub fn best_total(&self) -> Option<u64> {
        self.total_bytes.or(self.total_bytes_estimate)
    }
}

/// External download collaborator: turns a video URL into a local audio file.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        on_update: &(dyn Fn(DownloadUpdate) + Send + Sync),
    ) -> Result<()>;
}

/// Downloads best-available audio via a yt-dlp subprocess, extracting to WAV.
///
/// Progress lines are requested with `--progress-template` and forwarded as
/// [`DownloadUpdate`]s while the process runs.
pub struct YtDlpDownloader;

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        on_update: &(dyn Fn(DownloadUpdate) + Send + Sync),
    ) -> Result<()> {
        // yt-dlp substitutes the extension during audio extraction
        let output_template = dest.with_extension("%(ext)s");
        let mut child = Command::new("yt-dlp")
            .arg(url)
            .arg("--extractor-args")
            .arg("youtube:player_client=android,web")
            .arg("-f")
            .arg("bestaudio/best")
            .arg("-x")
            .arg("--audio-format")
            .arg("wav")
            .arg("--audio-quality")
            .arg("192K")
            .arg("--newline")
            .arg("--progress-template")
            .arg(concat!(
                "download:progress ",
                "%(progress.downloaded_bytes)s ",
                "%(progress.total_bytes)s ",
                "%(progress.total_bytes_estimate)s",
            ))
            .arg("-o")
            .arg(&output_template)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                if let Some(update) = parse_progress_line(&line) {
                    on_update(update);
                }
            }
        }

        let status = child.wait().await?;
        let stderr_text = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            return Err(PostcastError::DownloadFailed {
                url: url.to_string(),
                reason: stderr_text,
            });
        }

        Ok(())
    }
}

/// Parses a `--progress-template` line. Missing fields arrive as "NA".
fn parse_progress_line(line: &str) -> Option<DownloadUpdate> {
    let rest = line.strip_prefix("progress ")?;
    let mut fields = rest.split_whitespace();
    let downloaded_bytes = fields.next()?.parse::<f64>().ok()? as u64;
    let total_bytes = fields.next().and_then(|v| v.parse::<f64>().ok()).map(|v| v as u64);
    let total_bytes_estimate = fields.next().and_then(|v| v.parse::<f64>().ok()).map(|v| v as u64);
    Some(DownloadUpdate {
        downloaded_bytes,
        total_bytes,
        total_bytes_estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_progress_line() {
        let update = parse_progress_line("progress 1024 2048 NA").unwrap();
        assert_eq!(update.downloaded_bytes, 1024);
        assert_eq!(update.total_bytes, Some(2048));
        assert_eq!(update.total_bytes_estimate, None);
        assert_eq!(update.best_total(), Some(2048));
    }

    #[test]
    fn estimate_is_the_fallback_total() {
        let update = parse_progress_line("progress 512 NA 4096.0").unwrap();
        assert_eq!(update.total_bytes, None);
        assert_eq!(update.best_total(), Some(4096));
    }

    #[test]
    fn ignores_unrelated_output_lines() {
        assert_eq!(parse_progress_line("[download] Destination: audio.wav"), None);
        assert_eq!(parse_progress_line("progress NA NA NA"), None);
    }
}
