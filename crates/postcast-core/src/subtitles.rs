use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::Result;
use crate::types::Transcript;

/// Formats seconds as `HH:MM:SS.mmm`. Hours may exceed 24; milliseconds come
/// from the same div/mod arithmetic as the other fields, not separate
/// rounding.
pub fn format_timecode(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;
    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

/// Writes the transcript as an `.srt`-shaped UTF-8 file: 1-based index,
/// timecode line, text, blank separator. Returns the written path.
pub async fn export_srt(transcript: &Transcript, path: &Path) -> Result<PathBuf> {
    let mut out = String::new();
    for (i, seg) in transcript.segments.iter().enumerate() {
        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_timecode(seg.start),
            format_timecode(seg.end)
        ));
        out.push_str(seg.text.trim());
        out.push_str("\n\n");
    }
    fs::write(path, &out).await?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    #[test]
    fn timecodes_use_exact_div_mod_arithmetic() {
        assert_eq!(format_timecode(65.5), "00:01:05.500");
        assert_eq!(format_timecode(70.25), "00:01:10.250");
        assert_eq!(format_timecode(0.0), "00:00:00.000");
        assert_eq!(format_timecode(3661.001), "01:01:01.001");
    }

    #[test]
    fn hours_may_exceed_twenty_four() {
        assert_eq!(format_timecode(90_000.0), "25:00:00.000");
    }

    #[tokio::test]
    async fn writes_indexed_blocks_with_blank_separators() {
        let transcript = Transcript {
            segments: vec![
                Segment {
                    start: 65.5,
                    end: 70.25,
                    text: " first line".to_string(),
                },
                Segment {
                    start: 70.25,
                    end: 72.0,
                    text: " second line".to_string(),
                },
            ],
            language: "en".to_string(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtitles.srt");
        let written = export_srt(&transcript, &path).await.unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "1\n00:01:05.500 --> 00:01:10.250\nfirst line\n\n\
             2\n00:01:10.250 --> 00:01:12.000\nsecond line\n\n"
        );
    }
}
