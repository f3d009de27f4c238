use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PostcastError, Result};

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([\w-]+)")
        .expect("video URL pattern is valid")
});

/// Stable identifier parsed from a video URL.
///
/// Equivalent URLs (`youtube.com/watch?v=` and `youtu.be/` forms) map to the
/// same reference, which is why this and not the raw URL string is the cache
/// and idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoReference(String);

impl VideoReference {
    pub fn parse(url: &str) -> Result<Self> {
        VIDEO_URL
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| PostcastError::InvalidUrl {
                url: url.to_string(),
            })
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_urls_to_the_same_id() {
        let short = VideoReference::parse("https://youtu.be/abc123").unwrap();
        let long = VideoReference::parse("https://www.youtube.com/watch?v=abc123").unwrap();
        assert_eq!(short, long);
        assert_eq!(short.id(), "abc123");
    }

    #[test]
    fn parses_scheme_less_urls() {
        let video = VideoReference::parse("youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(video.id(), "dQw4w9WgXcQ");
    }

    #[test]
    fn rejects_non_video_urls() {
        let err = VideoReference::parse("https://example.com/watch?v=abc123").unwrap_err();
        assert!(matches!(err, PostcastError::InvalidUrl { .. }));
    }
}
