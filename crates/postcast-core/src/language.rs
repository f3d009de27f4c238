use std::fmt;

/// Transcription and analysis language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
}

const STOP_WORDS_PT: &[&str] = &[
    "a", "o", "as", "os", "de", "do", "da", "dos", "das", "em", "no", "na", "nos", "nas", "para",
    "com", "que", "e", "é", "um", "uma", "uns", "umas", "se", "por", "sobre",
];

const STOP_WORDS_EN: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "over", "after",
];

const STOP_WORDS_ES: &[&str] = &[
    "el", "la", "los", "las", "de", "del", "en", "y", "o", "que", "es", "un", "una", "unos",
    "unas", "para", "con", "por", "sobre",
];

impl Language {
    /// Two-letter code understood by Whisper.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn stop_words(&self) -> &'static [&'static str] {
        match self {
            Language::Pt => STOP_WORDS_PT,
            Language::En => STOP_WORDS_EN,
            Language::Es => STOP_WORDS_ES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
