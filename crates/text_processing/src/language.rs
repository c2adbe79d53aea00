//! Script-based language detection
//!
//! Used only when a paused conversation is resumed, to pick the language of
//! the resume notice from the sender's last message.

use travel_desk_core::Lang;

/// Dominant script of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedScript {
    /// Arabic block (U+0600..=U+06FF)
    Arabic,
    /// ASCII letters
    Latin,
    /// No letters of either script
    Unknown,
}

/// Detection result with the raw counts
#[derive(Debug, Clone)]
pub struct LanguageDetection {
    pub primary_script: DetectedScript,
    pub arabic_letters: usize,
    pub latin_letters: usize,
}

impl LanguageDetection {
    /// Reply language; anything but a Latin majority answers in Arabic
    pub fn lang(&self) -> Lang {
        match self.primary_script {
            DetectedScript::Latin => Lang::En,
            DetectedScript::Arabic | DetectedScript::Unknown => Lang::Ar,
        }
    }
}

/// Counts letters per script
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> LanguageDetection {
        let arabic_letters = text.chars().filter(|c| Self::is_arabic_letter(*c)).count();
        let latin_letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();

        let primary_script = if arabic_letters == 0 && latin_letters == 0 {
            DetectedScript::Unknown
        } else if latin_letters > arabic_letters {
            DetectedScript::Latin
        } else {
            DetectedScript::Arabic
        };

        LanguageDetection {
            primary_script,
            arabic_letters,
            latin_letters,
        }
    }

    /// Language of the last user message; `None` (no history) means Arabic
    pub fn detect_lang(&self, last_message: Option<&str>) -> Lang {
        last_message
            .map(|text| self.detect(text).lang())
            .unwrap_or(Lang::Ar)
    }

    fn is_arabic_letter(c: char) -> bool {
        ('\u{0600}'..='\u{06FF}').contains(&c) && c.is_alphabetic()
    }
}
