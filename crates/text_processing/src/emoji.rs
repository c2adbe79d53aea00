//! Emoji stripping

use once_cell::sync::Lazy;
use regex::Regex;

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F600}-\x{1F64F}",
        r"\x{1F300}-\x{1F5FF}",
        r"\x{1F680}-\x{1F6FF}",
        r"\x{1F1E0}-\x{1F1FF}",
        r"\x{2702}-\x{27B0}",
        r"\x{24C2}-\x{1F251}",
        "]+",
    ))
    .unwrap()
});

/// Remove emoji and pictographs; whitespace is left in place
pub fn strip_emojis(text: &str) -> String {
    EMOJI.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emoji() {
        assert_eq!(strip_emojis("شكرا 🙏😀"), "شكرا ");
        assert_eq!(strip_emojis("✈️🇦🇪"), "");
    }

    #[test]
    fn test_emoji_only_body_becomes_blank() {
        assert!(strip_emojis("😀 🚀 ").trim().is_empty());
    }

    #[test]
    fn test_arabic_and_digits_untouched() {
        let text = "أريد رحلة إلى دبي 2";
        assert_eq!(strip_emojis(text), text);
    }
}
