//! Text processing for the travel desk assistant
//!
//! This crate provides the deterministic text utilities the dialogue engine
//! relies on:
//! - **Arabic normalization**: canonical form for equality/substring search
//! - **Emoji stripping**: the cleaned body used for the emptiness check
//! - **Language detection**: script counting (Arabic vs Latin), no model involved
//!
//! # Example
//!
//! ```
//! use travel_desk_text_processing::{normalize_arabic, strip_emojis};
//!
//! assert_eq!(normalize_arabic("القاهرة"), normalize_arabic("القاهره"));
//! assert_eq!(strip_emojis("مرحبا 😀").trim(), "مرحبا");
//! ```

pub mod arabic;
pub mod emoji;
pub mod language;

pub use arabic::{normalize_arabic, normalized_contains, normalized_eq};
pub use emoji::strip_emojis;
pub use language::{DetectedScript, LanguageDetection, ScriptDetector};
