//! Outbound translation
//!
//! Replies are authored in Arabic. For English sessions they go through a
//! [`Translator`]; [`localize`] falls back to the Arabic text on any failure
//! so delivery never blocks on translation.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use travel_desk_core::{GenerateRequest, Lang, LanguageModel};

use crate::prompts;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Translation returned no text")]
    EmptyOutput,
}

/// Arabic to English translation
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

/// Translator backed by a chat model
pub struct LlmTranslator {
    llm: Arc<dyn LanguageModel>,
}

impl LlmTranslator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        tracing::debug!(text_length = text.len(), "Translating text to English");

        let request = GenerateRequest::new(prompts::TRANSLATION_SYSTEM_PROMPT)
            .with_user_message(text)
            .with_temperature(prompts::TRANSLATION_TEMPERATURE);

        let response = self
            .llm
            .generate(request)
            .await
            .map_err(|e| TranslationError::Llm(e.to_string()))?;

        let translated = response.text.trim();
        if translated.is_empty() {
            return Err(TranslationError::EmptyOutput);
        }
        Ok(translated.to_string())
    }
}

/// Render `text` for `lang`, returning the source text if translation fails
pub async fn localize(translator: &dyn Translator, text: &str, lang: Lang) -> String {
    if lang == Lang::Ar {
        return text.to_string();
    }

    match translator.translate(text).await {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!(error = %e, "Translation failed, sending Arabic text");
            text.to_string()
        }
    }
}
