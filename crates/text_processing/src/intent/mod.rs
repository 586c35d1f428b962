//! Keyword intent classification
//!
//! Scores every intent by counting how many of its phrases occur in the
//! lowercased message. Frustration phrases short-circuit to a human handoff.

mod keywords;

pub use keywords::{IntentKeywords, KeywordConfig, UrgencyKeywords};

use lead_agent_core::{Intent, IntentClassification};

/// Hits at which confidence saturates
const SATURATION_HITS: f32 = 3.0;

/// Keyword-count intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    keywords: KeywordConfig,
}

impl IntentClassifier {
    /// Classifier with the built-in Spanish tables
    pub fn new() -> Self {
        Self::with_keywords(KeywordConfig::default())
    }

    /// Classifier with custom tables (e.g. loaded from YAML)
    pub fn with_keywords(keywords: KeywordConfig) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordConfig {
        &self.keywords
    }

    fn normalize(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// Whether the message contains a frustration phrase
    pub fn is_frustrated(&self, text: &str) -> bool {
        let normalized = Self::normalize(text);
        self.keywords
            .frustration
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
    }

    /// Number of phrases of `intent` contained in the message
    pub fn score(&self, text: &str, intent: Intent) -> usize {
        let normalized = Self::normalize(text);
        Self::count_hits(&normalized, self.keywords.keywords_for(intent))
    }

    fn count_hits(normalized: &str, phrases: &[String]) -> usize {
        phrases
            .iter()
            .filter(|phrase| normalized.contains(phrase.as_str()))
            .count()
    }

    /// Classify a message
    ///
    /// Ties go to the intent listed first in the table.
    pub fn classify(&self, text: &str) -> IntentClassification {
        let normalized = Self::normalize(text);

        if self
            .keywords
            .frustration
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
        {
            tracing::debug!("Frustration phrase detected");
            return IntentClassification::new(Intent::ContactoHumano, 1.0);
        }

        let mut best: Option<(Intent, usize)> = None;
        for entry in &self.keywords.intents {
            if entry.intent == Intent::Fallback {
                continue;
            }
            let hits = Self::count_hits(&normalized, &entry.keywords);
            // Strict comparison keeps the earlier intent on ties
            if best.map_or(true, |(_, top)| hits > top) {
                best = Some((entry.intent, hits));
            }
        }

        match best {
            Some((intent, hits)) if hits > 0 => {
                let confidence = (hits as f32 / SATURATION_HITS).min(1.0);
                tracing::debug!(intent = %intent, hits, confidence, "Intent classified");
                IntentClassification::new(intent, confidence)
            },
            _ => IntentClassification::fallback(),
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
