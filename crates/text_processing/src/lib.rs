//! Text processing for the lead dialog
//!
//! This crate provides:
//! - **Intent Classification**: keyword-count scoring with a frustration override
//! - **Entity Extraction**: numbers, Spanish months, years and urgency
//! - **Keyword Tables**: built-in Spanish tables, replaceable from YAML
//!
//! # Example
//!
//! ```ignore
//! use lead_agent_text_processing::{EntityExtractor, IntentClassifier};
//!
//! let classifier = IntentClassifier::new();
//! let result = classifier.classify("Quiero cotizar mi casamiento");
//!
//! let entities = EntityExtractor::new().extract("marzo 2026");
//! assert_eq!(entities.approximate_date().as_deref(), Some("marzo 2026"));
//! ```

pub mod entities;
pub mod intent;

mod error;

pub use entities::{EntityExtractor, ExtractedEntities, Month};
pub use error::{Result, TextProcessingError};
pub use intent::{IntentClassifier, IntentKeywords, KeywordConfig, UrgencyKeywords};
