// Analysis module
// Model-backed reading of entries: feeling classification and growth insights

mod classifier;
mod insight;

pub use classifier::{Classification, EmotionClassifier};
pub use insight::{EmotionJourney, InsightGenerator, FALLBACK_INSIGHT};

/// Replies are asked to be bare JSON but often arrive fenced anyway.
/// Both parsers strip markdown fences before deserializing.
pub(crate) fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}
