//! Text Normalization
//!
//! Handles common ASR errors and text preprocessing before command matching.

use std::collections::HashMap;

/// Normalizes spoken text to fix common recognition errors
pub struct TextNormalizer {
    /// Manual corrections from config, longest first
    corrections: Vec<(String, String)>,
}

impl TextNormalizer {
    /// Create a new text normalizer
    pub fn new(corrections: HashMap<String, String>) -> Self {
        let mut corrections: Vec<(String, String)> = corrections
            .into_iter()
            .map(|(from, to)| (from.to_lowercase(), to.to_lowercase()))
            .filter(|(from, _)| !from.trim().is_empty())
            .collect();
        // Longer phrases win over their own substrings
        corrections.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self { corrections }
    }

    /// Normalize text: lowercase, corrections, trimmed single-spaced words
    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.to_lowercase();

        for (from, to) in &self.corrections {
            if result.contains(from.as_str()) {
                result = result.replace(from.as_str(), to);
            }
        }

        result.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}
