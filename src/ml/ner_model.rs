// Learned named-entity recognizer
// Greedy BIO sequence tagger scored by a linear (averaged perceptron) model
// that is trained offline and shipped as a JSON artifact

use crate::ml::pos_tagger::tokenize;
use crate::utils::ExtractionError;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const OUTSIDE: &str = "O";
pub const START_LABEL: &str = "<START>";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    pub trained_at: String,
    pub epochs: usize,
    pub sentences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerModel {
    pub labels: Vec<String>,
    /// feature -> one weight per label, aligned with `labels`
    pub weights: HashMap<String, Vec<f64>>,
    pub metadata: ModelMetadata,
}

/// A labeled span in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Features for the word at `index`, given the label predicted for the word before it.
pub fn token_features(words: &[&str], index: usize, prev_label: &str) -> Vec<String> {
    let word = words[index];
    let lower = word.to_lowercase();
    let prev = if index > 0 { words[index - 1].to_lowercase() } else { "<s>".to_string() };
    let next = words
        .get(index + 1)
        .map(|w| w.to_lowercase())
        .unwrap_or_else(|| "</s>".to_string());

    vec![
        "bias".to_string(),
        format!("w={}", lower),
        format!("shape={}", word_shape(word)),
        format!("pre3={}", lower.chars().take(3).collect::<String>()),
        format!("suf3={}", suffix(&lower, 3)),
        format!("prev_w={}", prev),
        format!("next_w={}", next),
        format!("prev_label={}", prev_label),
        format!("prev_label+shape={}+{}", prev_label, word_shape(word)),
    ]
}

/// `Ravi` -> `Xx`, `1990` -> `d`, `12/05` -> `d/d`
fn word_shape(word: &str) -> String {
    let mut shape = String::new();
    for c in word.chars() {
        let class = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_ascii_digit() {
            'd'
        } else {
            c
        };
        if !shape.ends_with(class) {
            shape.push(class);
        }
    }
    shape
}

fn suffix(word: &str, len: usize) -> String {
    let count = word.chars().count();
    word.chars().skip(count.saturating_sub(len)).collect()
}

/// Index of the best scoring label; ties go to the earlier label.
pub(crate) fn best_label_for(
    weights: &HashMap<String, Vec<f64>>,
    num_labels: usize,
    features: &[String],
) -> usize {
    let mut scores = vec![0.0; num_labels];
    for feature in features {
        if let Some(feature_weights) = weights.get(feature) {
            for (score, weight) in scores.iter_mut().zip(feature_weights) {
                *score += weight;
            }
        }
    }
    let mut best = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = index;
        }
    }
    best
}

fn entity_type(label: &str) -> Option<(&str, bool)> {
    if let Some(kind) = label.strip_prefix("B-") {
        Some((kind, true))
    } else {
        label.strip_prefix("I-").map(|kind| (kind, false))
    }
}

impl NerModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExtractionError::ModelError(format!("Failed to read model {}: {}", path.display(), e))
        })?;
        let model: NerModel = serde_json::from_str(&contents).map_err(|e| {
            ExtractionError::ModelError(format!("Failed to parse model {}: {}", path.display(), e))
        })?;
        model.validate()?;
        info!(
            "Loaded NER model {} ({} labels, {} features, trained {})",
            path.display(),
            model.labels.len(),
            model.weights.len(),
            model.metadata.trained_at
        );
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExtractionError> {
        let json = serde_json::to_string(self)
            .map_err(|e| ExtractionError::ModelError(format!("Failed to serialize model: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ExtractionError> {
        if !self.labels.iter().any(|l| l == OUTSIDE) {
            return Err(ExtractionError::ModelError("Model has no outside label".to_string()));
        }
        if let Some(bad) = self.labels.iter().find(|l| *l != OUTSIDE && entity_type(l).is_none()) {
            return Err(ExtractionError::ModelError(format!("Label is not BIO encoded: {}", bad)));
        }
        if let Some((feature, _)) = self.weights.iter().find(|(_, w)| w.len() != self.labels.len()) {
            return Err(ExtractionError::ModelError(format!(
                "Weights for feature {} do not match {} labels",
                feature,
                self.labels.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn best_label(&self, features: &[String]) -> usize {
        best_label_for(&self.weights, self.labels.len(), features)
    }

    pub fn predict_tags(&self, words: &[&str]) -> Vec<String> {
        let mut tags = Vec::with_capacity(words.len());
        let mut prev = START_LABEL.to_string();
        for index in 0..words.len() {
            let features = token_features(words, index, &prev);
            let label = self.labels[self.best_label(&features)].clone();
            prev = label.clone();
            tags.push(label);
        }
        tags
    }

    /// Entity spans in document order, with offsets into `text`.
    pub fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let tokens = tokenize(text);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        let tags = self.predict_tags(&words);

        let mut spans = Vec::new();
        let mut current: Option<(String, usize, usize)> = None;

        for (token, tag) in tokens.iter().zip(&tags) {
            match entity_type(tag) {
                Some((kind, is_begin)) => {
                    let continues = !is_begin
                        && current.as_ref().map_or(false, |(open, _, _)| open == kind);
                    if continues {
                        if let Some((_, _, end)) = current.as_mut() {
                            *end = token.end;
                        }
                    } else {
                        if let Some(span) = current.take() {
                            spans.push(span);
                        }
                        current = Some((kind.to_string(), token.start, token.end));
                    }
                }
                None => {
                    if let Some(span) = current.take() {
                        spans.push(span);
                    }
                }
            }
        }
        if let Some(span) = current.take() {
            spans.push(span);
        }

        spans
            .into_iter()
            .map(|(label, start, end)| EntitySpan {
                label,
                start,
                end,
                text: text[start..end].to_string(),
            })
            .collect()
    }
}
