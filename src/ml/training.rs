// Training for the learned NER model
// Averaged perceptron over BIO-tagged sentences read from CoNLL-style files

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use log::{debug, info};

use super::ner_model::{best_label_for, token_features, ModelMetadata, NerModel, OUTSIDE, START_LABEL};
use crate::utils::ExtractionError;

// Card-text sentences shipped with the crate so the learned stage works without a model file
const BUILTIN_CORPUS: &str = include_str!("../../data/ner_corpus.conll");
pub const BUILTIN_EPOCHS: usize = 10;

/// One annotated sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSentence {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

/// Parses `token TAG` lines; a blank line ends a sentence.
pub fn parse_conll(contents: &str) -> Result<Vec<TaggedSentence>, ExtractionError> {
    let mut sentences = Vec::new();
    let mut current = TaggedSentence { words: Vec::new(), tags: Vec::new() };

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if !current.words.is_empty() {
                sentences.push(std::mem::replace(
                    &mut current,
                    TaggedSentence { words: Vec::new(), tags: Vec::new() },
                ));
            }
            continue;
        }
        let mut parts = line.split_whitespace();
        let (word, tag) = match (parts.next(), parts.last()) {
            (Some(word), Some(tag)) => (word, tag),
            _ => {
                return Err(ExtractionError::TrainingError(format!(
                    "Line {}: expected `token TAG`, got `{}`",
                    line_no + 1,
                    line
                )))
            }
        };
        if tag != OUTSIDE && !tag.starts_with("B-") && !tag.starts_with("I-") {
            return Err(ExtractionError::TrainingError(format!(
                "Line {}: tag `{}` is not BIO encoded",
                line_no + 1,
                tag
            )));
        }
        current.words.push(word.to_string());
        current.tags.push(tag.to_string());
    }
    if !current.words.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

pub fn read_conll<P: AsRef<Path>>(path: P) -> Result<Vec<TaggedSentence>, ExtractionError> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        ExtractionError::TrainingError(format!("Failed to read {}: {}", path.as_ref().display(), e))
    })?;
    parse_conll(&contents)
}

/// Model trained from the bundled corpus, used when no model file is configured.
pub fn builtin_model() -> Result<NerModel, ExtractionError> {
    let sentences = parse_conll(BUILTIN_CORPUS)?;
    NerTrainer::new(BUILTIN_EPOCHS).train(&sentences)
}

/// Running sums needed to average weights without storing every update.
#[derive(Default)]
struct Accumulator {
    weights: HashMap<String, Vec<f64>>,
    totals: HashMap<String, Vec<f64>>,
    stamps: HashMap<String, Vec<usize>>,
}

impl Accumulator {
    fn update(&mut self, feature: &str, label: usize, delta: f64, step: usize, num_labels: usize) {
        let weights = self
            .weights
            .entry(feature.to_string())
            .or_insert_with(|| vec![0.0; num_labels]);
        let totals = self
            .totals
            .entry(feature.to_string())
            .or_insert_with(|| vec![0.0; num_labels]);
        let stamps = self
            .stamps
            .entry(feature.to_string())
            .or_insert_with(|| vec![0; num_labels]);

        totals[label] += (step - stamps[label]) as f64 * weights[label];
        stamps[label] = step;
        weights[label] += delta;
    }

    fn averaged(mut self, step: usize) -> HashMap<String, Vec<f64>> {
        let mut averaged = HashMap::with_capacity(self.weights.len());
        for (feature, weights) in self.weights.drain() {
            let totals = &self.totals[&feature];
            let stamps = &self.stamps[&feature];
            let avg: Vec<f64> = weights
                .iter()
                .enumerate()
                .map(|(label, weight)| {
                    let total = totals[label] + (step - stamps[label]) as f64 * weight;
                    if step > 0 { total / step as f64 } else { 0.0 }
                })
                .collect();
            if avg.iter().any(|w| *w != 0.0) {
                averaged.insert(feature, avg);
            }
        }
        averaged
    }
}

pub struct NerTrainer {
    epochs: usize,
}

impl NerTrainer {
    pub fn new(epochs: usize) -> Self {
        Self { epochs }
    }

    pub fn train(&self, sentences: &[TaggedSentence]) -> Result<NerModel, ExtractionError> {
        if sentences.is_empty() {
            return Err(ExtractionError::TrainingError("No training sentences".to_string()));
        }
        if self.epochs == 0 {
            return Err(ExtractionError::TrainingError("Epochs must be at least 1".to_string()));
        }

        // Outside label first so untrained features fall back to it
        let mut labels: Vec<String> = sentences
            .iter()
            .flat_map(|s| s.tags.iter().cloned())
            .filter(|t| t != OUTSIDE)
            .collect();
        labels.sort();
        labels.dedup();
        labels.insert(0, OUTSIDE.to_string());
        let label_index: HashMap<&str, usize> =
            labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();

        let mut model = NerModel {
            labels: labels.clone(),
            weights: HashMap::new(),
            metadata: ModelMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                trained_at: Utc::now().to_rfc3339(),
                epochs: self.epochs,
                sentences: sentences.len(),
            },
        };
        let mut acc = Accumulator::default();
        let mut step = 0;

        for epoch in 0..self.epochs {
            let mut errors = 0;
            let mut seen = 0;
            for sentence in sentences {
                let words: Vec<&str> = sentence.words.iter().map(String::as_str).collect();
                let mut prev = START_LABEL.to_string();
                for (index, truth) in sentence.tags.iter().enumerate() {
                    let features = token_features(&words, index, &prev);
                    let guess = best_label_for(&acc.weights, labels.len(), &features);

                    let truth_index = label_index[truth.as_str()];
                    step += 1;
                    seen += 1;
                    if guess != truth_index {
                        errors += 1;
                        for feature in &features {
                            acc.update(feature, truth_index, 1.0, step, labels.len());
                            acc.update(feature, guess, -1.0, step, labels.len());
                        }
                    }
                    prev = labels[guess].clone();
                }
            }
            debug!("Epoch {}: {}/{} tokens mistagged", epoch + 1, errors, seen);
        }

        model.weights = acc.averaged(step);
        info!(
            "Trained NER model on {} sentences ({} labels, {} features)",
            sentences.len(),
            model.labels.len(),
            model.weights.len()
        );
        Ok(model)
    }
}
