use crate::extraction::casing::HeuristicCasingStrategy;
use crate::extraction::learned::LearnedNerStrategy;
use crate::extraction::patterns::KeywordAnchorStrategy;
use crate::extraction::statistical::StatisticalNerStrategy;
use crate::ml::NerModel;
use crate::models::{NerConfig, RawText};
use crate::utils::ExtractionError;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameStage {
    KeywordAnchor,
    StatisticalNer,
    LearnedNer,
    HeuristicCasing,
}

impl fmt::Display for NameStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NameStage::KeywordAnchor => "keyword anchor",
            NameStage::StatisticalNer => "statistical NER",
            NameStage::LearnedNer => "learned NER",
            NameStage::HeuristicCasing => "heuristic casing",
        };
        f.write_str(name)
    }
}

/// One name-extraction strategy: a pure function of the normalized text.
/// `Ok(None)` means no candidate passed the strategy's acceptance check.
pub trait NameStrategy {
    fn stage(&self) -> NameStage;
    fn extract(&self, text: &RawText) -> Result<Option<String>, ExtractionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub value: String,
    pub stage: NameStage,
}

/// Ordered strategies; the first accepted candidate wins.
pub struct NameCascade {
    strategies: Vec<Box<dyn NameStrategy>>,
}

impl NameCascade {
    pub fn new(strategies: Vec<Box<dyn NameStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn from_config(config: &NerConfig, model: Option<Arc<NerModel>>) -> Self {
        let mut strategies: Vec<Box<dyn NameStrategy>> = vec![Box::new(KeywordAnchorStrategy)];
        if config.enable_statistical {
            strategies.push(Box::new(StatisticalNerStrategy));
        }
        if config.enable_learned {
            strategies.push(Box::new(LearnedNerStrategy::new(model)));
        }
        if config.enable_casing {
            strategies.push(Box::new(HeuristicCasingStrategy));
        }
        Self::new(strategies)
    }

    pub fn stages(&self) -> Vec<NameStage> {
        self.strategies.iter().map(|s| s.stage()).collect()
    }

    pub fn resolve(&self, text: &RawText) -> Option<NameMatch> {
        for strategy in &self.strategies {
            let stage = strategy.stage();
            match strategy.extract(text) {
                Ok(Some(value)) => {
                    info!("Name found by {} stage", stage);
                    return Some(NameMatch { value, stage });
                }
                Ok(None) => debug!("{} stage found no acceptable name", stage),
                // A failing stage counts as no result
                Err(e) => warn!("{} stage failed: {}", stage, e),
            }
        }
        debug!("Every name stage came up empty");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixed {
        stage: NameStage,
        result: Option<&'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl NameStrategy for Fixed {
        fn stage(&self) -> NameStage {
            self.stage
        }

        fn extract(&self, _text: &RawText) -> Result<Option<String>, ExtractionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.result.map(str::to_string))
        }
    }

    struct Broken;

    impl NameStrategy for Broken {
        fn stage(&self) -> NameStage {
            NameStage::LearnedNer
        }

        fn extract(&self, _text: &RawText) -> Result<Option<String>, ExtractionError> {
            Err(ExtractionError::ModelError("model exploded".to_string()))
        }
    }

    #[test]
    fn test_first_success_short_circuits() {
        let later_calls = Rc::new(Cell::new(0));
        let cascade = NameCascade::new(vec![
            Box::new(Fixed { stage: NameStage::KeywordAnchor, result: None, calls: Rc::new(Cell::new(0)) }),
            Box::new(Fixed { stage: NameStage::StatisticalNer, result: Some("Ravi Kumar"), calls: Rc::new(Cell::new(0)) }),
            Box::new(Fixed { stage: NameStage::HeuristicCasing, result: Some("Other Name"), calls: later_calls.clone() }),
        ]);

        let found = cascade.resolve(&RawText::new("anything")).unwrap();
        assert_eq!(found.value, "Ravi Kumar");
        assert_eq!(found.stage, NameStage::StatisticalNer);
        assert_eq!(later_calls.get(), 0);
    }

    #[test]
    fn test_failing_stage_falls_through() {
        let cascade = NameCascade::new(vec![
            Box::new(Broken),
            Box::new(Fixed { stage: NameStage::HeuristicCasing, result: Some("Asha Verma"), calls: Rc::new(Cell::new(0)) }),
        ]);
        let found = cascade.resolve(&RawText::new("x")).unwrap();
        assert_eq!(found.stage, NameStage::HeuristicCasing);
    }

    #[test]
    fn test_exhausted_cascade() {
        let cascade = NameCascade::new(vec![Box::new(Broken)]);
        assert_eq!(cascade.resolve(&RawText::new("x")), None);
    }

    #[test]
    fn test_default_order() {
        let cascade = NameCascade::from_config(&NerConfig::default(), None);
        assert_eq!(
            cascade.stages(),
            vec![
                NameStage::KeywordAnchor,
                NameStage::StatisticalNer,
                NameStage::LearnedNer,
                NameStage::HeuristicCasing,
            ]
        );
    }

    #[test]
    fn test_anchor_beats_later_stages() {
        let cascade = NameCascade::from_config(&NerConfig::default(), None);
        let found = cascade
            .resolve(&RawText::new("Government of India To J Smith DOB 01/01/1980 Priya Sharma"))
            .unwrap();
        assert_eq!(found.value, "J Smith");
        assert_eq!(found.stage, NameStage::KeywordAnchor);
    }

    #[test]
    fn test_single_token_anchor_falls_through() {
        let cascade = NameCascade::from_config(&NerConfig::default(), None);
        let found = cascade
            .resolve(&RawText::new("Name: Ravi 12/05/1990 issued to holder Priya Sharma"))
            .unwrap();
        assert_ne!(found.value, "Ravi");
        assert_eq!(found.value, "Priya Sharma");
        assert_eq!(found.stage, NameStage::StatisticalNer);
    }

    #[test]
    fn test_anchor_keeps_every_word_of_long_name() {
        let cascade = NameCascade::from_config(&NerConfig::default(), None);
        let found = cascade
            .resolve(&RawText::new("Name: Mohan Lal Verma DOB 01/01/1990 Male 1234 5678 9123"))
            .unwrap();
        assert_eq!(found.value, "Mohan Lal Verma");
        assert_eq!(found.stage, NameStage::KeywordAnchor);
    }

    #[test]
    fn test_casing_is_last_resort() {
        let config = NerConfig {
            enable_statistical: false,
            ..NerConfig::default()
        };
        let cascade = NameCascade::from_config(&config, None);
        let found = cascade.resolve(&RawText::new("Priya Sharma lives here")).unwrap();
        assert_eq!(found.value, "Priya Sharma");
        assert_eq!(found.stage, NameStage::HeuristicCasing);
    }
}
