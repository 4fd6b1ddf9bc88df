use crate::extraction::{NameStage, NameStrategy};
use crate::ml::{tokenize, Chunk, EntityLabel, NeChunker, PosTagger};
use crate::models::RawText;
use crate::utils::ExtractionError;

/// Tag, chunk, and take the first person chunk with at least two words.
pub struct StatisticalNerStrategy;

impl StatisticalNerStrategy {
    pub fn extract_person(text: &str) -> Option<String> {
        let tagged = PosTagger::tag(&tokenize(text));
        NeChunker::chunk(&tagged)
            .iter()
            .filter(|chunk| matches!(chunk, Chunk::Entity { label: EntityLabel::Person, .. }))
            .filter_map(Chunk::entity_text)
            .find(|entity| entity.split_whitespace().count() >= 2)
    }
}

impl NameStrategy for StatisticalNerStrategy {
    fn stage(&self) -> NameStage {
        NameStage::StatisticalNer
    }

    fn extract(&self, text: &RawText) -> Result<Option<String>, ExtractionError> {
        Ok(Self::extract_person(text.as_str()))
    }
}
