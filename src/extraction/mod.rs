pub mod cascade;
pub mod casing;
pub mod learned;
pub mod patterns;
pub mod statistical;

pub use cascade::{NameCascade, NameMatch, NameStage, NameStrategy};
pub use casing::HeuristicCasingStrategy;
pub use learned::LearnedNerStrategy;
pub use patterns::{FieldMatcher, KeywordAnchorStrategy, StructuredField, StructuredFields};
pub use statistical::StatisticalNerStrategy;
