// Language processing behind the name-extraction stages:
// a lexicon tagger with an entity chunker, and a trainable sequence model

pub mod chunker;
pub mod ner_model;
pub mod pos_tagger;
pub mod training;

pub use chunker::{Chunk, EntityLabel, NeChunker};
pub use ner_model::{EntitySpan, NerModel};
pub use pos_tagger::{tokenize, PosTagger, TaggedToken, Token};
pub use training::{builtin_model, parse_conll, read_conll, NerTrainer, TaggedSentence};
