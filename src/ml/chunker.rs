// Named-entity chunker over POS-tagged tokens
// Groups maximal proper-noun runs and labels them with gazetteer lookups

use crate::ml::pos_tagger::TaggedToken;
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fmt;

lazy_static! {
    static ref ORGANIZATION_WORDS: HashSet<&'static str> = [
        "government", "authority", "ministry", "department", "bank", "limited",
        "ltd", "corporation", "university", "college", "board", "office",
        "commission", "council", "uidai", "aadhaar", "aadhar", "unique",
        "identification", "republic", "income", "tax", "election",
    ].into_iter().collect();

    static ref PLACE_WORDS: HashSet<&'static str> = [
        "india", "bharat", "delhi", "new", "mumbai", "bombay", "kolkata",
        "calcutta", "chennai", "madras", "bengaluru", "bangalore", "hyderabad",
        "pune", "ahmedabad", "jaipur", "lucknow", "kanpur", "nagpur", "indore",
        "bhopal", "patna", "surat", "maharashtra", "karnataka", "kerala",
        "gujarat", "rajasthan", "punjab", "haryana", "bihar", "odisha",
        "telangana", "assam", "goa", "tamil", "nadu", "uttar", "pradesh",
        "madhya", "andhra", "west", "bengal",
    ].into_iter().collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Person,
    Organization,
    Gpe,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Gpe => "GPE",
        };
        f.write_str(label)
    }
}

/// One node of a chunked sentence: either a plain token or a labeled entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Token(TaggedToken),
    Entity {
        label: EntityLabel,
        tokens: Vec<TaggedToken>,
    },
}

impl Chunk {
    /// Entity words joined by single spaces
    pub fn entity_text(&self) -> Option<String> {
        match self {
            Chunk::Entity { tokens, .. } => Some(
                tokens
                    .iter()
                    .map(|t| t.word())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Chunk::Token(_) => None,
        }
    }
}

pub struct NeChunker;

impl NeChunker {
    pub fn chunk(tagged: &[TaggedToken]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut run: Vec<TaggedToken> = Vec::new();

        for token in tagged {
            if token.is_proper_noun() {
                run.push(token.clone());
                continue;
            }
            if !run.is_empty() {
                chunks.push(Self::label_run(std::mem::take(&mut run)));
            }
            chunks.push(Chunk::Token(token.clone()));
        }
        if !run.is_empty() {
            chunks.push(Self::label_run(run));
        }

        chunks
    }

    fn label_run(tokens: Vec<TaggedToken>) -> Chunk {
        let lowered: Vec<String> = tokens.iter().map(|t| t.word().to_lowercase()).collect();

        let label = if lowered.iter().any(|w| ORGANIZATION_WORDS.contains(w.as_str())) {
            EntityLabel::Organization
        } else if lowered.iter().all(|w| PLACE_WORDS.contains(w.as_str())) {
            EntityLabel::Gpe
        } else if tokens.len() == 1 && Self::is_acronym(tokens[0].word()) {
            EntityLabel::Organization
        } else {
            EntityLabel::Person
        };

        Chunk::Entity { label, tokens }
    }

    fn is_acronym(word: &str) -> bool {
        word.len() <= 5 && word.len() > 1 && word.chars().all(|c| c.is_ascii_uppercase())
    }
}
