// Tokenizer and lexicon-driven part-of-speech tagger
// Tags follow the Penn Treebank set; card labels are pinned to common-noun
// tags so they never merge into proper-noun runs

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(
        r"[A-Za-z]+(?:'[A-Za-z]+)*|[0-9]+(?:[/.:,\-][0-9]+)*|\S"
    ).unwrap();

    // Closed-class words and card labels
    pub static ref LEXICON: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        for word in ["the", "a", "an", "this", "that", "these", "those", "each", "every", "any"] {
            m.insert(word, "DT");
        }
        for word in [
            "of", "in", "on", "at", "for", "from", "by", "with", "under", "about",
            "into", "since", "as", "per", "via", "near", "after", "before",
        ] {
            m.insert(word, "IN");
        }
        m.insert("to", "TO");
        for word in ["and", "or", "but", "nor"] {
            m.insert(word, "CC");
        }
        for word in ["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them"] {
            m.insert(word, "PRP");
        }
        for word in ["my", "your", "his", "her", "its", "our", "their"] {
            m.insert(word, "PRP$");
        }
        for word in ["will", "can", "may", "shall", "must", "should", "would", "could"] {
            m.insert(word, "MD");
        }
        for word in ["is", "has", "does"] {
            m.insert(word, "VBZ");
        }
        for word in ["are", "have", "do", "am"] {
            m.insert(word, "VBP");
        }
        for word in ["was", "were", "had", "did"] {
            m.insert(word, "VBD");
        }
        m.insert("be", "VB");
        m.insert("not", "RB");
        // Labels printed on identity cards
        for word in [
            "name", "dob", "yob", "birth", "date", "year", "gender", "sex", "male",
            "female", "address", "father", "mother", "husband", "wife", "son",
            "daughter", "number", "no", "vid", "enrolment", "download", "issue",
            "mobile", "phone", "pin", "card", "signature", "holder", "holder's",
            "help", "www", "gov", "mera", "pehchan",
        ] {
            m.insert(word, "NN");
        }
        m
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Byte offsets into the source text
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: &'static str,
}

impl TaggedToken {
    pub fn word(&self) -> &str {
        &self.token.text
    }

    pub fn is_proper_noun(&self) -> bool {
        self.tag == "NNP" || self.tag == "NNPS"
    }
}

/// Splits text into word, number and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

pub struct PosTagger;

impl PosTagger {
    pub fn tag(tokens: &[Token]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|token| TaggedToken {
                token: token.clone(),
                tag: Self::tag_word(&token.text),
            })
            .collect()
    }

    pub fn tag_word(word: &str) -> &'static str {
        let lower = word.to_lowercase();
        if let Some(tag) = LEXICON.get(lower.as_str()) {
            return *tag;
        }

        let mut chars = word.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return "SYM",
        };

        if first.is_ascii_digit() {
            return "CD";
        }
        if !first.is_alphabetic() {
            return match first {
                ',' => ",",
                '.' | '!' | '?' => ".",
                ':' | ';' | '-' => ":",
                '(' | '[' | '{' => "(",
                ')' | ']' | '}' => ")",
                '$' => "$",
                '"' | '\'' => "''",
                _ => "SYM",
            };
        }
        if first.is_uppercase() {
            return if lower.len() > 3 && lower.ends_with('s') && word.chars().skip(1).all(|c| c.is_uppercase()) {
                "NNPS"
            } else {
                "NNP"
            };
        }

        if lower.ends_with("ly") {
            "RB"
        } else if lower.ends_with("ing") {
            "VBG"
        } else if lower.ends_with("ed") {
            "VBD"
        } else if lower.ends_with("ous") || lower.ends_with("ful") || lower.ends_with("able") {
            "JJ"
        } else if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
            "NNS"
        } else {
            "NN"
        }
    }
}
