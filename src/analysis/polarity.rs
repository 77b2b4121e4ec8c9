//! Lexical sentiment polarity
//!
//! A purely lexical analyzer producing a polarity score in [-1, 1]. This is
//! one of the handcrafted scalar features; the learned classifier does the
//! heavy lifting, so the lexicon only needs to capture broad valence with
//! negation and intensifier handling.

use std::collections::HashMap;

/// Word-valence lexicon for social-media comment text
pub struct PolarityLexicon {
    /// Word to valence mapping
    words: HashMap<String, f32>,
    /// Negation words (flip the sign of the following sentiment word)
    negations: Vec<String>,
    /// Intensifier multipliers
    intensifiers: HashMap<String, f32>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    /// Create the default lexicon
    pub fn new() -> Self {
        let mut words = HashMap::new();

        let positive_words = [
            ("love", 0.8),
            ("amazing", 0.8),
            ("awesome", 0.8),
            ("great", 0.7),
            ("excellent", 0.8),
            ("fantastic", 0.8),
            ("wonderful", 0.7),
            ("beautiful", 0.6),
            ("perfect", 0.8),
            ("good", 0.5),
            ("nice", 0.5),
            ("cool", 0.5),
            ("best", 0.7),
            ("happy", 0.6),
            ("excited", 0.6),
            ("impressive", 0.6),
            ("stylish", 0.5),
            ("comfortable", 0.5),
            ("durable", 0.4),
            ("affordable", 0.4),
            ("recommend", 0.6),
            ("buying", 0.4),
            ("definitely", 0.3),
            ("finally", 0.3),
            ("quality", 0.3),
        ];

        let negative_words = [
            ("hate", -0.8),
            ("terrible", -0.8),
            ("awful", -0.8),
            ("horrible", -0.8),
            ("worst", -0.8),
            ("bad", -0.5),
            ("ugly", -0.6),
            ("weird", -0.4),
            ("cheap", -0.4),
            ("overpriced", -0.6),
            ("expensive", -0.4),
            ("disappointed", -0.7),
            ("disappointing", -0.7),
            ("scam", -0.9),
            ("fake", -0.7),
            ("useless", -0.7),
            ("broken", -0.6),
            ("waste", -0.7),
            ("boring", -0.5),
            ("annoying", -0.6),
            ("uncomfortable", -0.5),
            ("misleading", -0.7),
            ("regret", -0.6),
            ("refund", -0.5),
            ("never", -0.3),
        ];

        for (word, score) in positive_words {
            words.insert(word.to_string(), score);
        }
        for (word, score) in negative_words {
            words.insert(word.to_string(), score);
        }

        let negations = [
            "not", "no", "never", "nobody", "nothing", "cannot", "cant", "can't", "dont", "don't",
            "doesnt", "doesn't", "didnt", "didn't", "wont", "won't", "isnt", "isn't", "wasnt",
            "wasn't", "hardly", "barely",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let mut intensifiers = HashMap::new();
        intensifiers.insert("very".to_string(), 1.5);
        intensifiers.insert("really".to_string(), 1.4);
        intensifiers.insert("extremely".to_string(), 2.0);
        intensifiers.insert("super".to_string(), 1.5);
        intensifiers.insert("totally".to_string(), 1.5);
        intensifiers.insert("absolutely".to_string(), 1.8);
        intensifiers.insert("so".to_string(), 1.3);
        intensifiers.insert("slightly".to_string(), 0.5);
        intensifiers.insert("somewhat".to_string(), 0.7);
        intensifiers.insert("kinda".to_string(), 0.7);

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }

    /// Polarity of a text in [-1, 1]; 0.0 when no lexicon word matches
    pub fn polarity(&self, text: &str) -> f32 {
        let mut scores: Vec<f32> = Vec::new();

        let mut negate_next = false;
        let mut intensifier: f32 = 1.0;

        for raw in text.split_whitespace() {
            let word: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
                .to_lowercase();

            if word.is_empty() {
                continue;
            }

            if self.is_negation(&word) {
                negate_next = true;
                continue;
            }

            if let Some(&mult) = self.intensifiers.get(&word) {
                intensifier = mult;
                continue;
            }

            if let Some(&base) = self.words.get(&word) {
                let mut score = base;
                if negate_next {
                    score = -score;
                    negate_next = false;
                }
                score *= intensifier;
                intensifier = 1.0;
                scores.push(score);
            } else {
                negate_next = false;
                intensifier = 1.0;
            }
        }

        if scores.is_empty() {
            0.0
        } else {
            (scores.iter().sum::<f32>() / scores.len() as f32).clamp(-1.0, 1.0)
        }
    }

    /// Add a custom word to the lexicon
    pub fn add_word(&mut self, word: &str, score: f32) {
        self.words.insert(word.to_lowercase(), score);
    }
}
