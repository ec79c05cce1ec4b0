//! Keyword/phrase lexicon scoring for community notes and weather descriptions.
//!
//! Matching is case-insensitive substring search over whitespace-condensed text.
//! Phrases are checked first (longest first) and every occurrence of a matched
//! phrase is masked out, so neither a shorter phrase nor a single keyword can
//! score the same words twice. Keywords then add +1 (positive) or -1.2 (negative)
//! once each. No normalization happens here; callers get the raw delta.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Contribution of one matched positive keyword.
pub const POSITIVE_KEYWORD_DELTA: f64 = 1.0;
/// Contribution of one matched negative keyword. Cautions outweigh casual praise.
pub const NEGATIVE_KEYWORD_DELTA: f64 = -1.2;

const MASK: &str = "|";

static NOTE_LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../lexicon/notes.json");
    Lexicon::from_json(raw).expect("valid note lexicon")
});

static WEATHER_LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../lexicon/weather.json");
    Lexicon::from_json(raw).expect("valid weather lexicon")
});

/// A high-severity phrase and its fixed delta.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Phrase {
    pub phrase: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
}

/// Raw lexicon result split by source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LexiconScore {
    pub keyword: f64,
    pub phrase: f64,
}

impl LexiconScore {
    pub fn total(&self) -> f64 {
        self.keyword + self.phrase
    }
}

impl Lexicon {
    /// Built-in lexicon for community notes and incident descriptions.
    pub fn notes() -> &'static Lexicon {
        &NOTE_LEXICON
    }

    /// Built-in lexicon for short weather forecasts ("Thunderstorm", "Partly Sunny").
    pub fn weather() -> &'static Lexicon {
        &WEATHER_LEXICON
    }

    /// Parse a lexicon from JSON. Entries are lower-cased and phrases are
    /// ordered longest first; ties keep file order.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let mut lex: Lexicon = serde_json::from_str(raw)?;
        lex.positive = clean_terms(lex.positive);
        lex.negative = clean_terms(lex.negative);
        lex.phrases.retain(|p| !normalize(&p.phrase).is_empty());
        for p in lex.phrases.iter_mut() {
            p.phrase = normalize(&p.phrase);
        }
        lex.phrases
            .sort_by(|a, b| b.phrase.chars().count().cmp(&a.phrase.chars().count()));
        Ok(lex)
    }

    /// Score `text`. Empty text scores 0.
    pub fn score(&self, text: &str) -> LexiconScore {
        let mut masked = normalize(text);
        if masked.is_empty() {
            return LexiconScore::default();
        }

        let mut phrase = 0.0;
        for p in &self.phrases {
            if masked.contains(p.phrase.as_str()) {
                phrase += p.delta;
                masked = masked.replace(p.phrase.as_str(), MASK);
            }
        }

        let positives = self
            .positive
            .iter()
            .filter(|k| masked.contains(k.as_str()))
            .count() as f64;
        let negatives = self
            .negative
            .iter()
            .filter(|k| masked.contains(k.as_str()))
            .count() as f64;

        LexiconScore {
            keyword: positives * POSITIVE_KEYWORD_DELTA + negatives * NEGATIVE_KEYWORD_DELTA,
            phrase,
        }
    }

    /// Convenience: combined keyword + phrase delta.
    pub fn delta(&self, text: &str) -> f64 {
        self.score(text).total()
    }
}

fn clean_terms(terms: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(terms.len());
    for t in terms {
        let n = normalize(&t);
        if !n.is_empty() && !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Lower-case and condense runs of whitespace into one space.
fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(Lexicon::notes().score(""), LexiconScore::default());
        assert_eq!(Lexicon::notes().score("   \n\t"), LexiconScore::default());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let lex = Lexicon::notes();
        assert!(approx(lex.delta("WELL LIT and Calm"), 2.0));
        assert!(approx(lex.delta("Dark underpass"), -1.2));
    }

    #[test]
    fn each_keyword_counts_once() {
        assert!(approx(Lexicon::notes().delta("dark, dark, very dark"), -1.2));
    }

    #[test]
    fn phrase_masks_its_keywords_and_shorter_phrases() {
        let s = Lexicon::notes().score("almost got attacked near the bridge, otherwise well lit");
        assert!(approx(s.phrase, -4.0), "phrase={}", s.phrase);
        assert!(approx(s.keyword, 1.0), "keyword={}", s.keyword);
        assert!(approx(s.total(), -3.0));
    }

    #[test]
    fn felt_unsafe_is_a_phrase_not_a_keyword() {
        let s = Lexicon::notes().score("I felt   unsafe here");
        assert!(approx(s.phrase, -2.0));
        assert!(approx(s.keyword, 0.0));
    }

    #[test]
    fn weather_lexicon_is_separate() {
        let lex = Lexicon::weather();
        assert!(approx(lex.delta("Thunderstorm"), -2.4));
        assert!(approx(lex.delta("Sunny"), 1.0));
        // "dark" is a note keyword only.
        assert!(approx(lex.delta("dark"), 0.0));
    }

    #[test]
    fn custom_lexicon_orders_phrases_longest_first() {
        let raw = r#"{
            "positive": ["Nice", "nice", ""],
            "phrases": [
                {"phrase": "got hit", "delta": -1},
                {"phrase": "Almost Got Hit", "delta": -3}
            ]
        }"#;
        let lex = Lexicon::from_json(raw).unwrap();
        assert_eq!(lex.positive, vec!["nice".to_string()]);
        assert_eq!(lex.phrases[0].phrase, "almost got hit");
        assert!(approx(lex.delta("almost got hit, nice street"), -2.0));
    }
}
