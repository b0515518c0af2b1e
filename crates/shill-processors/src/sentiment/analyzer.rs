//! Lexicon and rule based sentiment scoring.
//!
//! Scores follow the VADER scheme: each token gets a valence from the
//! lexicon, adjusted for intensifiers, negation, capitalization and a
//! contrastive "but"; the summed valence is normalized into a compound score
//! in `[-1, 1]` and split into positive/negative/neutral proportions.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Intensifier increment.
const B_INCR: f64 = 0.293;
/// Dampener decrement.
const B_DECR: f64 = -0.293;
/// ALL-CAPS emphasis.
const C_INCR: f64 = 0.733;
/// Negation flips and dampens.
const N_SCALAR: f64 = -0.74;
/// Normalization constant approximating the maximum expected sum.
const ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

const BOOSTERS: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly", "deeply",
    "enormously", "entirely", "especially", "exceptionally", "extremely", "fabulously", "fully",
    "greatly", "hella", "highly", "hugely", "incredibly", "intensely", "majorly", "more", "most",
    "particularly", "purely", "quite", "really", "remarkably", "so", "substantially",
    "thoroughly", "totally", "tremendously", "unbelievably", "unusually", "utterly", "very",
];

const DAMPENERS: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sorta",
];

static LEXICON: LazyLock<HashMap<String, f64>> =
    LazyLock::new(|| parse_lexicon(include_str!("../../data/sentiment_lexicon.tsv")));

fn parse_lexicon(data: &str) -> HashMap<String, f64> {
    data.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (word, valence) = line.split_once('\t')?;
            Some((word.trim().to_lowercase(), valence.trim().parse().ok()?))
        })
        .collect()
}

/// Polarity breakdown for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl PolarityScores {
    /// `(name, value)` pairs in display order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("neg", self.neg),
            ("neu", self.neu),
            ("pos", self.pos),
            ("compound", self.compound),
        ]
    }
}

/// Sentiment scorer backed by the built-in valence lexicon.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentIntensityAnalyzer;

impl SentimentIntensityAnalyzer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Score a text.
    #[must_use]
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let words = tokenize(text);
        let is_cap_diff = is_cap_diff(&words);
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        let mut sentiments = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if booster_scalar(&lower[i]).is_some() {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence(&words, &lower, i, word, is_cap_diff));
        }

        but_check(&lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence(
        &self,
        words: &[&str],
        lower: &[String],
        i: usize,
        word: &str,
        is_cap_diff: bool,
    ) -> f64 {
        let Some(&base) = LEXICON.get(&lower[i]) else {
            return 0.0;
        };

        let mut valence = base;
        if is_cap_diff && is_upper(word) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for distance in 1..=3 {
            if i < distance {
                break;
            }
            let prev = i - distance;
            if LEXICON.contains_key(&lower[prev]) {
                continue;
            }

            let mut scalar = scalar_inc_dec(words[prev], &lower[prev], valence, is_cap_diff);
            if distance == 2 {
                scalar *= 0.95;
            } else if distance == 3 {
                scalar *= 0.9;
            }
            valence += scalar;

            if is_negation(&lower[prev]) {
                valence *= N_SCALAR;
            }
        }

        valence
    }
}

/// Split on whitespace, strip surrounding punctuation from words, and drop
/// single characters.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            // Short tokens are kept whole so emoticons survive.
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .filter(|w| w.chars().count() > 1)
        .collect()
}

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

/// True when some, but not all, words are ALL CAPS.
fn is_cap_diff(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_upper(w)).count();
    caps > 0 && caps < words.len()
}

fn is_negation(lower: &str) -> bool {
    let bare: String = lower.chars().filter(|c| *c != '\'').collect();
    NEGATIONS.contains(&bare.as_str()) || lower.contains("n't")
}

fn booster_scalar(lower: &str) -> Option<f64> {
    if BOOSTERS.contains(&lower) {
        Some(B_INCR)
    } else if DAMPENERS.contains(&lower) {
        Some(B_DECR)
    } else {
        None
    }
}

fn scalar_inc_dec(word: &str, lower: &str, valence: f64, is_cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster_scalar(lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if is_cap_diff && is_upper(word) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

/// Sentiment before "but" is halved, after it is boosted by half.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    let Some(but_index) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < but_index {
            *s *= 0.5;
        } else if i > but_index {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;

    let questions = text.matches('?').count();
    #[allow(clippy::cast_precision_loss)]
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * 0.18,
        _ => 0.96,
    };

    exclamations + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::default();
    }

    let punct = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
