// Lexical Statistics
// Tokenization and stylometry metrics consumed by the text signals.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9_]+|[\u{4e00}-\u{9fff}]").expect("word regex")
    })
}

fn punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[，。！？.!?]").expect("punctuation regex"))
}

/// Tokenize into words (latin runs and single CJK chars).
pub fn tokenize(text: &str) -> Vec<&str> {
    word_re().find_iter(text).map(|m| m.as_str()).collect()
}

/// Split into sentences on terminal punctuation. Decimal points and
/// punctuation inside quotes do not split.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let chars: Vec<char> = text.chars().collect();
    let quote_chars: [char; 6] = ['"', '\u{201c}', '\u{201d}', '\'', '\u{2018}', '\u{2019}'];

    let mut sentences = Vec::new();
    let mut buffer = String::new();
    let mut in_quote = false;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        if quote_chars.contains(&ch) {
            in_quote = !in_quote;
        }

        if ['。', '！', '？', '.', '!', '?'].contains(&ch) && !in_quote {
            // Keep decimal numbers intact
            let is_decimal = ch == '.'
                && i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit();
            if !is_decimal {
                let sentence = buffer.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                buffer.clear();
            }
        }

        i += 1;
    }

    let remaining = buffer.trim().to_string();
    if !remaining.is_empty() {
        sentences.push(remaining);
    }

    sentences
}

// ============ Stylometry Metrics ============

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StylometryMetrics {
    pub ttr: f64,
    pub avg_sentence_len: f64,
    pub repeat_ratio: f64,
    pub ngram_repeat_rate: f64,
    pub punctuation_ratio: f64,
    pub word_count: usize,
}

/// Compute stylometry metrics for text. Empty or word-free text yields the
/// zero default.
pub fn compute_stylometry(text: &str) -> StylometryMetrics {
    if text.is_empty() {
        return StylometryMetrics::default();
    }

    let words = tokenize(text);
    let total_words = words.len();
    if total_words == 0 {
        return StylometryMetrics::default();
    }

    // Type-Token Ratio
    let unique_words: HashSet<&str> = words.iter().cloned().collect();
    let ttr = unique_words.len() as f64 / total_words as f64;

    // Average sentence length in chars
    let sentences = split_sentences(text);
    let avg_sentence_len = if sentences.is_empty() {
        text.chars().count() as f64
    } else {
        sentences.iter().map(|s| s.chars().count()).sum::<usize>() as f64
            / sentences.len() as f64
    };

    // Punctuation ratio over char length
    let punct_count = punct_re().find_iter(text).count();
    let char_len = text.chars().count().max(1) as f64;
    let punctuation_ratio = punct_count as f64 / char_len;

    // Repeat ratio: fraction of vocab items occurring >= 3 times
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in &words {
        *freq.entry(*t).or_insert(0) += 1;
    }
    let repeat_ratio = freq.values().filter(|&&v| v >= 3).count() as f64 / freq.len().max(1) as f64;

    let ngram_repeat_rate = ngram_repeat_rate(&words, 3);

    StylometryMetrics {
        ttr,
        avg_sentence_len,
        repeat_ratio,
        ngram_repeat_rate,
        punctuation_ratio,
        word_count: total_words,
    }
}

fn ngram_repeat_rate(tokens: &[&str], n: usize) -> f64 {
    if n == 0 || tokens.len() < n + 1 {
        return 0.0;
    }
    let mut counts: HashMap<Vec<&str>, usize> = HashMap::new();
    let mut total = 0usize;
    for i in 0..=tokens.len().saturating_sub(n) {
        let key: Vec<&str> = tokens[i..i + n].to_vec();
        *counts.entry(key).or_insert(0) += 1;
        total += 1;
    }
    let repeats = counts.values().filter(|&&c| c >= 2).map(|&c| c - 1).sum::<usize>();
    repeats as f64 / total.max(1) as f64
}

/// Unigram-entropy perplexity proxy. A crude stand-in for model perplexity:
/// repetitive low-diversity text scores low, varied text scores high.
/// Bounded to [20, 300].
pub fn estimate_perplexity(text: &str) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 120.0;
    }

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in &tokens {
        *freq.entry(*t).or_insert(0) += 1;
    }

    let total = tokens.len() as f64;
    let entropy = -freq
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            p * (p + 1e-12).ln()
        })
        .sum::<f64>();

    let ppl_uni = entropy.exp();
    let ppl_scaled = 20.0 + ((ppl_uni - 1.0) * 22.5).min(280.0);
    let distinct = freq.len() as f64;
    let diversity = distinct / total.max(1.0);
    let base = 120.0 - diversity * 60.0 + (text.chars().count() as f64) / 500.0;
    let val = 0.5 * ppl_scaled + 0.5 * base;
    let clamped = val.clamp(20.0, 300.0);
    (clamped * 100.0).round() / 100.0
}
