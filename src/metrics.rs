//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Text Metrics
//!
//! Scalar measurements over raw text and its word tokens. Every length is
//! counted in characters, not bytes.
//!
//! Ratios and means over an empty input are undefined and come back as
//! `None`; callers decide whether that is an error.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use serde::Serialize;
use serde_json::Value;

use crate::config::ZiFilterConfig;
use crate::tokenize::tokenize_lowercase;

/// Arithmetic mean of word lengths.
pub fn mean_word_length(words: &[String]) -> Option<f64> {
    if words.is_empty() {
        return None;
    }
    let total: usize = words.iter().map(|w| w.chars().count()).sum();
    Some(total as f64 / words.len() as f64)
}

/// Characters whose Unicode numeric type is Decimal or Digit.
///
/// `\p{Nd}` covers the decimal digits of every script. The explicit ranges
/// are the Numeric_Type=Digit characters (superscripts, subscripts, circled
/// and parenthesized digits, Ethiopic and a few historic scripts). Fractions,
/// Roman numerals and other numeric symbols are not digits.
pub const DIGIT_PATTERN: &str = concat!(
    r"[\p{Nd}",
    r"\x{B2}\x{B3}\x{B9}\x{1369}-\x{1371}\x{19DA}",
    r"\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}",
    r"\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}",
    r"\x{24EA}\x{24F5}-\x{24FD}\x{24FF}",
    r"\x{2776}-\x{277E}\x{2780}-\x{2788}\x{278A}-\x{2792}",
    r"\x{10A40}-\x{10A43}\x{10E60}-\x{10E68}\x{11052}-\x{1105A}\x{1F100}-\x{1F10A}]",
);

static DIGIT: OnceLock<Regex> = OnceLock::new();

fn digit() -> &'static Regex {
    DIGIT.get_or_init(|| Regex::new(DIGIT_PATTERN).expect("digit pattern is valid"))
}

/// True for decimal digits in any script and for digit forms such as `²`.
pub fn is_digit(ch: char) -> bool {
    let mut buf = [0u8; 4];
    digit().is_match(ch.encode_utf8(&mut buf))
}

/// Share of characters in `text` that are digits (see [`is_digit`]).
pub fn digit_ratio(text: &str) -> Option<f64> {
    let total = text.chars().count();
    if total == 0 {
        return None;
    }
    let digits = digit().find_iter(text).count();
    Some(digits as f64 / total as f64)
}

/// Share of words made only of ASCII characters.
pub fn ascii_word_ratio(words: &[String]) -> Option<f64> {
    if words.is_empty() {
        return None;
    }
    let ascii = words.iter().filter(|w| w.is_ascii()).count();
    Some(ascii as f64 / words.len() as f64)
}

/// Returns the first marker found in `haystack`.
pub fn find_marker<'a>(haystack: &str, markers: &'a [String]) -> Option<&'a str> {
    markers
        .iter()
        .map(String::as_str)
        .find(|marker| haystack.contains(marker))
}

/// Occurrences of the most common `n`-word shingle divided by the word count.
///
/// Zero when there are fewer than `n` words.
pub fn top_ngram_frequency(words: &[String], n: usize) -> f64 {
    if n == 0 || words.len() < n {
        return 0.0;
    }
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    let mut top = 0usize;
    for shingle in words.windows(n) {
        let count = counts.entry(shingle).or_insert(0);
        *count += 1;
        top = top.max(*count);
    }
    top as f64 / words.len() as f64
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Lines of `text` with empty lines removed.
///
/// Recognises the same boundaries as universal-newline splitting: `\n`, `\r`,
/// `\r\n`, vertical tab, form feed, the file/group/record separators, NEL and
/// the Unicode line and paragraph separators.
pub fn non_empty_lines(text: &str) -> Vec<&str> {
    text.split(is_line_break)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Length statistics over the non-empty lines of a text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ZiLineStats {
    pub lines: usize,
    pub max_length: usize,
    pub mean_length: f64,
}

impl ZiLineStats {
    /// `None` when the text has no non-empty line.
    pub fn compute(text: &str) -> Option<Self> {
        let lines = non_empty_lines(text);
        if lines.is_empty() {
            return None;
        }
        let lengths: Vec<usize> = lines.iter().map(|line| line.chars().count()).collect();
        let max_length = lengths.iter().copied().max().unwrap_or(0);
        let total: usize = lengths.iter().sum();
        Some(ZiLineStats {
            lines: lengths.len(),
            max_length,
            mean_length: total as f64 / lengths.len() as f64,
        })
    }
}

/// True when `marker` occurs within the first `prefix_chars` characters.
pub fn marker_in_prefix(text: &str, marker: &str, prefix_chars: usize) -> bool {
    let end = text
        .char_indices()
        .nth(prefix_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    text[..end].contains(marker)
}

/// Every measurement the filter knows, computed eagerly.
///
/// The decision engine never builds this; it measures lazily and stops at the
/// first failing check. This snapshot exists for diagnostics and reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZiTextMetrics {
    pub chars: usize,
    pub words: usize,
    pub mean_word_length: Option<f64>,
    pub digit_ratio: Option<f64>,
    pub ascii_word_ratio: Option<f64>,
    pub generated_marker: Option<String>,
    /// Top shingle frequency per configured n, in configuration order.
    pub ngram_frequencies: Vec<(usize, f64)>,
    pub lines: Option<ZiLineStats>,
    pub xml_declaration: bool,
}

impl ZiTextMetrics {
    pub fn compute(text: &str, config: &ZiFilterConfig) -> Self {
        let lower = text.to_lowercase();
        let words = tokenize_lowercase(&lower);
        ZiTextMetrics {
            chars: text.chars().count(),
            words: words.len(),
            mean_word_length: mean_word_length(&words),
            digit_ratio: digit_ratio(text),
            ascii_word_ratio: ascii_word_ratio(&words),
            generated_marker: find_marker(&lower, &config.generated_markers).map(str::to_string),
            ngram_frequencies: config
                .ngram_thresholds
                .iter()
                .map(|rule| (rule.n, top_ngram_frequency(&words, rule.n)))
                .collect(),
            lines: ZiLineStats::compute(text),
            xml_declaration: marker_in_prefix(text, &config.xml_marker, config.xml_prefix_chars),
        }
    }

    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
