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

//! # Word Tokenizer
//!
//! Splits lowercased text into word-like tokens on runs of whitespace and the
//! punctuation that separates identifiers in source code
//! (`, ; ! . \ / = : ? - > <`). Single-character tokens survive only when
//! they are alphanumeric, so stray brackets and quotes never count as words.

use std::sync::OnceLock;

use regex::Regex;

/// Delimiter runs that separate words.
///
/// `\s` is widened with the information separators `\x1c`-`\x1f`, which
/// count as whitespace for line splitting as well.
pub const WORD_DELIMITER_PATTERN: &str = r"[\s\x1c-\x1f,;!.\\/=:?\-><]+";

static WORD_SPLITTER: OnceLock<Regex> = OnceLock::new();

fn word_splitter() -> &'static Regex {
    WORD_SPLITTER
        .get_or_init(|| Regex::new(WORD_DELIMITER_PATTERN).expect("word delimiter pattern is valid"))
}

/// Lowercases `text` and splits it into words.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_lowercase(&text.to_lowercase())
}

/// Splits text that is already lowercased.
///
/// The decision engine lowercases once and reuses the result for the
/// generated-code marker search.
pub fn tokenize_lowercase(lower: &str) -> Vec<String> {
    word_splitter()
        .split(lower)
        .filter(|word| keep_word(word))
        .map(str::to_string)
        .collect()
}

fn keep_word(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(only), None) => only.is_alphanumeric(),
        _ => true,
    }
}
