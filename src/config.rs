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

//! # Filter Configuration
//!
//! Thresholds of the code quality filter. The constants below are the
//! reference values; [`ZiFilterConfig::default`] is built from them and
//! reproduces the reference behaviour exactly.
//!
//! Configurations can be written as JSON (operator factory style) or YAML:
//!
//! ```yaml
//! excluded_languages: ["Text", "TeX"]
//! max_digit_ratio: 0.25
//! ngram_thresholds:
//!   - { n: 2, max_frequency: 0.2 }
//!   - { n: 3, max_frequency: 0.18 }
//! ```
//!
//! Omitted keys keep their reference value.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};

/// Language labels rejected outright. Matching is exact and case-sensitive.
pub const EXCLUDED_LANGUAGES: [&str; 3] = ["Text", "Jupyter Notebook", "TeX"];

/// Fewer words than this is `too_short_text`.
pub const MIN_WORDS: usize = 5;

/// Mean word length above this is `long_mean_word_length`.
pub const MAX_MEAN_WORD_LENGTH: f64 = 25.0;

/// Digit share of all characters above this is `too_much_digits`.
pub const MAX_DIGIT_RATIO: f64 = 0.3;

/// ASCII word share below this is `too_much_non_ascii`.
pub const MIN_ASCII_WORD_RATIO: f64 = 0.5;

/// Substrings of the lowercased text that mark generated code.
pub const GENERATED_CODE_MARKERS: [&str; 3] = ["generated code", "autogenerated", "auto-generated"];

/// `(n, max_frequency)` pairs, checked in this order.
pub const NGRAM_THRESHOLDS: [(usize, f64); 3] = [(2, 0.20), (3, 0.18), (4, 0.16)];

/// Longest non-empty line allowed.
pub const MAX_LINE_LENGTH: usize = 1000;

/// Mean non-empty line length above this is `too_long_avg_line_length`.
pub const MAX_MEAN_LINE_LENGTH: f64 = 150.0;

/// Mean non-empty line length below this is `too_short_avg_line_length`.
pub const MIN_MEAN_LINE_LENGTH: f64 = 5.0;

/// XML declaration searched for at the start of the original text.
pub const XML_DECLARATION_MARKER: &str = "<?xml version=";

/// Characters of the original text searched for [`XML_DECLARATION_MARKER`].
pub const XML_PREFIX_CHARS: usize = 100;

/// Shingle sizes that have a rejection tag.
pub const SUPPORTED_NGRAM_SIZES: [usize; 3] = [2, 3, 4];

/// Repetition threshold for one shingle size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiNgramRule {
    /// Shingle size in words.
    pub n: usize,
    /// Largest accepted share of the most common shingle.
    pub max_frequency: f64,
}

/// Thresholds of every check in the guard chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZiFilterConfig {
    /// Language labels rejected outright, matched exactly.
    pub excluded_languages: BTreeSet<String>,
    pub min_words: usize,
    pub max_mean_word_length: f64,
    pub max_digit_ratio: f64,
    pub min_ascii_word_ratio: f64,
    /// Lowercase substrings marking generated code.
    pub generated_markers: Vec<String>,
    /// Checked in order; the first exceeded rule names the rejection.
    pub ngram_thresholds: Vec<ZiNgramRule>,
    /// Longest accepted line, in characters.
    pub max_line_length: usize,
    pub max_mean_line_length: f64,
    pub min_mean_line_length: f64,
    pub xml_marker: String,
    /// Characters from the start searched for `xml_marker`.
    pub xml_prefix_chars: usize,
}

impl Default for ZiFilterConfig {
    fn default() -> Self {
        Self {
            excluded_languages: EXCLUDED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            min_words: MIN_WORDS,
            max_mean_word_length: MAX_MEAN_WORD_LENGTH,
            max_digit_ratio: MAX_DIGIT_RATIO,
            min_ascii_word_ratio: MIN_ASCII_WORD_RATIO,
            generated_markers: GENERATED_CODE_MARKERS.iter().map(|m| m.to_string()).collect(),
            ngram_thresholds: NGRAM_THRESHOLDS
                .iter()
                .map(|&(n, max_frequency)| ZiNgramRule { n, max_frequency })
                .collect(),
            max_line_length: MAX_LINE_LENGTH,
            max_mean_line_length: MAX_MEAN_LINE_LENGTH,
            min_mean_line_length: MIN_MEAN_LINE_LENGTH,
            xml_marker: XML_DECLARATION_MARKER.to_string(),
            xml_prefix_chars: XML_PREFIX_CHARS,
        }
    }
}

impl ZiFilterConfig {
    /// Parses and validates a JSON configuration object. `null` means defaults.
    pub fn from_value(config: &Value) -> Result<Self> {
        let parsed: Self = match config {
            Value::Null => Self::default(),
            Value::Object(_) => serde_json::from_value(config.clone()).map_err(|err| {
                ZiError::validation(format!("filter.code_quality config: {err}"))
            })?,
            _ => {
                return Err(ZiError::validation(
                    "filter.code_quality config must be object",
                ))
            }
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let parsed: Self = serde_yaml::from_str(source)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Loads a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::from_value(&serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(ZiError::validation(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Rejects thresholds the guard chain cannot evaluate meaningfully.
    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [
            ("max_digit_ratio", self.max_digit_ratio),
            ("min_ascii_word_ratio", self.min_ascii_word_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ZiError::validation(format!(
                    "{name} must be within [0, 1], got {ratio}"
                )));
            }
        }

        if self.ngram_thresholds.is_empty() {
            return Err(ZiError::validation("ngram_thresholds must not be empty"));
        }
        for rule in &self.ngram_thresholds {
            if !SUPPORTED_NGRAM_SIZES.contains(&rule.n) {
                return Err(ZiError::validation(format!(
                    "ngram size {} has no rejection tag; expected one of {:?}",
                    rule.n, SUPPORTED_NGRAM_SIZES
                )));
            }
            if !(0.0..=1.0).contains(&rule.max_frequency) {
                return Err(ZiError::validation(format!(
                    "ngram max_frequency for n={} must be within [0, 1], got {}",
                    rule.n, rule.max_frequency
                )));
            }
        }

        if self.min_mean_line_length > self.max_mean_line_length {
            return Err(ZiError::validation(format!(
                "min_mean_line_length {} exceeds max_mean_line_length {}",
                self.min_mean_line_length, self.max_mean_line_length
            )));
        }
        if self.max_mean_word_length <= 0.0 {
            return Err(ZiError::validation("max_mean_word_length must be positive"));
        }
        if self.generated_markers.iter().any(String::is_empty) {
            return Err(ZiError::validation("generated_markers must not contain empty strings"));
        }
        Ok(())
    }
}
