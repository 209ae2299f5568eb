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

//! # Code Quality Filter
//!
//! Heuristic guard chain deciding whether a source-code record is fit for a
//! training corpus. Checks run in a fixed order and the first failing check
//! names the rejection:
//!
//! 1. excluded language label
//! 2. too few words
//! 3. mean word length
//! 4. digit density
//! 5. ASCII word share
//! 6. generated-code markers
//! 7. repeated 2-, 3- and 4-word shingles
//! 8. longest line
//! 9. mean line length (too long, then too short)
//! 10. XML declaration near the start
//!
//! The order matters: a record failing several checks is always reported under
//! the earliest one.
//!
//! ## Empty input
//!
//! Text that leaves a measurement undefined (no characters, no words, no
//! non-empty line) when that measurement is reached is a producer bug and is
//! reported as [`ZiError::Validation`] instead of being accepted or tagged.

use std::sync::OnceLock;

use serde_json::Value;

use crate::config::ZiFilterConfig;
use crate::errors::{Result, ZiError};
use crate::metrics::{
    ascii_word_ratio, digit_ratio, find_marker, marker_in_prefix, mean_word_length,
    top_ngram_frequency, ZiLineStats,
};
use crate::operator::ZiOperator;
use crate::operators::rejection::ZiRejectionTag;
use crate::operators::stream::{ZiFilterStream, ZiFilterSummary};
use crate::record::{ZiRecord, ZiRecordBatch};
use crate::tokenize::tokenize_lowercase;

/// Decision engine of the code quality filter.
#[derive(Clone, Debug, Default)]
pub struct ZiCodeFilter {
    config: ZiFilterConfig,
}

impl ZiCodeFilter {
    /// Filter with the reference thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter with custom thresholds; the configuration is validated first.
    pub fn with_config(config: ZiFilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Thresholds this filter applies.
    pub fn config(&self) -> &ZiFilterConfig {
        &self.config
    }

    /// Returns the rejection tag for `text`, or `None` if it passes every check.
    ///
    /// # Arguments
    ///
    /// - `text`: raw record content
    /// - `language`: the record's language label, `""` when unknown
    ///
    /// # Returns
    ///
    /// - `Ok(Some(tag))`: the first failing check
    /// - `Ok(None)`: the text passed every check
    /// - `Err(ZiError::Validation)`: a measurement reached by the chain is
    ///   undefined for this text
    pub fn classify(&self, text: &str, language: &str) -> Result<Option<ZiRejectionTag>> {
        let config = &self.config;

        if config.excluded_languages.contains(language) {
            return Ok(Some(ZiRejectionTag::ExcludedLanguage));
        }

        let lower = text.to_lowercase();
        let words = tokenize_lowercase(&lower);
        if words.len() < config.min_words {
            return Ok(Some(ZiRejectionTag::TooShortText));
        }

        let mean_length = defined(mean_word_length(&words), "mean word length")?;
        if mean_length > config.max_mean_word_length {
            return Ok(Some(ZiRejectionTag::LongMeanWordLength));
        }

        let digits = defined(digit_ratio(text), "digit ratio")?;
        if digits > config.max_digit_ratio {
            return Ok(Some(ZiRejectionTag::TooMuchDigits));
        }

        let ascii = defined(ascii_word_ratio(&words), "ascii word ratio")?;
        if ascii < config.min_ascii_word_ratio {
            return Ok(Some(ZiRejectionTag::TooMuchNonAscii));
        }

        if find_marker(&lower, &config.generated_markers).is_some() {
            return Ok(Some(ZiRejectionTag::GeneratedCode));
        }

        for rule in &config.ngram_thresholds {
            if top_ngram_frequency(&words, rule.n) > rule.max_frequency {
                let tag = ZiRejectionTag::frequent_ngrams(rule.n).ok_or_else(|| {
                    ZiError::internal(format!("no rejection tag for {}-word shingles", rule.n))
                })?;
                return Ok(Some(tag));
            }
        }

        let lines = ZiLineStats::compute(text).ok_or_else(|| {
            ZiError::validation("line statistics are undefined for text without non-empty lines")
        })?;
        if lines.max_length > config.max_line_length {
            return Ok(Some(ZiRejectionTag::TooLongMaxLineLength));
        }
        if lines.mean_length > config.max_mean_line_length {
            return Ok(Some(ZiRejectionTag::TooLongAvgLineLength));
        } else if lines.mean_length < config.min_mean_line_length {
            return Ok(Some(ZiRejectionTag::TooShortAvgLineLength));
        }

        if marker_in_prefix(text, &config.xml_marker, config.xml_prefix_chars) {
            return Ok(Some(ZiRejectionTag::XmlTag));
        }

        Ok(None)
    }

    /// Classifies a record by its `text` and `lang` (missing `lang` is `""`).
    pub fn classify_record(&self, record: &ZiRecord) -> Result<Option<ZiRejectionTag>> {
        self.classify(&record.text, record.language())
    }

    /// Starts a lazy filtering pass over `upstream` with fresh counters.
    pub fn stream<I>(&self, upstream: I) -> ZiFilterStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = ZiRecord>,
    {
        ZiFilterStream::new(self, upstream.into_iter())
    }

    /// Filters a batch, classifying records on the rayon pool.
    ///
    /// Counters and stats are folded in upstream order afterwards, so the
    /// output equals a sequential pass over the same batch. The first record
    /// that fails with an error aborts the batch.
    #[cfg(feature = "parallel")]
    pub fn apply_parallel(&self, batch: ZiRecordBatch) -> Result<(ZiRecordBatch, ZiFilterSummary)> {
        use rayon::prelude::*;

        let verdicts: Vec<Result<Option<ZiRejectionTag>>> = batch
            .par_iter()
            .map(|record| self.classify_record(record))
            .collect();

        let mut state = crate::operators::stream::ZiFilterState::new();
        let mut kept = Vec::new();
        for (record, verdict) in batch.into_iter().zip(verdicts) {
            if let Some(outcome) = state.admit(record, verdict) {
                kept.push(outcome?);
            }
        }
        Ok((kept, state.summary()))
    }

    /// Runs one pass over a batch and returns the survivors with the pass summary.
    pub fn filter_batch(&self, batch: ZiRecordBatch) -> Result<(ZiRecordBatch, ZiFilterSummary)> {
        let mut stream = self.stream(batch);
        let mut kept = Vec::new();
        for outcome in stream.by_ref() {
            kept.push(outcome?);
        }
        Ok((kept, stream.summary()))
    }
}

fn defined(value: Option<f64>, measurement: &str) -> Result<f64> {
    value.ok_or_else(|| ZiError::validation(format!("{measurement} is undefined for empty text")))
}

static DEFAULT_FILTER: OnceLock<ZiCodeFilter> = OnceLock::new();

/// Classifies `text` with the reference thresholds.
pub fn classify(text: &str, language: &str) -> Result<Option<ZiRejectionTag>> {
    DEFAULT_FILTER
        .get_or_init(ZiCodeFilter::new)
        .classify(text, language)
}

impl ZiOperator for ZiCodeFilter {
    fn name(&self) -> &'static str {
        "filter.code_quality"
    }

    fn apply(&self, batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
        self.stream(batch).collect()
    }
}

/// Factory that constructs [`ZiCodeFilter`] from JSON configuration.
pub fn code_quality_factory(config: &Value) -> Result<Box<dyn ZiOperator + Send + Sync>> {
    let config = ZiFilterConfig::from_value(config)?;
    Ok(Box::new(ZiCodeFilter::with_config(config)?))
}
