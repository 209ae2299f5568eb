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

//! # Rejection Vocabulary
//!
//! The closed set of rejection tags and the per-pass counter map. Tag strings
//! are consumed by reporting tools and must not change.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::ZiStats;

const TAG_COUNT: usize = 14;

/// Why a record was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZiRejectionTag {
    ExcludedLanguage,
    TooShortText,
    LongMeanWordLength,
    TooMuchDigits,
    TooMuchNonAscii,
    GeneratedCode,
    #[serde(rename = "frequent_2_grams")]
    Frequent2Grams,
    #[serde(rename = "frequent_3_grams")]
    Frequent3Grams,
    #[serde(rename = "frequent_4_grams")]
    Frequent4Grams,
    TooLongMaxLineLength,
    TooLongAvgLineLength,
    TooShortAvgLineLength,
    XmlTag,
    /// Reserved for the comment-ratio check, which is disabled. Never produced.
    TooHighCommentsRatio,
}

impl ZiRejectionTag {
    /// Every tag, in reporting order.
    pub const ALL: [ZiRejectionTag; TAG_COUNT] = [
        ZiRejectionTag::ExcludedLanguage,
        ZiRejectionTag::TooShortText,
        ZiRejectionTag::LongMeanWordLength,
        ZiRejectionTag::TooMuchDigits,
        ZiRejectionTag::TooMuchNonAscii,
        ZiRejectionTag::GeneratedCode,
        ZiRejectionTag::Frequent2Grams,
        ZiRejectionTag::Frequent3Grams,
        ZiRejectionTag::Frequent4Grams,
        ZiRejectionTag::TooLongMaxLineLength,
        ZiRejectionTag::TooLongAvgLineLength,
        ZiRejectionTag::TooShortAvgLineLength,
        ZiRejectionTag::XmlTag,
        ZiRejectionTag::TooHighCommentsRatio,
    ];

    /// Stable snake_case name used in `stats` keys and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiRejectionTag::ExcludedLanguage => "excluded_language",
            ZiRejectionTag::TooShortText => "too_short_text",
            ZiRejectionTag::LongMeanWordLength => "long_mean_word_length",
            ZiRejectionTag::TooMuchDigits => "too_much_digits",
            ZiRejectionTag::TooMuchNonAscii => "too_much_non_ascii",
            ZiRejectionTag::GeneratedCode => "generated_code",
            ZiRejectionTag::Frequent2Grams => "frequent_2_grams",
            ZiRejectionTag::Frequent3Grams => "frequent_3_grams",
            ZiRejectionTag::Frequent4Grams => "frequent_4_grams",
            ZiRejectionTag::TooLongMaxLineLength => "too_long_max_line_length",
            ZiRejectionTag::TooLongAvgLineLength => "too_long_avg_line_length",
            ZiRejectionTag::TooShortAvgLineLength => "too_short_avg_line_length",
            ZiRejectionTag::XmlTag => "xml_tag",
            ZiRejectionTag::TooHighCommentsRatio => "too_high_comments_ratio",
        }
    }

    /// Tag for a repeated `n`-word shingle, if that size has one.
    pub fn frequent_ngrams(n: usize) -> Option<Self> {
        match n {
            2 => Some(ZiRejectionTag::Frequent2Grams),
            3 => Some(ZiRejectionTag::Frequent3Grams),
            4 => Some(ZiRejectionTag::Frequent4Grams),
            _ => None,
        }
    }

    /// Parses a tag from its [`as_str`](Self::as_str) name.
    ///
    /// # Returns
    ///
    /// `None` for names outside the vocabulary.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.as_str() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ZiRejectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running tally of rejections for one stream pass.
///
/// Starts at zero for every tag and only ever grows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiRejectionCounts {
    counts: [u64; TAG_COUNT],
}

impl ZiRejectionCounts {
    /// Creates a tally with every tag at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one rejection under `tag`.
    pub fn increment(&mut self, tag: ZiRejectionTag) {
        self.counts[tag.index()] += 1;
    }

    /// Number of rejections recorded under `tag`.
    pub fn get(&self, tag: ZiRejectionTag) -> u64 {
        self.counts[tag.index()]
    }

    /// Sum over all tags.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterates `(tag, count)` pairs in [`ZiRejectionTag::ALL`] order,
    /// zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (ZiRejectionTag, u64)> + '_ {
        ZiRejectionTag::ALL
            .iter()
            .map(move |tag| (*tag, self.counts[tag.index()]))
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: &ZiRejectionCounts) {
        for (slot, add) in self.counts.iter_mut().zip(other.counts.iter()) {
            *slot += add;
        }
    }

    /// Snapshot with an entry for every tag, zero or not.
    pub fn as_stats(&self) -> ZiStats {
        self.iter()
            .map(|(tag, count)| (tag.as_str().to_string(), count))
            .collect()
    }

    /// Overlays this snapshot onto `stats`; counter entries win on collision.
    pub fn overlay(&self, stats: &mut ZiStats) {
        for (tag, count) in self.iter() {
            stats.insert(tag.as_str().to_string(), count);
        }
    }

    /// JSON object form of [`as_stats`](Self::as_stats).
    pub fn as_json(&self) -> Value {
        serde_json::to_value(self.as_stats()).unwrap_or(Value::Null)
    }
}

impl Serialize for ZiRejectionCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_stats().serialize(serializer)
    }
}
