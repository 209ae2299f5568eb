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

//! # Zistack Record Module
//!
//! A [`ZiRecord`] is one sample flowing through the corpus pipeline: the raw
//! `text`, an optional `lang` label, optional `stats` contributed by earlier
//! stages, and any other fields the producer attached. The filter only reads
//! `text` and `lang` and only rewrites `stats`; everything else is carried
//! through untouched.
//!
//! ## Usage Example
//!
//! ```rust
//! use zistack::record::ZiRecord;
//! use serde_json::json;
//!
//! let record = ZiRecord::from_value(json!({
//!     "text": "fn main() {}",
//!     "lang": "Rust",
//!     "path": "src/main.rs",
//! }))
//! .unwrap();
//!
//! assert_eq!(record.language(), "Rust");
//! assert_eq!(record.extra["path"], "src/main.rs");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};

/// Counter name to count, as attached to records by pipeline stages.
pub type ZiStats = BTreeMap<String, u64>;

/// Fundamental data unit seen by the quality filter.
///
/// Deserialization goes through [`ZiRecord::from_value`], so both paths apply
/// the same schema checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ZiRecord {
    /// Raw record content.
    pub text: String,

    /// Language label assigned upstream. Absent labels behave as `""`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Statistics contributed by earlier pipeline stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ZiStats>,

    /// Every other field of the incoming record, passed through verbatim.
    ///
    /// An explicit `"lang": null` is kept here so that it is written back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ZiRecord {
    /// Constructs a record carrying only text.
    pub fn new(text: impl Into<String>) -> Self {
        ZiRecord {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Attaches a language label, replacing a null one carried in `extra`.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.extra.remove("lang");
        self.lang = Some(lang.into());
        self
    }

    /// Attaches upstream statistics.
    pub fn with_stats(mut self, stats: ZiStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Language label, with a missing label read as the empty string.
    pub fn language(&self) -> &str {
        self.lang.as_deref().unwrap_or("")
    }

    /// Returns a mutable reference to the stats map, creating it if necessary.
    pub fn stats_mut(&mut self) -> &mut ZiStats {
        self.stats.get_or_insert_with(ZiStats::new)
    }

    /// Builds a record from a JSON object.
    ///
    /// `text` must be a string. `lang` may be absent or null; a null `lang`
    /// reads as `""` and is written back as null. `stats` may be absent or
    /// null, otherwise it must map names to non-negative integers.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ZiError::schema(format!(
                    "record must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let text = match object.remove("text") {
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(ZiError::schema(format!(
                    "record field 'text' must be a string, got {}",
                    json_kind(&other)
                )))
            }
            None => return Err(ZiError::schema("record is missing field 'text'")),
        };

        let lang = match object.remove("lang") {
            None => None,
            Some(Value::Null) => {
                object.insert("lang".to_string(), Value::Null);
                None
            }
            Some(Value::String(lang)) => Some(lang),
            Some(other) => {
                return Err(ZiError::schema(format!(
                    "record field 'lang' must be a string, got {}",
                    json_kind(&other)
                )))
            }
        };

        let stats = match object.remove("stats") {
            None | Some(Value::Null) => None,
            Some(Value::Object(entries)) => {
                let mut stats = ZiStats::new();
                for (key, value) in entries {
                    let count = value.as_u64().ok_or_else(|| {
                        ZiError::schema(format!(
                            "stats entry '{key}' must be a non-negative integer"
                        ))
                    })?;
                    stats.insert(key, count);
                }
                Some(stats)
            }
            Some(other) => {
                return Err(ZiError::schema(format!(
                    "record field 'stats' must be an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(ZiRecord {
            text,
            lang,
            stats,
            extra: object,
        })
    }

    /// Serializes the record back into a JSON object.
    pub fn into_value(self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<Value> for ZiRecord {
    type Error = ZiError;

    fn try_from(value: Value) -> Result<Self> {
        ZiRecord::from_value(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convenience alias for working on batches of records.
pub type ZiRecordBatch = Vec<ZiRecord>;
