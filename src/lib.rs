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

//! # Zistack Core Library
//!
//! Streaming quality filter for source-code corpora. Each record is run
//! through a fixed chain of heuristic checks; records failing a check are
//! dropped and counted under a single rejection tag, records passing all of
//! them are forwarded with the running rejection counts merged into their
//! `stats`.
//!
//! ## Module Overview
//!
//! - **record**: [`ZiRecord`], the sample flowing through the pipeline
//! - **tokenize**: word tokenizer used by every word-based check
//! - **metrics**: scalar text measurements (ratios, n-gram frequency, line lengths)
//! - **config**: reference thresholds and the serde-backed [`ZiFilterConfig`]
//! - **operators**: decision engine, rejection vocabulary and stream aggregator
//! - **operator**: batch operator trait shared with the wider framework
//! - **errors**: [`ZiError`] and the crate-wide [`Result`]
//!
//! ## Feature Flags
//!
//! - `parallel`: classify batches on the rayon thread pool
//!
//! ## Quick Start
//!
//! ```rust
//! use zistack::{ZiCodeFilter, ZiRecord};
//!
//! let filter = ZiCodeFilter::new();
//! let records = vec![
//!     ZiRecord::new("x = 1").with_lang("Python"),
//!     ZiRecord::new("Some prose").with_lang("Text"),
//! ];
//!
//! for record in filter.stream(records) {
//!     let record = record.unwrap();
//!     println!("{:?}", record.stats);
//! }
//! ```

pub mod config;
pub mod errors;
pub mod metrics;
pub mod operator;
pub mod operators;
pub mod record;
pub mod tokenize;

pub use config::{ZiFilterConfig, ZiNgramRule};
pub use errors::{Result, ZiError};
pub use metrics::{ZiLineStats, ZiTextMetrics};
pub use operator::{execute_operator, ZiOperator};
pub use operators::code_filter::{classify, code_quality_factory, ZiCodeFilter};
pub use operators::rejection::{ZiRejectionCounts, ZiRejectionTag};
pub use operators::stream::{ZiFilterStream, ZiFilterSummary, ZiFilteredSource};
pub use record::{ZiRecord, ZiRecordBatch, ZiStats};
pub use tokenize::tokenize;
