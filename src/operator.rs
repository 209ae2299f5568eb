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

//! # Zistack Operator Module
//!
//! Batch seam shared with the rest of the data-preparation framework. An
//! operator receives a batch of records and returns the records that survive,
//! possibly rewritten.
//!
//! The code quality filter is primarily a lazy stream transformer (see
//! [`crate::operators::stream`]); implementing [`ZiOperator`] lets pipelines
//! that work batch-by-batch use it as one stage. Each `apply` call is one
//! independent filtering pass with its own rejection counters.
//!
//! ```rust
//! use zistack::operator::execute_operator;
//! use zistack::operators::code_filter::ZiCodeFilter;
//! use zistack::record::ZiRecord;
//!
//! let filter = ZiCodeFilter::new();
//! let batch = vec![ZiRecord::new("a b c")];
//! let kept = execute_operator(&filter, batch).unwrap();
//! assert!(kept.is_empty());
//! ```

use crate::errors::{Result, ZiError};
use crate::record::ZiRecordBatch;

/// Contract every batch operator fulfils.
pub trait ZiOperator: std::fmt::Debug {
    /// Unique, human-readable name used in logs, errors and factory lookup.
    fn name(&self) -> &'static str;

    /// Applies the operator to an incoming batch of records.
    ///
    /// The returned batch may be smaller than the input; record order is kept.
    fn apply(&self, batch: ZiRecordBatch) -> Result<ZiRecordBatch>;
}

/// Executes an operator and tags any error with the operator name.
pub fn execute_operator(operator: &dyn ZiOperator, batch: ZiRecordBatch) -> Result<ZiRecordBatch> {
    operator
        .apply(batch)
        .map_err(|err| ZiError::operator(operator.name(), err.to_string()))
}
