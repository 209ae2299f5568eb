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

//! # Filter Stream
//!
//! Lazy adapter that runs the code quality filter over an upstream iterator.
//! Rejected records are dropped and counted; every accepted record leaves with
//! its `stats` overlaid by the rejection counts observed so far in the pass.
//!
//! Each pass owns its counters. Starting another pass (another call to
//! [`ZiCodeFilter::stream`], or another iteration of a [`ZiFilteredSource`])
//! starts again from zero.
//!
//! ```rust
//! use zistack::operators::code_filter::ZiCodeFilter;
//! use zistack::record::ZiRecord;
//!
//! let filter = ZiCodeFilter::new();
//! let upstream = vec![ZiRecord::new("too short"), ZiRecord::new("fn main() {\n    run_app(parse_args());\n}\n// entry point of the tool")];
//! let kept: Vec<ZiRecord> = filter
//!     .stream(upstream)
//!     .collect::<zistack::Result<_>>()
//!     .unwrap();
//! assert_eq!(kept[0].stats.as_ref().unwrap()["too_short_text"], 1);
//! ```

use serde::Serialize;

use crate::errors::Result;
use crate::operators::code_filter::ZiCodeFilter;
use crate::operators::rejection::{ZiRejectionCounts, ZiRejectionTag};
use crate::record::ZiRecord;

/// Accounting of one filtering pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ZiFilterSummary {
    /// Records pulled from upstream.
    pub consumed: u64,
    /// Records yielded with merged stats.
    pub accepted: u64,
    /// Records dropped under a rejection tag.
    pub rejected: u64,
    /// Records whose text could not be measured.
    pub failed: u64,
    /// Per-tag breakdown of `rejected`.
    pub counts: ZiRejectionCounts,
}

/// Counters and bookkeeping owned by one pass.
#[derive(Debug, Default)]
pub(crate) struct ZiFilterState {
    counts: ZiRejectionCounts,
    consumed: u64,
    accepted: u64,
    failed: u64,
}

impl ZiFilterState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the verdict for one upstream record.
    ///
    /// Returns what the pass should yield for it: nothing for a rejection,
    /// the record with merged stats for an acceptance, the error otherwise.
    pub(crate) fn admit(
        &mut self,
        mut record: ZiRecord,
        verdict: Result<Option<ZiRejectionTag>>,
    ) -> Option<Result<ZiRecord>> {
        self.consumed += 1;
        match verdict {
            Ok(Some(tag)) => {
                self.counts.increment(tag);
                log::debug!("record #{} rejected: {}", self.consumed, tag);
                None
            }
            Ok(None) => {
                self.accepted += 1;
                self.counts.overlay(record.stats_mut());
                Some(Ok(record))
            }
            Err(err) => {
                self.failed += 1;
                log::warn!("record #{} could not be classified: {}", self.consumed, err);
                Some(Err(err))
            }
        }
    }

    pub(crate) fn counts(&self) -> &ZiRejectionCounts {
        &self.counts
    }

    pub(crate) fn summary(&self) -> ZiFilterSummary {
        ZiFilterSummary {
            consumed: self.consumed,
            accepted: self.accepted,
            rejected: self.counts.total(),
            failed: self.failed,
            counts: self.counts.clone(),
        }
    }
}

/// Iterator returned by [`ZiCodeFilter::stream`].
///
/// Pulls from upstream only until the next accepted (or failing) record.
#[derive(Debug)]
pub struct ZiFilterStream<'a, I> {
    filter: &'a ZiCodeFilter,
    upstream: I,
    state: ZiFilterState,
    exhausted: bool,
}

impl<'a, I> ZiFilterStream<'a, I>
where
    I: Iterator<Item = ZiRecord>,
{
    pub(crate) fn new(filter: &'a ZiCodeFilter, upstream: I) -> Self {
        Self {
            filter,
            upstream,
            state: ZiFilterState::new(),
            exhausted: false,
        }
    }

    /// Rejection counts observed so far in this pass.
    pub fn counts(&self) -> &ZiRejectionCounts {
        self.state.counts()
    }

    /// Accounting of this pass so far; final once the stream returns `None`.
    pub fn summary(&self) -> ZiFilterSummary {
        self.state.summary()
    }
}

impl<'a, I> Iterator for ZiFilterStream<'a, I>
where
    I: Iterator<Item = ZiRecord>,
{
    type Item = Result<ZiRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            let record = match self.upstream.next() {
                Some(record) => record,
                None => {
                    self.exhausted = true;
                    let summary = self.state.summary();
                    log::info!(
                        "code quality pass finished: consumed={} accepted={} rejected={} failed={}",
                        summary.consumed,
                        summary.accepted,
                        summary.rejected,
                        summary.failed
                    );
                    return None;
                }
            };
            let verdict = self.filter.classify_record(&record);
            if let Some(outcome) = self.state.admit(record, verdict) {
                return Some(outcome);
            }
        }
    }
}

/// A re-iterable source bound to a filter.
///
/// Every iteration clones the source and runs a new pass with zeroed counters.
#[derive(Clone, Debug)]
pub struct ZiFilteredSource<S> {
    filter: ZiCodeFilter,
    source: S,
}

impl<S> ZiFilteredSource<S>
where
    S: Clone + IntoIterator<Item = ZiRecord>,
{
    /// Binds `source` to `filter`.
    pub fn new(filter: ZiCodeFilter, source: S) -> Self {
        Self { filter, source }
    }

    /// Starts a new pass over a clone of the source.
    pub fn iter(&self) -> ZiFilterStream<'_, S::IntoIter> {
        self.filter.stream(self.source.clone())
    }
}

impl<'a, S> IntoIterator for &'a ZiFilteredSource<S>
where
    S: Clone + IntoIterator<Item = ZiRecord>,
{
    type Item = Result<ZiRecord>;
    type IntoIter = ZiFilterStream<'a, S::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
