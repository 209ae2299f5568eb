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

//! # Zistack Operator Tests - Filter Stream
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test stream
//! ```

use proptest::prelude::*;
use serde_json::json;
use zistack::{
    ZiCodeFilter, ZiError, ZiFilterConfig, ZiFilteredSource, ZiRecord, ZiRejectionTag, ZiStats,
};

const PARAGRAPH: &str = "The parser reads each source file once and builds a compact syntax tree.\n\
Every node keeps a pointer to its parent so that later passes can walk upward.\n\
Errors are collected instead of thrown, which lets the tool report several problems at once.\n";

const SOURCE: &str = "fn main() {\n    run_app(parse_args());\n}\n// entry point of the tool";

fn run(filter: &ZiCodeFilter, records: Vec<ZiRecord>) -> Vec<ZiRecord> {
    filter
        .stream(records)
        .collect::<zistack::Result<Vec<_>>>()
        .unwrap()
}

/// Scenario: a clean record leaves with every counter at zero.
#[test]
fn test_clean_record_gets_zero_stats() {
    let kept = run(&ZiCodeFilter::new(), vec![ZiRecord::new(PARAGRAPH)]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].text, PARAGRAPH);

    let stats = kept[0].stats.as_ref().unwrap();
    assert_eq!(stats.len(), ZiRejectionTag::ALL.len());
    assert!(stats.values().all(|count| *count == 0));
    assert_eq!(stats["too_high_comments_ratio"], 0);
}

/// Scenario: a rejection before an acceptance shows up in its stats.
#[test]
fn test_counts_accumulate_across_records() {
    let kept = run(
        &ZiCodeFilter::new(),
        vec![
            ZiRecord::new("a b c"),
            ZiRecord::new(PARAGRAPH),
            ZiRecord::new(PARAGRAPH).with_lang("Text"),
            ZiRecord::new(SOURCE).with_lang("Rust"),
        ],
    );
    assert_eq!(kept.len(), 2);

    let first = kept[0].stats.as_ref().unwrap();
    assert_eq!(first["too_short_text"], 1);
    assert_eq!(first["excluded_language"], 0);

    let second = kept[1].stats.as_ref().unwrap();
    assert_eq!(second["too_short_text"], 1);
    assert_eq!(second["excluded_language"], 1);
}

/// Tests the merge rule between existing stats and counters.
#[test]
fn test_existing_stats_are_merged() {
    let existing = ZiStats::from([
        ("too_short_text".to_string(), 42),
        ("near_duplicates".to_string(), 3),
    ]);
    let kept = run(
        &ZiCodeFilter::new(),
        vec![
            ZiRecord::new("short"),
            ZiRecord::new(PARAGRAPH).with_stats(existing),
        ],
    );
    let stats = kept[0].stats.as_ref().unwrap();
    assert_eq!(stats["too_short_text"], 1);
    assert_eq!(stats["near_duplicates"], 3);
    assert_eq!(stats.len(), ZiRejectionTag::ALL.len() + 1);
}

/// Tests that each pass over the same source starts from zero.
#[test]
fn test_passes_do_not_share_counters() {
    let records = vec![ZiRecord::new("too short"), ZiRecord::new(PARAGRAPH)];
    let source = ZiFilteredSource::new(ZiCodeFilter::new(), records.clone());

    for _ in 0..2 {
        let kept: Vec<ZiRecord> = source.iter().map(Result::unwrap).collect();
        assert_eq!(kept[0].stats.as_ref().unwrap()["too_short_text"], 1);
    }
    for outcome in &source {
        assert_eq!(outcome.unwrap().stats.unwrap()["too_short_text"], 1);
    }

    let filter = ZiCodeFilter::new();
    for _ in 0..2 {
        let kept = run(&filter, records.clone());
        assert_eq!(kept[0].stats.as_ref().unwrap()["too_short_text"], 1);
    }
}

/// Tests that an unmeasurable record yields an error and the pass goes on.
#[test]
fn test_error_does_not_stop_the_pass() {
    let filter = ZiCodeFilter::with_config(ZiFilterConfig {
        min_words: 0,
        ..Default::default()
    })
    .unwrap();
    let mut stream = filter.stream(vec![
        ZiRecord::new(""),
        ZiRecord::new(PARAGRAPH),
    ]);

    assert!(matches!(
        stream.next(),
        Some(Err(ZiError::Validation { .. }))
    ));
    let kept = stream.next().unwrap().unwrap();
    assert!(kept.stats.unwrap().values().all(|count| *count == 0));
    assert!(stream.next().is_none());

    let summary = stream.summary();
    assert_eq!(summary.consumed, 2);
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.rejected, 0);
    assert_eq!(summary.failed, 1);
}

/// Tests the batch helper and its summary.
#[test]
fn test_filter_batch_summary() {
    let (kept, summary) = ZiCodeFilter::new()
        .filter_batch(vec![
            ZiRecord::new(PARAGRAPH),
            ZiRecord::new("x ".repeat(100)),
            ZiRecord::new(PARAGRAPH).with_lang("TeX"),
            ZiRecord::new(SOURCE),
        ])
        .unwrap();

    assert_eq!(kept.len(), 2);
    assert_eq!(summary.consumed, 4);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.counts.get(ZiRejectionTag::Frequent2Grams), 1);
    assert_eq!(summary.counts.get(ZiRejectionTag::ExcludedLanguage), 1);

    let encoded = serde_json::to_value(&summary).unwrap();
    assert_eq!(encoded["counts"]["frequent_2_grams"], 1);
}

/// Tests that JSON records keep their unknown fields through the filter.
#[test]
fn test_json_records_keep_extra_fields() {
    let inputs = vec![
        json!({"text": PARAGRAPH, "lang": "Markdown", "repo": "acme/parser"}),
        json!({"text": "tiny", "repo": "acme/other"}),
    ];
    let records = inputs
        .into_iter()
        .map(ZiRecord::from_value)
        .collect::<zistack::Result<Vec<_>>>()
        .unwrap();

    let kept = run(&ZiCodeFilter::new(), records);
    assert_eq!(kept.len(), 1);
    let value = kept[0].clone().into_value().unwrap();
    assert_eq!(value["repo"], "acme/parser");
    assert_eq!(value["lang"], "Markdown");
    assert_eq!(value["stats"]["too_short_text"], 0);
}

/// Tests that the parallel batch path matches a sequential pass.
#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let batch: Vec<ZiRecord> = (0..64)
        .map(|i| match i % 4 {
            0 => ZiRecord::new(PARAGRAPH),
            1 => ZiRecord::new("a b"),
            2 => ZiRecord::new(SOURCE).with_lang("Jupyter Notebook"),
            _ => ZiRecord::new(SOURCE),
        })
        .collect();

    let filter = ZiCodeFilter::new();
    let sequential = filter.filter_batch(batch.clone()).unwrap();
    let parallel = filter.apply_parallel(batch).unwrap();
    assert_eq!(sequential, parallel);
}

const POOL: [&str; 5] = [
    PARAGRAPH,
    SOURCE,
    "a b",
    "x x x x x x x x x x x x",
    "123456 654321 111111 222222 333333",
];

proptest! {
    /// Every accepted record sees counters at least as large as the one before.
    #[test]
    fn prop_stats_never_decrease(picks in prop::collection::vec(0usize..POOL.len(), 0..40)) {
        let records: Vec<ZiRecord> = picks.iter().map(|&i| ZiRecord::new(POOL[i])).collect();
        let filter = ZiCodeFilter::new();
        let mut stream = filter.stream(records);

        let mut previous: Option<ZiStats> = None;
        for outcome in stream.by_ref() {
            let stats = outcome.unwrap().stats.unwrap();
            if let Some(prev) = &previous {
                for tag in ZiRejectionTag::ALL {
                    prop_assert!(stats[tag.as_str()] >= prev[tag.as_str()]);
                }
            }
            previous = Some(stats);
        }

        let summary = stream.summary();
        prop_assert_eq!(summary.consumed, picks.len() as u64);
        prop_assert_eq!(summary.accepted + summary.counts.total(), summary.consumed);
        prop_assert_eq!(summary.counts.get(ZiRejectionTag::TooHighCommentsRatio), 0);
    }
}
