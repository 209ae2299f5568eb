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

//! # Zistack Core Tests - Record
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test record
//! ```

use serde_json::json;
use zistack::{ZiCodeFilter, ZiError, ZiRecord, ZiStats};

/// Tests that a JSON line round-trips through a record with every field kept.
#[test]
fn test_record_from_jsonl_line() {
    let line = r#"{"text": "print('hi')", "lang": "Python", "max_stars_repo_name": "octo/hello", "size": 11}"#;
    let record = ZiRecord::from_value(serde_json::from_str(line).unwrap()).unwrap();

    assert_eq!(record.text, "print('hi')");
    assert_eq!(record.language(), "Python");
    assert!(record.stats.is_none());
    assert_eq!(record.extra.len(), 2);

    let value = record.into_value().unwrap();
    assert_eq!(value["max_stars_repo_name"], "octo/hello");
    assert_eq!(value["size"], 11);
    assert!(value.get("stats").is_none());
}

/// Tests that serde deserialization and `from_value` agree.
#[test]
fn test_record_serde_matches_from_value() {
    let value = json!({"text": "x", "stats": {"seen": 2}, "path": "a.rs"});
    let via_serde: ZiRecord = serde_json::from_value(value.clone()).unwrap();
    let via_helper = ZiRecord::from_value(value).unwrap();
    assert_eq!(via_serde, via_helper);
}

/// Tests the builder helpers.
#[test]
fn test_record_builders() {
    let record = ZiRecord::new("body")
        .with_lang("Go")
        .with_stats(ZiStats::from([("kept".to_string(), 1)]));
    assert_eq!(record.language(), "Go");
    assert_eq!(record.stats.unwrap()["kept"], 1);
    assert_eq!(ZiRecord::new("body").language(), "");
}

/// Tests that records without usable text are schema errors.
#[test]
fn test_record_schema_errors() {
    let err = ZiRecord::from_value(json!({"content": "x"})).unwrap_err();
    assert!(matches!(err, ZiError::Schema { .. }));
    assert!(err.to_string().contains("'text'"));

    let err = ZiRecord::from_value(json!({"text": "x", "lang": 3})).unwrap_err();
    assert!(matches!(err, ZiError::Schema { .. }));

    let err = ZiRecord::from_value(json!({"text": "x", "stats": [1, 2]})).unwrap_err();
    assert!(matches!(err, ZiError::Schema { .. }));
}

/// Tests that an explicit null label survives a filtering pass.
#[test]
fn test_null_lang_passes_through_filter() {
    let text = "fn main() {\n    run_app(parse_args());\n}\n// entry point of the tool";
    let record: ZiRecord =
        serde_json::from_value(json!({"text": text, "lang": null, "id": 7})).unwrap();
    assert_eq!(record.language(), "");

    let (kept, _) = ZiCodeFilter::new().filter_batch(vec![record]).unwrap();
    let value = kept[0].clone().into_value().unwrap();
    assert!(value["lang"].is_null());
    assert!(value.as_object().unwrap().contains_key("lang"));
    assert_eq!(value["id"], 7);
    assert_eq!(value["stats"]["xml_tag"], 0);
}

/// Tests that serde deserialization applies the record schema checks.
#[test]
fn test_serde_rejects_malformed_records() {
    let err = serde_json::from_value::<ZiRecord>(json!({"text": "x", "lang": 3})).unwrap_err();
    assert!(err.to_string().contains("lang"));
}
