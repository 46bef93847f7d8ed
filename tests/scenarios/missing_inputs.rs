//! Test: missing inputs abort the run before the processor is invoked

use crate::helpers::*;
use serde_json::json;
use stageline::{Stage, StageOutput, ValueStore};

/// An absent input key fails the run without an invocation
#[test]
fn test_missing_input_is_caught_early() {
    let (processor, calls) = CountingProcessor::new(StageOutput::Single(json!(1)));
    let result = run_quiet(
        vec![Stage::new("Dummy", processor, &["missing"], &["out"])],
        ValueStore::new(),
    );

    assert!(!result.success);
    let failure = result.first_failure().unwrap();
    assert_eq!(failure.stage, "Dummy");
    assert_eq!(failure.message(), r#"Missing inputs: ["missing"]"#);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

/// The failure names every absent key, not just the first
#[test]
fn test_all_absent_keys_are_named() {
    let (processor, _calls) = CountingProcessor::new(StageOutput::Single(json!(1)));
    let result = run_quiet(
        vec![Stage::new("Dummy", processor, &["a", "b", "c"], &["out"])],
        ValueStore::new().with("b", 2),
    );

    assert!(!result.success);
    assert_eq!(
        result.first_failure().unwrap().message(),
        r#"Missing inputs: ["a", "c"]"#
    );
}

/// A retry budget never applies to structural errors
#[test]
fn test_missing_input_is_never_retried() {
    let (processor, calls) = CountingProcessor::new(StageOutput::Single(json!(1)));
    let result = run_quiet(
        vec![Stage::new("Dummy", processor, &["missing"], &["out"]).with_retries(5)],
        ValueStore::new(),
    );

    assert!(!result.success);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

/// A key produced by an earlier stage satisfies a later stage's input
#[test]
fn test_earlier_output_satisfies_later_input() {
    let (first, _) = CountingProcessor::new(StageOutput::Single(json!("produced")));
    let (second, second_calls) = CountingProcessor::new(StageOutput::Single(json!("done")));

    let result = run_quiet(
        vec![
            Stage::new("Produce", first, &[], &["link"]),
            Stage::new("Consume", second, &["link"], &["out"]),
        ],
        ValueStore::new(),
    );

    assert!(result.success);
    assert_eq!(second_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(result.values.get("out"), Some(&json!("done")));
}

/// Prior stages' outputs remain in the partial store on failure
#[test]
fn test_partial_store_reflects_committed_stages() {
    let (first, _) = CountingProcessor::new(StageOutput::Single(json!("kept")));
    let (second, _) = CountingProcessor::new(StageOutput::Single(json!("never")));

    let result = run_quiet(
        vec![
            Stage::new("Produce", first, &[], &["kept_key"]),
            Stage::new("Starve", second, &["absent"], &["never_key"]),
        ],
        ValueStore::new().with("seed", 1),
    );

    assert!(!result.success);
    assert_eq!(result.values.get("seed"), Some(&json!(1)));
    assert_eq!(result.values.get("kept_key"), Some(&json!("kept")));
    assert!(!result.values.contains("never_key"));
}
