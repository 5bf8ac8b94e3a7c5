// Integration tests for algorithm dispatch through the catalog

use stepviz::catalog::{
    generate, Algorithm, Category, GeneratedTrace, HashConfig, RunConfig, DEFAULT_DATA,
};
use stepviz::VizError;

#[test]
fn test_every_algorithm_generates_with_defaults() {
    for algorithm in Algorithm::ALL {
        let mut config = RunConfig::new(algorithm);
        if let Some((min, _)) = algorithm.input_range() {
            config = config.with_input(min);
        } else if algorithm.input_name().is_some() {
            config = config.with_input(DEFAULT_DATA[0]);
        }

        let trace = generate(&config).unwrap();
        assert!(!trace.is_empty(), "{} produced no steps", algorithm);
        assert_eq!(trace.narrative().len(), trace.len());
    }
}

#[test]
fn test_categories_cover_catalog() {
    let total: usize = Category::ALL
        .into_iter()
        .map(|c| Algorithm::in_category(c).count())
        .sum();
    assert_eq!(total, Algorithm::ALL.len());
    assert_eq!(Algorithm::in_category(Category::Sorting).count(), 5);
}

#[test]
fn test_unknown_algorithm() {
    let err = "bogo-sort".parse::<Algorithm>().unwrap_err();
    assert_eq!(
        err,
        VizError::UnknownAlgorithm {
            name: "bogo-sort".to_string()
        }
    );
    assert_eq!(err.to_string(), "unknown algorithm 'bogo-sort'");
}

#[test]
fn test_search_requires_target() {
    let config = RunConfig::new(Algorithm::LinearSearch);
    let err = generate(&config).unwrap_err();
    assert_eq!(err.to_string(), "missing input: search target");
}

#[test]
fn test_recursion_input_range() {
    let config = RunConfig::new(Algorithm::Fibonacci).with_input(11);
    let err = generate(&config).unwrap_err();
    assert_eq!(err.to_string(), "n must be between 0 and 10, got 11");

    let config = RunConfig::new(Algorithm::Factorial).with_input(5);
    let GeneratedTrace::Calls(trace) = generate(&config).unwrap() else {
        panic!("expected a call trace");
    };
    assert_eq!(trace.last().unwrap().state.event.result(), Some(120));
}

#[test]
fn test_hashing_uses_data_keys() {
    let config = RunConfig::new(Algorithm::HashChaining)
        .with_data(vec![1, 2, 3])
        .with_hash(HashConfig::new(5, "djb2"));
    let GeneratedTrace::Chaining(trace) = generate(&config).unwrap() else {
        panic!("expected a chaining trace");
    };
    assert_eq!(trace.count("insert-chaining"), 3);
    assert_eq!(trace.last().unwrap().state.table.len(), 5);
}

#[test]
fn test_lookup_runs_against_built_table() {
    let config = RunConfig::new(Algorithm::HashProbing)
        .with_data(vec![10, 20, 30])
        .with_lookup("key20");
    let GeneratedTrace::ProbingLookup(trace) = generate(&config).unwrap() else {
        panic!("expected a probing lookup trace");
    };
    assert_eq!(trace.first().unwrap().tag(), "search-start");
    assert_eq!(trace.last().unwrap().tag(), "found");

    let config = RunConfig::new(Algorithm::HashChaining).with_lookup("missing");
    let trace = generate(&config).unwrap();
    assert!(matches!(trace, GeneratedTrace::ChainingLookup(_)));
    assert_eq!(trace.tags().last(), Some(&"not-found"));
}

#[test]
fn test_dump_is_a_flat_step_array() {
    let config = RunConfig::new(Algorithm::BubbleSort).with_data(vec![2, 1]);
    let trace = generate(&config).unwrap();
    let json = serde_json::to_value(&trace).unwrap();

    let steps = json.as_array().unwrap();
    assert_eq!(steps.len(), trace.len());
    assert_eq!(steps[0]["kind"], "initialize");
    assert_eq!(steps[0]["array"], serde_json::json!([2, 1]));
    assert!(steps[0]["message"].is_string());
}

#[test]
fn test_narrative_block_layout() {
    let config = RunConfig::new(Algorithm::TowerOfHanoi).with_input(1);
    let blocks = generate(&config).unwrap().narrative();
    assert_eq!(blocks.len(), 3);
    assert!(blocks[0].starts_with("#1    initial"));
    assert_eq!(blocks[1].lines().count(), 3);
}
