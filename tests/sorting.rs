// Integration tests for the sorting step generators

use stepviz::sorting::{
    bubble_sort_steps, insertion_sort_steps, merge_sort_steps, quick_sort_steps,
    selection_sort_steps, SortEvent, SortSnapshot,
};
use stepviz::trace::Trace;

fn final_array(trace: &Trace<SortSnapshot>) -> Vec<i64> {
    trace.last().expect("trace is never empty").state.array.clone()
}

#[test]
fn test_bubble_sort_example() {
    let trace = bubble_sort_steps(&[5, 3, 8, 1]);

    assert_eq!(trace.first().unwrap().tag(), "initialize");
    assert_eq!(trace.last().unwrap().tag(), "complete");
    assert_eq!(final_array(&trace), vec![1, 3, 5, 8]);

    // First inversion is 5 > 3 at positions 0 and 1
    let first_swap = trace
        .iter()
        .find(|s| s.tag() == "swap")
        .expect("at least one swap");
    assert_eq!(first_swap.state.swapping(), &[0, 1]);
    assert_eq!(first_swap.state.array, vec![3, 5, 8, 1]);
}

#[test]
fn test_bubble_sort_step_counts() {
    let trace = bubble_sort_steps(&[5, 3, 8, 1]);

    // n-1 passes, each with n-1-i comparisons
    assert_eq!(trace.count("pass-start"), 3);
    assert_eq!(trace.count("compare"), 3 + 2 + 1);
    assert_eq!(trace.count("mark-sorted"), 3);
    assert_eq!(trace.count("swap"), 4);

    let complete = trace.last().unwrap();
    assert_eq!(complete.state.sorted, vec![0, 1, 2, 3]);
}

#[test]
fn test_bubble_sort_equal_values_never_swap() {
    let trace = bubble_sort_steps(&[2, 2, 2]);
    assert_eq!(trace.count("swap"), 0);
    assert_eq!(trace.count("compare"), 3);
}

#[test]
fn test_sequence_numbers_are_contiguous() {
    let trace = bubble_sort_steps(&[4, 1, 3]);
    for (i, step) in trace.iter().enumerate() {
        assert_eq!(step.sequence_number, i + 1);
    }
}

#[test]
fn test_empty_and_single_inputs() {
    let generators: [fn(&[i64]) -> Trace<SortSnapshot>; 5] = [
        bubble_sort_steps,
        selection_sort_steps,
        insertion_sort_steps,
        merge_sort_steps,
        quick_sort_steps,
    ];

    for generate in generators {
        for input in [&[][..], &[42][..]] {
            let trace = generate(input);
            assert!(!trace.is_empty());
            assert_eq!(trace.last().unwrap().tag(), "complete");
            assert_eq!(trace.count("compare"), 0);
            assert_eq!(final_array(&trace), input.to_vec());
        }
    }
}

#[test]
fn test_merge_and_quick_have_single_complete_for_trivial_input() {
    assert_eq!(merge_sort_steps(&[7]).tags(), vec!["complete"]);
    assert_eq!(quick_sort_steps(&[]).tags(), vec!["complete"]);
}

#[test]
fn test_selection_sort_no_swap_when_minimum_in_place() {
    let trace = selection_sort_steps(&[1, 3, 2]);
    assert_eq!(final_array(&trace), vec![1, 2, 3]);

    let first_decision = trace
        .iter()
        .find(|s| matches!(s.tag(), "swap" | "no-swap"))
        .unwrap();
    assert_eq!(first_decision.tag(), "no-swap");
    assert_eq!(trace.count("new-minimum"), 1);
    assert_eq!(trace.count("swap"), 1);
}

#[test]
fn test_insertion_sort_shift_and_insert() {
    let trace = insertion_sort_steps(&[3, 1, 2]);
    assert_eq!(final_array(&trace), vec![1, 2, 3]);

    // 1 goes to the front, 2 lands after 1
    assert_eq!(trace.count("insert-beginning"), 1);
    assert_eq!(trace.count("found-position"), 1);
    assert_eq!(trace.count("shift"), 2);

    let inserts: Vec<_> = trace
        .iter()
        .filter_map(|s| match s.state.event {
            SortEvent::Insert {
                insert_position,
                inserted_value,
            } => Some((insert_position, inserted_value)),
            _ => None,
        })
        .collect();
    assert_eq!(inserts, vec![(0, 1), (1, 2)]);
}

#[test]
fn test_merge_sort_structure() {
    let trace = merge_sort_steps(&[4, 3, 2, 1]);
    assert_eq!(trace.first().unwrap().tag(), "divide");
    assert_eq!(trace.first().unwrap().state.array, vec![4, 3, 2, 1]);
    assert_eq!(final_array(&trace), vec![1, 2, 3, 4]);

    // A range of length > 1 is divided once and merged once
    assert_eq!(trace.count("divide"), 3);
    assert_eq!(trace.count("merge"), 3);

    let last_merge = trace.iter().rev().find(|s| s.tag() == "merge").unwrap();
    assert_eq!(last_merge.state.range(), Some([0, 3]));
}

#[test]
fn test_merge_sort_is_stable_on_ties() {
    // Left element wins ties: equal values produce `≤` descriptions
    let trace = merge_sort_steps(&[2, 2]);
    let compare = trace.iter().find(|s| s.tag() == "compare").unwrap();
    assert!(compare.description.contains("left half"));
}

#[test]
fn test_quick_sort_pivots() {
    let trace = quick_sort_steps(&[3, 1, 2]);
    assert_eq!(trace.first().unwrap().tag(), "select-pivot");
    assert_eq!(trace.first().unwrap().state.pivot(), Some(2));
    assert_eq!(final_array(&trace), vec![1, 2, 3]);

    let first_place = trace.iter().find(|s| s.tag() == "place-pivot").unwrap();
    assert_eq!(first_place.state.pivot(), Some(1));
    assert_eq!(first_place.state.array, vec![1, 2, 3]);
}

#[test]
fn test_input_is_not_mutated() {
    let input = vec![9, 4, 7];
    let _ = quick_sort_steps(&input);
    let _ = merge_sort_steps(&input);
    assert_eq!(input, vec![9, 4, 7]);
}

#[test]
fn test_snapshots_are_independent() {
    let trace = bubble_sort_steps(&[2, 1]);
    let mut copy = trace.first().unwrap().clone();
    copy.state.array[0] = 100;
    assert_eq!(trace.first().unwrap().state.array, vec![2, 1]);
}

#[test]
fn test_serialized_kind_tags() {
    let trace = selection_sort_steps(&[2, 1]);
    let json = serde_json::to_value(&trace).unwrap();
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, trace.tags());
    assert_eq!(json[0]["sequence_number"], 1);
}
