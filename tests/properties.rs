// Property tests over generated traces

use proptest::prelude::*;

use stepviz::hashfn::HashFunction;
use stepviz::hashing::{
    hash_with_chaining_steps, hash_with_linear_probing_steps, lookup_chaining_steps, HashEvent,
    HashTable, LookupEvent,
};
use stepviz::recursion::{fibonacci_steps, tower_of_hanoi_steps, Peg};
use stepviz::searching::{binary_search_steps, linear_search_steps, SearchEvent};
use stepviz::sorting::{
    bubble_sort_steps, insertion_sort_steps, merge_sort_steps, quick_sort_steps,
    selection_sort_steps, SortSnapshot,
};
use stepviz::trace::{StepKind, Trace};

const SORTS: [fn(&[i64]) -> Trace<SortSnapshot>; 5] = [
    bubble_sort_steps,
    selection_sort_steps,
    insertion_sort_steps,
    merge_sort_steps,
    quick_sort_steps,
];

fn small_arrays() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..50, 0..12)
}

fn keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{0,6}", 0..12)
}

fn hash_function() -> impl Strategy<Value = HashFunction> {
    prop::sample::select(HashFunction::ALL.to_vec())
}

/// Shared envelope checks: 1-based contiguous numbering and a single
/// terminal step at the end.
fn check_envelope<K: StepKind>(trace: &Trace<K>) -> Result<(), TestCaseError> {
    prop_assert!(!trace.is_empty());
    for (i, step) in trace.iter().enumerate() {
        prop_assert_eq!(step.sequence_number, i + 1);
        prop_assert_eq!(step.is_terminal(), i + 1 == trace.len());
        prop_assert!(!step.message.is_empty());
    }
    Ok(())
}

fn fib(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a + b;
        a = b;
        b = next;
    }
    a
}

proptest! {
    #[test]
    fn prop_sorts_produce_sorted_permutation(input in small_arrays()) {
        let mut expected = input.clone();
        expected.sort();

        for generate in SORTS {
            let trace = generate(&input);
            check_envelope(&trace)?;
            let last = trace.last().unwrap();
            prop_assert_eq!(&last.state.array, &expected);
            prop_assert_eq!(last.tag(), "complete");
        }
    }

    #[test]
    fn prop_every_snapshot_is_a_permutation(input in small_arrays()) {
        let mut expected = input.clone();
        expected.sort();

        // Insertion sort holds a duplicate mid-shift, so it is left out
        for generate in [bubble_sort_steps, selection_sort_steps, quick_sort_steps] {
            for step in &generate(&input) {
                let mut values = step.state.array.clone();
                values.sort();
                prop_assert_eq!(&values, &expected);
            }
        }
    }

    #[test]
    fn prop_swaps_exchange_exactly_two_slots(input in small_arrays()) {
        for generate in [bubble_sort_steps, selection_sort_steps, quick_sort_steps] {
            let trace = generate(&input);
            for pair in trace.steps().windows(2) {
                let (before, after) = (&pair[0].state, &pair[1].state);
                if let [i, j] = *after.swapping() {
                    prop_assert!(i < input.len() && j < input.len());
                    let mut expected = before.array.clone();
                    expected.swap(i, j);
                    prop_assert_eq!(&after.array, &expected);
                }
            }
        }
    }

    #[test]
    fn prop_linear_search_finds_first_match(
        input in small_arrays(),
        target in -50i64..50,
    ) {
        let trace = linear_search_steps(&input, target, 0);
        check_envelope(&trace)?;

        match trace.last().unwrap().state.event {
            SearchEvent::Found { found_index, comparisons } => {
                prop_assert_eq!(input.iter().position(|&v| v == target), Some(found_index));
                prop_assert_eq!(comparisons, found_index + 1);
            }
            SearchEvent::NotFound { comparisons, .. } => {
                prop_assert!(!input.contains(&target));
                prop_assert_eq!(comparisons, input.len());
            }
            ref other => {
                prop_assert!(false, "unexpected final event {:?}", other);
            }
        }
    }

    #[test]
    fn prop_binary_search_is_correct_and_logarithmic(
        mut input in small_arrays(),
        target in -50i64..50,
    ) {
        input.sort();
        let trace = binary_search_steps(&input, target);
        check_envelope(&trace)?;

        // At most floor(log2 n) + 1 halvings
        let bound = (usize::BITS - input.len().leading_zeros()) as usize;
        let last = trace.last().unwrap();
        prop_assert!(last.state.comparisons().unwrap() <= bound);

        match last.state.event {
            SearchEvent::Found { found_index, .. } => {
                prop_assert_eq!(input[found_index], target);
            }
            _ => {
                prop_assert!(!input.contains(&target));
            }
        }
    }

    #[test]
    fn prop_hash_is_deterministic_and_in_range(
        key in "[ -~]{0,12}",
        size in 1usize..64,
        function in hash_function(),
    ) {
        let first = function.hash(&key, size).unwrap();
        let second = function.hash(&key, size).unwrap();
        prop_assert!(first.index < size);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_chaining_keeps_every_key(
        keys in keys(),
        size in 1usize..12,
        function in hash_function(),
    ) {
        let trace = hash_with_chaining_steps(&keys, size, function).unwrap();
        check_envelope(&trace)?;

        let table = &trace.last().unwrap().state.table;
        prop_assert_eq!(table.len(), size);
        prop_assert_eq!(table.element_count(), keys.len());
        prop_assert_eq!(trace.count("insert-chaining"), keys.len());

        for key in &keys {
            let lookup = lookup_chaining_steps(table, key, function).unwrap();
            check_envelope(&lookup)?;
            let found = matches!(lookup.last().unwrap().state.event, LookupEvent::Found { .. });
            prop_assert!(found);
        }
    }

    #[test]
    fn prop_probing_terminates_for_every_key(
        keys in keys(),
        size in 1usize..8,
        function in hash_function(),
    ) {
        let trace = hash_with_linear_probing_steps(&keys, size, function).unwrap();
        check_envelope(&trace)?;

        let settled = trace.count("insert-probing") + trace.count("table-full");
        prop_assert_eq!(settled, keys.len());

        for step in &trace {
            if let HashEvent::CollisionProbe { probe_count, .. } = step.state.event {
                prop_assert!(probe_count <= size);
            }
        }

        let last = &trace.last().unwrap().state;
        prop_assert!(last.table.element_count() <= size);
        if let HashEvent::Complete { placed, .. } = last.event {
            prop_assert_eq!(placed, last.table.element_count());
        }
    }

    #[test]
    fn prop_fibonacci_memo_is_consistent(n in 0u32..25) {
        let trace = fibonacci_steps(n).unwrap();
        check_envelope(&trace)?;

        prop_assert_eq!(trace.last().unwrap().state.event.result(), Some(fib(n)));
        for step in &trace {
            for (argument, value) in step.state.memo_entries() {
                prop_assert_eq!(value, fib(argument));
            }
        }
        // Each argument is expanded once; fib(1) never reaches fib(0)
        let expanded = if n == 1 { 1 } else { n + 1 };
        prop_assert_eq!(trace.count("call") as u32, expanded);
    }

    #[test]
    fn prop_hanoi_is_optimal(n in 1u32..9) {
        let trace = tower_of_hanoi_steps(n, Peg::A, Peg::C, Peg::B).unwrap();
        check_envelope(&trace)?;

        let moves = (1u64 << n) - 1;
        prop_assert_eq!(trace.last().unwrap().state.move_count, moves);
        prop_assert_eq!(trace.len(), (1usize << (n + 1)) - 1);
        prop_assert!(trace.iter().all(|s| s.state.towers.is_legal()));
    }
}
