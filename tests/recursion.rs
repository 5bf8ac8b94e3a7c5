// Integration tests for the recursion traces: factorial, fibonacci, hanoi

use stepviz::recursion::{
    factorial_steps, fibonacci_steps, tower_of_hanoi_steps, Peg, RecursionEvent, MAX_DISKS,
    MAX_FACTORIAL,
};
use stepviz::VizError;

#[test]
fn test_factorial_zero() {
    let trace = factorial_steps(0).unwrap();
    assert_eq!(trace.tags(), vec!["call", "base-case", "complete"]);
    assert_eq!(trace.get(1).unwrap().state.event.result(), Some(1));
    assert_eq!(trace.last().unwrap().state.event.result(), Some(1));
}

#[test]
fn test_factorial_unwinds_in_order() {
    let trace = factorial_steps(3).unwrap();
    assert_eq!(
        trace.tags(),
        vec!["call", "call", "call", "base-case", "return", "return", "complete"]
    );

    let returns: Vec<(u32, u64)> = trace
        .iter()
        .filter_map(|s| match s.state.event {
            RecursionEvent::Return { argument, result } => Some((argument, result)),
            _ => None,
        })
        .collect();
    assert_eq!(returns, vec![(2, 2), (3, 6)]);
    assert!(trace.last().unwrap().state.memo.is_none());
}

#[test]
fn test_factorial_stack_depth() {
    let trace = factorial_steps(4).unwrap();
    for step in &trace {
        let stack = &step.state.call_stack;
        if let RecursionEvent::Call { argument, depth } = step.state.event {
            assert_eq!(stack.len(), depth + 1);
            assert_eq!(stack.last().unwrap().argument, argument);
        }
        for (i, frame) in stack.iter().enumerate() {
            assert_eq!(frame.depth, i);
        }
    }
    assert!(trace.last().unwrap().state.call_stack.is_empty());
}

#[test]
fn test_factorial_largest_supported() {
    let trace = factorial_steps(MAX_FACTORIAL).unwrap();
    assert_eq!(
        trace.last().unwrap().state.event.result(),
        Some(2_432_902_008_176_640_000)
    );

    let err = factorial_steps(MAX_FACTORIAL + 1).unwrap_err();
    assert!(matches!(err, VizError::InvalidArgument { .. }));
}

#[test]
fn test_fibonacci_small_trace() {
    let trace = fibonacci_steps(3).unwrap();
    assert_eq!(
        trace.tags(),
        vec![
            "call", // fib(3)
            "call", // fib(2)
            "call", // fib(1)
            "base-case",
            "call", // fib(0)
            "base-case",
            "return",   // fib(2)
            "memoized", // fib(1)
            "return",   // fib(3)
            "complete",
        ]
    );

    let last = trace.last().unwrap();
    assert_eq!(
        last.state.event,
        RecursionEvent::Complete {
            final_result: Some(2),
            fib_tree: true
        }
    );
    assert_eq!(last.state.memo_entries(), vec![(0, 0), (1, 1), (2, 1), (3, 2)]);
}

#[test]
fn test_fibonacci_memoized_values_match_memo() {
    let trace = fibonacci_steps(8).unwrap();
    for step in &trace {
        if let RecursionEvent::Memoized { argument, result } = step.state.event {
            let memo = step.state.memo.as_ref().unwrap();
            assert_eq!(memo.get(&argument), Some(&result));
        }
    }
    assert_eq!(trace.last().unwrap().state.event.result(), Some(21));
}

#[test]
fn test_fibonacci_base_cases() {
    assert_eq!(
        fibonacci_steps(0).unwrap().tags(),
        vec!["call", "base-case", "complete"]
    );
    assert_eq!(
        fibonacci_steps(1).unwrap().last().unwrap().state.event.result(),
        Some(1)
    );
}

#[test]
fn test_hanoi_three_disks() {
    let trace = tower_of_hanoi_steps(3, Peg::A, Peg::C, Peg::B).unwrap();
    let last = trace.last().unwrap();

    assert_eq!(trace.first().unwrap().tag(), "initial");
    assert_eq!(last.tag(), "complete");
    assert_eq!(last.state.move_count, 7);
    assert_eq!(trace.count("move"), 7);
    assert_eq!(trace.len(), 15);

    assert_eq!(last.state.towers.peg(Peg::C), &[3, 2, 1]);
    assert!(last.state.towers.peg(Peg::A).is_empty());
    assert!(last.state.towers.peg(Peg::B).is_empty());
}

#[test]
fn test_hanoi_single_disk() {
    let trace = tower_of_hanoi_steps(1, Peg::B, Peg::A, Peg::C).unwrap();
    assert_eq!(trace.tags(), vec!["initial", "move", "complete"]);
    assert_eq!(
        trace.get(1).unwrap().state.event,
        RecursionEvent::Move {
            disk: 1,
            from: Peg::B,
            to: Peg::A,
            depth: 0
        }
    );
}

#[test]
fn test_hanoi_every_step_is_legal() {
    let trace = tower_of_hanoi_steps(5, Peg::A, Peg::C, Peg::B).unwrap();
    let mut previous_moves = 0;
    for step in &trace {
        assert!(step.state.towers.is_legal());
        assert_eq!(step.state.towers.disk_count(), 5);
        assert!(step.state.move_count >= previous_moves);
        previous_moves = step.state.move_count;
    }
    assert_eq!(previous_moves, 31);
}

#[test]
fn test_hanoi_rejects_bad_arguments() {
    assert!(matches!(
        tower_of_hanoi_steps(0, Peg::A, Peg::C, Peg::B),
        Err(VizError::InvalidArgument { .. })
    ));
    assert!(tower_of_hanoi_steps(MAX_DISKS + 1, Peg::A, Peg::C, Peg::B).is_err());
    assert!(tower_of_hanoi_steps(3, Peg::A, Peg::A, Peg::B).is_err());
    assert!(tower_of_hanoi_steps(3, Peg::A, Peg::C, Peg::C).is_err());
}

#[test]
fn test_hanoi_serializes_pegs_as_arrays() {
    let trace = tower_of_hanoi_steps(2, Peg::A, Peg::C, Peg::B).unwrap();
    let json = serde_json::to_value(trace.first().unwrap()).unwrap();
    assert_eq!(json["kind"], "initial");
    assert_eq!(json["towers"], serde_json::json!([[2, 1], [], []]));
    assert_eq!(json["move_count"], 0);
}
