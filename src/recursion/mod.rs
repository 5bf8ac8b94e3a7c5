//! Recursion step generators
//!
//! - [`factorial_steps`]: plain recursion with a call-stack snapshot
//! - [`fibonacci_steps`]: memoised recursion; the memo is consulted before a
//!   frame is pushed and every step carries a copy of it
//! - [`tower_of_hanoi_steps`]: three pegs of disks, snapshotted after every
//!   move
//!
//! # Call-stack discipline
//!
//! A `call` step is emitted right after its frame is pushed, so the stack it
//! shows has `depth + 1` frames. The frame is popped right after the matching
//! `base-case` or `return` step. Memo hits push nothing.
//!
//! Range checks for interactive use live in [`catalog`](crate::catalog);
//! these generators only reject arguments whose results overflow `u64` or
//! whose traces would be unreasonably large.

mod hanoi;

pub use hanoi::{tower_of_hanoi_steps, HanoiSnapshot, Peg, Towers, MAX_DISKS};

use crate::error::{Result, VizError};
use crate::trace::{StepKind, Trace, TraceBuilder};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Largest `n` whose factorial fits in a `u64`
pub const MAX_FACTORIAL: u32 = 20;

/// Largest `n` whose Fibonacci number fits in a `u64`
pub const MAX_FIBONACCI: u32 = 93;

/// Cached results keyed by argument
pub type MemoTable = FxHashMap<u32, u64>;

/// One active invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallFrame {
    pub argument: u32,
    pub depth: usize,
}

/// The recursion step vocabulary, shared by all three procedures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RecursionEvent {
    Call {
        argument: u32,
        depth: usize,
    },
    BaseCase {
        argument: u32,
        result: u64,
    },
    Return {
        argument: u32,
        result: u64,
    },
    Memoized {
        argument: u32,
        result: u64,
    },
    Initial {
        disks: u32,
        source: Peg,
        destination: Peg,
    },
    Move {
        disk: u32,
        from: Peg,
        to: Peg,
        depth: usize,
    },
    RecursiveCall {
        disks: u32,
        from: Peg,
        to: Peg,
        stage: u8,
        depth: usize,
    },
    Complete {
        #[serde(skip_serializing_if = "Option::is_none")]
        final_result: Option<u64>,
        fib_tree: bool,
    },
}

impl RecursionEvent {
    fn tag(&self) -> &'static str {
        match self {
            RecursionEvent::Call { .. } => "call",
            RecursionEvent::BaseCase { .. } => "base-case",
            RecursionEvent::Return { .. } => "return",
            RecursionEvent::Memoized { .. } => "memoized",
            RecursionEvent::Initial { .. } => "initial",
            RecursionEvent::Move { .. } => "move",
            RecursionEvent::RecursiveCall { .. } => "recursive-call",
            RecursionEvent::Complete { .. } => "complete",
        }
    }

    /// Value produced by the step, if it resolves a call
    pub fn result(&self) -> Option<u64> {
        match *self {
            RecursionEvent::BaseCase { result, .. }
            | RecursionEvent::Return { result, .. }
            | RecursionEvent::Memoized { result, .. } => Some(result),
            RecursionEvent::Complete { final_result, .. } => final_result,
            _ => None,
        }
    }
}

/// Call stack (and memo, for fibonacci) at one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallSnapshot {
    pub call_stack: Vec<CallFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<MemoTable>,
    #[serde(flatten)]
    pub event: RecursionEvent,
}

impl CallSnapshot {
    /// Memo entries sorted by argument
    pub fn memo_entries(&self) -> Vec<(u32, u64)> {
        let mut entries: Vec<(u32, u64)> = self
            .memo
            .iter()
            .flat_map(|memo| memo.iter().map(|(&k, &v)| (k, v)))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl StepKind for CallSnapshot {
    fn tag(&self) -> &'static str {
        self.event.tag()
    }

    fn is_terminal(&self) -> bool {
        matches!(self.event, RecursionEvent::Complete { .. })
    }
}

struct CallRecorder {
    stack: Vec<CallFrame>,
    memo: Option<MemoTable>,
    trace: TraceBuilder<CallSnapshot>,
}

impl CallRecorder {
    fn new(memo: Option<MemoTable>) -> Self {
        CallRecorder {
            stack: Vec::new(),
            memo,
            trace: TraceBuilder::new(),
        }
    }

    fn emit(
        &mut self,
        event: RecursionEvent,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let snapshot = CallSnapshot {
            call_stack: self.stack.clone(),
            memo: self.memo.clone(),
            event,
        };
        self.trace.push(snapshot, message, highlight, description);
    }

    fn push_frame(&mut self, argument: u32, depth: usize) {
        self.stack.push(CallFrame { argument, depth });
        debug_assert_eq!(self.stack.len(), depth + 1);
    }

    fn pop_frame(&mut self) {
        self.stack.pop();
    }
}

/// Trace `n!` computed recursively.
pub fn factorial_steps(n: u32) -> Result<Trace<CallSnapshot>> {
    if n > MAX_FACTORIAL {
        return Err(VizError::invalid(format!(
            "factorial({}) overflows a 64-bit result (max n is {})",
            n, MAX_FACTORIAL
        )));
    }

    let mut rec = CallRecorder::new(None);
    let result = factorial(&mut rec, n, n, 0);

    rec.emit(
        RecursionEvent::Complete {
            final_result: Some(result),
            fib_tree: false,
        },
        format!("Completed: {}! = {}", n, result),
        format!("Final result: {}! = {}", n, result),
        format!(
            "All recursive frames returned. The answer to {}! is {}.",
            n, result
        ),
    );
    tracing::debug!(n, steps = rec.trace.next_number() - 1, "generated factorial trace");
    Ok(rec.trace.finish())
}

fn factorial(rec: &mut CallRecorder, root: u32, num: u32, depth: usize) -> u64 {
    rec.push_frame(num, depth);
    let description = if depth == 0 {
        format!("Begin computing {}! by expanding calls down to 1.", root)
    } else if num <= 1 {
        format!("Dive deeper: factorial({}) is the last call needed.", num)
    } else {
        format!(
            "Dive deeper: need factorial({}) so we will call factorial({}).",
            num,
            num - 1
        )
    };
    rec.emit(
        RecursionEvent::Call {
            argument: num,
            depth,
        },
        format!("Calling factorial({})", num),
        format!("Making recursive call: factorial({})", num),
        description,
    );

    if num <= 1 {
        rec.emit(
            RecursionEvent::BaseCase {
                argument: num,
                result: 1,
            },
            format!("Base case: factorial({}) = 1", num),
            format!("Reached base case: factorial({}) returns 1", num),
            format!(
                "Stop: factorial({}) is defined as 1 (base case). Start unwinding recursion.",
                num
            ),
        );
        rec.pop_frame();
        return 1;
    }

    let inner = factorial(rec, root, num - 1, depth + 1);
    let result = u64::from(num) * inner;

    rec.emit(
        RecursionEvent::Return {
            argument: num,
            result,
        },
        format!(
            "factorial({}) = {} × factorial({}) = {}",
            num,
            num,
            num - 1,
            result
        ),
        format!("Returning: {} × {} = {}", num, inner, result),
        format!(
            "Resolved deeper call: multiply {} by factorial({}) to get {}.",
            num,
            num - 1,
            result
        ),
    );
    rec.pop_frame();
    result
}

/// Trace `fib(n)` computed recursively with memoisation.
pub fn fibonacci_steps(n: u32) -> Result<Trace<CallSnapshot>> {
    if n > MAX_FIBONACCI {
        return Err(VizError::invalid(format!(
            "fibonacci({}) overflows a 64-bit result (max n is {})",
            n, MAX_FIBONACCI
        )));
    }

    let mut rec = CallRecorder::new(Some(MemoTable::default()));
    let result = fibonacci(&mut rec, n, n, 0);

    rec.emit(
        RecursionEvent::Complete {
            final_result: Some(result),
            fib_tree: true,
        },
        format!("Completed: fib({}) = {}", n, result),
        format!("Final result: fibonacci({}) = {}", n, result),
        format!("All branches resolved; fib({}) = {}.", n, result),
    );
    tracing::debug!(n, steps = rec.trace.next_number() - 1, "generated fibonacci trace");
    Ok(rec.trace.finish())
}

fn memo_lookup(rec: &CallRecorder, num: u32) -> Option<u64> {
    rec.memo.as_ref().and_then(|memo| memo.get(&num).copied())
}

fn memo_store(rec: &mut CallRecorder, num: u32, value: u64) {
    if let Some(memo) = rec.memo.as_mut() {
        memo.insert(num, value);
    }
}

fn fibonacci(rec: &mut CallRecorder, root: u32, num: u32, depth: usize) -> u64 {
    if let Some(cached) = memo_lookup(rec, num) {
        rec.emit(
            RecursionEvent::Memoized {
                argument: num,
                result: cached,
            },
            format!("Using memoized value: fibonacci({}) = {}", num, cached),
            format!("Cache hit: fibonacci({}) already computed", num),
            format!(
                "We already computed fib({}) earlier; reuse stored value {}.",
                num, cached
            ),
        );
        return cached;
    }

    rec.push_frame(num, depth);
    let description = if depth == 0 {
        format!(
            "Start computing fib({}) by branching until base cases (0 or 1).",
            root
        )
    } else if num <= 1 {
        format!("fib({}) is a base case; no further branching.", num)
    } else {
        format!(
            "Expand fib({}) into fib({}) + fib({}).",
            num,
            num - 1,
            num - 2
        )
    };
    rec.emit(
        RecursionEvent::Call {
            argument: num,
            depth,
        },
        format!("Calling fibonacci({})", num),
        format!("Making recursive call: fibonacci({})", num),
        description,
    );

    if num <= 1 {
        let result = u64::from(num);
        rec.emit(
            RecursionEvent::BaseCase {
                argument: num,
                result,
            },
            format!("Base case: fibonacci({}) = {}", num, result),
            format!("Reached base case: fibonacci({}) returns {}", num, result),
            format!("Base case encountered; return {}.", result),
        );
        rec.pop_frame();
        memo_store(rec, num, result);
        return result;
    }

    // n-1 resolves completely, memo writes included, before n-2 starts
    let first = fibonacci(rec, root, num - 1, depth + 1);
    let second = fibonacci(rec, root, num - 2, depth + 1);
    let result = first + second;

    rec.emit(
        RecursionEvent::Return {
            argument: num,
            result,
        },
        format!(
            "fibonacci({}) = fibonacci({}) + fibonacci({}) = {}",
            num,
            num - 1,
            num - 2,
            result
        ),
        format!("Returning: {}", result),
        format!(
            "Combine results: fib({}) + fib({}) = {}.",
            num - 1,
            num - 2,
            result
        ),
    );
    rec.pop_frame();
    memo_store(rec, num, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_entries_sorted() {
        let trace = fibonacci_steps(5).unwrap();
        let last = trace.last().unwrap();
        let entries = last.state.memo_entries();
        assert_eq!(
            entries,
            vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 3), (5, 5)]
        );
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(factorial_steps(MAX_FACTORIAL).is_ok());
        assert!(factorial_steps(MAX_FACTORIAL + 1).is_err());
        assert!(fibonacci_steps(MAX_FIBONACCI + 1).is_err());
    }
}
