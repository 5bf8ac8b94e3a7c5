//! Searching step generators
//!
//! [`linear_search_steps`] scans left to right from a start index and stops
//! at the first match. [`binary_search_steps`] assumes the caller passes an
//! ascending array; it does not check or re-sort, so an unsorted input gives a
//! well-formed but meaningless trace.
//!
//! Both traces open with `initialize` and end in `found` or `not-found`,
//! which carry the number of comparisons made.

use crate::trace::{StepKind, Trace, TraceBuilder};
use serde::Serialize;

/// Array and target at one searching step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub array: Vec<i64>,
    pub target: i64,
    #[serde(flatten)]
    pub event: SearchEvent,
}

/// Outcome of comparing an element with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Comparison {
    Equal,
    Less,
    Greater,
}

impl Comparison {
    pub fn of(value: i64, target: i64) -> Self {
        match value.cmp(&target) {
            std::cmp::Ordering::Equal => Comparison::Equal,
            std::cmp::Ordering::Less => Comparison::Less,
            std::cmp::Ordering::Greater => Comparison::Greater,
        }
    }

    pub fn is_match(self) -> bool {
        self == Comparison::Equal
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::Less => "<",
            Comparison::Greater => ">",
        }
    }
}

/// Inclusive bounds still under consideration. `right` is `None` once it
/// has moved below index zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchRange {
    pub left: usize,
    pub right: Option<usize>,
}

impl SearchRange {
    fn describe_right(&self) -> String {
        match self.right {
            Some(r) => r.to_string(),
            None => "-1".to_string(),
        }
    }
}

/// The searching step vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SearchEvent {
    Initialize {
        range: SearchRange,
    },
    Examine {
        index: usize,
        value: i64,
    },
    CalculateMid {
        range: SearchRange,
        mid: usize,
    },
    ExamineMid {
        range: SearchRange,
        mid: usize,
        value: i64,
    },
    Compare {
        index: usize,
        value: i64,
        comparison: Comparison,
        is_match: bool,
    },
    SearchRight {
        range: SearchRange,
        previous_mid: usize,
        eliminated: [usize; 2],
    },
    SearchLeft {
        range: SearchRange,
        previous_mid: usize,
        eliminated: [usize; 2],
    },
    Found {
        found_index: usize,
        comparisons: usize,
    },
    NotFound {
        range: SearchRange,
        comparisons: usize,
    },
}

impl SearchSnapshot {
    /// Index currently being looked at, if any
    pub fn current_index(&self) -> Option<usize> {
        match self.event {
            SearchEvent::Examine { index, .. } | SearchEvent::Compare { index, .. } => Some(index),
            SearchEvent::CalculateMid { mid, .. } | SearchEvent::ExamineMid { mid, .. } => {
                Some(mid)
            }
            SearchEvent::Found { found_index, .. } => Some(found_index),
            _ => None,
        }
    }

    /// Bounds of the live search window, for binary search steps
    pub fn range(&self) -> Option<SearchRange> {
        match self.event {
            SearchEvent::Initialize { range }
            | SearchEvent::CalculateMid { range, .. }
            | SearchEvent::ExamineMid { range, .. }
            | SearchEvent::SearchRight { range, .. }
            | SearchEvent::SearchLeft { range, .. }
            | SearchEvent::NotFound { range, .. } => Some(range),
            _ => None,
        }
    }

    pub fn comparisons(&self) -> Option<usize> {
        match self.event {
            SearchEvent::Found { comparisons, .. } | SearchEvent::NotFound { comparisons, .. } => {
                Some(comparisons)
            }
            _ => None,
        }
    }
}

impl StepKind for SearchSnapshot {
    fn tag(&self) -> &'static str {
        match self.event {
            SearchEvent::Initialize { .. } => "initialize",
            SearchEvent::Examine { .. } => "examine",
            SearchEvent::CalculateMid { .. } => "calculate-mid",
            SearchEvent::ExamineMid { .. } => "examine-mid",
            SearchEvent::Compare { .. } => "compare",
            SearchEvent::SearchRight { .. } => "search-right",
            SearchEvent::SearchLeft { .. } => "search-left",
            SearchEvent::Found { .. } => "found",
            SearchEvent::NotFound { .. } => "not-found",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self.event,
            SearchEvent::Found { .. } | SearchEvent::NotFound { .. }
        )
    }

    fn array(&self) -> Option<&[i64]> {
        Some(&self.array)
    }
}

struct Recorder<'a> {
    array: &'a [i64],
    target: i64,
    trace: TraceBuilder<SearchSnapshot>,
}

impl<'a> Recorder<'a> {
    fn new(array: &'a [i64], target: i64) -> Self {
        Recorder {
            array,
            target,
            trace: TraceBuilder::new(),
        }
    }

    fn emit(
        &mut self,
        event: SearchEvent,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let snapshot = SearchSnapshot {
            array: self.array.to_vec(),
            target: self.target,
            event,
        };
        self.trace.push(snapshot, message, highlight, description);
    }

    fn finish(self, algorithm: &str) -> Trace<SearchSnapshot> {
        tracing::debug!(
            algorithm,
            len = self.array.len(),
            target = self.target,
            steps = self.trace.next_number() - 1,
            "generated search trace"
        );
        self.trace.finish()
    }
}

/// Sequential scan from `start_index` to the end of `array`.
pub fn linear_search_steps(array: &[i64], target: i64, start_index: usize) -> Trace<SearchSnapshot> {
    let mut rec = Recorder::new(array, target);
    let n = array.len();
    let start = start_index.min(n);
    let remaining = n - start;
    let range = SearchRange {
        left: start,
        right: n.checked_sub(1),
    };

    rec.emit(
        SearchEvent::Initialize { range },
        format!("Starting linear search for {}", target),
        format!("Searching through {} elements sequentially", remaining),
        "Linear search checks each element one by one from left to right",
    );

    for (i, &value) in array.iter().enumerate().skip(start) {
        rec.emit(
            SearchEvent::Examine { index: i, value },
            format!("Examining element at index {}", i),
            format!("Current element: {}", value),
            format!("Checking if {} equals target {}", value, target),
        );

        let is_match = value == target;
        rec.emit(
            SearchEvent::Compare {
                index: i,
                value,
                comparison: Comparison::of(value, target),
                is_match,
            },
            format!(
                "Comparing: {} {} {}",
                value,
                if is_match { "==" } else { "!=" },
                target
            ),
            if is_match {
                "Match found!".to_string()
            } else {
                "No match, continue searching".to_string()
            },
            if is_match {
                format!("Target found at position {}", i)
            } else {
                format!(
                    "{} is not equal to {}, move to next element",
                    value, target
                )
            },
        );

        if is_match {
            let comparisons = i - start + 1;
            rec.emit(
                SearchEvent::Found {
                    found_index: i,
                    comparisons,
                },
                format!("Target {} found at index {}", target, i),
                format!(
                    "Search completed successfully in {} comparison(s)",
                    comparisons
                ),
                format!(
                    "Linear search found the target after examining {} elements",
                    comparisons
                ),
            );
            return rec.finish("linear search");
        }
    }

    rec.emit(
        SearchEvent::NotFound {
            range,
            comparisons: remaining,
        },
        format!("Target {} not found in array", target),
        format!(
            "Searched all {} elements without finding target",
            remaining
        ),
        format!(
            "Linear search completed after {} comparisons with no match",
            remaining
        ),
    );
    rec.finish("linear search")
}

/// Halving search over an ascending `array`.
pub fn binary_search_steps(array: &[i64], target: i64) -> Trace<SearchSnapshot> {
    let mut rec = Recorder::new(array, target);
    let n = array.len();
    let mut range = SearchRange {
        left: 0,
        right: n.checked_sub(1),
    };
    let mut comparisons = 0;

    rec.emit(
        SearchEvent::Initialize { range },
        format!("Starting binary search for {}", target),
        format!(
            "Binary search requires sorted array - range [{}, {}]",
            range.left,
            range.describe_right()
        ),
        "Binary search eliminates half the search space in each step",
    );

    while let Some(right) = range.right.filter(|&r| range.left <= r) {
        let left = range.left;
        let mid = left + (right - left) / 2;
        let value = array[mid];

        rec.emit(
            SearchEvent::CalculateMid { range, mid },
            format!(
                "Calculating midpoint: floor(({} + {}) / 2) = {}",
                left, right, mid
            ),
            format!("Midpoint at index {} divides search range", mid),
            "Binary search always checks the middle element of current range",
        );

        rec.emit(
            SearchEvent::ExamineMid { range, mid, value },
            format!("Examining middle element: array[{}] = {}", mid, value),
            format!("Comparing {} with target {}", value, target),
            "This comparison will determine which half to search next",
        );

        comparisons += 1;
        let comparison = Comparison::of(value, target);
        let (highlight, description) = match comparison {
            Comparison::Equal => (
                "Target found!".to_string(),
                format!("Perfect match at index {}", mid),
            ),
            Comparison::Less => (
                "Target is in right half".to_string(),
                format!("{} < {}, so target must be in right half", value, target),
            ),
            Comparison::Greater => (
                "Target is in left half".to_string(),
                format!("{} > {}, so target must be in left half", value, target),
            ),
        };
        rec.emit(
            SearchEvent::Compare {
                index: mid,
                value,
                comparison,
                is_match: comparison.is_match(),
            },
            format!("Comparison: {} {} {}", value, comparison.symbol(), target),
            highlight,
            description,
        );

        match comparison {
            Comparison::Equal => {
                rec.emit(
                    SearchEvent::Found {
                        found_index: mid,
                        comparisons,
                    },
                    format!("Target {} found at index {}", target, mid),
                    format!(
                        "Binary search completed successfully in {} comparison(s)",
                        comparisons
                    ),
                    "Binary search is highly efficient: O(log n) time complexity",
                );
                return rec.finish("binary search");
            }
            Comparison::Less => {
                range.left = mid + 1;
                rec.emit(
                    SearchEvent::SearchRight {
                        range,
                        previous_mid: mid,
                        eliminated: [0, mid],
                    },
                    format!(
                        "Eliminating left half: searching range [{}, {}]",
                        range.left,
                        range.describe_right()
                    ),
                    format!("Discarded {} elements from left half", mid + 1),
                    format!(
                        "Since {} < {}, target cannot be in left half",
                        value, target
                    ),
                );
            }
            Comparison::Greater => {
                range.right = mid.checked_sub(1);
                rec.emit(
                    SearchEvent::SearchLeft {
                        range,
                        previous_mid: mid,
                        eliminated: [mid, n - 1],
                    },
                    format!(
                        "Eliminating right half: searching range [{}, {}]",
                        range.left,
                        range.describe_right()
                    ),
                    format!("Discarded {} elements from right half", n - mid),
                    format!(
                        "Since {} > {}, target cannot be in right half",
                        value, target
                    ),
                );
            }
        }
    }

    rec.emit(
        SearchEvent::NotFound { range, comparisons },
        format!("Target {} not found in array", target),
        format!(
            "Binary search completed in {} comparison(s) - target not present",
            comparisons
        ),
        format!(
            "Search space exhausted: left ({}) > right ({})",
            range.left,
            range.describe_right()
        ),
    );
    rec.finish("binary search")
}
