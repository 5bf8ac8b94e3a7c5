//! Sorting step generators
//!
//! Five comparison sorts, each a pure function from an input slice to a
//! [`Trace`] of [`SortSnapshot`]s. The input is copied on entry and never
//! modified.
//!
//! | Generator | First step | Last step |
//! |-----------|------------|-----------|
//! | [`bubble_sort_steps`] | `initialize` | `complete` |
//! | [`selection_sort_steps`] | `initialize` | `complete` |
//! | [`insertion_sort_steps`] | `initialize` | `complete` |
//! | [`merge_sort_steps`] | `divide` | `complete` |
//! | [`quick_sort_steps`] | `select-pivot` | `complete` |
//!
//! Merge sort and quick sort use a terser vocabulary without an
//! `initialize` step; their first step already shows the untouched input.
//! All five close with `complete`, and inputs of length zero or one produce
//! a trace holding only that step for the divide-and-conquer sorts.
//!
//! Ties never swap: bubble sort swaps on strict `>`, selection sort takes a
//! new minimum on strict `<`, insertion sort shifts on strict `>`, merge sort
//! takes the left element on `<=`.

use crate::trace::{join_values, StepKind, Trace, TraceBuilder};
use serde::Serialize;

/// Array state at one sorting step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortSnapshot {
    pub array: Vec<i64>,
    /// Indices already in their final position
    pub sorted: Vec<usize>,
    #[serde(flatten)]
    pub event: SortEvent,
}

/// The sorting step vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SortEvent {
    Initialize,
    PassStart {
        pass: usize,
    },
    Compare {
        comparing: [usize; 2],
    },
    Swap {
        swapping: [usize; 2],
    },
    NewMinimum {
        comparing: [usize; 2],
        min_index: usize,
    },
    NoSwap {
        index: usize,
    },
    MarkSorted {
        index: usize,
    },
    Select {
        index: usize,
        key: i64,
    },
    Shift {
        shifting: [usize; 2],
        key: i64,
    },
    FoundPosition {
        comparing: [usize; 2],
        insert_position: usize,
    },
    InsertBeginning {
        key: i64,
    },
    Insert {
        insert_position: usize,
        inserted_value: i64,
    },
    Divide {
        range: [usize; 2],
    },
    Merge {
        range: [usize; 2],
        merged: Vec<i64>,
    },
    SelectPivot {
        pivot: usize,
    },
    PlacePivot {
        pivot: usize,
    },
    Complete,
}

impl SortSnapshot {
    /// Indices being compared at this step
    pub fn comparing(&self) -> &[usize] {
        match &self.event {
            SortEvent::Compare { comparing }
            | SortEvent::NewMinimum { comparing, .. }
            | SortEvent::FoundPosition { comparing, .. } => comparing,
            _ => &[],
        }
    }

    /// Indices exchanged at this step
    pub fn swapping(&self) -> &[usize] {
        match &self.event {
            SortEvent::Swap { swapping } => swapping,
            _ => &[],
        }
    }

    /// Source and destination of a shift
    pub fn shifting(&self) -> &[usize] {
        match &self.event {
            SortEvent::Shift { shifting, .. } => shifting,
            _ => &[],
        }
    }

    /// Pivot index for quick sort steps
    pub fn pivot(&self) -> Option<usize> {
        match self.event {
            SortEvent::SelectPivot { pivot } | SortEvent::PlacePivot { pivot } => Some(pivot),
            _ => None,
        }
    }

    /// Inclusive index range a merge sort step works on
    pub fn range(&self) -> Option<[usize; 2]> {
        match self.event {
            SortEvent::Divide { range } | SortEvent::Merge { range, .. } => Some(range),
            _ => None,
        }
    }
}

impl StepKind for SortSnapshot {
    fn tag(&self) -> &'static str {
        match self.event {
            SortEvent::Initialize => "initialize",
            SortEvent::PassStart { .. } => "pass-start",
            SortEvent::Compare { .. } => "compare",
            SortEvent::Swap { .. } => "swap",
            SortEvent::NewMinimum { .. } => "new-minimum",
            SortEvent::NoSwap { .. } => "no-swap",
            SortEvent::MarkSorted { .. } => "mark-sorted",
            SortEvent::Select { .. } => "select",
            SortEvent::Shift { .. } => "shift",
            SortEvent::FoundPosition { .. } => "found-position",
            SortEvent::InsertBeginning { .. } => "insert-beginning",
            SortEvent::Insert { .. } => "insert",
            SortEvent::Divide { .. } => "divide",
            SortEvent::Merge { .. } => "merge",
            SortEvent::SelectPivot { .. } => "select-pivot",
            SortEvent::PlacePivot { .. } => "place-pivot",
            SortEvent::Complete => "complete",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.event, SortEvent::Complete)
    }

    fn array(&self) -> Option<&[i64]> {
        Some(&self.array)
    }
}

/// Working array plus the trace being recorded
struct Recorder {
    array: Vec<i64>,
    trace: TraceBuilder<SortSnapshot>,
}

impl Recorder {
    fn new(input: &[i64]) -> Self {
        Recorder {
            array: input.to_vec(),
            trace: TraceBuilder::new(),
        }
    }

    fn emit(
        &mut self,
        sorted: Vec<usize>,
        event: SortEvent,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let snapshot = SortSnapshot {
            array: self.array.clone(),
            sorted,
            event,
        };
        self.trace.push(snapshot, message, highlight, description);
    }

    fn complete(&mut self, name: &str, description: impl Into<String>) {
        let all = (0..self.array.len()).collect();
        let message = format!("{} completed! Array is now sorted.", name);
        let highlight = format!("Final result: [{}]", join_values(&self.array));
        self.emit(all, SortEvent::Complete, message, highlight, description);
    }

    fn finish(self, algorithm: &str) -> Trace<SortSnapshot> {
        tracing::debug!(
            algorithm,
            len = self.array.len(),
            steps = self.trace.next_number() - 1,
            "generated sort trace"
        );
        self.trace.finish()
    }
}

fn ordinal(n: usize) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Bubble sort: adjacent compare-and-swap passes, largest values settle right.
pub fn bubble_sort_steps(input: &[i64]) -> Trace<SortSnapshot> {
    let mut rec = Recorder::new(input);
    let n = rec.array.len();
    let tail = |count: usize| -> Vec<usize> { (0..count).map(|idx| n - 1 - idx).collect() };

    rec.emit(
        Vec::new(),
        SortEvent::Initialize,
        format!("Starting Bubble Sort with array [{}]", join_values(&rec.array)),
        "Initial array - will bubble largest elements to the right",
        "Bubble Sort compares adjacent elements and swaps them if they're in wrong order",
    );

    for i in 0..n.saturating_sub(1) {
        rec.emit(
            tail(i),
            SortEvent::PassStart { pass: i + 1 },
            format!("Starting pass {}", i + 1),
            format!("Pass {}: Will find the {} largest element", i + 1, ordinal(i + 1)),
            "Each pass bubbles the largest unsorted element to its correct position",
        );

        for j in 0..n - i - 1 {
            let (a, b) = (rec.array[j], rec.array[j + 1]);
            let out_of_order = a > b;
            let number = rec.trace.next_number();
            rec.emit(
                tail(i),
                SortEvent::Compare {
                    comparing: [j, j + 1],
                },
                format!("Comparing {} and {}", a, b),
                format!(
                    "Step {}: Compare elements at positions {} and {}",
                    number,
                    j,
                    j + 1
                ),
                format!(
                    "{} {} {} - {}",
                    a,
                    if out_of_order { ">" } else { "≤" },
                    b,
                    if out_of_order {
                        "Need to swap"
                    } else {
                        "No swap needed"
                    }
                ),
            );

            if out_of_order {
                rec.array.swap(j, j + 1);
                let (a, b) = (rec.array[j], rec.array[j + 1]);
                rec.emit(
                    tail(i),
                    SortEvent::Swap {
                        swapping: [j, j + 1],
                    },
                    format!("Swapped {} and {}", a, b),
                    format!("Swapping because {} < {} (after swap)", a, b),
                    "Elements swapped - larger element moves right",
                );
            }
        }

        let settled = n - 1 - i;
        let value = rec.array[settled];
        rec.emit(
            tail(i + 1),
            SortEvent::MarkSorted { index: settled },
            format!("Element {} is now in its final position", value),
            format!(
                "Pass {} complete. Largest element bubbled to position {}",
                i + 1,
                settled
            ),
            format!("Position {} is now sorted with value {}", settled, value),
        );
    }

    rec.complete("Bubble Sort", "All elements are now in ascending order");
    rec.finish("bubble sort")
}

/// Selection sort: find the minimum of the unsorted suffix, swap it forward.
pub fn selection_sort_steps(input: &[i64]) -> Trace<SortSnapshot> {
    let mut rec = Recorder::new(input);
    let n = rec.array.len();
    let prefix = |count: usize| -> Vec<usize> { (0..count).collect() };

    rec.emit(
        Vec::new(),
        SortEvent::Initialize,
        format!("Starting Selection Sort on array of {} elements", n),
        "Selection sort finds the minimum element and places it at the beginning",
        "Selection sort repeatedly finds the minimum element from unsorted portion",
    );

    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;

        rec.emit(
            prefix(i),
            SortEvent::PassStart { pass: i + 1 },
            format!("Pass {}: Finding minimum in range [{}, {}]", i + 1, i, n - 1),
            "Starting search for minimum element in unsorted portion",
            format!("Assume element at index {} is minimum: {}", i, rec.array[i]),
        );

        for j in i + 1..n {
            let (current_min, candidate) = (rec.array[min_index], rec.array[j]);
            rec.emit(
                prefix(i),
                SortEvent::Compare {
                    comparing: [min_index, j],
                },
                format!(
                    "Comparing current minimum {} with {}",
                    current_min, candidate
                ),
                format!("Checking if {} < {}", candidate, current_min),
                "Looking for smaller element in remaining unsorted portion",
            );

            if candidate < current_min {
                min_index = j;
                rec.emit(
                    prefix(i),
                    SortEvent::NewMinimum {
                        comparing: [min_index, j],
                        min_index,
                    },
                    format!("New minimum found: {} at index {}", candidate, min_index),
                    format!("{} is smaller than previous minimum", candidate),
                    format!("Update minimum index to {}", min_index),
                );
            }
        }

        if min_index != i {
            let displaced = rec.array[i];
            rec.array.swap(i, min_index);
            let placed = rec.array[i];
            rec.emit(
                prefix(i),
                SortEvent::Swap {
                    swapping: [i, min_index],
                },
                format!("Swapping minimum {} to position {}", placed, i),
                format!(
                    "Moving {} from index {} to sorted position {}",
                    placed, min_index, i
                ),
                format!(
                    "Exchanged {} (at {}) with {} (at {})",
                    displaced, i, placed, min_index
                ),
            );
        } else {
            rec.emit(
                prefix(i),
                SortEvent::NoSwap { index: i },
                format!(
                    "No swap needed - minimum {} already at position {}",
                    rec.array[i], i
                ),
                "Element is already in correct position",
                "Minimum element was already at the beginning of unsorted portion",
            );
        }

        rec.emit(
            prefix(i + 1),
            SortEvent::MarkSorted { index: i },
            format!("Position {} is now sorted with value {}", i, rec.array[i]),
            format!("Sorted portion now includes {} element(s)", i + 1),
            format!("Element {} is in its final sorted position", rec.array[i]),
        );
    }

    rec.complete(
        "Selection Sort",
        format!(
            "All elements are in ascending order after {} passes",
            n.saturating_sub(1)
        ),
    );
    rec.finish("selection sort")
}

/// Insertion sort: grow a sorted prefix by shifting larger values right.
pub fn insertion_sort_steps(input: &[i64]) -> Trace<SortSnapshot> {
    let mut rec = Recorder::new(input);
    let n = rec.array.len();
    let prefix = |count: usize| -> Vec<usize> { (0..count.min(n)).collect() };

    let first = match rec.array.first() {
        Some(value) => format!("First element {} is trivially sorted", value),
        None => "Empty array is trivially sorted".to_string(),
    };
    rec.emit(
        prefix(1),
        SortEvent::Initialize,
        format!("Starting Insertion Sort on array of {} elements", n),
        first,
        "Insertion sort builds sorted array one element at a time",
    );

    for i in 1..n {
        let key = rec.array[i];
        // `j` is one past the slot being examined, so it never underflows
        let mut j = i;

        rec.emit(
            prefix(i),
            SortEvent::Select { index: i, key },
            format!("Selecting element {} at index {} for insertion", key, i),
            format!("Next element to insert into sorted portion: {}", key),
            format!(
                "Will find correct position for {} in sorted portion [0..{}]",
                key,
                i - 1
            ),
        );

        while j > 0 && rec.array[j - 1] > key {
            let left = rec.array[j - 1];
            rec.emit(
                prefix(i),
                SortEvent::Compare {
                    comparing: [j - 1, i],
                },
                format!("Comparing {} > {}", left, key),
                format!("{} is greater than {}, need to shift right", left, key),
                format!(
                    "Element {} at position {} is larger than key {}",
                    left,
                    j - 1,
                    key
                ),
            );
            rec.emit(
                prefix(i),
                SortEvent::Shift {
                    shifting: [j - 1, j],
                    key,
                },
                format!("Shifting {} from position {} to {}", left, j - 1, j),
                "Making space for insertion by moving element right",
                format!("Shift {} one position right to make room", left),
            );
            rec.array[j] = left;
            j -= 1;
        }

        if j > 0 {
            let left = rec.array[j - 1];
            rec.emit(
                prefix(i),
                SortEvent::FoundPosition {
                    comparing: [j - 1, i],
                    insert_position: j,
                },
                format!("Found insertion position: {} <= {}", left, key),
                format!("{} should be inserted at position {}", key, j),
                format!(
                    "Element {} is not greater than {}, so insert after it",
                    left, key
                ),
            );
        } else {
            rec.emit(
                prefix(i),
                SortEvent::InsertBeginning { key },
                format!("{} is smallest, insert at beginning", key),
                format!("{} is smaller than all sorted elements", key),
                format!(
                    "Key {} is smaller than all elements in sorted portion",
                    key
                ),
            );
        }

        rec.array[j] = key;
        rec.emit(
            prefix(i + 1),
            SortEvent::Insert {
                insert_position: j,
                inserted_value: key,
            },
            format!("Inserted {} at position {}", key, j),
            format!("{} is now in correct sorted position", key),
            format!("Sorted portion extended to include {} elements", i + 1),
        );
    }

    rec.complete(
        "Insertion Sort",
        format!(
            "All elements inserted in correct positions through {} iterations",
            n.saturating_sub(1)
        ),
    );
    rec.finish("insertion sort")
}

/// Top-down merge sort over inclusive ranges.
pub fn merge_sort_steps(input: &[i64]) -> Trace<SortSnapshot> {
    let mut rec = Recorder::new(input);
    if rec.array.len() > 1 {
        let high = rec.array.len() - 1;
        merge_sort_range(&mut rec, 0, high);
    }
    rec.complete(
        "Merge Sort",
        "Every range has been divided down to single elements and merged back in order",
    );
    rec.finish("merge sort")
}

fn merge_sort_range(rec: &mut Recorder, low: usize, high: usize) {
    if low >= high {
        return;
    }
    let mid = low + (high - low) / 2;

    rec.emit(
        Vec::new(),
        SortEvent::Divide { range: [low, high] },
        format!("Dividing array from {} to {}", low, high),
        "Divide phase: splitting array",
        format!(
            "Split [{}, {}] into [{}, {}] and [{}, {}]",
            low,
            high,
            low,
            mid,
            mid + 1,
            high
        ),
    );

    merge_sort_range(rec, low, mid);
    merge_sort_range(rec, mid + 1, high);
    merge_halves(rec, low, mid, high);

    let merged = rec.array[low..=high].to_vec();
    rec.emit(
        Vec::new(),
        SortEvent::Merge {
            range: [low, high],
            merged,
        },
        format!("Merged subarray from {} to {}", low, high),
        "Conquer phase: merging sorted subarrays",
        format!(
            "Positions {} through {} now hold [{}] in ascending order",
            low,
            high,
            join_values(&rec.array[low..=high])
        ),
    );
}

fn merge_halves(rec: &mut Recorder, low: usize, mid: usize, high: usize) {
    let left = rec.array[low..=mid].to_vec();
    let right = rec.array[mid + 1..=high].to_vec();
    let (mut i, mut j, mut k) = (0, 0, low);

    while i < left.len() && j < right.len() {
        let (a, b) = (left[i], right[j]);
        rec.emit(
            Vec::new(),
            SortEvent::Compare {
                comparing: [low + i, mid + 1 + j],
            },
            format!("Comparing {} and {}", a, b),
            "Merging subarrays",
            if a <= b {
                format!("{} ≤ {}, take {} from the left half", a, b, a)
            } else {
                format!("{} > {}, take {} from the right half", a, b, b)
            },
        );

        if a <= b {
            rec.array[k] = a;
            i += 1;
        } else {
            rec.array[k] = b;
            j += 1;
        }
        k += 1;
    }

    for &value in left[i..].iter().chain(right[j..].iter()) {
        rec.array[k] = value;
        k += 1;
    }
}

/// Quick sort with Lomuto partitioning, last element as pivot.
pub fn quick_sort_steps(input: &[i64]) -> Trace<SortSnapshot> {
    let mut rec = Recorder::new(input);
    if rec.array.len() > 1 {
        let high = rec.array.len() - 1;
        quick_sort_range(&mut rec, 0, high);
    }
    rec.complete(
        "Quick Sort",
        "Every pivot has been placed and all partitions are sorted",
    );
    rec.finish("quick sort")
}

fn quick_sort_range(rec: &mut Recorder, low: usize, high: usize) {
    if low >= high {
        return;
    }
    let pivot_index = partition(rec, low, high);
    if pivot_index > low {
        quick_sort_range(rec, low, pivot_index - 1);
    }
    quick_sort_range(rec, pivot_index + 1, high);
}

fn partition(rec: &mut Recorder, low: usize, high: usize) -> usize {
    let pivot = rec.array[high];
    // Next slot for an element smaller than the pivot
    let mut store = low;

    rec.emit(
        Vec::new(),
        SortEvent::SelectPivot { pivot: high },
        format!("Selected pivot: {}", pivot),
        format!("Partitioning around pivot {}", pivot),
        format!(
            "Elements smaller than {} in [{}, {}] will move to its left",
            pivot, low, high
        ),
    );

    for j in low..high {
        let value = rec.array[j];
        rec.emit(
            Vec::new(),
            SortEvent::Compare {
                comparing: [j, high],
            },
            format!("Comparing {} with pivot {}", value, pivot),
            "Partitioning elements around pivot",
            if value < pivot {
                format!("{} < {}, it belongs left of the pivot", value, pivot)
            } else {
                format!("{} ≥ {}, it stays right of the pivot", value, pivot)
            },
        );

        if value < pivot {
            rec.array.swap(store, j);
            rec.emit(
                Vec::new(),
                SortEvent::Swap {
                    swapping: [store, j],
                },
                format!("Swapped {} and {}", rec.array[j], rec.array[store]),
                "Moving smaller element to left of pivot",
                format!(
                    "{} moves to position {}, growing the smaller-than-pivot region",
                    rec.array[store], store
                ),
            );
            store += 1;
        }
    }

    rec.array.swap(store, high);
    rec.emit(
        Vec::new(),
        SortEvent::PlacePivot { pivot: store },
        format!("Placed pivot {} at position {}", pivot, store),
        "Pivot in final position",
        format!(
            "{} element(s) smaller than {} sit to its left",
            store - low,
            pivot
        ),
    );

    store
}
