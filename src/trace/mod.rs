//! Step records and the immutable trace container
//!
//! Every generator in this crate produces a [`Trace`]: a finite, ordered list
//! of [`Step`]s, each holding a full value copy of the algorithm state at one
//! micro-operation plus the narrative text shown alongside it.
//!
//! # Structure
//!
//! A step is split in two:
//! - the family payload `K` (for example [`SortSnapshot`]), a closed enum of
//!   step kinds carrying only the fields each kind needs, wrapped with the
//!   family's snapshot data
//! - the shared envelope: `sequence_number`, `message`, `highlight`,
//!   `description`
//!
//! Sequence numbers are assigned by [`TraceBuilder`] and are 1-based and
//! contiguous. Once [`TraceBuilder::finish`] returns, the trace can only be
//! read.
//!
//! [`SortSnapshot`]: crate::sorting::SortSnapshot

use serde::Serialize;

/// Behaviour every family payload provides to consumers.
pub trait StepKind {
    /// The kebab-case step tag, e.g. `compare` or `hash-result`.
    fn tag(&self) -> &'static str;

    /// Whether this kind ends a trace (`complete`, `found`, `not-found`).
    fn is_terminal(&self) -> bool;

    /// Whether the step is reported as a success in the activity log.
    fn is_milestone(&self) -> bool {
        matches!(
            self.tag(),
            "found" | "mark-sorted" | "complete" | "insert"
        )
    }

    /// The working array, for families that snapshot one.
    fn array(&self) -> Option<&[i64]> {
        None
    }
}

/// One immutable record of algorithm state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<K> {
    pub sequence_number: usize,
    #[serde(flatten)]
    pub state: K,
    pub message: String,
    pub highlight: String,
    pub description: String,
}

impl<K: StepKind> Step<K> {
    pub fn tag(&self) -> &'static str {
        self.state.tag()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// A complete, read-only step sequence produced by one generator call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace<K> {
    steps: Vec<Step<K>>,
}

impl<K> Trace<K> {
    /// Get a step by zero-based index
    pub fn get(&self, index: usize) -> Option<&Step<K>> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<&Step<K>> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Step<K>> {
        self.steps.last()
    }

    pub fn steps(&self) -> &[Step<K>] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<K>> {
        self.steps.iter()
    }
}

impl<K: StepKind> Trace<K> {
    /// Step tags in order, handy for tests and summaries.
    pub fn tags(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.tag()).collect()
    }

    /// Number of steps carrying the given tag
    pub fn count(&self, tag: &str) -> usize {
        self.steps.iter().filter(|s| s.tag() == tag).count()
    }
}

impl<'a, K> IntoIterator for &'a Trace<K> {
    type Item = &'a Step<K>;
    type IntoIter = std::slice::Iter<'a, Step<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Accumulates steps during generation and numbers them.
#[derive(Debug)]
pub(crate) struct TraceBuilder<K> {
    steps: Vec<Step<K>>,
}

impl<K> TraceBuilder<K> {
    pub(crate) fn new() -> Self {
        TraceBuilder { steps: Vec::new() }
    }

    /// Append a step. `state` must already be an independent copy.
    pub(crate) fn push(
        &mut self,
        state: K,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let step = Step {
            sequence_number: self.steps.len() + 1,
            state,
            message: message.into(),
            highlight: highlight.into(),
            description: description.into(),
        };
        debug_assert!(
            !step.message.is_empty() && !step.highlight.is_empty() && !step.description.is_empty(),
            "step {} has empty narrative text",
            step.sequence_number
        );
        self.steps.push(step);
    }

    /// Sequence number the next pushed step will receive
    pub(crate) fn next_number(&self) -> usize {
        self.steps.len() + 1
    }

    pub(crate) fn finish(self) -> Trace<K> {
        Trace { steps: self.steps }
    }
}

/// Render `[a, b, c]` the way the narrative text shows arrays.
pub(crate) fn join_values<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Dummy(&'static str);

    impl StepKind for Dummy {
        fn tag(&self) -> &'static str {
            self.0
        }
        fn is_terminal(&self) -> bool {
            self.0 == "complete"
        }
    }

    #[test]
    fn test_builder_numbers_contiguously() {
        let mut builder = TraceBuilder::new();
        assert_eq!(builder.next_number(), 1);
        builder.push(Dummy("initialize"), "a", "b", "c");
        builder.push(Dummy("compare"), "a", "b", "c");
        builder.push(Dummy("complete"), "a", "b", "c");
        let trace = builder.finish();

        let numbers: Vec<usize> = trace.iter().map(|s| s.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(trace.tags(), vec!["initialize", "compare", "complete"]);
        assert!(trace.last().is_some_and(|s| s.is_terminal()));
        assert!(trace.last().is_some_and(|s| s.state.is_milestone()));
    }

    #[test]
    fn test_join_values() {
        assert_eq!(join_values(&[5, 3, 8]), "5, 3, 8");
        assert_eq!(join_values::<i64>(&[]), "");
    }
}
