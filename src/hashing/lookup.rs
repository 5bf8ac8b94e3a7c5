//! Lookup traces over an already-built table

use super::{ChainingTable, HashTable, ProbingTable};
use crate::error::Result;
use crate::hashfn::HashFunction;
use crate::trace::{StepKind, Trace, TraceBuilder};
use serde::Serialize;

/// Where a key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotRef {
    Chain { bucket: usize, item: usize },
    Slot(usize),
}

/// Table state at one lookup step. The table itself is not modified by a
/// lookup; every step still carries its own copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupSnapshot<T> {
    pub table: T,
    pub key: String,
    #[serde(flatten)]
    pub event: LookupEvent,
}

/// The lookup step vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LookupEvent {
    SearchStart {
        index: usize,
    },
    BucketScan {
        bucket: usize,
        entries: usize,
    },
    Compare {
        bucket: usize,
        item: usize,
        candidate: String,
        is_match: bool,
    },
    Probe {
        index: usize,
        candidate: String,
        is_match: bool,
    },
    Found {
        location: SlotRef,
        value: String,
        probes: Option<usize>,
    },
    NotFound {
        probes: Option<usize>,
    },
}

impl<T> LookupSnapshot<T> {
    /// Slot or bucket the step points at
    pub fn focus_index(&self) -> Option<usize> {
        match &self.event {
            LookupEvent::SearchStart { index } | LookupEvent::Probe { index, .. } => Some(*index),
            LookupEvent::BucketScan { bucket, .. } | LookupEvent::Compare { bucket, .. } => {
                Some(*bucket)
            }
            LookupEvent::Found { location, .. } => match location {
                SlotRef::Chain { bucket, .. } => Some(*bucket),
                SlotRef::Slot(index) => Some(*index),
            },
            LookupEvent::NotFound { .. } => None,
        }
    }
}

impl<T> StepKind for LookupSnapshot<T> {
    fn tag(&self) -> &'static str {
        match self.event {
            LookupEvent::SearchStart { .. } => "search-start",
            LookupEvent::BucketScan { .. } => "bucket-scan",
            LookupEvent::Compare { .. } => "compare",
            LookupEvent::Probe { .. } => "probe",
            LookupEvent::Found { .. } => "found",
            LookupEvent::NotFound { .. } => "not-found",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self.event,
            LookupEvent::Found { .. } | LookupEvent::NotFound { .. }
        )
    }
}

struct Recorder<'a, T> {
    table: &'a T,
    key: &'a str,
    trace: TraceBuilder<LookupSnapshot<T>>,
}

impl<'a, T: HashTable> Recorder<'a, T> {
    fn emit(
        &mut self,
        event: LookupEvent,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let snapshot = LookupSnapshot {
            table: self.table.clone(),
            key: self.key.to_string(),
            event,
        };
        self.trace.push(snapshot, message, highlight, description);
    }

    fn start(&mut self, function: HashFunction) -> Result<usize> {
        let index = function.hash(self.key, self.table.table_size())?.index;
        self.emit(
            LookupEvent::SearchStart { index },
            format!("Searching for \"{}\" (start index {})", self.key, index),
            "Begin search",
            format!("{}(\"{}\") = {}, so the search starts there", function, self.key, index),
        );
        Ok(index)
    }

    fn finish(self, layout: &str) -> Trace<LookupSnapshot<T>> {
        tracing::debug!(
            layout,
            key = self.key,
            steps = self.trace.next_number() - 1,
            "generated lookup trace"
        );
        self.trace.finish()
    }
}

/// Replay a search for `key` in a chaining table.
pub fn lookup_chaining_steps(
    table: &ChainingTable,
    key: &str,
    function: HashFunction,
) -> Result<Trace<LookupSnapshot<ChainingTable>>> {
    let mut rec = Recorder {
        table,
        key,
        trace: TraceBuilder::new(),
    };
    let index = rec.start(function)?;
    let bucket = &table[index];

    rec.emit(
        LookupEvent::BucketScan {
            bucket: index,
            entries: bucket.len(),
        },
        format!("Scanning bucket {}", index),
        format!(
            "{} entr{}",
            bucket.len(),
            if bucket.len() == 1 { "y" } else { "ies" }
        ),
        "Only this bucket can hold the key, so its chain is walked in order",
    );

    for (item, entry) in bucket.iter().enumerate() {
        let is_match = entry.key == key;
        rec.emit(
            LookupEvent::Compare {
                bucket: index,
                item,
                candidate: entry.key.clone(),
                is_match,
            },
            format!("Compare \"{}\" to \"{}\"", entry.key, key),
            if is_match { "Match" } else { "No match" },
            format!("Entry {} of bucket {} holds \"{}\"", item, index, entry.key),
        );

        if is_match {
            rec.emit(
                LookupEvent::Found {
                    location: SlotRef::Chain {
                        bucket: index,
                        item,
                    },
                    value: entry.value.clone(),
                    probes: None,
                },
                format!("Found \"{}\" -> \"{}\"", key, entry.value),
                "Search successful",
                format!("Key located at position {} of bucket {}", item, index),
            );
            return Ok(rec.finish("chaining"));
        }
    }

    rec.emit(
        LookupEvent::NotFound { probes: None },
        format!("Key \"{}\" not found in bucket {}", key, index),
        "Search unsuccessful",
        format!("Bucket {} was exhausted without a match", index),
    );
    Ok(rec.finish("chaining"))
}

/// Replay a search for `key` in an open-addressing table.
pub fn lookup_probing_steps(
    table: &ProbingTable,
    key: &str,
    function: HashFunction,
) -> Result<Trace<LookupSnapshot<ProbingTable>>> {
    let mut rec = Recorder {
        table,
        key,
        trace: TraceBuilder::new(),
    };
    let mut current = rec.start(function)?;
    let mut probes = 0;

    while probes < table.len() {
        let Some(entry) = &table[current] else {
            break;
        };
        let is_match = entry.key == key;
        rec.emit(
            LookupEvent::Probe {
                index: current,
                candidate: entry.key.clone(),
                is_match,
            },
            format!("Probe {}: {}", current, entry.key),
            if is_match { "Match" } else { "Check" },
            if is_match {
                format!("Slot {} holds the key", current)
            } else {
                format!(
                    "Slot {} holds \"{}\", continue to slot {}",
                    current,
                    entry.key,
                    (current + 1) % table.len()
                )
            },
        );

        if is_match {
            rec.emit(
                LookupEvent::Found {
                    location: SlotRef::Slot(current),
                    value: entry.value.clone(),
                    probes: Some(probes),
                },
                format!(
                    "Found \"{}\" -> \"{}\" at index {}",
                    key, entry.value, current
                ),
                format!("Search successful after {} probe(s)", probes),
                format!("The key sat {} slot(s) past its home index", probes),
            );
            return Ok(rec.finish("probing"));
        }

        current = (current + 1) % table.len();
        probes += 1;
    }

    rec.emit(
        LookupEvent::NotFound {
            probes: Some(probes),
        },
        format!("Key \"{}\" not found after {} probe(s)", key, probes),
        "Search unsuccessful",
        if probes == table.len() {
            "Every slot was visited without a match".to_string()
        } else {
            format!("Reached empty slot {}; the key was never inserted", current)
        },
    );
    Ok(rec.finish("probing"))
}
