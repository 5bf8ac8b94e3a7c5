//! Hash table step generators
//!
//! Two insertion traces layered on [`hashfn`](crate::hashfn):
//! - [`hash_with_chaining_steps`]: every bucket is a list and colliding keys
//!   are appended to it
//! - [`hash_with_linear_probing_steps`]: every slot holds at most one entry
//!   and collisions walk forward (wrapping) to the next free slot
//!
//! and two lookup traces that replay a search over a table taken from the
//! final step of an insertion trace ([`lookup_chaining_steps`],
//! [`lookup_probing_steps`]).
//!
//! # Table snapshots
//!
//! Each step stores a deep copy of the table. Within one run a chained key is
//! never removed and an occupied slot never empties. Re-inserting a key that
//! already occupies a probing slot overwrites that slot in place.
//!
//! # Full tables
//!
//! When linear probing has visited every slot without finding room, the key
//! gets a `table-full` step and is dropped. The table is not resized and the
//! remaining keys are still processed.

mod lookup;

pub use lookup::{
    lookup_chaining_steps, lookup_probing_steps, LookupEvent, LookupSnapshot, SlotRef,
};

use crate::error::{Result, VizError};
use crate::hashfn::HashFunction;
use crate::trace::{StepKind, Trace, TraceBuilder};
use serde::Serialize;

/// A stored key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    /// The value the visualizer stores for `key`.
    pub fn for_key(key: &str) -> Self {
        Entry {
            key: key.to_string(),
            value: format!("value_{}", key),
        }
    }
}

pub type Bucket = Vec<Entry>;

/// Buckets of a chaining table
pub type ChainingTable = Vec<Bucket>;

/// Slots of an open-addressing table
pub type ProbingTable = Vec<Option<Entry>>;

/// Summary figures for a table snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableStats {
    pub table_size: usize,
    pub elements: usize,
    pub load_factor: f64,
    pub occupied: usize,
    /// Buckets holding more than one entry (always 0 for probing tables)
    pub collisions: usize,
    pub longest_chain: usize,
}

/// Shared view over both table layouts.
pub trait HashTable: Clone {
    fn table_size(&self) -> usize;

    fn element_count(&self) -> usize;

    fn stats(&self) -> TableStats;

    fn load_factor(&self) -> f64 {
        match self.table_size() {
            0 => 0.0,
            size => self.element_count() as f64 / size as f64,
        }
    }
}

impl HashTable for ChainingTable {
    fn table_size(&self) -> usize {
        self.len()
    }

    fn element_count(&self) -> usize {
        self.iter().map(Vec::len).sum()
    }

    fn stats(&self) -> TableStats {
        TableStats {
            table_size: self.len(),
            elements: self.element_count(),
            load_factor: self.load_factor(),
            occupied: self.iter().filter(|b| !b.is_empty()).count(),
            collisions: self.iter().filter(|b| b.len() > 1).count(),
            longest_chain: self.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

impl HashTable for ProbingTable {
    fn table_size(&self) -> usize {
        self.len()
    }

    fn element_count(&self) -> usize {
        self.iter().filter(|slot| slot.is_some()).count()
    }

    fn stats(&self) -> TableStats {
        let elements = self.element_count();
        TableStats {
            table_size: self.len(),
            elements,
            load_factor: self.load_factor(),
            occupied: elements,
            collisions: 0,
            longest_chain: usize::from(elements > 0),
        }
    }
}

/// The hash-function sub-record attached to computation steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashStep {
    pub key: String,
    /// Value before reduction to an index
    pub hash: i64,
    pub index: usize,
    pub function: HashFunction,
    pub derivation: Vec<String>,
}

/// Table state at one hashing step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashSnapshot<T> {
    pub table: T,
    #[serde(flatten)]
    pub event: HashEvent,
}

pub type ChainingSnapshot = HashSnapshot<ChainingTable>;
pub type ProbingSnapshot = HashSnapshot<ProbingTable>;

/// The insertion step vocabulary for both collision strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HashEvent {
    Initialize {
        table_size: usize,
        function: HashFunction,
    },
    HashComputation {
        hash_step: HashStep,
    },
    HashResult {
        key: String,
        hash: i64,
        index: usize,
        function: HashFunction,
    },
    CollisionDetected {
        key: String,
        index: usize,
        bucket_len: usize,
    },
    InsertChaining {
        key: String,
        value: String,
        index: usize,
        bucket_len: usize,
        collided: bool,
    },
    CollisionProbe {
        key: String,
        initial_index: usize,
        probe_index: usize,
        next_index: usize,
        probe_count: usize,
        occupant: Entry,
    },
    TableFull {
        key: String,
        initial_index: usize,
        probe_count: usize,
    },
    InsertProbing {
        key: String,
        value: String,
        initial_index: usize,
        final_index: usize,
        probe_count: usize,
    },
    Complete {
        keys: usize,
        placed: usize,
        load_factor: f64,
    },
}

impl<T> HashSnapshot<T> {
    /// Slot or bucket the step points at
    pub fn focus_index(&self) -> Option<usize> {
        match &self.event {
            HashEvent::HashComputation { hash_step } => Some(hash_step.index),
            HashEvent::HashResult { index, .. }
            | HashEvent::CollisionDetected { index, .. }
            | HashEvent::InsertChaining { index, .. } => Some(*index),
            HashEvent::CollisionProbe { probe_index, .. } => Some(*probe_index),
            HashEvent::TableFull { initial_index, .. } => Some(*initial_index),
            HashEvent::InsertProbing { final_index, .. } => Some(*final_index),
            HashEvent::Initialize { .. } | HashEvent::Complete { .. } => None,
        }
    }

    /// Derivation lines, present on `hash-computation` steps
    pub fn hash_step(&self) -> Option<&HashStep> {
        match &self.event {
            HashEvent::HashComputation { hash_step } => Some(hash_step),
            _ => None,
        }
    }
}

impl<T> StepKind for HashSnapshot<T> {
    fn tag(&self) -> &'static str {
        match self.event {
            HashEvent::Initialize { .. } => "initialize",
            HashEvent::HashComputation { .. } => "hash-computation",
            HashEvent::HashResult { .. } => "hash-result",
            HashEvent::CollisionDetected { .. } => "collision-detected",
            HashEvent::InsertChaining { .. } => "insert-chaining",
            HashEvent::CollisionProbe { .. } => "collision-probe",
            HashEvent::TableFull { .. } => "table-full",
            HashEvent::InsertProbing { .. } => "insert-probing",
            HashEvent::Complete { .. } => "complete",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.event, HashEvent::Complete { .. })
    }
}

struct Recorder<T> {
    table: T,
    function: HashFunction,
    trace: TraceBuilder<HashSnapshot<T>>,
}

impl<T: HashTable> Recorder<T> {
    fn new(table: T, function: HashFunction) -> Self {
        Recorder {
            table,
            function,
            trace: TraceBuilder::new(),
        }
    }

    fn emit(
        &mut self,
        event: HashEvent,
        message: impl Into<String>,
        highlight: impl Into<String>,
        description: impl Into<String>,
    ) {
        let snapshot = HashSnapshot {
            table: self.table.clone(),
            event,
        };
        self.trace.push(snapshot, message, highlight, description);
    }

    /// Emit `hash-computation` and `hash-result` for `key` and return its
    /// index.
    fn hash_key(&mut self, key: &str, computing: String, result_noun: &str) -> Result<usize> {
        let outcome = self.function.hash(key, self.table.table_size())?;
        let function = self.function;

        self.emit(
            HashEvent::HashComputation {
                hash_step: HashStep {
                    key: key.to_string(),
                    hash: outcome.raw,
                    index: outcome.index,
                    function,
                    derivation: outcome.derivation,
                },
            },
            format!("Computing hash for \"{}\"", key),
            "Hash computation in progress",
            computing,
        );

        self.emit(
            HashEvent::HashResult {
                key: key.to_string(),
                hash: outcome.raw,
                index: outcome.index,
                function,
            },
            format!("Hash result: \"{}\" → {} {}", key, result_noun, outcome.index),
            format!("{}(\"{}\") = {}", function, key, outcome.index),
            if result_noun == "bucket" {
                "Index chosen by hash function"
            } else {
                "Initial index before probing"
            },
        );

        Ok(outcome.index)
    }

    fn complete(&mut self, keys: usize, strategy: &str) {
        let placed = self.table.element_count();
        let load_factor = keys as f64 / self.table.table_size() as f64;
        self.emit(
            HashEvent::Complete {
                keys,
                placed,
                load_factor,
            },
            format!("Hash table construction completed{}", strategy),
            format!("{} keys inserted", keys),
            format!("Final load factor: {:.2}", load_factor),
        );
    }
}

fn check_table_size(table_size: usize) -> Result<()> {
    if table_size == 0 {
        return Err(VizError::invalid("table size must be positive"));
    }
    Ok(())
}

/// Insert `keys` in order into a chaining table of `table_size` buckets.
pub fn hash_with_chaining_steps<S: AsRef<str>>(
    keys: &[S],
    table_size: usize,
    function: HashFunction,
) -> Result<Trace<ChainingSnapshot>> {
    check_table_size(table_size)?;
    let mut rec = Recorder::new(vec![Bucket::new(); table_size], function);

    rec.emit(
        HashEvent::Initialize {
            table_size,
            function,
        },
        format!(
            "Initialized hash table (size {}) using {} hash function",
            table_size, function
        ),
        "Ready for insertions (collision handling: chaining)",
        "Load factor starts at 0.00",
    );

    for key in keys {
        let key = key.as_ref();
        let index = rec.hash_key(
            key,
            format!(
                "Converting characters to numeric value and applying {}",
                function
            ),
            "bucket",
        )?;

        let before = rec.table[index].len();
        let collided = before > 0;
        if collided {
            rec.emit(
                HashEvent::CollisionDetected {
                    key: key.to_string(),
                    index,
                    bucket_len: before,
                },
                format!("Collision detected at bucket {}", index),
                format!("Bucket size before insert: {}", before),
                "Chaining: appending to existing list",
            );
        }

        let entry = Entry::for_key(key);
        let value = entry.value.clone();
        rec.table[index].push(entry);
        let after = rec.table[index].len();

        rec.emit(
            HashEvent::InsertChaining {
                key: key.to_string(),
                value: value.clone(),
                index,
                bucket_len: after,
                collided,
            },
            format!("Inserted \"{}\" -> \"{}\" at bucket {}", key, value, index),
            if collided {
                format!("Collision resolved via chaining (length now {})", after)
            } else {
                "Inserted without collision".to_string()
            },
            if collided {
                "Appended to existing chain"
            } else {
                "First element in bucket"
            },
        );
    }

    rec.complete(keys.len(), "");
    tracing::debug!(
        keys = keys.len(),
        table_size,
        %function,
        steps = rec.trace.next_number() - 1,
        "generated chaining trace"
    );
    Ok(rec.trace.finish())
}

impl Recorder<ProbingTable> {
    /// Walk forward from `initial` until a free slot or a slot already
    /// holding `key`. Returns the slot and the number of probes, or `None`
    /// after `table_size` probes.
    fn probe_for_slot(&mut self, key: &str, initial: usize) -> Option<(usize, usize)> {
        let size = self.table.len();
        let mut current = initial;
        let mut probes = 0;

        loop {
            let occupant = match &self.table[current] {
                Some(entry) if entry.key != key => entry.clone(),
                _ => return Some((current, probes)),
            };

            let next = (current + 1) % size;
            self.emit(
                HashEvent::CollisionProbe {
                    key: key.to_string(),
                    initial_index: initial,
                    probe_index: current,
                    next_index: next,
                    probe_count: probes + 1,
                    occupant: occupant.clone(),
                },
                format!("Collision at bucket {}", current),
                format!(
                    "Occupied by \"{}\" -> probing to {}",
                    occupant.key, next
                ),
                "Bucket occupied, continue linear probing",
            );

            current = next;
            probes += 1;
            if probes >= size {
                return None;
            }
        }
    }
}

/// Insert `keys` in order into an open-addressing table of `table_size`
/// slots.
pub fn hash_with_linear_probing_steps<S: AsRef<str>>(
    keys: &[S],
    table_size: usize,
    function: HashFunction,
) -> Result<Trace<ProbingSnapshot>> {
    check_table_size(table_size)?;
    let mut rec = Recorder::new(vec![None; table_size], function);

    rec.emit(
        HashEvent::Initialize {
            table_size,
            function,
        },
        format!(
            "Initialized hash table (size {}) using open addressing (linear probing)",
            table_size
        ),
        "Each slot holds one key-value pair",
        "Collisions resolved by probing to next slot",
    );

    for key in keys {
        let key = key.as_ref();
        let initial = rec.hash_key(
            key,
            format!("Applying {} to derive starting index", function),
            "starting index",
        )?;

        let Some((slot, probes)) = rec.probe_for_slot(key, initial) else {
            rec.emit(
                HashEvent::TableFull {
                    key: key.to_string(),
                    initial_index: initial,
                    probe_count: table_size,
                },
                format!("Hash table is full! Cannot insert \"{}\"", key),
                format!("All {} slots are already occupied", table_size),
                "Open addressing failed - hash table needs to be resized",
            );
            tracing::debug!(key, table_size, "probing table full, key skipped");
            continue;
        };

        let entry = Entry::for_key(key);
        let value = entry.value.clone();
        rec.table[slot] = Some(entry);

        rec.emit(
            HashEvent::InsertProbing {
                key: key.to_string(),
                value: value.clone(),
                initial_index: initial,
                final_index: slot,
                probe_count: probes,
            },
            format!("Inserted \"{}\" -> \"{}\" at bucket {}", key, value, slot),
            if probes > 0 {
                format!("Collision resolved after {} probe(s)", probes)
            } else {
                "Inserted without collision".to_string()
            },
            if probes > 0 {
                format!("Found empty bucket after {} probe(s)", probes)
            } else {
                "First occupant of bucket".to_string()
            },
        );
    }

    rec.complete(keys.len(), " (linear probing)");
    tracing::debug!(
        keys = keys.len(),
        table_size,
        %function,
        steps = rec.trace.next_number() - 1,
        "generated linear probing trace"
    );
    Ok(rec.trace.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chaining_stats() {
        let table: ChainingTable = vec![
            vec![Entry::for_key("a"), Entry::for_key("b")],
            vec![],
            vec![Entry::for_key("c")],
        ];
        let stats = table.stats();
        assert_eq!(stats.elements, 3);
        assert_eq!(stats.occupied, 2);
        assert_eq!(stats.collisions, 1);
        assert_eq!(stats.longest_chain, 2);
        assert!((stats.load_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_probing_stats() {
        let table: ProbingTable = vec![Some(Entry::for_key("a")), None, None, None];
        let stats = table.stats();
        assert_eq!(stats.elements, 1);
        assert_eq!(stats.collisions, 0);
        assert!((stats.load_factor - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_entry_value() {
        let entry = Entry::for_key("key7");
        assert_eq!(entry.value, "value_key7");
    }
}
