//! Algorithm catalog and run configuration
//!
//! This is the caller layer that sits in front of the generators. It owns
//! everything the generators deliberately leave to their caller:
//!
//! - algorithm identifiers and their categories
//! - default input data and hash-table configuration
//! - range validation of recursion arguments and presence of search targets
//! - key derivation for hashing runs
//! - sorting a copy of the data before binary search
//!
//! [`generate`] validates a [`RunConfig`] and dispatches to exactly one
//! generator, returning the result wrapped in [`GeneratedTrace`].

use crate::error::{Result, VizError};
use crate::hashfn::HashFunction;
use crate::hashing::{
    self, ChainingSnapshot, ChainingTable, LookupSnapshot, ProbingSnapshot, ProbingTable,
};
use crate::recursion::{self, CallSnapshot, HanoiSnapshot, Peg};
use crate::searching::{self, SearchSnapshot};
use crate::sorting::{self, SortSnapshot};
use crate::trace::{StepKind, Trace};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Data used when the caller supplies none
pub const DEFAULT_DATA: [i64; 7] = [64, 34, 25, 12, 22, 11, 90];

/// Keys hashed when the data set is empty
pub const SAMPLE_KEYS: [&str; 6] = ["apple", "banana", "cat", "dog", "elephant", "fox"];

pub const DEFAULT_TABLE_SIZE: usize = 7;
pub const MIN_TABLE_SIZE: usize = 3;
pub const MAX_TABLE_SIZE: usize = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sorting,
    Searching,
    Hashing,
    Recursion,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Sorting,
        Category::Searching,
        Category::Hashing,
        Category::Recursion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Sorting => "Sorting Algorithms",
            Category::Searching => "Search Algorithms",
            Category::Hashing => "Hash Tables",
            Category::Recursion => "Recursion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    LinearSearch,
    BinarySearch,
    HashChaining,
    HashProbing,
    Factorial,
    Fibonacci,
    TowerOfHanoi,
}

impl Algorithm {
    pub const ALL: [Algorithm; 12] = [
        Algorithm::BubbleSort,
        Algorithm::SelectionSort,
        Algorithm::InsertionSort,
        Algorithm::MergeSort,
        Algorithm::QuickSort,
        Algorithm::LinearSearch,
        Algorithm::BinarySearch,
        Algorithm::HashChaining,
        Algorithm::HashProbing,
        Algorithm::Factorial,
        Algorithm::Fibonacci,
        Algorithm::TowerOfHanoi,
    ];

    /// Stable kebab-case identifier used on the command line
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubble-sort",
            Algorithm::SelectionSort => "selection-sort",
            Algorithm::InsertionSort => "insertion-sort",
            Algorithm::MergeSort => "merge-sort",
            Algorithm::QuickSort => "quick-sort",
            Algorithm::LinearSearch => "linear-search",
            Algorithm::BinarySearch => "binary-search",
            Algorithm::HashChaining => "hash-chaining",
            Algorithm::HashProbing => "hash-probing",
            Algorithm::Factorial => "factorial",
            Algorithm::Fibonacci => "fibonacci",
            Algorithm::TowerOfHanoi => "tower-hanoi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "Bubble Sort",
            Algorithm::SelectionSort => "Selection Sort",
            Algorithm::InsertionSort => "Insertion Sort",
            Algorithm::MergeSort => "Merge Sort",
            Algorithm::QuickSort => "Quick Sort",
            Algorithm::LinearSearch => "Linear Search",
            Algorithm::BinarySearch => "Binary Search",
            Algorithm::HashChaining => "Hash with Chaining",
            Algorithm::HashProbing => "Hash with Linear Probing",
            Algorithm::Factorial => "Factorial",
            Algorithm::Fibonacci => "Fibonacci",
            Algorithm::TowerOfHanoi => "Tower of Hanoi",
        }
    }

    pub fn complexity(self) -> &'static str {
        match self {
            Algorithm::BubbleSort | Algorithm::SelectionSort | Algorithm::InsertionSort => "O(n²)",
            Algorithm::MergeSort | Algorithm::QuickSort => "O(n log n)",
            Algorithm::LinearSearch => "O(n)",
            Algorithm::BinarySearch => "O(log n)",
            Algorithm::HashChaining | Algorithm::HashProbing => "O(1) avg",
            Algorithm::Factorial => "O(n)",
            Algorithm::Fibonacci => "O(n) memoized",
            Algorithm::TowerOfHanoi => "O(2^n)",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Algorithm::BubbleSort
            | Algorithm::SelectionSort
            | Algorithm::InsertionSort
            | Algorithm::MergeSort
            | Algorithm::QuickSort => Category::Sorting,
            Algorithm::LinearSearch | Algorithm::BinarySearch => Category::Searching,
            Algorithm::HashChaining | Algorithm::HashProbing => Category::Hashing,
            Algorithm::Factorial | Algorithm::Fibonacci | Algorithm::TowerOfHanoi => {
                Category::Recursion
            }
        }
    }

    /// Inclusive range accepted for the run input, for algorithms that
    /// take a bounded argument
    pub fn input_range(self) -> Option<(i64, i64)> {
        match self {
            Algorithm::Factorial => Some((0, 8)),
            Algorithm::Fibonacci => Some((0, 10)),
            Algorithm::TowerOfHanoi => Some((1, 5)),
            _ => None,
        }
    }

    /// What the run input means, for algorithms that need one
    pub fn input_name(self) -> Option<&'static str> {
        match self.category() {
            Category::Searching => Some("search target"),
            Category::Recursion => Some(match self {
                Algorithm::TowerOfHanoi => "number of disks",
                _ => "n",
            }),
            _ => None,
        }
    }

    pub fn in_category(category: Category) -> impl Iterator<Item = Algorithm> {
        Algorithm::ALL
            .into_iter()
            .filter(move |a| a.category() == category)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id() == wanted)
            .ok_or(VizError::UnknownAlgorithm {
                name: s.to_string(),
            })
    }
}

/// Table size and hash function for hashing runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    pub table_size: usize,
    pub function: HashFunction,
}

impl Default for HashConfig {
    fn default() -> Self {
        HashConfig {
            table_size: DEFAULT_TABLE_SIZE,
            function: HashFunction::Modulo,
        }
    }
}

impl HashConfig {
    /// Build from loosely-typed user input. Out-of-range sizes and unknown
    /// function names fall back to the defaults instead of failing.
    pub fn new(table_size: i64, function: &str) -> Self {
        let table_size = match usize::try_from(table_size) {
            Ok(size) if (MIN_TABLE_SIZE..=MAX_TABLE_SIZE).contains(&size) => size,
            _ => {
                tracing::warn!(
                    requested = table_size,
                    fallback = DEFAULT_TABLE_SIZE,
                    "table size out of range, using default"
                );
                DEFAULT_TABLE_SIZE
            }
        };
        let function = function.parse().unwrap_or_else(|_| {
            tracing::warn!(requested = function, "unknown hash function, using modulo");
            HashFunction::Modulo
        });
        HashConfig {
            table_size,
            function,
        }
    }
}

/// Everything needed to produce one trace.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub algorithm: Algorithm,
    pub data: Vec<i64>,
    pub input: Option<i64>,
    pub hash: HashConfig,
    /// Key to search for in the finished table (hashing runs only)
    pub lookup: Option<String>,
}

impl RunConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        RunConfig {
            algorithm,
            data: DEFAULT_DATA.to_vec(),
            input: None,
            hash: HashConfig::default(),
            lookup: None,
        }
    }

    pub fn with_data(mut self, data: Vec<i64>) -> Self {
        self.data = data;
        self
    }

    pub fn with_input(mut self, input: i64) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_hash(mut self, hash: HashConfig) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_lookup(mut self, key: impl Into<String>) -> Self {
        self.lookup = Some(key.into());
        self
    }

    /// Keys inserted by hashing runs: `key<n>` per data value, or the
    /// sample keys when there is no data.
    pub fn keys(&self) -> Vec<String> {
        if self.data.is_empty() {
            SAMPLE_KEYS.iter().map(|k| k.to_string()).collect()
        } else {
            self.data.iter().map(|n| format!("key{}", n)).collect()
        }
    }

    fn required_input(&self) -> Result<i64> {
        let what = self.algorithm.input_name().unwrap_or("input");
        let value = self.input.ok_or(VizError::MissingInput { what })?;
        if let Some((min, max)) = self.algorithm.input_range() {
            if !(min..=max).contains(&value) {
                return Err(VizError::OutOfRange {
                    what,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(value)
    }

    fn recursion_argument(&self) -> Result<u32> {
        let value = self.required_input()?;
        u32::try_from(value)
            .map_err(|_| VizError::invalid(format!("{} is not a valid argument", value)))
    }
}

/// A trace from any family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedTrace {
    Sorting(Trace<SortSnapshot>),
    Searching(Trace<SearchSnapshot>),
    Chaining(Trace<ChainingSnapshot>),
    Probing(Trace<ProbingSnapshot>),
    ChainingLookup(Trace<LookupSnapshot<ChainingTable>>),
    ProbingLookup(Trace<LookupSnapshot<ProbingTable>>),
    Calls(Trace<CallSnapshot>),
    Hanoi(Trace<HanoiSnapshot>),
}

macro_rules! each_trace {
    ($value:expr, $trace:ident => $body:expr) => {
        match $value {
            GeneratedTrace::Sorting($trace) => $body,
            GeneratedTrace::Searching($trace) => $body,
            GeneratedTrace::Chaining($trace) => $body,
            GeneratedTrace::Probing($trace) => $body,
            GeneratedTrace::ChainingLookup($trace) => $body,
            GeneratedTrace::ProbingLookup($trace) => $body,
            GeneratedTrace::Calls($trace) => $body,
            GeneratedTrace::Hanoi($trace) => $body,
        }
    };
}

impl GeneratedTrace {
    pub fn len(&self) -> usize {
        each_trace!(self, t => t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tags(&self) -> Vec<&'static str> {
        each_trace!(self, t => t.tags())
    }

    /// Plain-text narrative of every step, one block per step.
    pub fn narrative(&self) -> Vec<String> {
        each_trace!(self, t => t
            .iter()
            .map(|s| {
                format!(
                    "#{:<4} {:<18} {}\n      {}\n      {}",
                    s.sequence_number,
                    s.tag(),
                    s.message,
                    s.highlight,
                    s.description
                )
            })
            .collect())
    }

    fn ensure_non_empty(self) -> Result<Self> {
        if self.is_empty() {
            Err(VizError::EmptyTrace)
        } else {
            Ok(self)
        }
    }
}

fn last_table<T: Clone>(trace: &Trace<hashing::HashSnapshot<T>>) -> Result<T> {
    trace
        .last()
        .map(|step| step.state.table.clone())
        .ok_or(VizError::EmptyTrace)
}

/// Validate `config` and run the matching generator.
pub fn generate(config: &RunConfig) -> Result<GeneratedTrace> {
    let algorithm = config.algorithm;
    tracing::info!(%algorithm, data = ?config.data, input = ?config.input, "generating steps");

    if config.lookup.is_some() && algorithm.category() != Category::Hashing {
        return Err(VizError::invalid(format!(
            "--lookup only applies to hashing algorithms, not {}",
            algorithm
        )));
    }

    let trace = match algorithm {
        Algorithm::BubbleSort => GeneratedTrace::Sorting(sorting::bubble_sort_steps(&config.data)),
        Algorithm::SelectionSort => {
            GeneratedTrace::Sorting(sorting::selection_sort_steps(&config.data))
        }
        Algorithm::InsertionSort => {
            GeneratedTrace::Sorting(sorting::insertion_sort_steps(&config.data))
        }
        Algorithm::MergeSort => GeneratedTrace::Sorting(sorting::merge_sort_steps(&config.data)),
        Algorithm::QuickSort => GeneratedTrace::Sorting(sorting::quick_sort_steps(&config.data)),
        Algorithm::LinearSearch => {
            let target = config.required_input()?;
            GeneratedTrace::Searching(searching::linear_search_steps(&config.data, target, 0))
        }
        Algorithm::BinarySearch => {
            let target = config.required_input()?;
            let mut sorted = config.data.clone();
            sorted.sort_unstable();
            GeneratedTrace::Searching(searching::binary_search_steps(&sorted, target))
        }
        Algorithm::HashChaining => {
            let HashConfig {
                table_size,
                function,
            } = config.hash;
            let built = hashing::hash_with_chaining_steps(&config.keys(), table_size, function)?;
            match &config.lookup {
                Some(key) => GeneratedTrace::ChainingLookup(hashing::lookup_chaining_steps(
                    &last_table(&built)?,
                    key,
                    function,
                )?),
                None => GeneratedTrace::Chaining(built),
            }
        }
        Algorithm::HashProbing => {
            let HashConfig {
                table_size,
                function,
            } = config.hash;
            let built =
                hashing::hash_with_linear_probing_steps(&config.keys(), table_size, function)?;
            match &config.lookup {
                Some(key) => GeneratedTrace::ProbingLookup(hashing::lookup_probing_steps(
                    &last_table(&built)?,
                    key,
                    function,
                )?),
                None => GeneratedTrace::Probing(built),
            }
        }
        Algorithm::Factorial => {
            GeneratedTrace::Calls(recursion::factorial_steps(config.recursion_argument()?)?)
        }
        Algorithm::Fibonacci => {
            GeneratedTrace::Calls(recursion::fibonacci_steps(config.recursion_argument()?)?)
        }
        Algorithm::TowerOfHanoi => GeneratedTrace::Hanoi(recursion::tower_of_hanoi_steps(
            config.recursion_argument()?,
            Peg::A,
            Peg::C,
            Peg::B,
        )?),
    };

    let trace = trace.ensure_non_empty()?;
    tracing::info!(%algorithm, steps = trace.len(), "generated animation steps");
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_ids_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.id().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!(matches!(
            "heap-sort".parse::<Algorithm>(),
            Err(VizError::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_hash_config_falls_back() {
        assert_eq!(HashConfig::new(50, "djb2").table_size, DEFAULT_TABLE_SIZE);
        assert_eq!(HashConfig::new(-1, "modulo").table_size, DEFAULT_TABLE_SIZE);
        assert_eq!(HashConfig::new(11, "nope").function, HashFunction::Modulo);

        let cfg = HashConfig::new(13, "multiplicative");
        assert_eq!(cfg.table_size, 13);
        assert_eq!(cfg.function, HashFunction::Multiplicative);
    }

    #[test]
    fn test_keys() {
        let cfg = RunConfig::new(Algorithm::HashChaining).with_data(vec![3, 7]);
        assert_eq!(cfg.keys(), vec!["key3", "key7"]);

        let cfg = RunConfig::new(Algorithm::HashChaining).with_data(vec![]);
        assert_eq!(cfg.keys().len(), SAMPLE_KEYS.len());
    }

    #[test]
    fn test_input_validation() {
        let cfg = RunConfig::new(Algorithm::Factorial);
        assert_eq!(
            generate(&cfg),
            Err(VizError::MissingInput { what: "n" })
        );

        let cfg = RunConfig::new(Algorithm::TowerOfHanoi).with_input(6);
        assert!(matches!(
            generate(&cfg),
            Err(VizError::OutOfRange { value: 6, min: 1, max: 5, .. })
        ));

        let cfg = RunConfig::new(Algorithm::BubbleSort).with_lookup("key3");
        assert!(matches!(generate(&cfg), Err(VizError::InvalidArgument { .. })));
    }

    #[test]
    fn test_binary_search_sorts_copy() {
        let cfg = RunConfig::new(Algorithm::BinarySearch).with_input(25);
        let GeneratedTrace::Searching(trace) = generate(&cfg).unwrap() else {
            panic!("expected a searching trace");
        };
        assert_eq!(trace.first().unwrap().state.array, vec![11, 12, 22, 25, 34, 64, 90]);
        assert_eq!(trace.last().unwrap().tag(), "found");
    }
}
