//! String hash functions with human-readable derivations
//!
//! Each [`HashFunction`] maps a key and a table size to a bucket index and
//! records the arithmetic it performed as a list of derivation lines, which
//! the hashing traces show next to the table.
//!
//! # Functions
//!
//! - [`HashFunction::Modulo`]: sum of character codes, reduced modulo the
//!   table size
//! - [`HashFunction::Multiplicative`]: Knuth's multiplicative method with the
//!   golden-ratio constant [`GOLDEN_RATIO_FRACTION`]
//! - [`HashFunction::Djb2`]: Bernstein's `hash * 33 + c`, starting at 5381,
//!   with the 32-bit shift wraparound of the classic implementation
//!
//! Character codes are UTF-16 code units, so non-ASCII keys hash the same way
//! a browser would compute them.

use crate::error::{Result, VizError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Fractional multiplier used by the multiplicative method
pub const GOLDEN_RATIO_FRACTION: f64 = 0.6180339887;

/// Starting value of the djb2 hash
pub const DJB2_SEED: i64 = 5381;

/// Result of hashing one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashOutcome {
    /// Value before reduction to a table index (character sum, or the final
    /// djb2 accumulator)
    pub raw: i64,
    /// Bucket index in `0..table_size`
    pub index: usize,
    /// Ordered explanation of the computation
    pub derivation: Vec<String>,
}

/// The selectable hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashFunction {
    #[default]
    Modulo,
    #[serde(rename = "multiplication")]
    Multiplicative,
    Djb2,
}

impl HashFunction {
    pub const ALL: [HashFunction; 3] = [
        HashFunction::Modulo,
        HashFunction::Multiplicative,
        HashFunction::Djb2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HashFunction::Modulo => "modulo",
            HashFunction::Multiplicative => "multiplication",
            HashFunction::Djb2 => "djb2",
        }
    }

    /// Hash `key` into a table of `table_size` buckets.
    pub fn hash(self, key: &str, table_size: usize) -> Result<HashOutcome> {
        if table_size == 0 {
            return Err(VizError::invalid("table size must be positive"));
        }

        let outcome = match self {
            HashFunction::Modulo => modulo(key, table_size),
            HashFunction::Multiplicative => multiplicative(key, table_size),
            HashFunction::Djb2 => djb2(key, table_size),
        };
        debug_assert!(outcome.index < table_size);
        Ok(outcome)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modulo" | "sum" | "mod" => Ok(HashFunction::Modulo),
            "multiplication" | "multiplicative" | "mult" => Ok(HashFunction::Multiplicative),
            "djb2" => Ok(HashFunction::Djb2),
            other => Err(VizError::invalid(format!("unknown hash function '{}'", other))),
        }
    }
}

fn char_codes(key: &str) -> Vec<u16> {
    key.encode_utf16().collect()
}

fn sum_codes(codes: &[u16]) -> i64 {
    codes.iter().map(|&c| i64::from(c)).sum()
}

fn sum_expression(codes: &[u16], sum: i64) -> String {
    if codes.is_empty() {
        format!("Sum: {}", sum)
    } else {
        let terms: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        format!("Sum: {} = {}", terms.join(" + "), sum)
    }
}

fn code_list(codes: &[u16]) -> String {
    let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
    format!("Character codes: [{}]", codes.join(", "))
}

fn modulo(key: &str, table_size: usize) -> HashOutcome {
    let codes = char_codes(key);
    let sum = sum_codes(&codes);
    let index = sum.rem_euclid(table_size as i64) as usize;

    HashOutcome {
        raw: sum,
        index,
        derivation: vec![
            format!("Key: \"{}\"", key),
            code_list(&codes),
            sum_expression(&codes, sum),
            format!("Hash: {} mod {} = {}", sum, table_size, index),
        ],
    }
}

fn multiplicative(key: &str, table_size: usize) -> HashOutcome {
    let codes = char_codes(key);
    let sum = sum_codes(&codes);
    let product = sum as f64 * GOLDEN_RATIO_FRACTION;
    let fraction = product.fract();
    // fraction < 1, so the floor stays below table_size
    let index = ((table_size as f64 * fraction).floor() as usize).min(table_size - 1);

    HashOutcome {
        raw: sum,
        index,
        derivation: vec![
            format!("Key: \"{}\"", key),
            code_list(&codes),
            format!("Sum: {}", sum),
            format!(
                "Product: {} × {:.10} = {:.10}",
                sum, GOLDEN_RATIO_FRACTION, product
            ),
            format!("Fractional part: {:.10}", fraction),
            format!("Hash: floor({} × {:.6}) = {}", table_size, fraction, index),
        ],
    }
}

/// One djb2 round: `(hash << 5) + hash + code`.
///
/// The shift operates on the low 32 bits of the accumulator as a signed
/// integer and wraps, while the addition is carried out at full width.
fn djb2_round(hash: i64, code: u16) -> i64 {
    let shifted = (hash as i32).wrapping_shl(5);
    i64::from(shifted) + hash + i64::from(code)
}

/// Printable form of a single UTF-16 unit; half of a surrogate pair shows
/// as U+FFFD.
fn code_unit_char(code: u16) -> char {
    char::from_u32(u32::from(code)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn djb2(key: &str, table_size: usize) -> HashOutcome {
    let mut hash = DJB2_SEED;
    let mut derivation = vec![format!("Initial hash: {}", hash)];

    for code in key.encode_utf16() {
        let old = hash;
        hash = djb2_round(old, code);
        derivation.push(format!(
            "'{}' ({}): {} << 5 + {} + {} = {}",
            code_unit_char(code),
            code,
            old,
            old,
            code,
            hash
        ));
    }

    let index = (hash.unsigned_abs() % table_size as u64) as usize;
    derivation.push(format!("Final: |{}| mod {} = {}", hash, table_size, index));

    HashOutcome {
        raw: hash,
        index,
        derivation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulo_derivation() {
        let out = HashFunction::Modulo.hash("ab", 5).unwrap();
        assert_eq!(out.raw, 195);
        assert_eq!(out.index, 0);
        assert_eq!(
            out.derivation,
            vec![
                "Key: \"ab\"",
                "Character codes: [97, 98]",
                "Sum: 97 + 98 = 195",
                "Hash: 195 mod 5 = 0",
            ]
        );
    }

    #[test]
    fn test_modulo_empty_key() {
        let out = HashFunction::Modulo.hash("", 7).unwrap();
        assert_eq!(out.raw, 0);
        assert_eq!(out.index, 0);
        assert_eq!(out.derivation[2], "Sum: 0");
    }

    #[test]
    fn test_multiplicative() {
        // 97 * 0.6180339887 = 59.9492969039, fractional part 0.9492969039
        let out = HashFunction::Multiplicative.hash("a", 10).unwrap();
        assert_eq!(out.raw, 97);
        assert_eq!(out.index, 9);
        assert_eq!(out.derivation[3], "Product: 97 × 0.6180339887 = 59.9492969039");
        assert_eq!(out.derivation[5], "Hash: floor(10 × 0.949297) = 9");
    }

    #[test]
    fn test_djb2_small_key() {
        // 5381 * 33 + 97 = 177670
        let out = HashFunction::Djb2.hash("a", 7).unwrap();
        assert_eq!(out.raw, 177_670);
        assert_eq!(out.index, 177_670 % 7);
        assert_eq!(out.derivation[0], "Initial hash: 5381");
        assert_eq!(out.derivation[1], "'a' (97): 5381 << 5 + 5381 + 97 = 177670");
        assert_eq!(out.derivation.len(), 3);
    }

    #[test]
    fn test_djb2_shift_wraps_at_32_bits() {
        // Long keys push the accumulator past the i32 range before shifting
        let out = HashFunction::Djb2.hash("elephant", 7).unwrap();
        let mut expected = DJB2_SEED;
        for code in "elephant".encode_utf16() {
            expected = i64::from((expected as i32).wrapping_shl(5)) + expected + i64::from(code);
        }
        assert_eq!(out.raw, expected);
        assert!(out.index < 7);
        assert_eq!(out.derivation.len(), "elephant".len() + 2);
    }

    #[test]
    fn test_djb2_splits_astral_chars_into_units() {
        let out = HashFunction::Djb2.hash("\u{1F600}", 7).unwrap();
        assert_eq!(out.derivation.len(), 4);
        assert!(out.derivation[1].starts_with("'\u{FFFD}' (55357): 5381 << 5"));
        assert!(out.derivation[2].starts_with("'\u{FFFD}' (56832): "));
    }

    #[test]
    fn test_zero_table_size_is_invalid() {
        for f in HashFunction::ALL {
            assert!(matches!(
                f.hash("key", 0),
                Err(VizError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("sum".parse::<HashFunction>().unwrap(), HashFunction::Modulo);
        assert_eq!(
            "Multiplicative".parse::<HashFunction>().unwrap(),
            HashFunction::Multiplicative
        );
        assert_eq!("djb2".parse::<HashFunction>().unwrap(), HashFunction::Djb2);
        assert!("sha256".parse::<HashFunction>().is_err());
    }
}
