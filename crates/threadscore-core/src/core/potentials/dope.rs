use crate::core::utils::residue_codes::one_letter_code;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Number of distance bins per residue pair.
pub const BUCKET_COUNT: usize = 30;
/// Width of a distance bin in Angstroms; bin `k` is centred on `0.25 + k * 0.5`.
pub const BUCKET_WIDTH: f64 = 0.5;

const BACKBONE_ATOM: &str = "CA";

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed energy table line {line}: {details}")]
    Parse { line: usize, details: String },
    #[error("Unknown residue name '{name}' on energy table line {line}")]
    UnknownResidue { line: usize, name: String },
    #[error(
        "Energy table line {line} has {found} energy values, expected {expected}",
        expected = BUCKET_COUNT
    )]
    BucketCount { line: usize, found: usize },
}

/// Statistical distance-dependent pair potential, keyed by an ordered pair of one-letter
/// residue names.
///
/// The table is loaded once and only read afterwards, so a single instance can be shared
/// across scoring threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DopeTable {
    energies: HashMap<(char, char), [f64; BUCKET_COUNT]>,
}

impl DopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, first: char, second: char, energies: [f64; BUCKET_COUNT]) {
        self.energies.insert(
            (first.to_ascii_uppercase(), second.to_ascii_uppercase()),
            energies,
        );
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Discretizes a distance into its bin index, clamped to the last bin.
    pub fn bucket(distance: f64) -> usize {
        let index = (distance / BUCKET_WIDTH).floor();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(BUCKET_COUNT - 1)
        }
    }

    /// Energy of the residue pair at the given bin.
    ///
    /// The potential is symmetric, so a table that only lists one ordering of a pair still
    /// answers for the other.
    pub fn energy(&self, first: char, second: char, bucket: usize) -> Option<f64> {
        let key = (first.to_ascii_uppercase(), second.to_ascii_uppercase());
        self.energies
            .get(&key)
            .or_else(|| self.energies.get(&(key.1, key.0)))
            .and_then(|values| values.get(bucket))
            .copied()
    }

    pub fn energy_at(&self, first: char, second: char, distance: f64) -> Option<f64> {
        self.energy(first, second, Self::bucket(distance))
    }

    /// Loads a DOPE parameter file.
    ///
    /// Each line reads `RES1 ATOM1 RES2 ATOM2 e1 .. e30`. Only alpha-carbon pairs are kept;
    /// blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let file = std::fs::File::open(path).map_err(|e| TableLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let table = Self::read_from(BufReader::new(file)).map_err(|e| match e {
            TableLoadError::Io { source, .. } => TableLoadError::Io {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })?;
        debug!(path = ?path, pairs = table.len(), "Loaded distance energy table.");
        Ok(table)
    }

    pub fn read_from(reader: impl BufRead) -> Result<Self, TableLoadError> {
        let mut table = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line_num = index + 1;
            let line = line.map_err(|e| TableLoadError::Io {
                path: String::new(),
                source: e,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(TableLoadError::Parse {
                    line: line_num,
                    details: "expected residue and atom names before the energy values".into(),
                });
            }
            if fields[1] != BACKBONE_ATOM || fields[3] != BACKBONE_ATOM {
                continue;
            }

            let first = one_letter_code(fields[0]).ok_or_else(|| TableLoadError::UnknownResidue {
                line: line_num,
                name: fields[0].to_string(),
            })?;
            let second =
                one_letter_code(fields[2]).ok_or_else(|| TableLoadError::UnknownResidue {
                    line: line_num,
                    name: fields[2].to_string(),
                })?;

            let values = &fields[4..];
            if values.len() != BUCKET_COUNT {
                return Err(TableLoadError::BucketCount {
                    line: line_num,
                    found: values.len(),
                });
            }
            let mut energies = [0.0; BUCKET_COUNT];
            for (slot, raw) in energies.iter_mut().zip(values) {
                *slot = raw.parse().map_err(|_| TableLoadError::Parse {
                    line: line_num,
                    details: format!("invalid energy value '{}'", raw),
                })?;
            }
            table.insert(first, second, energies);
        }
        Ok(table)
    }
}
