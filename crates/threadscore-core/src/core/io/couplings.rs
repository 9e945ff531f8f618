use super::traits::RecordFile;
use crate::core::scoring::coevolution::Coupling;
use itertools::Itertools;
use std::io::{self, BufRead};
use thiserror::Error;

/// Pairs closer than this along the sequence are not reported as contacts.
pub const DEFAULT_MIN_SEPARATION: usize = 6;

#[derive(Debug, Error)]
pub enum CouplingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid coupling value '{value}' on line {line}")]
    InvalidValue { line: usize, value: String },
    #[error("Coupling matrix line {line} has {found} values, expected {expected}")]
    NotSquare {
        line: usize,
        found: usize,
        expected: usize,
    },
}

/// Square matrix of co-evolution coupling strengths between query positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CouplingMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CouplingMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn strength(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.size && j < self.size).then(|| self.values[i * self.size + j])
    }

    /// The `count` strongest pairs at least `min_separation` apart, ranked from 1.
    ///
    /// Ties keep sequence order.
    pub fn top_couplings(&self, count: usize, min_separation: usize) -> Vec<Coupling> {
        (0..self.size)
            .tuple_combinations::<(usize, usize)>()
            .filter(|&(i, j)| j - i >= min_separation)
            .map(|(i, j)| (i, j, self.values[i * self.size + j]))
            .sorted_by(|a, b| b.2.total_cmp(&a.2))
            .take(count)
            .enumerate()
            .map(|(k, (i, j, _))| Coupling { rank: k + 1, i, j })
            .collect()
    }
}

/// Whitespace-separated coupling matrix, one row per line (CCMpred output).
pub struct CouplingFile;

impl RecordFile for CouplingFile {
    type Records = CouplingMatrix;
    type Error = CouplingError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Records, Self::Error> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|value| {
                    value.parse::<f64>().map_err(|_| CouplingError::InvalidValue {
                        line: line_num,
                        value: value.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(expected) = rows.first().map(Vec::len) {
                if row.len() != expected {
                    return Err(CouplingError::NotSquare {
                        line: line_num,
                        found: row.len(),
                        expected,
                    });
                }
            }
            rows.push(row);
        }

        let size = rows.len();
        if let Some(first) = rows.first() {
            if first.len() != size {
                return Err(CouplingError::NotSquare {
                    line: 1,
                    found: first.len(),
                    expected: size,
                });
            }
        }
        Ok(CouplingMatrix {
            size,
            values: rows.into_iter().flatten().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn read(content: &str) -> Result<CouplingMatrix, CouplingError> {
        CouplingFile::read_from(&mut BufReader::new(Cursor::new(content)))
    }

    fn matrix(size: usize, strong: &[(usize, usize, f64)]) -> String {
        let mut values = vec![vec![0.0; size]; size];
        for &(i, j, v) in strong {
            values[i][j] = v;
            values[j][i] = v;
        }
        values
            .iter()
            .map(|row| row.iter().map(|v| format!("{:.3}", v)).join("\t"))
            .join("\n")
    }

    #[test]
    fn reads_square_matrix() {
        let parsed = read(&matrix(4, &[(0, 3, 0.5)])).unwrap();
        assert_eq!(parsed.size(), 4);
        assert_eq!(parsed.strength(3, 0), Some(0.5));
        assert_eq!(parsed.strength(4, 0), None);
    }

    #[test]
    fn top_couplings_are_ranked_and_respect_separation() {
        let parsed = read(&matrix(10, &[(0, 9, 0.2), (1, 8, 0.9), (2, 4, 5.0), (0, 7, 0.4)]))
            .unwrap();
        let top = parsed.top_couplings(2, DEFAULT_MIN_SEPARATION);
        assert_eq!(
            top,
            vec![
                Coupling { rank: 1, i: 1, j: 8 },
                Coupling { rank: 2, i: 0, j: 7 },
            ]
        );
    }

    #[test]
    fn asking_for_more_pairs_than_exist_returns_all() {
        let parsed = read(&matrix(3, &[])).unwrap();
        assert_eq!(parsed.top_couplings(10, 1).len(), 3);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(matches!(
            read("0 1 2\n0 1\n"),
            Err(CouplingError::NotSquare { line: 2, .. })
        ));
        assert!(matches!(
            read("0 1 2\n0 1 2\n"),
            Err(CouplingError::NotSquare { line: 1, .. })
        ));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert!(matches!(
            read("0 x\n1 0\n"),
            Err(CouplingError::InvalidValue { line: 1, .. })
        ));
    }
}
