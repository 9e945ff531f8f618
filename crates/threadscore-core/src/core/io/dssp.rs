use super::traits::RecordFile;
use crate::core::models::residue::SecondaryStructure;
use crate::core::utils::residue_codes::max_accessible_area;
use std::io::{self, BufRead};
use thiserror::Error;

const HEADER_PREFIX: &str = "  #  RESIDUE";
const CHAIN_BREAK: char = '!';

#[derive(Debug, Error)]
pub enum DsspError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: DsspParseErrorKind },
    #[error("No residue table header found")]
    MissingHeader,
}

#[derive(Debug, Error)]
pub enum DsspParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Line is too short for a residue record (must be at least 38 chars)")]
    LineTooShort,
}

/// One residue line of a DSSP report.
#[derive(Debug, Clone, PartialEq)]
pub struct DsspResidue {
    pub number: isize,
    pub chain_id: char,
    /// One-letter code; DSSP's lowercase half-cystine labels are folded into `C`.
    pub amino_acid: char,
    pub structure: SecondaryStructure,
    /// Absolute solvent accessible surface in square Angstroms.
    pub accessibility: f64,
}

impl DsspResidue {
    /// Accessibility relative to the residue type's maximum; `NaN` for residue types without
    /// a reference value.
    pub fn relative_accessibility(&self) -> f64 {
        max_accessible_area(self.amino_acid).map_or(f64::NAN, |max| self.accessibility / max)
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map_or(' ', |b| *b as char)
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<isize, DsspError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| DsspError::Parse {
        line: line_num,
        kind: DsspParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.to_string(),
        },
    })
}

/// Classic DSSP text output.
pub struct DsspFile;

impl RecordFile for DsspFile {
    type Records = Vec<DsspResidue>;
    type Error = DsspError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Records, Self::Error> {
        let mut residues = Vec::new();
        let mut in_table = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if !in_table {
                in_table = line.starts_with(HEADER_PREFIX);
                continue;
            }
            if line.trim().is_empty() || column_char(&line, 13) == CHAIN_BREAK {
                continue;
            }
            if line.len() < 38 {
                return Err(DsspError::Parse {
                    line: line_num,
                    kind: DsspParseErrorKind::LineTooShort,
                });
            }

            let code = column_char(&line, 13);
            let amino_acid = if code.is_ascii_lowercase() {
                'C'
            } else {
                code
            };
            let structure =
                SecondaryStructure::from_code(column_char(&line, 16)).unwrap_or(SecondaryStructure::Coil);

            residues.push(DsspResidue {
                number: parse_int(&line, line_num, 5, 10)?,
                chain_id: column_char(&line, 11),
                amino_acid,
                structure,
                accessibility: parse_int(&line, line_num, 34, 38)? as f64,
            });
        }

        if !in_table {
            return Err(DsspError::MissingHeader);
        }
        Ok(residues)
    }
}

/// Relative accessibility of every residue, in report order.
pub fn relative_accessibilities(residues: &[DsspResidue]) -> Vec<f64> {
    residues
        .iter()
        .map(DsspResidue::relative_accessibility)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    const REPORT: &str = "\
==== Secondary Structure Definition by the program DSSP ==== DATE=2024-01-01
    3  1  0  0  0 TOTAL NUMBER OF RESIDUES, NUMBER OF CHAINS, ...
  #  RESIDUE AA STRUCTURE BP1 BP2  ACC     N-H-->O    O-->H-N    N-H-->O    O-->H-N    TCO  KAPPA ALPHA  PHI   PSI    X-CA   Y-CA   Z-CA
    1    1 A M              0   0  198      0, 0.0     2,-0.3     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 127.4   11.6    6.1   -5.1
    2    2 A K  H >   -     0   0   41      1,-0.2     3,-0.1     0, 0.0     0, 0.0  -0.442 360.0 -90.2 -84.1 137.9    8.2    5.9   -3.5
    3        !              0   0    0      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    0.0    0.0    0.0
    4    4 A a  E     -     0   0   20      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    6.0    4.0   -2.0
";

    fn read(content: &str) -> Result<Vec<DsspResidue>, DsspError> {
        DsspFile::read_from(&mut BufReader::new(Cursor::new(content)))
    }

    #[test]
    fn parses_residue_lines_after_header_and_skips_chain_breaks() {
        let residues = read(REPORT).unwrap();
        assert_eq!(residues.len(), 3);
        assert_eq!(residues[0].amino_acid, 'M');
        assert_eq!(residues[0].accessibility, 198.0);
        assert_eq!(residues[0].structure, SecondaryStructure::Coil);
        assert_eq!(residues[1].structure, SecondaryStructure::Helix);
        assert_eq!(residues[2].number, 4);
    }

    #[test]
    fn lowercase_half_cystines_become_cysteine() {
        let residues = read(REPORT).unwrap();
        assert_eq!(residues[2].amino_acid, 'C');
        assert_eq!(residues[2].structure, SecondaryStructure::Sheet);
    }

    #[test]
    fn relative_accessibility_divides_by_maximum_area() {
        let residues = read(REPORT).unwrap();
        let rsa = relative_accessibilities(&residues);
        let max_lys = max_accessible_area('K').unwrap();
        assert!((rsa[1] - 41.0 / max_lys).abs() < 1e-12);
    }

    #[test]
    fn unknown_residue_has_undefined_relative_accessibility() {
        let residue = DsspResidue {
            number: 1,
            chain_id: 'A',
            amino_acid: 'X',
            structure: SecondaryStructure::Coil,
            accessibility: 10.0,
        };
        assert!(residue.relative_accessibility().is_nan());
    }

    #[test]
    fn report_without_header_is_rejected() {
        assert!(matches!(
            read("nothing to see\n"),
            Err(DsspError::MissingHeader)
        ));
    }

    #[test]
    fn invalid_accessibility_is_rejected() {
        let content = format!(
            "{}\n    1    1 A M              0   0  1x8      0, 0.0\n",
            HEADER_PREFIX
        );
        assert!(matches!(
            read(&content),
            Err(DsspError::Parse {
                line: 2,
                kind: DsspParseErrorKind::InvalidInt { .. }
            })
        ));
    }
}
