use super::traits::RecordFile;
use crate::core::models::alignment::Alignment;
use crate::core::models::residue::{Backbone, Residue};
use crate::core::models::sequence::Sequence;
use crate::core::utils::residue_codes::{one_letter_code, three_letter_code};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Alignment needs structure residue {index} but the file has {available}")]
    ResidueOutOfRange { index: usize, available: usize },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars)")]
    LineTooShort,
}

/// Backbone atoms of one residue of a coordinate file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbResidue {
    pub name: String,
    pub chain_id: char,
    pub number: isize,
    pub insertion_code: char,
    pub backbone: Backbone,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map_or(' ', |b| *b as char)
}

fn parse_coordinate(line: &str, line_num: usize, start: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, start + 8);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, start + 8),
            value: value.to_string(),
        },
    })
}

/// PDB-format coordinate files, reduced to backbone atoms.
///
/// Only the first model is read, and only the primary alternate location of each atom.
pub struct PdbFile;

impl RecordFile for PdbFile {
    type Records = Vec<PdbResidue>;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Records, Self::Error> {
        let mut residues: Vec<PdbResidue> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" => {}
                "ENDMDL" => break,
                _ => continue,
            }
            if line.len() < 54 {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort,
                });
            }

            let alt_loc = column_char(&line, 16);
            if alt_loc != ' ' && alt_loc != 'A' {
                continue;
            }

            let atom_name = slice_and_trim(&line, 12, 16);
            let res_name = slice_and_trim(&line, 17, 20);
            let chain_id = column_char(&line, 21);
            let number_str = slice_and_trim(&line, 22, 26);
            let number: isize = number_str.parse().map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidInt {
                    columns: "23-26".into(),
                    value: number_str.to_string(),
                },
            })?;
            let insertion_code = column_char(&line, 26);

            let is_new_residue = residues.last().is_none_or(|last| {
                last.chain_id != chain_id
                    || last.number != number
                    || last.insertion_code != insertion_code
            });
            if is_new_residue {
                residues.push(PdbResidue {
                    name: res_name.to_string(),
                    chain_id,
                    number,
                    insertion_code,
                    backbone: Backbone::default(),
                });
            }

            let slot = match atom_name {
                "N" => 0,
                "CA" => 1,
                "C" => 2,
                "CB" => 3,
                _ => continue,
            };
            let point = Point3::new(
                parse_coordinate(&line, line_num, 30)?,
                parse_coordinate(&line, line_num, 38)?,
                parse_coordinate(&line, line_num, 46)?,
            );
            if let Some(residue) = residues.last_mut() {
                let backbone = &mut residue.backbone;
                match slot {
                    0 => backbone.n = Some(point),
                    1 => backbone.ca = Some(point),
                    2 => backbone.c = Some(point),
                    _ => backbone.cb = Some(point),
                }
            }
        }

        Ok(residues)
    }
}

/// Gives each non-gap residue of `template` the backbone of its structure residue.
///
/// The k-th non-gap residue takes structure residue `first - 1 + k`, counted in file order.
pub fn attach_backbones(template: &Sequence, structure: &[PdbResidue]) -> Result<Sequence, PdbError> {
    let offset = template.first().saturating_sub(1);
    let mut mismatches = 0usize;
    let mut next = offset;

    let residues = template
        .residues()
        .iter()
        .map(|residue| {
            if residue.is_gap() {
                return Ok(residue.clone());
            }
            let record = structure.get(next).ok_or(PdbError::ResidueOutOfRange {
                index: next + 1,
                available: structure.len(),
            })?;
            next += 1;
            if one_letter_code(&record.name) != Some(residue.name()) {
                mismatches += 1;
            }
            Ok(residue.clone().with_backbone(record.backbone))
        })
        .collect::<Result<Vec<Residue>, PdbError>>()?;

    if mismatches > 0 {
        debug!(
            mismatches,
            "Template sequence differs from its structure file at some positions."
        );
    }
    Ok(Sequence::new(residues, template.first(), template.last()))
}

fn write_atom(
    writer: &mut impl Write,
    serial: usize,
    atom: &str,
    res_name: &str,
    res_number: usize,
    point: &Point3<f64>,
    element: &str,
) -> io::Result<()> {
    writeln!(
        writer,
        "{:<6}{:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        "ATOM",
        serial,
        format!(" {:<3}", atom),
        res_name,
        'A',
        res_number,
        point.x,
        point.y,
        point.z,
        1.0,
        0.0,
        element
    )
}

/// Writes the query threaded on the template backbone: for every column where neither side
/// is a gap, the N, CA and C atoms of the template residue under the query residue's name.
///
/// Residues are numbered by their position in the ungapped query.
pub fn write_threaded_model(alignment: &Alignment, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "REMARK Threading of query sequence on the {} template #{}.",
        alignment.template_name(),
        alignment.num
    )?;

    let mut serial = 1;
    for (k, (position, query_residue)) in alignment.query.cursor().enumerate() {
        let Some(template_residue) = alignment.template.residue(position) else {
            continue;
        };
        if template_residue.is_gap() {
            continue;
        }
        let res_name = three_letter_code(query_residue.name());
        let res_number = alignment.query.first() + k;
        let backbone = template_residue.backbone();
        for (atom, element, point) in [
            ("N", "N", backbone.n),
            ("CA", "C", backbone.ca),
            ("C", "C", backbone.c),
        ] {
            if let Some(point) = point {
                write_atom(writer, serial, atom, res_name, res_number, &point, element)?;
                serial += 1;
            }
        }
    }
    writeln!(writer, "END")
}
