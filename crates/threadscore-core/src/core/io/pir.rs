use crate::core::models::alignment::Alignment;
use crate::core::models::sequence::Sequence;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const LINE_WIDTH: usize = 75;

/// Code under which the query appears in the alignment file.
pub fn query_code(alignment: &Alignment) -> String {
    format!("query_{}", alignment.template_name())
}

fn write_wrapped(writer: &mut impl Write, sequence: &Sequence) -> io::Result<()> {
    let mut text = sequence.to_gapped_string();
    text.push('*');
    let chars: Vec<char> = text.chars().collect();
    for chunk in chars.chunks(LINE_WIDTH) {
        writeln!(writer, "{}", chunk.iter().collect::<String>())?;
    }
    Ok(())
}

/// Writes the two-record PIR alignment consumed by the comparative modeling tool: the
/// template as a `structure` record spanning its aligned residues, then the query as a
/// plain `sequence` record.
pub fn write_pir(alignment: &Alignment, writer: &mut impl Write) -> io::Result<()> {
    let template = &alignment.template;
    let code = &alignment.template_info.pdb;

    writeln!(writer, ">P1;{}", code)?;
    writeln!(
        writer,
        "structure:{}:{}:@:{}:@::::",
        code,
        template.first(),
        template.last()
    )?;
    write_wrapped(writer, template)?;
    writeln!(writer)?;
    writeln!(writer, ">P1;{}", query_code(alignment))?;
    writeln!(writer, "sequence:::::::::")?;
    write_wrapped(writer, &alignment.query)
}

pub fn write_pir_to_path<P: AsRef<Path>>(alignment: &Alignment, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_pir(alignment, &mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::alignment::TemplateInfo;
    use tempfile::tempdir;

    fn alignment(query: &str, template: &str) -> Alignment {
        Alignment::new(
            1,
            12.5,
            Sequence::from_gapped(query, 1, 4),
            Sequence::from_gapped(template, 3, 6),
            TemplateInfo {
                name: "Agglutinin".into(),
                pdb: "1jlxa1".into(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn writes_template_then_query_record() {
        let mut out = Vec::new();
        write_pir(&alignment("AC-DE", "ACGD-"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            ">P1;1jlxa1\nstructure:1jlxa1:3:@:6:@::::\nACGD-*\n\n\
             >P1;query_Agglutinin\nsequence:::::::::\nAC-DE*\n"
        );
    }

    #[test]
    fn long_sequences_are_wrapped() {
        let long = "A".repeat(100);
        let mut out = Vec::new();
        write_pir(&alignment(&long, &long), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().all(|l| l.len() <= LINE_WIDTH));
        assert!(text.contains(&format!("{}*\n", "A".repeat(25))));
    }

    #[test]
    fn write_pir_to_path_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aln.ali");
        write_pir_to_path(&alignment("AC", "AC"), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(">P1;1jlxa1\n"));
        assert!(text.ends_with("AC*\n"));
    }
}
