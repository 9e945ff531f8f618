use crate::core::models::alignment::Benchmark;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreTableError {
    #[error("Failed to write score table '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// One line of the per-query score table, one per scored template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub template: String,
    pub alignment: usize,
    pub blosum: i32,
    pub threading: f64,
    pub modeller: f64,
    pub secondary_structure: f64,
    pub solvent_access: f64,
    pub co_evolution: f64,
    pub sum_scores: f64,
    pub benchmark: Benchmark,
}

/// Writes the rows as a comma-separated table with a header line.
pub fn write_score_table(rows: &[ScoreRow], path: &Path) -> Result<(), ScoreTableError> {
    let path_str = || path.to_string_lossy().to_string();
    let mut writer = csv::Writer::from_path(path).map_err(|source| ScoreTableError::Csv {
        path: path_str(),
        source,
    })?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|source| ScoreTableError::Csv {
                path: path_str(),
                source,
            })?;
    }
    writer.flush().map_err(|source| ScoreTableError::Io {
        path: path_str(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(template: &str, sum: f64) -> ScoreRow {
        ScoreRow {
            template: template.into(),
            alignment: 2,
            blosum: 17,
            threading: 1.5,
            modeller: 3000.25,
            secondary_structure: 0.75,
            solvent_access: 0.5,
            co_evolution: 1.25,
            sum_scores: sum,
            benchmark: Benchmark::Fold,
        }
    }

    #[test]
    fn writes_header_and_rows_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        write_score_table(&[row("a", 2.0), row("b", 1.0)], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                "template",
                "alignment",
                "blosum",
                "threading",
                "modeller",
                "secondary_structure",
                "solvent_access",
                "co_evolution",
                "sum_scores",
                "benchmark"
            ]
        );
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "a");
        assert_eq!(&records[0][4], "3000.25");
        assert_eq!(&records[0][9], "Fold");
        assert_eq!(&records[1][8], "1.0");
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("scores.csv");
        let result = write_score_table(&[row("a", 0.0)], &path);
        assert!(matches!(result, Err(ScoreTableError::Csv { .. })));
    }
}
