use crate::core::models::alignment::{Alignment, Benchmark, TemplateInfo};
use crate::core::models::residue::{Residue, SecondaryStructure};
use crate::core::models::sequence::Sequence;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Confidence given to labels observed on a solved structure.
const OBSERVED_CONFIDENCE: u8 = 9;

#[derive(Debug, Error)]
pub enum AlignmentSetError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid alignment set '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Alignment set '{path}' has no alignments")]
    Empty { path: String },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct QueryEntry {
    pub name: String,
    /// Length of the ungapped query; derived from the prediction or the spans when absent.
    pub length: Option<usize>,
    /// Predicted secondary structure of the ungapped query.
    #[serde(rename = "ss-prediction", default)]
    pub ss_prediction: String,
    /// One 0-9 digit per predicted label.
    #[serde(rename = "ss-confidence", default)]
    pub ss_confidence: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct AlignmentEntry {
    pub num: usize,
    #[serde(default)]
    pub score: f64,
    pub template: String,
    pub pdb: String,
    #[serde(default)]
    pub benchmark: Benchmark,
    /// Coordinate file of the template, relative to the alignment set file.
    pub structure: Option<PathBuf>,
    #[serde(rename = "query-first")]
    pub query_first: usize,
    #[serde(rename = "query-last")]
    pub query_last: usize,
    #[serde(rename = "query-sequence")]
    pub query_sequence: String,
    #[serde(rename = "template-first")]
    pub template_first: usize,
    #[serde(rename = "template-last")]
    pub template_last: usize,
    #[serde(rename = "template-sequence")]
    pub template_sequence: String,
    /// Observed secondary structure of the template, gapped like its sequence.
    #[serde(rename = "template-ss")]
    pub template_ss: Option<String>,
}

/// A query and the candidate alignments produced for it upstream.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct AlignmentSet {
    pub query: QueryEntry,
    pub alignments: Vec<AlignmentEntry>,
}

impl AlignmentSet {
    pub fn load(path: &Path) -> Result<Self, AlignmentSetError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| AlignmentSetError::Io {
            path: path_str.clone(),
            source,
        })?;
        let mut set: Self = toml::from_str(&content).map_err(|source| AlignmentSetError::Toml {
            path: path_str.clone(),
            source,
        })?;
        if set.alignments.is_empty() {
            return Err(AlignmentSetError::Empty { path: path_str });
        }

        let absolute = std::path::absolute(path).map_err(|source| AlignmentSetError::Io {
            path: path_str.clone(),
            source,
        })?;
        let base = absolute.parent().unwrap_or_else(|| Path::new("/"));
        for entry in &mut set.alignments {
            if let Some(structure) = entry.structure.take() {
                entry.structure = Some(base.join(structure));
            }
        }
        debug!(
            path = %path_str,
            query = %set.query.name,
            alignments = set.alignments.len(),
            "Loaded alignment set."
        );
        Ok(set)
    }

    /// Length of the ungapped query sequence.
    pub fn query_length(&self) -> usize {
        self.query.length.unwrap_or_else(|| {
            let predicted = self.query.ss_prediction.chars().count();
            let spanned = self
                .alignments
                .iter()
                .map(|a| a.query_last)
                .max()
                .unwrap_or(0);
            predicted.max(spanned)
        })
    }

    /// Builds one [`Alignment`] per entry: the query carries its predicted secondary
    /// structure, the template its observed one. Coordinates are attached separately.
    pub fn alignments(&self) -> Vec<Alignment> {
        self.alignments
            .iter()
            .map(|entry| self.build(entry))
            .collect()
    }

    fn build(&self, entry: &AlignmentEntry) -> Alignment {
        let predictions: Vec<(char, u8)> = self
            .query
            .ss_prediction
            .chars()
            .zip(
                self.query
                    .ss_confidence
                    .chars()
                    .map(|c| c.to_digit(10).unwrap_or(0) as u8)
                    .chain(std::iter::repeat(0)),
            )
            .collect();

        let offset = entry.query_first.saturating_sub(1);
        let mut k = 0;
        let mut unlabelled = 0usize;
        let query_residues = entry
            .query_sequence
            .chars()
            .map(|name| {
                let residue = Residue::new(name);
                if residue.is_gap() {
                    return residue;
                }
                let prediction = predictions.get(offset + k);
                k += 1;
                match prediction.and_then(|&(code, conf)| {
                    SecondaryStructure::from_code(code).map(|ss| (ss, conf))
                }) {
                    Some((ss, conf)) => residue.with_secondary_structure(ss, conf),
                    None => {
                        unlabelled += 1;
                        residue
                    }
                }
            })
            .collect();
        if unlabelled > 0 && !predictions.is_empty() {
            warn!(
                alignment = entry.num,
                template = %entry.template,
                unlabelled,
                "Query residues fall outside the secondary structure prediction."
            );
        }

        let observed: Vec<Option<SecondaryStructure>> = entry
            .template_ss
            .as_deref()
            .map(|ss| ss.chars().map(SecondaryStructure::from_code).collect())
            .unwrap_or_default();
        let template_residues = entry
            .template_sequence
            .chars()
            .enumerate()
            .map(|(position, name)| {
                let residue = Residue::new(name);
                match observed.get(position).copied().flatten() {
                    Some(ss) => residue.with_secondary_structure(ss, OBSERVED_CONFIDENCE),
                    None => residue,
                }
            })
            .collect();

        Alignment::new(
            entry.num,
            entry.score,
            Sequence::new(query_residues, entry.query_first, entry.query_last),
            Sequence::new(
                template_residues,
                entry.template_first,
                entry.template_last,
            ),
            TemplateInfo {
                name: entry.template.clone(),
                pdb: entry.pdb.clone(),
                benchmark: entry.benchmark,
                structure: entry.structure.clone(),
            },
        )
    }
}
