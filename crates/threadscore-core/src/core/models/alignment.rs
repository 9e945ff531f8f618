use super::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Structural relationship between the query and the template, as labelled by the benchmark
/// the alignment comes from. Only used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Benchmark {
    Family,
    Superfamily,
    Fold,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Benchmark::Family => "Family",
            Benchmark::Superfamily => "Superfamily",
            Benchmark::Fold => "Fold",
            Benchmark::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Identity of the template structure an alignment threads the query onto.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateInfo {
    /// Template name, used to key per-template directories.
    pub name: String,
    /// Code of the template's coordinate file (e.g. `1jlxa1`).
    pub pdb: String,
    pub benchmark: Benchmark,
    /// Atomic coordinate file of the template, consumed by the external tools.
    pub structure: Option<PathBuf>,
}

/// A query/template pair of equal-length gapped sequences produced upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Position of the alignment in the upstream ranking (1-based).
    pub num: usize,
    /// Upstream alignment score, carried through for reporting.
    pub score: f64,
    pub query: Sequence,
    pub template: Sequence,
    pub template_info: TemplateInfo,
}

impl Alignment {
    pub fn new(
        num: usize,
        score: f64,
        query: Sequence,
        template: Sequence,
        template_info: TemplateInfo,
    ) -> Self {
        Self {
            num,
            score,
            query,
            template,
            template_info,
        }
    }

    pub fn len(&self) -> usize {
        self.query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.query.len() == self.template.len()
    }

    pub fn template_name(&self) -> &str {
        &self.template_info.name
    }
}
