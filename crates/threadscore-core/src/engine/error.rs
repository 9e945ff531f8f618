use thiserror::Error;

use super::config::ConfigError;
use super::diagnostics::Stage;
use super::external::ExternalToolError;
use crate::core::io::alignment_set::AlignmentSetError;
use crate::core::io::couplings::CouplingError;
use crate::core::io::pdb::PdbError;
use crate::core::io::scores::ScoreTableError;
use crate::core::potentials::dope::TableLoadError;
use crate::core::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Alignment #{num} ({template}): {stage} failed: {source}")]
    Scoring {
        num: usize,
        template: String,
        stage: Stage,
        source: ScoringError,
    },

    #[error("Alignment #{num} ({template}) has no template structure file")]
    MissingStructure { num: usize, template: String },

    #[error("Failed to read structure '{path}': {source}")]
    Structure { path: String, source: PdbError },

    #[error("External tool failed during {stage}: {source}")]
    ExternalTool {
        stage: Stage,
        source: ExternalToolError,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to load energy table: {0}")]
    Table(#[from] TableLoadError),

    #[error("Failed to load alignments: {0}")]
    AlignmentSet(#[from] AlignmentSetError),

    #[error("Failed to read couplings '{path}': {source}")]
    Couplings { path: String, source: CouplingError },

    #[error("Failed to write scores: {0}")]
    ScoreTable(#[from] ScoreTableError),
}

impl EngineError {
    /// Evaluation step an alignment-level error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            EngineError::Scoring { stage, .. } | EngineError::ExternalTool { stage, .. } => *stage,
            EngineError::MissingStructure { .. } | EngineError::Structure { .. } => Stage::Structure,
            _ => Stage::Preparation,
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        }
    }
}
