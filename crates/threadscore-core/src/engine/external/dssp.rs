use super::{ExternalToolError, StructureAnalyzer, absolute, check_output, program};
use crate::core::io::dssp::{DsspFile, DsspResidue};
use crate::core::io::traits::RecordFile;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const TOOL: &str = "DSSP";

/// Runs a DSSP executable on a coordinate file and parses the report from its stdout.
#[derive(Debug, Clone)]
pub struct DsspRunner {
    binary: PathBuf,
}

impl DsspRunner {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl StructureAnalyzer for DsspRunner {
    fn analyze(
        &self,
        structure: &Path,
        work_dir: &Path,
    ) -> Result<Vec<DsspResidue>, ExternalToolError> {
        let structure = absolute(structure)?;
        debug!(structure = ?structure, "Running DSSP.");
        let output = Command::new(program(&self.binary)?)
            .arg("-i")
            .arg(&structure)
            .current_dir(absolute(work_dir)?)
            .output()
            .map_err(|source| ExternalToolError::Spawn { tool: TOOL, source })?;
        let stdout = check_output(TOOL, output)?;
        DsspFile::read_from(&mut stdout.as_slice())
            .map_err(|source| ExternalToolError::Report { tool: TOOL, source })
    }
}
