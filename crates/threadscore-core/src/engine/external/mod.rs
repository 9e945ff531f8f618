//! Adapters for the external programs the aggregator delegates to: a comparative modeling
//! tool and a structure analysis tool.
//!
//! Both sit behind the [`ComparativeModeler`] and [`StructureAnalyzer`] traits. Every call receives an explicit working directory; no adapter changes the process's
//! current directory.

pub mod dssp;
pub mod modeller;

#[cfg(test)]
pub(crate) mod fakes;

use crate::core::io::dssp::{DsspError, DsspResidue};
use crate::core::models::alignment::Alignment;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: String,
        stderr: String,
    },
    #[error("Unexpected output from {tool}: {details}")]
    Output {
        tool: &'static str,
        details: String,
    },
    #[error("{tool} reported '{path}' but the file does not exist")]
    MissingProduct { tool: &'static str, path: String },
    #[error("Unreadable report from {tool}: {source}")]
    Report {
        tool: &'static str,
        source: DsspError,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
}

impl ExternalToolError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string_lossy().to_string(),
            source,
        }
    }
}

/// Inputs prepared for one comparative modeling run.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub alignment: &'a Alignment,
    /// PIR alignment file naming the template and the query.
    pub alignment_file: &'a Path,
    /// Directory holding the template coordinate file, named after its code.
    pub atom_dir: &'a Path,
    /// Private directory the tool runs in and writes its products to.
    pub work_dir: &'a Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub model_path: PathBuf,
    /// Statistical potential energy of the model as assessed by the tool (lower is better).
    pub dope: f64,
}

pub trait ComparativeModeler {
    fn build_model(&self, request: &ModelRequest<'_>) -> Result<ModelOutput, ExternalToolError>;
}

pub trait StructureAnalyzer {
    /// Per-residue secondary structure and accessibility of the structure file, in residue
    /// order.
    fn analyze(
        &self,
        structure: &Path,
        work_dir: &Path,
    ) -> Result<Vec<DsspResidue>, ExternalToolError>;
}

/// Resolves `path` against the process's current directory. Tool processes run in their own
/// working directory, so relative arguments would otherwise be resolved a second time.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf, ExternalToolError> {
    std::path::absolute(path).map_err(|e| ExternalToolError::io(path, e))
}

/// A program given with a directory part is resolved like any other path; a bare name is
/// left for the `PATH` lookup.
pub(crate) fn program(path: &Path) -> Result<PathBuf, ExternalToolError> {
    if path.components().count() > 1 {
        absolute(path)
    } else {
        Ok(path.to_path_buf())
    }
}

/// Turns a finished process into its stdout, or a [`ExternalToolError::Failed`] carrying the
/// tail of stderr.
pub(crate) fn check_output(tool: &'static str, output: Output) -> Result<Vec<u8>, ExternalToolError> {
    if output.status.success() {
        return Ok(output.stdout);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
    Err(ExternalToolError::Failed {
        tool,
        status: output.status.to_string(),
        stderr: tail.into_iter().rev().collect::<Vec<_>>().join(" | "),
    })
}
