//! In-memory stand-ins for the external tools, shared by the engine and workflow tests.

use super::{ComparativeModeler, ExternalToolError, ModelOutput, ModelRequest, StructureAnalyzer};
use crate::core::io::dssp::DsspResidue;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::RecordFile;
use crate::core::models::residue::SecondaryStructure;
use std::fs;
use std::path::Path;

/// PDB text with `residues` alanine alpha carbons on the x axis, `spacing` apart.
pub(crate) fn line_structure(residues: usize, spacing: f64) -> String {
    let mut text = String::new();
    for i in 0..residues {
        text.push_str(&format!(
            "ATOM  {:>5}  CA  ALA A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           C\n",
            i + 1,
            i + 1,
            i as f64 * spacing,
            0.0,
            0.0
        ));
    }
    text.push_str("END\n");
    text
}

pub(crate) struct CopyingModeler;

impl ComparativeModeler for CopyingModeler {
    fn build_model(
        &self,
        request: &ModelRequest<'_>,
    ) -> Result<ModelOutput, ExternalToolError> {
        let source = request
            .atom_dir
            .join(format!("{}.atm", request.alignment.template_info.pdb));
        let model_path = request.work_dir.join("query.B99990001.pdb");
        fs::copy(&source, &model_path).map_err(|e| ExternalToolError::io(&source, e))?;
        Ok(ModelOutput {
            model_path,
            dope: -500.0,
        })
    }
}

pub(crate) struct FailingModeler;

impl ComparativeModeler for FailingModeler {
    fn build_model(
        &self,
        _request: &ModelRequest<'_>,
    ) -> Result<ModelOutput, ExternalToolError> {
        Err(ExternalToolError::Failed {
            tool: "MODELLER",
            status: "exit status: 1".into(),
            stderr: "no template".into(),
        })
    }
}

/// Reports every residue of the file as an exposed helix.
pub(crate) struct HelixAnalyzer;

impl StructureAnalyzer for HelixAnalyzer {
    fn analyze(
        &self,
        structure: &Path,
        _work_dir: &Path,
    ) -> Result<Vec<DsspResidue>, ExternalToolError> {
        let residues =
            PdbFile::read_from_path(structure).map_err(|e| ExternalToolError::Output {
                tool: "DSSP",
                details: e.to_string(),
            })?;
        Ok(residues
            .iter()
            .enumerate()
            .map(|(i, _)| DsspResidue {
                number: i as isize + 1,
                chain_id: 'A',
                amino_acid: 'A',
                structure: SecondaryStructure::Helix,
                accessibility: 100.0,
            })
            .collect())
    }
}
