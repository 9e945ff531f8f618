use super::config::ScoringConfig;
use super::diagnostics::{Diagnostics, Stage};
use super::error::EngineError;
use super::external::{ComparativeModeler, ModelRequest, StructureAnalyzer};
use crate::core::io::dssp::{DsspResidue, relative_accessibilities};
use crate::core::io::pdb::{PdbFile, attach_backbones, write_threaded_model};
use crate::core::io::pir::write_pir_to_path;
use crate::core::io::traits::RecordFile;
use crate::core::models::alignment::Alignment;
use crate::core::models::residue::{AtomSelector, Residue};
use crate::core::models::sequence::Sequence;
use crate::core::potentials::dope::DopeTable;
use crate::core::scoring::ScoringError;
use crate::core::scoring::accessibility::{accessibility_score, rsa_by_alignment_position};
use crate::core::scoring::blosum::blosum_score;
use crate::core::scoring::coevolution::{Coupling, coevolution_score};
use crate::core::scoring::distance::DistanceMatrix;
use crate::core::scoring::secondary_structure::secondary_structure_score;
use crate::core::scoring::threading::threading_score_from_matrix;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Confidence given to labels read from a structure analysis report.
const OBSERVED_CONFIDENCE: u8 = 9;

/// All scores of one alignment. Every component except `blosum` is "higher is better".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreVector {
    pub threading: f64,
    pub blosum: i32,
    pub secondary_structure: f64,
    pub accessibility: f64,
    pub coevolution: f64,
    /// Negated energy of the comparative model, as assessed by the modeling tool.
    pub modeller: f64,
    /// Plain sum of the five structural components; not normalized.
    pub sum: f64,
}

impl ScoreVector {
    /// The components that make up `sum`, in a fixed order.
    pub fn summed_components(&self) -> [f64; 5] {
        [
            self.threading,
            self.modeller,
            self.secondary_structure,
            self.accessibility,
            self.coevolution,
        ]
    }
}

/// Read-only tables shared by every alignment of a run.
#[derive(Debug, Clone, Default)]
pub struct ScoringTables {
    pub dope: DopeTable,
    /// Predicted contacts over the ungapped query, best first.
    pub couplings: Vec<Coupling>,
    pub query_length: usize,
}

#[derive(Clone, Copy)]
pub struct ExternalTools<'a> {
    pub modeler: &'a (dyn ComparativeModeler + Sync),
    pub analyzer: &'a (dyn StructureAnalyzer + Sync),
}

/// Everything [`evaluate`] needs besides the alignment itself.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub config: &'a ScoringConfig,
    pub tables: &'a ScoringTables,
    pub tools: ExternalTools<'a>,
    pub diagnostics: &'a Diagnostics,
}

/// Scores one alignment.
///
/// A failure is logged, recorded in the context's diagnostics with the alignment's identity,
/// and returned; it never affects other alignments.
#[instrument(skip_all, name = "evaluate_alignment", fields(num = alignment.num, template = %alignment.template_name()))]
pub fn evaluate(
    alignment: &Alignment,
    context: &EvaluationContext<'_>,
) -> Result<ScoreVector, EngineError> {
    let result = score_alignment(alignment, context);
    match &result {
        Ok(scores) => info!(
            threading = scores.threading,
            modeller = scores.modeller,
            sum = scores.sum,
            "Alignment scored."
        ),
        Err(err) => {
            warn!(stage = %err.stage(), error = %err, "Alignment skipped.");
            context
                .diagnostics
                .record(alignment, err.stage(), err.to_string());
        }
    }
    result
}

fn scoring_error(alignment: &Alignment, stage: Stage) -> impl FnOnce(ScoringError) -> EngineError {
    let num = alignment.num;
    let template = alignment.template_name().to_string();
    move |source| EngineError::Scoring {
        num,
        template,
        stage,
        source,
    }
}

fn score_alignment(
    alignment: &Alignment,
    context: &EvaluationContext<'_>,
) -> Result<ScoreVector, EngineError> {
    let config = context.config;
    let tables = context.tables;

    if !alignment.is_consistent() {
        return Err(scoring_error(alignment, Stage::Preparation)(
            ScoringError::LengthMismatch {
                query: alignment.query.len(),
                template: alignment.template.len(),
            },
        ));
    }

    // === Template coordinates ===
    let structure_file = alignment.template_info.structure.as_deref().ok_or_else(|| {
        EngineError::MissingStructure {
            num: alignment.num,
            template: alignment.template_name().to_string(),
        }
    })?;
    let structure_file =
        std::path::absolute(structure_file).map_err(|e| EngineError::io(structure_file, e))?;
    let structure_path = structure_file.as_path();
    let structure_error = |source| EngineError::Structure {
        path: structure_path.to_string_lossy().to_string(),
        source,
    };
    let structure = PdbFile::read_from_path(structure_path).map_err(structure_error)?;
    let threaded = Alignment {
        template: attach_backbones(&alignment.template, &structure).map_err(structure_error)?,
        ..alignment.clone()
    };

    let work_dir = config.layout.alignment_dir(alignment);
    fs::create_dir_all(&work_dir).map_err(|e| EngineError::io(&work_dir, e))?;

    // === Local scores ===
    let matrix = DistanceMatrix::build(
        &threaded.query,
        &threaded.template,
        Some(config.distance_range),
        AtomSelector::Alpha,
    )
    .map_err(scoring_error(alignment, Stage::Threading))?;
    let threading = threading_score_from_matrix(&threaded.query, &matrix, &tables.dope)
        .map_err(scoring_error(alignment, Stage::Threading))?;
    let blosum = blosum_score(&threaded.query, &threaded.template)
        .map_err(scoring_error(alignment, Stage::Blosum))?;
    let coevolution = score_coevolution(&threaded, context)?;
    debug!(threading, blosum, coevolution, "Local scores computed.");

    write_threaded(&threaded, &work_dir)?;

    // === Comparative model ===
    let model_path = build_model(&threaded, structure_path, &work_dir, context)?;

    // === Structure analysis of model and template ===
    let analysis_error = |source| EngineError::ExternalTool {
        stage: Stage::Accessibility,
        source,
    };
    let model_report = context
        .tools
        .analyzer
        .analyze(&model_path.0, &work_dir)
        .map_err(analysis_error)?;
    let template_report = context
        .tools
        .analyzer
        .analyze(structure_path, &work_dir)
        .map_err(analysis_error)?;

    let observed = observed_template(&threaded.template, &template_report);
    let secondary_structure =
        secondary_structure_score(&threaded.query, &observed, config.ss_confidence_threshold)
            .map_err(scoring_error(alignment, Stage::SecondaryStructure))?;

    let predicted_rsa =
        rsa_by_alignment_position(&threaded.query, &relative_accessibilities(&model_report));
    let template_offset = threaded.template.first().saturating_sub(1);
    let template_rsa = rsa_by_alignment_position(
        &threaded.template,
        &relative_accessibilities(template_report.get(template_offset..).unwrap_or(&[])),
    );
    let accessibility = accessibility_score(
        &predicted_rsa,
        &template_rsa,
        threaded.query.gapless_len(),
        config.rsa_threshold,
        config.accessibility_filter,
    );

    let modeller = model_path.1;
    Ok(ScoreVector {
        threading,
        blosum,
        secondary_structure,
        accessibility,
        coevolution,
        modeller,
        sum: threading + modeller + secondary_structure + accessibility + coevolution,
    })
}

fn score_coevolution(
    threaded: &Alignment,
    context: &EvaluationContext<'_>,
) -> Result<f64, EngineError> {
    let tables = context.tables;
    if tables.couplings.is_empty() {
        return Ok(0.0);
    }
    let contacts = DistanceMatrix::build_contact_map(
        &threaded.query,
        &threaded.template,
        tables.query_length,
        context.config.coevolution_atom,
    )
    .map_err(scoring_error(threaded, Stage::Coevolution))?;
    Ok(coevolution_score(
        &contacts,
        &tables.couplings,
        threaded.query.first(),
        threaded.query.last(),
        context.config.contact_cutoff,
    ))
}

fn write_threaded(threaded: &Alignment, work_dir: &Path) -> Result<(), EngineError> {
    let path = work_dir.join(format!("{}_threaded.pdb", threaded.template_info.pdb));
    let file = fs::File::create(&path).map_err(|e| EngineError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    write_threaded_model(threaded, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| EngineError::io(&path, e))
}

/// Runs the modeling tool and moves its product into the structure store. Returns the
/// stored model path and the negated model energy.
fn build_model(
    threaded: &Alignment,
    structure_path: &Path,
    work_dir: &Path,
    context: &EvaluationContext<'_>,
) -> Result<(std::path::PathBuf, f64), EngineError> {
    let alignment_file = work_dir.join(format!("{}.ali", threaded.template_name()));
    write_pir_to_path(threaded, &alignment_file).map_err(|e| EngineError::io(&alignment_file, e))?;

    let atom_file = work_dir.join(format!("{}.atm", threaded.template_info.pdb));
    fs::copy(structure_path, &atom_file).map_err(|e| EngineError::io(&atom_file, e))?;

    let output = context
        .tools
        .modeler
        .build_model(&ModelRequest {
            alignment: threaded,
            alignment_file: &alignment_file,
            atom_dir: work_dir,
            work_dir,
        })
        .map_err(|source| EngineError::ExternalTool {
            stage: Stage::Modeling,
            source,
        })?;

    let stored = context.config.layout.model_path(threaded);
    relocate(&output.model_path, &stored)?;
    debug!(model = ?stored, dope = output.dope, "Comparative model stored.");
    Ok((stored, -output.dope))
}

fn relocate(from: &Path, to: &Path) -> Result<(), EngineError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // Rename fails across filesystems.
    fs::copy(from, to).map_err(|e| EngineError::io(to, e))?;
    fs::remove_file(from).map_err(|e| EngineError::io(from, e))
}

/// The template with observed secondary structure from the analysis report on residues that
/// carry no label yet. Report residues are matched like coordinates: the k-th non-gap
/// residue takes report entry `first - 1 + k`.
fn observed_template(template: &Sequence, report: &[DsspResidue]) -> Sequence {
    let offset = template.first().saturating_sub(1);
    let mut k = 0;
    let residues: Vec<Residue> = template
        .residues()
        .iter()
        .map(|residue| {
            if residue.is_gap() {
                return residue.clone();
            }
            let entry = report.get(offset + k);
            k += 1;
            match entry {
                Some(entry) if residue.secondary_structure().is_none() => residue
                    .clone()
                    .with_secondary_structure(entry.structure, OBSERVED_CONFIDENCE),
                _ => residue.clone(),
            }
        })
        .collect();
    Sequence::new(residues, template.first(), template.last())
}
