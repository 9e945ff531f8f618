use crate::core::io::alignment_set::AlignmentSet;
use crate::core::io::couplings::{CouplingFile, DEFAULT_MIN_SEPARATION};
use crate::core::io::scores::{ScoreRow, write_score_table};
use crate::core::io::traits::RecordFile;
use crate::core::models::alignment::Alignment;
use crate::core::potentials::dope::DopeTable;
use crate::engine::config::ScoringConfig;
use crate::engine::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::error::EngineError;
use crate::engine::evaluate::{
    EvaluationContext, ExternalTools, ScoreVector, ScoringTables, evaluate,
};
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Input files of one scoring run.
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub alignments_path: PathBuf,
    pub dope_path: PathBuf,
    /// Residue coupling matrix of the query; without it every co-evolution score is 0.
    pub couplings_path: Option<PathBuf>,
    /// Number of top couplings to use; defaults to half the query length.
    pub top_couplings: Option<usize>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub query: String,
    /// Score table rows, best first.
    pub rows: Vec<ScoreRow>,
    /// Alignments that could not be scored, in alignment order.
    pub skipped: Vec<Diagnostic>,
    pub table_path: PathBuf,
}

impl ScoreReport {
    pub fn scored(&self) -> usize {
        self.rows.len()
    }
}

#[instrument(skip_all, name = "score_workflow")]
pub fn run(
    request: &ScoreRequest,
    config: &ScoringConfig,
    tools: ExternalTools<'_>,
    reporter: &ProgressReporter,
) -> Result<ScoreReport, EngineError> {
    // === Phase 0: Load inputs ===
    reporter.report(Progress::PhaseStart { name: "Loading" });
    let set = AlignmentSet::load(&request.alignments_path)?;
    let tables = load_tables(request, &set)?;
    let alignments = set.alignments();
    info!(
        query = %set.query.name,
        alignments = alignments.len(),
        couplings = tables.couplings.len(),
        "Inputs loaded."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Score every alignment ===
    reporter.report(Progress::PhaseStart { name: "Scoring" });
    let diagnostics = Diagnostics::new();
    let context = EvaluationContext {
        config,
        tables: &tables,
        tools,
        diagnostics: &diagnostics,
    };
    let scored = score_alignments(&alignments, &context, reporter);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Rank and persist ===
    reporter.report(Progress::PhaseStart { name: "Ranking" });
    let rows = rank(&scored, config.normalize_sum);
    std::fs::create_dir_all(&request.output_dir)
        .map_err(|e| EngineError::io(&request.output_dir, e))?;
    let table_path = request
        .output_dir
        .join(format!("{}_scores.csv", set.query.name));
    write_score_table(&rows, &table_path)?;
    reporter.report(Progress::PhaseFinish);

    let skipped = diagnostics.drain();
    if !skipped.is_empty() {
        warn!(skipped = skipped.len(), "Some alignments could not be scored.");
    }
    info!(
        scored = rows.len(),
        table = ?table_path,
        "Workflow complete."
    );
    Ok(ScoreReport {
        query: set.query.name.clone(),
        rows,
        skipped,
        table_path,
    })
}

fn load_tables(request: &ScoreRequest, set: &AlignmentSet) -> Result<ScoringTables, EngineError> {
    let dope = DopeTable::load(&request.dope_path)?;
    let query_length = set.query_length();

    let couplings = match &request.couplings_path {
        None => Vec::new(),
        Some(path) => {
            let matrix =
                CouplingFile::read_from_path(path).map_err(|source| EngineError::Couplings {
                    path: path.to_string_lossy().to_string(),
                    source,
                })?;
            if matrix.size() != query_length {
                warn!(
                    matrix = matrix.size(),
                    query = query_length,
                    "Coupling matrix size differs from the query length."
                );
            }
            let count = request.top_couplings.unwrap_or(query_length / 2);
            matrix.top_couplings(count, DEFAULT_MIN_SEPARATION)
        }
    };

    Ok(ScoringTables {
        dope,
        couplings,
        query_length,
    })
}

/// Evaluates every alignment, in parallel when the `parallel` feature is on. Failed
/// alignments are left out of the result and recorded in the context's diagnostics.
pub fn score_alignments<'a>(
    alignments: &'a [Alignment],
    context: &EvaluationContext<'_>,
    reporter: &ProgressReporter,
) -> Vec<(&'a Alignment, ScoreVector)> {
    reporter.report(Progress::TaskStart {
        total_steps: alignments.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = alignments.iter();

    #[cfg(feature = "parallel")]
    let iterator = alignments.par_iter();

    let scored = iterator
        .filter_map(|alignment| {
            let result = evaluate(alignment, context);
            reporter.report(Progress::AlignmentDone {
                num: alignment.num,
                scored: result.is_ok(),
            });
            result.ok().map(|scores| (alignment, scores))
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    scored
}

/// Sum of the min-max normalized components of each score vector. A component that is
/// constant across the pool contributes 0.
pub fn normalized_sums(scores: &[ScoreVector]) -> Vec<f64> {
    let bounds: Vec<Option<(f64, f64)>> = (0..5)
        .map(|component| {
            scores
                .iter()
                .map(|s| s.summed_components()[component])
                .minmax_by(|a, b| a.total_cmp(b))
                .into_option()
        })
        .collect();

    scores
        .iter()
        .map(|s| {
            s.summed_components()
                .iter()
                .zip(&bounds)
                .map(|(&value, bound)| match *bound {
                    Some((min, max)) if max > min => (value - min) / (max - min),
                    _ => 0.0,
                })
                .sum()
        })
        .collect()
}

/// Builds the score table rows, best first. Ties keep alignment order.
pub fn rank(scored: &[(&Alignment, ScoreVector)], normalize: bool) -> Vec<ScoreRow> {
    let vectors: Vec<ScoreVector> = scored.iter().map(|(_, s)| *s).collect();
    let sums = if normalize {
        normalized_sums(&vectors)
    } else {
        vectors.iter().map(|s| s.sum).collect()
    };

    let mut rows: Vec<ScoreRow> = scored
        .iter()
        .zip(sums)
        .map(|((alignment, s), sum_scores)| ScoreRow {
            template: alignment.template_name().to_string(),
            alignment: alignment.num,
            blosum: s.blosum,
            threading: s.threading,
            modeller: s.modeller,
            secondary_structure: s.secondary_structure,
            solvent_access: s.accessibility,
            co_evolution: s.coevolution,
            sum_scores,
            benchmark: alignment.template_info.benchmark,
        })
        .collect();
    rows.sort_by(|a, b| b.sum_scores.total_cmp(&a.sum_scores));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::sequence::Sequence;
    use crate::engine::config::ScoringConfigBuilder;
    use crate::engine::diagnostics::Stage;
    use crate::engine::external::fakes::{CopyingModeler, HelixAnalyzer, line_structure};
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    const SET: &str = r#"
[query]
name = "query1"
length = 4
ss-prediction = "HHHH"
ss-confidence = "9999"

[[alignments]]
num = 1
template = "Near"
pdb = "near"
benchmark = "Family"
structure = "near.atm"
query-first = 1
query-last = 4
query-sequence = "AAAA"
template-first = 1
template-last = 4
template-sequence = "AAAA"

[[alignments]]
num = 2
template = "Broken"
pdb = "broken"
structure = "absent.atm"
query-first = 1
query-last = 4
query-sequence = "AAAA"
template-first = 1
template-last = 4
template-sequence = "AAAA"

[[alignments]]
num = 3
template = "Far"
pdb = "far"
benchmark = "Fold"
structure = "far.atm"
query-first = 1
query-last = 4
query-sequence = "AAAA"
template-first = 1
template-last = 4
template-sequence = "AAAA"
"#;

    fn dope_line() -> String {
        let values: Vec<String> = (0..30).map(|k| format!("{:.2}", -0.1 * k as f64)).collect();
        format!("ALA CA ALA CA {}\n", values.join(" "))
    }

    fn setup() -> (TempDir, ScoreRequest, ScoringConfig) {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("set.toml"), SET).unwrap();
        fs::write(root.join("near.atm"), line_structure(4, 3.8)).unwrap();
        fs::write(root.join("far.atm"), line_structure(4, 4.5)).unwrap();
        fs::write(root.join("dope.lib"), dope_line()).unwrap();

        let request = ScoreRequest {
            alignments_path: root.join("set.toml"),
            dope_path: root.join("dope.lib"),
            couplings_path: None,
            top_couplings: None,
            output_dir: root.join("out"),
        };
        let config = ScoringConfigBuilder::new()
            .distance_range(4.0, 15.0)
            .rsa_threshold(0.25)
            .work_dir(root.join("work"))
            .structures_dir(root.join("pdb"))
            .build()
            .unwrap();
        (dir, request, config)
    }

    fn tools() -> ExternalTools<'static> {
        ExternalTools {
            modeler: &CopyingModeler,
            analyzer: &HelixAnalyzer,
        }
    }

    fn read_templates(path: &Path) -> Vec<String> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().get(0).unwrap().to_string())
            .collect()
    }

    #[test]
    fn run_scores_ranks_and_skips_broken_alignments() {
        let (_dir, request, config) = setup();
        let report = run(&request, &config, tools(), &ProgressReporter::new()).unwrap();

        assert_eq!(report.query, "query1");
        assert_eq!(report.scored(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].alignment, 2);
        assert_eq!(report.skipped[0].stage, Stage::Structure);

        // Longer spacing lands in lower-energy buckets of the ramp, so "Far" threads better.
        assert_eq!(report.rows[0].template, "Far");
        assert_eq!(report.rows[0].sum_scores, 1.0);
        assert_eq!(report.rows[1].sum_scores, 0.0);
        assert_eq!(
            report.table_path,
            request.output_dir.join("query1_scores.csv")
        );
        assert_eq!(read_templates(&report.table_path), vec!["Far", "Near"]);
    }

    #[test]
    fn run_reports_progress_for_every_alignment() {
        let (_dir, request, config) = setup();
        let done = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::AlignmentDone { num, scored } = event {
                done.lock().unwrap().push((num, scored));
            }
        }));
        run(&request, &config, tools(), &reporter).unwrap();
        drop(reporter);

        let mut done = done.into_inner().unwrap();
        done.sort();
        assert_eq!(done, vec![(1, true), (2, false), (3, true)]);
    }

    #[test]
    fn run_with_couplings_uses_top_pairs() {
        let (dir, mut request, config) = setup();
        let mut matrix = vec![vec!["0.0"; 8]; 8];
        matrix[0][7] = "0.9";
        matrix[7][0] = "0.9";
        let text: String = matrix.iter().map(|row| row.join(" ") + "\n").collect();
        fs::write(dir.path().join("query.mat"), text).unwrap();
        request.couplings_path = Some(dir.path().join("query.mat"));

        let report = run(&request, &config, tools(), &ProgressReporter::new()).unwrap();
        // The only strong pair lies outside the 4-residue query, so no template confirms it.
        assert!(report.rows.iter().all(|r| r.co_evolution == 0.0));
    }

    #[test]
    fn missing_alignment_set_is_fatal() {
        let (dir, mut request, config) = setup();
        request.alignments_path = dir.path().join("nope.toml");
        assert!(matches!(
            run(&request, &config, tools(), &ProgressReporter::new()),
            Err(EngineError::AlignmentSet(_))
        ));
    }

    fn vector(threading: f64, modeller: f64) -> ScoreVector {
        ScoreVector {
            threading,
            modeller,
            sum: threading + modeller,
            ..Default::default()
        }
    }

    #[test]
    fn normalized_sums_rescale_each_component() {
        let sums = normalized_sums(&[vector(-10.0, 100.0), vector(-5.0, 300.0), vector(0.0, 200.0)]);
        assert_eq!(sums, vec![0.0, 1.5, 1.5]);
    }

    #[test]
    fn normalized_sums_of_single_alignment_are_zero() {
        assert_eq!(normalized_sums(&[vector(-10.0, 100.0)]), vec![0.0]);
        assert!(normalized_sums(&[]).is_empty());
    }

    #[test]
    fn rank_sorts_by_sum_and_keeps_raw_components() {
        let a = Alignment::new(
            1,
            0.0,
            Sequence::from_gapped("A", 1, 1),
            Sequence::from_gapped("A", 1, 1),
            Default::default(),
        );
        let mut b = a.clone();
        b.num = 2;
        let scored = vec![(&a, vector(-10.0, 1.0)), (&b, vector(-2.0, 1.0))];

        let raw = rank(&scored, false);
        assert_eq!(raw[0].alignment, 2);
        assert_eq!(raw[0].sum_scores, -1.0);

        let normalized = rank(&scored, true);
        assert_eq!(normalized[0].alignment, 2);
        assert_eq!(normalized[0].sum_scores, 1.0);
        assert_eq!(normalized[0].threading, -2.0);
    }
}
