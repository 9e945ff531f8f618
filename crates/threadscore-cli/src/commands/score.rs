use crate::cli::ScoreArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use threadscore::engine::evaluate::ExternalTools;
use threadscore::engine::external::dssp::DsspRunner;
use threadscore::engine::external::modeller::ModellerRunner;
use threadscore::engine::progress::ProgressReporter;
use threadscore::workflows;
use tracing::{info, warn};

pub fn run(args: ScoreArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    let modeler = ModellerRunner::new(app.modeller_python.clone());
    let analyzer = DsspRunner::new(app.dssp.clone());
    let tools = ExternalTools {
        modeler: &modeler,
        analyzer: &analyzer,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Scoring alignments from {}...", args.alignments.display());
    info!("Invoking the core scoring workflow...");
    let report = workflows::score::run(&app.request, &app.scoring, tools, &reporter)?;

    for diagnostic in &report.skipped {
        warn!("Skipped {}", diagnostic);
    }

    println!(
        "Scored {} alignment(s) of {}, skipped {}.",
        report.scored(),
        report.query,
        report.skipped.len()
    );
    if let Some(best) = report.rows.first() {
        println!(
            "✓ Best template: {} (alignment #{}, score {:.3})",
            best.template, best.alignment, best.sum_scores
        );
    }
    println!("Score table written to: {}", report.table_path.display());
    Ok(())
}
