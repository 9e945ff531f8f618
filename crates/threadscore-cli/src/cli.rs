use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "threadscore - rank candidate template structures for a query protein by threading, modeling, and structural agreement scores.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to score alignments in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every alignment of a query against its templates and write the ranked score table.
    Score(ScoreArgs),
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug, Default)]
pub struct ScoreArgs {
    // --- Inputs ---
    /// Alignment set of the query in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub alignments: PathBuf,

    /// Distance-dependent statistical potential (DOPE parameter file).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub dope: PathBuf,

    /// Directory the score table is written to.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Residue coupling matrix of the query; co-evolution scores are 0 without it.
    #[arg(long, value_name = "PATH")]
    pub couplings: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Scoring Overrides ---
    /// Number of top couplings to use. Defaults to half the query length.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top_couplings: Option<usize>,

    /// Lower bound of the threading distance window, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub distance_min: Option<f64>,

    /// Upper bound of the threading distance window, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub distance_max: Option<f64>,

    /// Relative solvent accessibility threshold (0-1).
    #[arg(long, value_name = "FLOAT")]
    pub rsa_threshold: Option<f64>,

    /// Rank on the raw sum of scores instead of the normalized sum.
    #[arg(long)]
    pub raw_sum: bool,

    // --- Tools and Directories ---
    /// Python interpreter with MODELLER installed.
    #[arg(long, value_name = "PATH")]
    pub modeller_python: Option<PathBuf>,

    /// DSSP executable.
    #[arg(long, value_name = "PATH")]
    pub dssp: Option<PathBuf>,

    /// Directory for per-alignment working files.
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Directory the built models are stored in, one subdirectory per template.
    #[arg(long, value_name = "DIR")]
    pub structures_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scoring.rsa-threshold=0.3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_command_parses_required_and_global_arguments() {
        let cli = Cli::try_parse_from([
            "threadscore",
            "-vv",
            "-j",
            "4",
            "score",
            "-a",
            "set.toml",
            "-d",
            "dope.lib",
            "-o",
            "out",
            "-n",
            "20",
            "-S",
            "scoring.rsa-threshold=0.3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Score(args) = cli.command;
        assert_eq!(args.alignments, PathBuf::from("set.toml"));
        assert_eq!(args.top_couplings, Some(20));
        assert_eq!(args.set_values, vec!["scoring.rsa-threshold=0.3"]);
        assert!(!args.raw_sum);
    }

    #[test]
    fn missing_required_input_is_rejected() {
        assert!(Cli::try_parse_from(["threadscore", "score", "-a", "set.toml"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "threadscore", "-q", "-v", "score", "-a", "a", "-d", "d", "-o", "o",
        ]);
        assert!(result.is_err());
    }
}
