use std::path::PathBuf;
use threadscore::engine::config::ScoringConfig;
use threadscore::workflows::score::ScoreRequest;

pub struct AppConfig {
    pub request: ScoreRequest,
    pub scoring: ScoringConfig,
    pub modeller_python: PathBuf,
    pub dssp: PathBuf,
}
