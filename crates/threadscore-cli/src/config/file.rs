use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use threadscore::core::models::residue::AtomSelector;
use threadscore::core::scoring::accessibility::AccessibilityFilter;
use tracing::debug;

/// Contents of a configuration file. Every value is optional; absent values fall back to
/// the built-in defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub scoring: Option<FileScoringConfig>,
    pub tools: Option<FileToolsConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileScoringConfig {
    #[serde(rename = "distance-min")]
    pub distance_min: Option<f64>,
    #[serde(rename = "distance-max")]
    pub distance_max: Option<f64>,
    #[serde(rename = "rsa-threshold")]
    pub rsa_threshold: Option<f64>,
    #[serde(rename = "accessibility-filter")]
    pub accessibility_filter: Option<AccessibilityFilter>,
    #[serde(rename = "ss-confidence-threshold")]
    pub ss_confidence_threshold: Option<u8>,
    #[serde(rename = "contact-cutoff")]
    pub contact_cutoff: Option<f64>,
    #[serde(rename = "coevolution-atom")]
    pub coevolution_atom: Option<AtomSelector>,
    #[serde(rename = "top-couplings")]
    pub top_couplings: Option<usize>,
    #[serde(rename = "normalize-sum")]
    pub normalize_sum: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileToolsConfig {
    #[serde(rename = "modeller-python")]
    pub modeller_python: Option<PathBuf>,
    pub dssp: Option<PathBuf>,
    #[serde(rename = "work-dir")]
    pub work_dir: Option<PathBuf>,
    #[serde(rename = "structures-dir")]
    pub structures_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_file_reads_both_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [scoring]
            distance-min = 4.0
            distance-max = 12.0
            accessibility-filter = "buried"
            coevolution-atom = "beta-with-alpha-fallback"
            normalize-sum = false

            [tools]
            modeller-python = "/opt/modeller/bin/python"
            work-dir = "scratch"
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let scoring = config.scoring.unwrap();
        assert_eq!(scoring.distance_min, Some(4.0));
        assert_eq!(scoring.accessibility_filter, Some(AccessibilityFilter::Buried));
        assert_eq!(
            scoring.coevolution_atom,
            Some(AtomSelector::BetaWithAlphaFallback)
        );
        assert_eq!(scoring.normalize_sum, Some(false));
        assert!(scoring.rsa_threshold.is_none());
        let tools = config.tools.unwrap();
        assert_eq!(tools.work_dir, Some(PathBuf::from("scratch")));
        assert!(tools.dssp.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scoring]\ndistance-minimum = 4.0\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_parsing_error_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
