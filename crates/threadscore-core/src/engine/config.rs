use crate::core::models::alignment::Alignment;
use crate::core::models::residue::AtomSelector;
use crate::core::scoring::accessibility::AccessibilityFilter;
use crate::core::scoring::coevolution::DEFAULT_CONTACT_CUTOFF;
use crate::core::scoring::distance::DistanceRange;
use crate::core::scoring::secondary_structure::DEFAULT_CONFIDENCE_THRESHOLD;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Where per-alignment scratch files and produced models go.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceLayout {
    pub work_dir: PathBuf,
    pub structures_dir: PathBuf,
}

impl WorkspaceLayout {
    /// Private working directory of one alignment, so that concurrent tool runs never share
    /// a directory.
    pub fn alignment_dir(&self, alignment: &Alignment) -> PathBuf {
        self.work_dir
            .join(format!("{}_{}", alignment.num, alignment.template_name()))
    }

    /// Final location of the comparative model built for `alignment`.
    pub fn model_path(&self, alignment: &Alignment) -> PathBuf {
        self.template_dir(alignment.template_name())
            .join(format!("{}_mod.atm", alignment.template_info.pdb))
    }

    pub fn template_dir(&self, template: &str) -> PathBuf {
        self.structures_dir.join(template)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub distance_range: DistanceRange,
    pub rsa_threshold: f64,
    pub accessibility_filter: AccessibilityFilter,
    pub ss_confidence_threshold: u8,
    pub contact_cutoff: f64,
    pub coevolution_atom: AtomSelector,
    /// Rank on the sum of min-max normalized components rather than the raw sum.
    pub normalize_sum: bool,
    pub layout: WorkspaceLayout,
}

#[derive(Default)]
pub struct ScoringConfigBuilder {
    distance_range: Option<DistanceRange>,
    rsa_threshold: Option<f64>,
    accessibility_filter: Option<AccessibilityFilter>,
    ss_confidence_threshold: Option<u8>,
    contact_cutoff: Option<f64>,
    coevolution_atom: Option<AtomSelector>,
    normalize_sum: Option<bool>,
    work_dir: Option<PathBuf>,
    structures_dir: Option<PathBuf>,
}

impl ScoringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance_range(mut self, min: f64, max: f64) -> Self {
        self.distance_range = Some(DistanceRange::new(min, max));
        self
    }
    pub fn rsa_threshold(mut self, threshold: f64) -> Self {
        self.rsa_threshold = Some(threshold);
        self
    }
    pub fn accessibility_filter(mut self, filter: AccessibilityFilter) -> Self {
        self.accessibility_filter = Some(filter);
        self
    }
    pub fn ss_confidence_threshold(mut self, threshold: u8) -> Self {
        self.ss_confidence_threshold = Some(threshold);
        self
    }
    pub fn contact_cutoff(mut self, cutoff: f64) -> Self {
        self.contact_cutoff = Some(cutoff);
        self
    }
    pub fn coevolution_atom(mut self, atom: AtomSelector) -> Self {
        self.coevolution_atom = Some(atom);
        self
    }
    pub fn normalize_sum(mut self, normalize: bool) -> Self {
        self.normalize_sum = Some(normalize);
        self
    }
    pub fn work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = Some(path);
        self
    }
    pub fn structures_dir(mut self, path: PathBuf) -> Self {
        self.structures_dir = Some(path);
        self
    }

    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let distance_range = self
            .distance_range
            .ok_or(ConfigError::MissingParameter("distance_range"))?;
        if !(distance_range.min >= 0.0 && distance_range.min <= distance_range.max) {
            return Err(ConfigError::InvalidParameter {
                name: "distance_range",
                reason: format!(
                    "expected 0 <= min <= max, got [{}, {}]",
                    distance_range.min, distance_range.max
                ),
            });
        }

        let rsa_threshold = self
            .rsa_threshold
            .ok_or(ConfigError::MissingParameter("rsa_threshold"))?;
        if !(0.0..=1.0).contains(&rsa_threshold) {
            return Err(ConfigError::InvalidParameter {
                name: "rsa_threshold",
                reason: format!("expected a fraction in [0, 1], got {}", rsa_threshold),
            });
        }

        let ss_confidence_threshold = self
            .ss_confidence_threshold
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        if ss_confidence_threshold > 10 {
            return Err(ConfigError::InvalidParameter {
                name: "ss_confidence_threshold",
                reason: format!("expected 0-10, got {}", ss_confidence_threshold),
            });
        }

        let layout = WorkspaceLayout {
            work_dir: absolute_dir(
                "work_dir",
                self.work_dir
                    .ok_or(ConfigError::MissingParameter("work_dir"))?,
            )?,
            structures_dir: absolute_dir(
                "structures_dir",
                self.structures_dir
                    .ok_or(ConfigError::MissingParameter("structures_dir"))?,
            )?,
        };

        Ok(ScoringConfig {
            distance_range,
            rsa_threshold,
            accessibility_filter: self.accessibility_filter.unwrap_or_default(),
            ss_confidence_threshold,
            contact_cutoff: self.contact_cutoff.unwrap_or(DEFAULT_CONTACT_CUTOFF),
            coevolution_atom: self.coevolution_atom.unwrap_or_default(),
            normalize_sum: self.normalize_sum.unwrap_or(true),
            layout,
        })
    }
}

/// Tools run with their working directory set to a per-alignment directory, so every path
/// handed to them must not depend on the process's current directory.
fn absolute_dir(name: &'static str, path: PathBuf) -> Result<PathBuf, ConfigError> {
    std::path::absolute(&path).map_err(|e| ConfigError::InvalidParameter {
        name,
        reason: format!("cannot resolve '{}': {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::alignment::TemplateInfo;
    use crate::core::models::sequence::Sequence;

    fn complete_builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::new()
            .distance_range(5.0, 15.0)
            .rsa_threshold(0.25)
            .work_dir(PathBuf::from("/tmp/work"))
            .structures_dir(PathBuf::from("/tmp/pdb"))
    }

    #[test]
    fn build_fills_defaults() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.distance_range, DistanceRange::new(5.0, 15.0));
        assert_eq!(config.ss_confidence_threshold, 7);
        assert_eq!(config.contact_cutoff, 8.0);
        assert_eq!(config.accessibility_filter, AccessibilityFilter::Exposed);
        assert_eq!(config.coevolution_atom, AtomSelector::Alpha);
        assert!(config.normalize_sum);
    }

    #[test]
    fn build_reports_missing_parameters() {
        let result = ScoringConfigBuilder::new().rsa_threshold(0.25).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("distance_range")));

        let result = ScoringConfigBuilder::new()
            .distance_range(5.0, 15.0)
            .rsa_threshold(0.25)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("work_dir")));
    }

    #[test]
    fn build_rejects_inverted_distance_range() {
        let result = complete_builder().distance_range(15.0, 5.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "distance_range",
                ..
            })
        ));
    }

    #[test]
    fn build_rejects_threshold_outside_unit_interval() {
        let result = complete_builder().rsa_threshold(25.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "rsa_threshold",
                ..
            })
        ));
    }

    #[test]
    fn build_resolves_relative_directories_against_the_current_directory() {
        let layout = complete_builder()
            .work_dir(PathBuf::from("work"))
            .structures_dir(PathBuf::from("./structures"))
            .build()
            .unwrap()
            .layout;
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(layout.work_dir, cwd.join("work"));
        assert_eq!(layout.structures_dir, cwd.join("structures"));
    }

    #[test]
    fn layout_gives_each_alignment_its_own_directory() {
        let layout = complete_builder().build().unwrap().layout;
        let alignment = Alignment::new(
            4,
            0.0,
            Sequence::from_gapped("A", 1, 1),
            Sequence::from_gapped("A", 1, 1),
            TemplateInfo {
                name: "Agglutinin".into(),
                pdb: "1jlxa1".into(),
                ..Default::default()
            },
        );
        assert_eq!(
            layout.alignment_dir(&alignment),
            PathBuf::from("/tmp/work/4_Agglutinin")
        );
        assert_eq!(
            layout.model_path(&alignment),
            PathBuf::from("/tmp/pdb/Agglutinin/1jlxa1_mod.atm")
        );
    }
}
