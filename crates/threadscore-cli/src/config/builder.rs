use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::str::FromStr;
use threadscore::core::models::residue::AtomSelector;
use threadscore::core::scoring::accessibility::AccessibilityFilter;
use threadscore::engine::config::ScoringConfigBuilder;
use threadscore::workflows::score::ScoreRequest;

/// Merges command-line flags, `--set` overrides, the config file, and the defaults, in that
/// order of precedence.
pub fn build_config(args: &ScoreArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let scoring_file = file_config.scoring.take().unwrap_or_default();
    let tools_file = file_config.tools.take().unwrap_or_default();

    let distance_min = args
        .distance_min
        .or(scoring_file.distance_min)
        .unwrap_or(defaults.distance_min);
    let distance_max = args
        .distance_max
        .or(scoring_file.distance_max)
        .unwrap_or(defaults.distance_max);
    let rsa_threshold = args
        .rsa_threshold
        .or(scoring_file.rsa_threshold)
        .unwrap_or(defaults.rsa_threshold);
    let normalize_sum = if args.raw_sum {
        false
    } else {
        scoring_file.normalize_sum.unwrap_or(defaults.normalize_sum)
    };

    let mut builder = ScoringConfigBuilder::new()
        .distance_range(distance_min, distance_max)
        .rsa_threshold(rsa_threshold)
        .normalize_sum(normalize_sum)
        .work_dir(
            args.work_dir
                .clone()
                .or(tools_file.work_dir)
                .unwrap_or(defaults.work_dir),
        )
        .structures_dir(
            args.structures_dir
                .clone()
                .or(tools_file.structures_dir)
                .unwrap_or(defaults.structures_dir),
        );
    if let Some(filter) = scoring_file.accessibility_filter {
        builder = builder.accessibility_filter(filter);
    }
    if let Some(threshold) = scoring_file.ss_confidence_threshold {
        builder = builder.ss_confidence_threshold(threshold);
    }
    if let Some(cutoff) = scoring_file.contact_cutoff {
        builder = builder.contact_cutoff(cutoff);
    }
    if let Some(atom) = scoring_file.coevolution_atom {
        builder = builder.coevolution_atom(atom);
    }
    let scoring = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        request: ScoreRequest {
            alignments_path: args.alignments.clone(),
            dope_path: args.dope.clone(),
            couplings_path: args.couplings.clone(),
            top_couplings: args.top_couplings.or(scoring_file.top_couplings),
            output_dir: args.output.clone(),
        },
        scoring,
        modeller_python: args
            .modeller_python
            .clone()
            .or(tools_file.modeller_python)
            .unwrap_or(defaults.modeller_python),
        dssp: args
            .dssp
            .clone()
            .or(tools_file.dssp)
            .unwrap_or(defaults.dssp),
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_enum<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = value.into_deserializer();
    T::deserialize(deserializer)
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        let scoring = config.scoring.get_or_insert_with(Default::default);
        match key {
            "scoring.distance-min" => {
                scoring.distance_min = Some(parse_value(key, value_str, "float")?);
            }
            "scoring.distance-max" => {
                scoring.distance_max = Some(parse_value(key, value_str, "float")?);
            }
            "scoring.rsa-threshold" => {
                scoring.rsa_threshold = Some(parse_value(key, value_str, "float")?);
            }
            "scoring.contact-cutoff" => {
                scoring.contact_cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "scoring.ss-confidence-threshold" => {
                scoring.ss_confidence_threshold = Some(parse_value(key, value_str, "integer")?);
            }
            "scoring.top-couplings" => {
                scoring.top_couplings = Some(parse_value(key, value_str, "integer")?);
            }
            "scoring.normalize-sum" => {
                scoring.normalize_sum = Some(parse_value(key, value_str, "boolean")?);
            }
            "scoring.accessibility-filter" => {
                scoring.accessibility_filter =
                    Some(parse_enum::<AccessibilityFilter>(key, value_str)?);
            }
            "scoring.coevolution-atom" => {
                scoring.coevolution_atom = Some(parse_enum::<AtomSelector>(key, value_str)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
