use std::path::PathBuf;

pub struct DefaultsConfig {
    pub distance_min: f64,
    pub distance_max: f64,
    pub rsa_threshold: f64,
    pub normalize_sum: bool,
    pub modeller_python: PathBuf,
    pub dssp: PathBuf,
    pub work_dir: PathBuf,
    pub structures_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            distance_min: 5.0,
            distance_max: 15.0,
            rsa_threshold: 0.25,
            normalize_sum: true,
            modeller_python: PathBuf::from("python3"),
            dssp: PathBuf::from("mkdssp"),
            work_dir: PathBuf::from("work"),
            structures_dir: PathBuf::from("structures"),
        }
    }
}
