use super::{
    ComparativeModeler, ExternalToolError, ModelOutput, ModelRequest, absolute, check_output,
    program,
};
use crate::core::io::pir::query_code;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const TOOL: &str = "MODELLER";
const SCRIPT_NAME: &str = "build_model.py";
const RESULT_MARKER: &str = "THREADSCORE_MODEL";

/// Builds a single fast model and prints its file name and DOPE-HR energy on one
/// tab-separated line.
///
/// Arguments: alignment file, template code, query code, atom directory.
pub const MODELLER_SCRIPT: &str = r#"import sys
from modeller import Environ, log, assess
from modeller.automodel import AutoModel

aln_file, known, sequence, atom_dir = sys.argv[1:5]
log.none()
env = Environ()
env.io.atom_files_directory = [atom_dir]
model = AutoModel(env, alnfile=aln_file, knowns=known, sequence=sequence,
                  assess_methods=assess.DOPEHR)
model.very_fast()
model.starting_model = 1
model.ending_model = 1
model.make()
output = model.outputs[0]
if output.get("failure"):
    sys.exit("model construction failed: {}".format(output["failure"]))
print("THREADSCORE_MODEL\t{}\t{}".format(output["name"], output["DOPE-HR score"]))
"#;

/// Runs MODELLER through a Python interpreter inside the alignment's working directory.
#[derive(Debug, Clone)]
pub struct ModellerRunner {
    interpreter: PathBuf,
    script: String,
}

impl ModellerRunner {
    pub fn new(interpreter: PathBuf) -> Self {
        Self {
            interpreter,
            script: MODELLER_SCRIPT.to_string(),
        }
    }

    /// Replaces the driver script run by the interpreter.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }
}

fn parse_result(stdout: &str, work_dir: &Path) -> Result<ModelOutput, ExternalToolError> {
    let line = stdout
        .lines()
        .find(|l| l.starts_with(RESULT_MARKER))
        .ok_or_else(|| ExternalToolError::Output {
            tool: TOOL,
            details: "no model line in output".into(),
        })?;
    let fields: Vec<&str> = line.split('\t').collect();
    let [_, name, dope] = fields.as_slice() else {
        return Err(ExternalToolError::Output {
            tool: TOOL,
            details: format!("malformed model line '{}'", line),
        });
    };
    let dope: f64 = dope.trim().parse().map_err(|_| ExternalToolError::Output {
        tool: TOOL,
        details: format!("invalid energy '{}'", dope),
    })?;

    let model_path = work_dir.join(name.trim());
    if !model_path.is_file() {
        return Err(ExternalToolError::MissingProduct {
            tool: TOOL,
            path: model_path.to_string_lossy().to_string(),
        });
    }
    Ok(ModelOutput { model_path, dope })
}

impl ComparativeModeler for ModellerRunner {
    fn build_model(&self, request: &ModelRequest<'_>) -> Result<ModelOutput, ExternalToolError> {
        let work_dir = absolute(request.work_dir)?;
        let alignment_file = absolute(request.alignment_file)?;
        let atom_dir = absolute(request.atom_dir)?;
        let script_path = work_dir.join(SCRIPT_NAME);
        std::fs::write(&script_path, &self.script)
            .map_err(|e| ExternalToolError::io(&script_path, e))?;

        debug!(
            work_dir = ?work_dir,
            template = %request.alignment.template_info.pdb,
            "Running comparative modeling."
        );
        let output = Command::new(program(&self.interpreter)?)
            .arg(&script_path)
            .arg(&alignment_file)
            .arg(&request.alignment.template_info.pdb)
            .arg(query_code(request.alignment))
            .arg(&atom_dir)
            .current_dir(&work_dir)
            .output()
            .map_err(|source| ExternalToolError::Spawn { tool: TOOL, source })?;

        let stdout = check_output(TOOL, output)?;
        parse_result(&String::from_utf8_lossy(&stdout), &work_dir)
    }
}
