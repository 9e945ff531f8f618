use crate::core::models::alignment::Alignment;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Step of an alignment's evaluation at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Preparation,
    Structure,
    Threading,
    Blosum,
    SecondaryStructure,
    Coevolution,
    Modeling,
    Accessibility,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Preparation => "preparation",
            Stage::Structure => "template structure",
            Stage::Threading => "threading score",
            Stage::Blosum => "BLOSUM score",
            Stage::SecondaryStructure => "secondary structure score",
            Stage::Coevolution => "co-evolution score",
            Stage::Modeling => "comparative modeling",
            Stage::Accessibility => "solvent accessibility",
        };
        f.write_str(name)
    }
}

/// A recorded per-alignment failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub alignment: usize,
    pub template: String,
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alignment #{} ({}): {} failed: {}",
            self.alignment, self.template, self.stage, self.message
        )
    }
}

/// Collects failures of one scoring run. Shared by reference between worker threads.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        // Poisoning only means a worker panicked mid-run; pushed entries are intact.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, alignment: &Alignment, stage: Stage, message: impl Into<String>) {
        self.lock().push(Diagnostic {
            alignment: alignment.num,
            template: alignment.template_name().to_string(),
            stage,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Takes every recorded entry, ordered by alignment number.
    pub fn drain(&self) -> Vec<Diagnostic> {
        let mut entries = std::mem::take(&mut *self.lock());
        entries.sort_by_key(|d| d.alignment);
        entries
    }
}
