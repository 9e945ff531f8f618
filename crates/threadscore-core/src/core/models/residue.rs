use nalgebra::Point3;
use serde::Deserialize;

/// The character used for alignment gaps, in residue names and in secondary structure strings.
pub const GAP: char = '-';

/// Three-state secondary structure classification, as produced by predictors
/// (PSIPRED style `H`/`E`/`C`) or derived from observed structures (DSSP codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryStructure {
    Helix,
    Sheet,
    Coil,
    Unknown,
}

impl SecondaryStructure {
    /// Parses a single secondary structure code.
    ///
    /// Returns `None` for the gap marker, so that a gapped label string maps directly onto
    /// `Option<SecondaryStructure>` per position. DSSP's eight-state alphabet is collapsed
    /// onto the three states.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            GAP => None,
            'H' | 'G' | 'I' => Some(Self::Helix),
            'E' | 'B' => Some(Self::Sheet),
            'C' | 'T' | 'S' | ' ' => Some(Self::Coil),
            _ => Some(Self::Unknown),
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Helix => 'H',
            Self::Sheet => 'E',
            Self::Coil => 'C',
            Self::Unknown => 'X',
        }
    }
}

/// Which backbone atom stands in for a residue when measuring inter-residue distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomSelector {
    /// Always the alpha carbon.
    #[default]
    Alpha,
    /// The beta carbon when resolved, the alpha carbon otherwise (glycine has no CB).
    BetaWithAlphaFallback,
}

/// Backbone atom positions of a single residue, in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Backbone {
    pub n: Option<Point3<f64>>,
    pub ca: Option<Point3<f64>>,
    pub c: Option<Point3<f64>>,
    pub cb: Option<Point3<f64>>,
}

impl Backbone {
    pub fn is_empty(&self) -> bool {
        self.n.is_none() && self.ca.is_none() && self.c.is_none() && self.cb.is_none()
    }

    pub fn select(&self, selector: AtomSelector) -> Option<Point3<f64>> {
        match selector {
            AtomSelector::Alpha => self.ca,
            AtomSelector::BetaWithAlphaFallback => self.cb.or(self.ca),
        }
    }
}

/// One position of a gapped sequence.
///
/// A residue is immutable once built. Gap residues never carry coordinates or a secondary
/// structure label: the `with_*` builders leave a gap untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    name: char,
    secondary_structure: Option<SecondaryStructure>,
    confidence: u8,
    backbone: Backbone,
}

impl Residue {
    pub fn new(name: char) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            secondary_structure: None,
            confidence: 0,
            backbone: Backbone::default(),
        }
    }

    pub fn gap() -> Self {
        Self::new(GAP)
    }

    /// Attaches a secondary structure label with a 0-9 confidence (clamped).
    pub fn with_secondary_structure(mut self, label: SecondaryStructure, confidence: u8) -> Self {
        if !self.is_gap() {
            self.secondary_structure = Some(label);
            self.confidence = confidence.min(9);
        }
        self
    }

    pub fn with_backbone(mut self, backbone: Backbone) -> Self {
        if !self.is_gap() {
            self.backbone = backbone;
        }
        self
    }

    pub fn name(&self) -> char {
        self.name
    }

    pub fn is_gap(&self) -> bool {
        self.name == GAP
    }

    pub fn secondary_structure(&self) -> Option<SecondaryStructure> {
        self.secondary_structure
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn backbone(&self) -> &Backbone {
        &self.backbone
    }
}
