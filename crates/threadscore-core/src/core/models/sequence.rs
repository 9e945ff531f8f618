use super::cursor::GapSkippingCursor;
use super::residue::Residue;

/// A gapped sequence taking part in an alignment.
///
/// `first` and `last` are 1-based positions in the original ungapped sequence of the first
/// and last aligned residues.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    residues: Vec<Residue>,
    first: usize,
    last: usize,
}

impl Sequence {
    pub fn new(residues: Vec<Residue>, first: usize, last: usize) -> Self {
        Self {
            residues,
            first,
            last,
        }
    }

    /// Builds a sequence of bare residues (no structure labels, no coordinates) from a
    /// gapped one-letter string.
    pub fn from_gapped(sequence: &str, first: usize, last: usize) -> Self {
        Self::new(sequence.chars().map(Residue::new).collect(), first, last)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, position: usize) -> Option<&Residue> {
        self.residues.get(position)
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn is_gap(&self, position: usize) -> bool {
        self.residues.get(position).is_none_or(Residue::is_gap)
    }

    pub fn gapless_len(&self) -> usize {
        self.residues.iter().filter(|r| !r.is_gap()).count()
    }

    /// Alignment columns holding a residue, in order.
    pub fn residue_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.cursor().map(|(position, _)| position)
    }

    /// A cursor over the non-gap residues of this sequence.
    pub fn cursor(&self) -> GapSkippingCursor<'_, Residue, fn(&Residue) -> bool> {
        GapSkippingCursor::new(&self.residues, Residue::is_gap as fn(&Residue) -> bool)
    }

    /// A cursor over the residues that carry a secondary structure label.
    pub fn labelled_cursor(&self) -> GapSkippingCursor<'_, Residue, fn(&Residue) -> bool> {
        let unlabelled: fn(&Residue) -> bool = |r| r.secondary_structure().is_none();
        GapSkippingCursor::new(&self.residues, unlabelled)
    }

    pub fn to_gapped_string(&self) -> String {
        self.residues.iter().map(Residue::name).collect()
    }
}
