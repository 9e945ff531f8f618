use super::error::{ScoringError, ensure_same_length};
use crate::core::models::residue::{AtomSelector, Backbone};
use crate::core::models::sequence::Sequence;
use nalgebra::Point3;
use tracing::trace;

/// One entry of a [`DistanceMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    /// Both residues are present but their distance is outside the accepted range, or the
    /// cell has not been visited (diagonal, lower triangle).
    #[default]
    Empty,
    /// One of the two positions is a gap in the query or the template.
    Gap,
    Distance(f64),
}

impl Cell {
    pub fn distance(self) -> Option<f64> {
        match self {
            Cell::Distance(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_gap(self) -> bool {
        matches!(self, Cell::Gap)
    }
}

/// Inclusive distance window in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRange {
    pub min: f64,
    pub max: f64,
}

impl DistanceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, distance: f64) -> bool {
        self.min <= distance && distance <= self.max
    }
}

/// Position of a residue for distance measurement: the alpha carbon is always required, the
/// beta carbon is used when both ends of a pair have one.
#[derive(Debug, Clone, Copy)]
struct Site {
    ca: Point3<f64>,
    cb: Option<Point3<f64>>,
}

impl Site {
    fn from_backbone(backbone: &Backbone, atom: AtomSelector) -> Option<Self> {
        let ca = backbone.ca?;
        let cb = match atom {
            AtomSelector::Alpha => None,
            AtomSelector::BetaWithAlphaFallback => backbone.cb,
        };
        Some(Self { ca, cb })
    }

    fn distance_to(&self, other: &Site) -> f64 {
        match (self.cb, other.cb) {
            (Some(a), Some(b)) => nalgebra::distance(&a, &b),
            _ => nalgebra::distance(&self.ca, &other.ca),
        }
    }
}

/// Square matrix of inter-residue distances measured on template coordinates.
///
/// Only the upper triangle (`i < j`) is filled. [`DistanceMatrix::lookup`] mirrors the
/// indices so that callers can ask for either orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<Cell>,
}

impl DistanceMatrix {
    fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a matrix from one optional point per position; `None` marks a gap.
    ///
    /// Distances outside `range` are left [`Cell::Empty`]. With no range every distance is
    /// kept.
    pub fn from_points(points: &[Option<Point3<f64>>], range: Option<DistanceRange>) -> Self {
        Self::fill(points, range, |a, b| nalgebra::distance(a, b))
    }

    /// Distance matrix over the alignment columns of `query` and `template`.
    ///
    /// A column is a gap when either sequence has a gap there. Non-gap columns take their
    /// coordinates from the template residue; a template residue without an alpha carbon is
    /// a data error.
    pub fn build(
        query: &Sequence,
        template: &Sequence,
        range: Option<DistanceRange>,
        atom: AtomSelector,
    ) -> Result<Self, ScoringError> {
        ensure_same_length(query.len(), template.len())?;

        let sites = (0..query.len())
            .map(|position| {
                if query.is_gap(position) || template.is_gap(position) {
                    return Ok(None);
                }
                template
                    .residue(position)
                    .and_then(|r| Site::from_backbone(r.backbone(), atom))
                    .map(Some)
                    .ok_or(ScoringError::MissingCoordinates { position })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::fill(&sites, range, Site::distance_to))
    }

    /// Contact map indexed by position in the ungapped query (0-based), sized to the full
    /// query length.
    ///
    /// The k-th non-gap query residue sits at `first - 1 + k`. Positions outside the aligned
    /// `[first, last]` span, and positions aligned to a template gap, are gaps. No distance
    /// window is applied.
    pub fn build_contact_map(
        query: &Sequence,
        template: &Sequence,
        query_length: usize,
        atom: AtomSelector,
    ) -> Result<Self, ScoringError> {
        ensure_same_length(query.len(), template.len())?;

        let offset = query.first().saturating_sub(1);
        let aligned = query.gapless_len();
        if offset + aligned > query_length {
            return Err(ScoringError::SpanOutOfBounds {
                first: query.first(),
                last: query.last(),
                query_length,
            });
        }

        let mut sites: Vec<Option<Site>> = vec![None; query_length];
        for (k, (position, _)) in query.cursor().enumerate() {
            if template.is_gap(position) {
                continue;
            }
            let site = template
                .residue(position)
                .and_then(|r| Site::from_backbone(r.backbone(), atom))
                .ok_or(ScoringError::MissingCoordinates { position })?;
            sites[offset + k] = Some(site);
        }

        Ok(Self::fill(&sites, None, Site::distance_to))
    }

    fn fill<T>(
        sites: &[Option<T>],
        range: Option<DistanceRange>,
        measure: impl Fn(&T, &T) -> f64,
    ) -> Self {
        let size = sites.len();
        let mut matrix = Self::empty(size);
        let mut measured = 0usize;

        for i in 0..size {
            let Some(row_site) = &sites[i] else {
                for j in i..size {
                    matrix.set(i, j, Cell::Gap);
                }
                continue;
            };
            for j in (i + 1)..size {
                if matrix.get(i, j).is_gap() {
                    continue;
                }
                match &sites[j] {
                    None => {
                        for k in i..j {
                            matrix.set(k, j, Cell::Gap);
                        }
                    }
                    Some(col_site) => {
                        let d = measure(row_site, col_site);
                        measured += 1;
                        if range.is_none_or(|r| r.contains(d)) {
                            matrix.set(i, j, Cell::Distance(d));
                        }
                    }
                }
            }
        }

        trace!(size, measured, "Distance matrix filled.");
        matrix
    }

    fn set(&mut self, i: usize, j: usize, cell: Cell) {
        self.cells[i * self.size + j] = cell;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw cell at `(i, j)`; out-of-bounds indices read as [`Cell::Empty`].
    pub fn get(&self, i: usize, j: usize) -> Cell {
        if i < self.size && j < self.size {
            self.cells[i * self.size + j]
        } else {
            Cell::Empty
        }
    }

    /// Cell for the unordered pair `{i, j}`, read from the populated triangle.
    pub fn lookup(&self, i: usize, j: usize) -> Cell {
        if i <= j {
            self.get(i, j)
        } else {
            self.get(j, i)
        }
    }

    /// Upper-triangle cells holding a distance, as `(i, j, distance)`.
    pub fn distances(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.size).flat_map(move |i| {
            ((i + 1)..self.size).filter_map(move |j| self.get(i, j).distance().map(|d| (i, j, d)))
        })
    }
}
